//! Game orchestrator
//!
//! Owns every subsystem and runs the fixed per-frame pipeline: paddle input
//! arbitration, ball motion, wall/paddle/block collisions, recovery sweep,
//! scoring, particles, then the terminal checks. The engine is headless and
//! time comes in as an explicit millisecond clock, so a whole session can be
//! driven deterministically from a test.

use glam::Vec2;
use log::{debug, info};
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::Serialize;

use crate::config::{CardInfo, CardLayout, ConfigError, GameConfig};
use crate::consts::{
    AREA_EFFECT_PARTICLES, BALL_SPAWN_INSET, DESTRUCTION_PARTICLES, IMPACT_PARTICLES, LOSS_MARGIN,
};
use crate::input::InputState;
use crate::raster::TextRasterizer;
use crate::scheduler::FrameScheduler;

use super::ball::BallPhysics;
use super::blocks::{BlockField, RecoveryState};
use super::layout;
use super::paddle::PaddleController;
use super::particles::ParticleSystem;

/// Points for the block the ball actually hit
const PRIMARY_BLOCK_SCORE: u32 = 10;
/// Points for each block taken down by the area effect
const AREA_BLOCK_SCORE: u32 = 5;
/// Chance an area-effect destruction also emits a small burst
const AREA_EFFECT_CHANCE: f32 = 0.3;

/// Snapshot of the session flags and score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SessionState {
    pub running: bool,
    pub paused: bool,
    pub game_over: bool,
    pub cleared: bool,
    pub score: u32,
}

#[derive(Debug)]
pub struct GameEngine<R: TextRasterizer> {
    config: GameConfig,
    rasterizer: R,

    ball: BallPhysics,
    paddle: PaddleController,
    blocks: BlockField,
    particles: ParticleSystem,
    scheduler: FrameScheduler,

    /// Gameplay randomness (launch angle, effect chance); cosmetic jitter
    /// lives on its own stream inside the particle system
    rng: Pcg32,

    running: bool,
    paused: bool,
    game_over: bool,
    cleared: bool,
    score: u32,
}

impl<R: TextRasterizer> GameEngine<R> {
    /// Build a session. Configuration problems are fatal here; a session
    /// never starts half-validated.
    pub fn new(config: GameConfig, rasterizer: R) -> Result<Self, ConfigError> {
        config.validate()?;

        let ball = BallPhysics::new(
            config.width / 2.0,
            config.height / 2.0,
            config.ball_radius,
            config.ball_speed,
        );
        let paddle = PaddleController::new(
            config.width / 2.0 - config.paddle_width / 2.0,
            config.height - config.paddle_height - 1.0,
            config.paddle_width,
            config.paddle_height,
        );
        let blocks = BlockField::new(config.block_recovery_ms, config.block_fade_in_ms);
        // Offset so the cosmetic stream never mirrors the gameplay stream.
        let particles = ParticleSystem::new(config.seed.wrapping_add(1));
        let rng = Pcg32::seed_from_u64(config.seed);

        Ok(Self {
            config,
            rasterizer,
            ball,
            paddle,
            blocks,
            particles,
            scheduler: FrameScheduler::new(),
            rng,
            running: false,
            paused: false,
            game_over: false,
            cleared: false,
            score: 0,
        })
    }

    /// Generate the block field from a card and reset positions. Replaces
    /// any previous field wholesale.
    pub fn load_card(&mut self, card: &CardInfo, layout_variant: CardLayout) {
        let blocks = layout::generate_blocks(&mut self.rasterizer, card, &self.config, layout_variant);
        debug!("loaded card field: {} blocks ({layout_variant:?})", blocks.len());
        self.blocks.replace(blocks);
        self.reset_positions();
    }

    /// Launch the ball and begin scheduling frames. No-op while running.
    pub fn start(&mut self) {
        if self.running {
            return;
        }

        self.running = true;
        self.paused = false;

        // Launch cone: mostly sideways, always with an upward component.
        let angle = (self.rng.random::<f32>() - 0.5) * std::f32::consts::FRAC_PI_2;
        self.ball.set_velocity(
            angle.cos() * self.config.ball_speed,
            -(angle.sin() * self.config.ball_speed).abs(),
        );

        info!("session started");
        self.scheduler.resume();
        self.scheduler.request();
    }

    pub fn toggle_pause(&mut self) {
        self.paused = !self.paused;
        info!("session {}", if self.paused { "paused" } else { "resumed" });
    }

    /// Return to the pre-start state with a full field and zero score. The
    /// session stays stopped until the next `start`.
    pub fn restart(&mut self) {
        self.reset_positions();
        self.blocks.reset();
        self.particles.clear();
        self.score = 0;
        self.running = false;
        self.paused = false;
        self.game_over = false;
        self.cleared = false;
        info!("session restarted");
    }

    /// Stop the session and cancel any queued frame. Idempotent.
    pub fn stop(&mut self) {
        self.running = false;
        self.scheduler.cancel();
    }

    /// Run one frame at the given clock. Paused frames skip the update but
    /// keep the schedule alive; terminal frames do nothing.
    pub fn frame(&mut self, now_ms: f64, input: &InputState) {
        if !self.running {
            return;
        }

        if !self.paused {
            self.update(now_ms, input);
        }

        if self.running && !self.game_over && !self.cleared {
            self.scheduler.request();
        }
    }

    fn update(&mut self, now_ms: f64, input: &InputState) {
        self.paddle
            .update(input, self.config.width, self.config.paddle_speed, now_ms);

        // Pointer follows only while the keyboard has gone quiet.
        if input.pointer_active(now_ms) && !self.paddle.is_keyboard_active(now_ms) {
            self.paddle
                .update_from_pointer(input.pointer_x, self.config.width);
        }

        self.ball.update();
        self.ball
            .check_wall_collision(self.config.width, self.config.height);
        self.ball.check_paddle_collision(
            self.paddle.pos().x,
            self.paddle.pos().y,
            self.paddle.width(),
            self.paddle.height(),
        );

        self.blocks.sweep_recovery(now_ms);

        if let Some(index) = self.blocks.check_collision(self.ball.pos(), self.ball.radius()) {
            let block = &self.blocks.blocks()[index];
            let rect = (block.x, block.y, block.width, block.height);
            let center = block.center();
            let color = block.color;

            self.blocks.destroy(index, now_ms);
            self.particles
                .emit_destruction(center, color, DESTRUCTION_PARTICLES);
            self.score += PRIMARY_BLOCK_SCORE;

            self.destroy_nearby(self.ball.pos(), self.ball.radius() * 0.5, now_ms);

            // The bounce is computed against the already-destroyed block's
            // rectangle, after the area pass has run.
            let collision = self
                .ball
                .check_block_collision(rect.0, rect.1, rect.2, rect.3);
            if collision.collided {
                self.particles
                    .emit_impact(self.ball.pos(), color, IMPACT_PARTICLES);
            }
        }

        self.particles.update();

        if self.ball.pos().y > self.config.height + LOSS_MARGIN {
            self.game_over = true;
            self.running = false;
            info!("game over at score {}", self.score);
        }

        if self.blocks.all_destroyed() {
            self.cleared = true;
            self.running = false;
            info!("field cleared at score {}", self.score);
        }
    }

    /// Area-of-effect pass around the primary hit. Scores less per block and
    /// only sometimes spends particles on each one.
    fn destroy_nearby(&mut self, center: Vec2, radius: f32, now_ms: f64) {
        for (block_center, color) in self.blocks.destroy_within(center, radius, now_ms) {
            self.score += AREA_BLOCK_SCORE;
            if self.rng.random::<f32>() < AREA_EFFECT_CHANCE {
                self.particles
                    .emit_destruction(block_center, color, AREA_EFFECT_PARTICLES);
            }
        }
    }

    fn reset_positions(&mut self) {
        self.ball
            .reset(self.config.width - BALL_SPAWN_INSET, BALL_SPAWN_INSET);
        self.paddle.reset(
            self.config.width / 2.0 - self.config.paddle_width / 2.0,
            self.config.height - self.config.paddle_height - 1.0,
        );
    }

    pub fn state(&self) -> SessionState {
        SessionState {
            running: self.running,
            paused: self.paused,
            game_over: self.game_over,
            cleared: self.cleared,
            score: self.score,
        }
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn ball(&self) -> &BallPhysics {
        &self.ball
    }

    pub fn paddle(&self) -> &PaddleController {
        &self.paddle
    }

    pub fn blocks(&self) -> &BlockField {
        &self.blocks
    }

    /// Mutable field access for hosts that tune recovery timing or install
    /// a prebuilt field
    pub fn blocks_mut(&mut self) -> &mut BlockField {
        &mut self.blocks
    }

    pub fn particles(&self) -> &ParticleSystem {
        &self.particles
    }

    pub fn scheduler_mut(&mut self) -> &mut FrameScheduler {
        &mut self.scheduler
    }

    /// Mutable ball access for hosts that implement custom launch behavior
    pub fn ball_mut(&mut self) -> &mut BallPhysics {
        &mut self.ball
    }

    /// Visual recovery state of a block by index, for renderers
    pub fn block_visual(&self, index: usize, now_ms: f64) -> Option<RecoveryState> {
        self.blocks
            .blocks()
            .get(index)
            .map(|b| self.blocks.recovery_state(b, now_ms))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::raster::GlyphGridRasterizer;
    use crate::sim::blocks::Block;

    fn engine() -> GameEngine<GlyphGridRasterizer> {
        let config = GameConfig::for_playfield(320.0, 200.0);
        GameEngine::new(config, GlyphGridRasterizer::default()).unwrap()
    }

    fn engine_with_blocks(blocks: Vec<Block>) -> GameEngine<GlyphGridRasterizer> {
        let mut e = engine();
        e.blocks_mut().replace(blocks);
        e
    }

    #[test]
    fn test_invalid_config_is_fatal() {
        let mut config = GameConfig::for_playfield(320.0, 200.0);
        config.ball_speed = 0.0;
        let err = GameEngine::new(config, GlyphGridRasterizer::default()).unwrap_err();
        assert_eq!(err, ConfigError::NonPositiveBallSpeed(0.0));
    }

    #[test]
    fn test_start_launches_upward_and_schedules() {
        let mut e = engine_with_blocks(vec![Block::new(10.0, 10.0, 1.0, 0xFFFFFF)]);
        assert_eq!(e.ball().vel(), Vec2::ZERO);

        e.start();
        let state = e.state();
        assert!(state.running && !state.paused);
        assert!(e.ball().vel().y <= 0.0);
        assert!((e.ball().vel().length() - e.config().ball_speed).abs() < 1e-3);
        assert!(e.scheduler_mut().take_request());
    }

    #[test]
    fn test_start_is_noop_while_running() {
        let mut e = engine_with_blocks(vec![Block::new(10.0, 10.0, 1.0, 0xFFFFFF)]);
        e.start();
        let vel = e.ball().vel();
        e.start();
        assert_eq!(e.ball().vel(), vel);
    }

    #[test]
    fn test_pause_freezes_update_but_keeps_schedule() {
        let mut e = engine_with_blocks(vec![Block::new(10.0, 10.0, 1.0, 0xFFFFFF)]);
        e.start();
        e.scheduler_mut().take_request();
        e.toggle_pause();

        let pos = e.ball().pos();
        e.frame(16.0, &InputState::default());
        assert_eq!(e.ball().pos(), pos);
        // A paused frame still queues the next one.
        assert!(e.scheduler_mut().take_request());

        e.toggle_pause();
        e.frame(32.0, &InputState::default());
        assert_ne!(e.ball().pos(), pos);
    }

    #[test]
    fn test_primary_hit_scores_and_destroys() {
        // One block directly in the ball's path, far from anything else.
        let mut e = engine_with_blocks(vec![
            Block::new(100.0, 100.0, 1.0, 0xF16584),
            Block::new(300.0, 10.0, 1.0, 0xF16584),
        ]);
        e.start();
        e.ball_mut().reset(100.5, 100.5);
        e.ball_mut().set_velocity(0.0, 3.0);

        e.frame(16.0, &InputState::default());
        assert!(e.blocks().blocks()[0].destroyed);
        assert!(!e.blocks().blocks()[1].destroyed);
        assert_eq!(e.score(), 10);
        assert!(!e.particles().is_empty());
    }

    #[test]
    fn test_area_effect_scores_five_per_block() {
        // A tight cluster: the primary hit takes one block for 10 points and
        // the area pass takes the neighbors for 5 each.
        let mut e = engine_with_blocks(vec![
            Block::new(100.0, 100.0, 1.0, 0xF16584),
            Block::new(101.0, 100.0, 1.0, 0xF16584),
            Block::new(102.0, 100.0, 1.0, 0xF16584),
            Block::new(300.0, 10.0, 1.0, 0xF16584),
        ]);
        e.start();
        e.ball_mut().reset(100.5, 100.5);
        e.ball_mut().set_velocity(0.0, 3.0);

        e.frame(16.0, &InputState::default());
        // Ball radius is 4, so the area pass reaches distance < 4 around the
        // ball and takes both neighbors.
        assert_eq!(e.score(), 10 + 5 + 5);
        assert!(!e.blocks().blocks()[3].destroyed);
    }

    #[test]
    fn test_clearing_the_field_ends_the_session() {
        let mut e = engine_with_blocks(vec![Block::new(100.0, 100.0, 1.0, 0xF16584)]);
        e.start();
        assert!(e.scheduler_mut().take_request());
        e.ball_mut().reset(100.5, 100.5);
        e.ball_mut().set_velocity(0.0, 3.0);

        e.frame(16.0, &InputState::default());
        let state = e.state();
        assert!(state.cleared && !state.running && !state.game_over);
        // No further frame was queued and later frames are ignored.
        assert!(!e.scheduler_mut().take_request());
        let score = e.score();
        e.frame(32.0, &InputState::default());
        assert_eq!(e.score(), score);
    }

    #[test]
    fn test_ball_below_margin_is_a_loss() {
        let mut e = engine_with_blocks(vec![Block::new(10.0, 10.0, 1.0, 0xFFFFFF)]);
        e.start();
        e.ball_mut().reset(160.0, 248.0);
        e.ball_mut().set_velocity(0.0, 3.0);

        // 248 + 3 = 251 > 200 + 50.
        e.frame(16.0, &InputState::default());
        let state = e.state();
        assert!(state.game_over && !state.running && !state.cleared);
    }

    #[test]
    fn test_exactly_on_margin_is_not_a_loss() {
        let mut e = engine_with_blocks(vec![Block::new(10.0, 10.0, 1.0, 0xFFFFFF)]);
        e.start();
        e.ball_mut().reset(160.0, 247.0);
        e.ball_mut().set_velocity(0.0, 3.0);

        e.frame(16.0, &InputState::default());
        assert!(!e.state().game_over);
    }

    #[test]
    fn test_restart_resets_but_stays_stopped() {
        let mut e = engine_with_blocks(vec![Block::new(100.0, 100.0, 1.0, 0xF16584)]);
        e.start();
        e.ball_mut().reset(100.5, 100.5);
        e.ball_mut().set_velocity(0.0, 3.0);
        e.frame(16.0, &InputState::default());
        assert!(e.state().cleared);

        e.restart();
        let state = e.state();
        assert_eq!(state.score, 0);
        assert!(!state.running && !state.game_over && !state.cleared);
        assert!(!e.blocks().blocks()[0].destroyed);
        assert!(e.particles().is_empty());
        // Spawn positions are restored.
        assert_eq!(e.ball().pos(), Vec2::new(270.0, 50.0));
        assert_eq!(e.ball().vel(), Vec2::ZERO);
    }

    #[test]
    fn test_stop_cancels_queued_frame() {
        let mut e = engine_with_blocks(vec![Block::new(10.0, 10.0, 1.0, 0xFFFFFF)]);
        e.start();
        e.stop();
        assert!(!e.state().running);
        assert!(!e.scheduler_mut().take_request());
        // Stopping again is harmless.
        e.stop();
    }

    #[test]
    fn test_pointer_defers_to_recent_keyboard() {
        let mut e = engine_with_blocks(vec![Block::new(10.0, 10.0, 1.0, 0xFFFFFF)]);
        e.start();

        // Hold a key at t=1000: paddle moves right, pointer is ignored.
        let mut input = InputState::default();
        input.right_pressed = true;
        input.pointer_moved(10.0, 1000.0);
        let x0 = e.paddle().pos().x;
        e.frame(1000.0, &input);
        assert!(e.paddle().pos().x > x0);

        // Key released; within the 500ms window the pointer still waits.
        input.right_pressed = false;
        input.pointer_moved(10.0, 1300.0);
        e.frame(1300.0, &input);
        assert!(e.paddle().pos().x > x0);

        // Window expired: the paddle snaps under the pointer.
        input.pointer_moved(10.0, 1600.0);
        e.frame(1600.0, &input);
        assert_eq!(e.paddle().pos().x, 0.0);
    }

    #[test]
    fn test_empty_field_clears_on_first_frame() {
        let mut e = engine();
        e.blocks_mut().replace(Vec::new());
        e.start();
        e.frame(16.0, &InputState::default());
        assert!(e.state().cleared);
    }

    #[test]
    fn test_load_card_builds_a_field_and_resets() {
        let mut e = engine();
        e.load_card(&CardInfo::sample(), CardLayout::Standard);
        assert!(!e.blocks().is_empty());
        assert_eq!(e.ball().pos(), Vec2::new(270.0, 50.0));

        // Loading a different card replaces the field, never accumulates.
        let small = CardInfo {
            name: Some("A".into()),
            ..CardInfo::default()
        };
        let full_len = e.blocks().len();
        e.load_card(&small, CardLayout::Minimal);
        assert!(e.blocks().len() < full_len);
    }

    #[test]
    fn test_full_session_invariants_hold() {
        // Drive a real session through the scheduler loop with the pointer
        // pinned under the ball, checking frame-by-frame invariants.
        let mut e = engine();
        e.load_card(&CardInfo::sample(), CardLayout::Standard);
        e.start();

        let mut input = InputState::default();
        let mut now_ms = 0.0;
        let mut last_score = 0;

        for _ in 0..600 {
            if !e.scheduler_mut().take_request() {
                break;
            }
            input.pointer_moved(e.ball().pos().x, now_ms);
            e.frame(now_ms, &input);
            now_ms += 1000.0 / 60.0;

            let state = e.state();
            assert!(state.score >= last_score, "score went backwards");
            last_score = state.score;

            let pos = e.ball().pos();
            let cfg = e.config();
            assert!(pos.x >= 0.0 && pos.x <= cfg.width);
            assert!(pos.y <= cfg.height + 50.0 + cfg.ball_speed + 1.0);

            if state.game_over || state.cleared {
                assert!(!state.running);
                break;
            }
        }

        // With the paddle glued under the ball the session never ends in a
        // loss within this window.
        assert!(!e.state().game_over);
    }
}

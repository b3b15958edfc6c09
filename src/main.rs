//! Card Breaker headless demo
//!
//! Builds a session from the sample business card, autopilots the paddle
//! under the ball, and drives the frame loop the way a host scheduler would:
//! poll `take_request`, gate on `begin_frame`, run one frame.

use card_breaker::raster::GlyphGridRasterizer;
use card_breaker::sim::GameEngine;
use card_breaker::{CardInfo, CardLayout, GameConfig, InputState};

const FRAME_MS: f64 = 1000.0 / 60.0;
const MAX_FRAMES: u64 = 60 * 120;

fn main() {
    env_logger::init();

    let mut config = GameConfig::for_playfield(640.0, 400.0);
    config.seed = 0xCA4D;

    let mut engine = match GameEngine::new(config, GlyphGridRasterizer::default()) {
        Ok(engine) => engine,
        Err(err) => {
            log::error!("bad configuration: {err}");
            std::process::exit(1);
        }
    };

    engine.load_card(&CardInfo::sample(), CardLayout::Standard);
    log::info!("field ready: {} blocks", engine.blocks().len());

    engine.start();

    let mut input = InputState::default();
    let mut now_ms = 0.0;
    let mut frames = 0u64;

    while frames < MAX_FRAMES && engine.scheduler_mut().take_request() {
        if !engine.scheduler_mut().begin_frame() {
            break;
        }

        // Autopilot: steer with the pointer, keeping it under the ball.
        input.pointer_moved(engine.ball().pos().x, now_ms);
        engine.frame(now_ms, &input);

        now_ms += FRAME_MS;
        frames += 1;
    }

    let state = engine.state();
    let outcome = if state.cleared {
        "cleared"
    } else if state.game_over {
        "game over"
    } else {
        "stopped"
    };
    println!(
        "{outcome} after {frames} frames: score {}, {} particles live",
        state.score,
        engine.particles().len()
    );
}

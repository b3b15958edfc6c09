//! Destructible block field and recovery state machine
//!
//! Each block is one scanned pixel of rasterized card text: a unit square in
//! logical coordinates whose position never changes. Only the destroyed flag
//! and timestamp mutate. A destroyed block stays hidden for the recovery
//! window, then fades back in linearly; it becomes collidable again the
//! instant the sweep clears its flag at recovery + fade elapsed, not when
//! the visual alpha reaches 1.

use glam::Vec2;

/// One destructible pixel-block
#[derive(Debug, Clone)]
pub struct Block {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    /// 0xRRGGBB, assigned from the element palette at generation time
    pub color: u32,
    pub destroyed: bool,
    pub destroyed_at: f64,
}

impl Block {
    pub fn new(x: f32, y: f32, size: f32, color: u32) -> Self {
        Self {
            x,
            y,
            width: size,
            height: size,
            color,
            destroyed: false,
            destroyed_at: 0.0,
        }
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }
}

/// Visual recovery state for rendering; decoupled from collidability
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RecoveryState {
    pub destroyed: bool,
    /// 0 while hidden, linear ramp during fade-in, 1 when alive
    pub alpha: f32,
}

/// The full block collection plus recovery timing
#[derive(Debug)]
pub struct BlockField {
    blocks: Vec<Block>,
    recovery_ms: f64,
    fade_in_ms: f64,
}

impl BlockField {
    pub fn new(recovery_ms: f64, fade_in_ms: f64) -> Self {
        Self {
            blocks: Vec::new(),
            recovery_ms,
            fade_in_ms,
        }
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Install a freshly generated field, discarding the previous one
    pub fn replace(&mut self, blocks: Vec<Block>) {
        self.blocks = blocks;
    }

    /// Mark a block destroyed. No-op (returning false) for out-of-range
    /// indices and blocks that are already down.
    pub fn destroy(&mut self, index: usize, now_ms: f64) -> bool {
        match self.blocks.get_mut(index) {
            Some(block) if !block.destroyed => {
                block.destroyed = true;
                block.destroyed_at = now_ms;
                true
            }
            _ => false,
        }
    }

    /// Visual state of a block as a function of time since destruction
    pub fn recovery_state(&self, block: &Block, now_ms: f64) -> RecoveryState {
        if !block.destroyed {
            return RecoveryState {
                destroyed: false,
                alpha: 1.0,
            };
        }

        let elapsed = now_ms - block.destroyed_at;
        if elapsed < self.recovery_ms {
            return RecoveryState {
                destroyed: true,
                alpha: 0.0,
            };
        }

        let fade = elapsed - self.recovery_ms;
        if fade < self.fade_in_ms {
            return RecoveryState {
                destroyed: false,
                alpha: (fade / self.fade_in_ms) as f32,
            };
        }

        RecoveryState {
            destroyed: false,
            alpha: 1.0,
        }
    }

    /// Clear the destroyed flag on every block whose recovery + fade window
    /// has fully elapsed. Must run once per frame before collision checks.
    pub fn sweep_recovery(&mut self, now_ms: f64) {
        let total = self.recovery_ms + self.fade_in_ms;
        for block in &mut self.blocks {
            if block.destroyed && now_ms - block.destroyed_at >= total {
                block.destroyed = false;
            }
        }
    }

    /// First non-destroyed block overlapping the ball, in stored order
    pub fn check_collision(&self, ball_pos: Vec2, ball_radius: f32) -> Option<usize> {
        let r_sq = ball_radius * ball_radius;
        for (i, block) in self.blocks.iter().enumerate() {
            if block.destroyed {
                continue;
            }

            let closest = Vec2::new(
                ball_pos.x.clamp(block.x, block.x + block.width),
                ball_pos.y.clamp(block.y, block.y + block.height),
            );
            if ball_pos.distance_squared(closest) < r_sq {
                return Some(i);
            }
        }
        None
    }

    /// Area-of-effect destruction: take down every live block whose center
    /// lies within twice the given radius. Returns the centers and colors of
    /// the destroyed blocks for scoring and effects. Never touches the ball.
    pub fn destroy_within(&mut self, center: Vec2, radius: f32, now_ms: f64) -> Vec<(Vec2, u32)> {
        let mut downed = Vec::new();
        for block in &mut self.blocks {
            if block.destroyed {
                continue;
            }
            let block_center = block.center();
            if block_center.distance(center) < radius * 2.0 {
                block.destroyed = true;
                block.destroyed_at = now_ms;
                downed.push((block_center, block.color));
            }
        }
        downed
    }

    /// True when every block is down; vacuously true for an empty field
    pub fn all_destroyed(&self) -> bool {
        self.blocks.iter().all(|b| b.destroyed)
    }

    /// Revive every block (restart)
    pub fn reset(&mut self) {
        for block in &mut self.blocks {
            block.destroyed = false;
            block.destroyed_at = 0.0;
        }
    }

    pub fn set_recovery_ms(&mut self, ms: f64) {
        self.recovery_ms = ms;
    }

    pub fn set_fade_in_ms(&mut self, ms: f64) {
        self.fade_in_ms = ms;
    }
}

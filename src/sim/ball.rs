//! Ball physics
//!
//! A point-mass circle with purely inertial motion: no gravity, no friction.
//! Glancing collisions can bleed speed through floating-point loss, so the
//! update step renormalizes any nonzero velocity back up to the base speed.
//! Velocities are in pixels per frame.

use glam::Vec2;

/// Result of a ball-vs-block test
#[derive(Debug, Clone, Copy)]
pub struct BlockCollision {
    pub collided: bool,
    /// Contact normal from closest point toward the ball center; zero when
    /// the ball center sits exactly on the closest point, in which case no
    /// reflection is applied
    pub normal: Vec2,
}

impl BlockCollision {
    pub fn miss() -> Self {
        Self {
            collided: false,
            normal: Vec2::ZERO,
        }
    }
}

/// The ball: position, velocity, radius, and an immutable base speed
#[derive(Debug, Clone)]
pub struct BallPhysics {
    pos: Vec2,
    vel: Vec2,
    radius: f32,
    base_speed: f32,
}

impl BallPhysics {
    /// Callers must guarantee `base_speed > 0`
    pub fn new(x: f32, y: f32, radius: f32, base_speed: f32) -> Self {
        Self {
            pos: Vec2::new(x, y),
            vel: Vec2::ZERO,
            radius,
            base_speed,
        }
    }

    pub fn pos(&self) -> Vec2 {
        self.pos
    }

    pub fn vel(&self) -> Vec2 {
        self.vel
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    pub fn base_speed(&self) -> f32 {
        self.base_speed
    }

    /// Advance one frame and enforce the speed floor
    pub fn update(&mut self) {
        self.pos += self.vel;

        let speed = self.vel.length();
        if speed > 0.0 && speed < self.base_speed {
            self.vel *= self.base_speed / speed;
        }
    }

    /// Direct velocity override (used for the launch impulse)
    pub fn set_velocity(&mut self, vx: f32, vy: f32) {
        self.vel = Vec2::new(vx, vy);
    }

    /// Move to a spawn point with zero velocity
    pub fn reset(&mut self, x: f32, y: f32) {
        self.pos = Vec2::new(x, y);
        self.vel = Vec2::ZERO;
    }

    /// Reflect off the side and top walls, clamping position inside. The
    /// bottom edge is open: falling through it is the loss condition and is
    /// judged by the orchestrator, not here.
    pub fn check_wall_collision(&mut self, width: f32, _height: f32) {
        if self.pos.x - self.radius < 0.0 {
            self.pos.x = self.radius;
            self.vel.x = self.vel.x.abs();
        }
        if self.pos.x + self.radius > width {
            self.pos.x = width - self.radius;
            self.vel.x = -self.vel.x.abs();
        }
        if self.pos.y - self.radius < 0.0 {
            self.pos.y = self.radius;
            self.vel.y = self.vel.y.abs();
        }
    }

    /// AABB test against the paddle. A hit maps the contact position along
    /// the paddle to a launch angle in ±0.35π and always sends the ball
    /// upward, seated exactly on the paddle top so it cannot sink in.
    pub fn check_paddle_collision(
        &mut self,
        paddle_x: f32,
        paddle_y: f32,
        paddle_width: f32,
        paddle_height: f32,
    ) -> bool {
        if self.pos.y + self.radius >= paddle_y
            && self.pos.y - self.radius <= paddle_y + paddle_height
            && self.pos.x + self.radius >= paddle_x
            && self.pos.x - self.radius <= paddle_x + paddle_width
        {
            let hit_pos = (self.pos.x - paddle_x) / paddle_width;
            let angle = (hit_pos - 0.5) * std::f32::consts::PI * 0.7;

            self.vel.x = angle.sin() * self.base_speed;
            self.vel.y = -(angle.cos() * self.base_speed).abs();
            self.pos.y = paddle_y - self.radius;
            return true;
        }
        false
    }

    /// Closest-point circle-vs-rectangle test. On overlap the ball is pushed
    /// out along the contact normal by the penetration depth and its velocity
    /// is specularly reflected (v' = v - 2(v.n)n), preserving speed.
    pub fn check_block_collision(
        &mut self,
        block_x: f32,
        block_y: f32,
        block_width: f32,
        block_height: f32,
    ) -> BlockCollision {
        let closest = Vec2::new(
            self.pos.x.clamp(block_x, block_x + block_width),
            self.pos.y.clamp(block_y, block_y + block_height),
        );
        let delta = self.pos - closest;
        let dist_sq = delta.length_squared();

        if dist_sq < self.radius * self.radius {
            let dist = dist_sq.sqrt();
            let normal = if dist > 0.0 { delta / dist } else { Vec2::ZERO };

            let overlap = self.radius - dist;
            self.pos += normal * overlap;

            self.vel -= 2.0 * self.vel.dot(normal) * normal;

            return BlockCollision {
                collided: true,
                normal,
            };
        }

        BlockCollision::miss()
    }
}

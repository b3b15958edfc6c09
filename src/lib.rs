//! Card Breaker - a breakout arcade engine built from business-card text
//!
//! Core modules:
//! - `sim`: Deterministic simulation (ball/paddle physics, block field, game state)
//! - `config`: Explicit session configuration and card data
//! - `raster`: Text rasterization capability traits (headless-testable)
//! - `input`: Host-updated input snapshot
//! - `scheduler`: Frame scheduling state machine

pub mod config;
pub mod input;
pub mod raster;
pub mod scheduler;
pub mod sim;

pub use config::{CardInfo, CardLayout, ConfigError, ElementKind, ElementPalette, GameConfig};
pub use input::InputState;
pub use scheduler::FrameScheduler;

/// Game tuning constants
pub mod consts {
    /// How long keyboard input keeps priority over pointer movement (ms)
    pub const KEYBOARD_PRIORITY_MS: f64 = 500.0;
    /// How long pointer movement counts as "active" (ms)
    pub const POINTER_PRIORITY_MS: f64 = 500.0;

    /// Block recovery defaults (ms)
    pub const BLOCK_RECOVERY_MS: f64 = 10_000.0;
    pub const BLOCK_FADE_IN_MS: f64 = 5_000.0;

    /// Alpha cutoff for the raster scan; anti-aliased fringe pixels stay
    /// below this and must not become blocks
    pub const ALPHA_THRESHOLD: u8 = 20;

    /// Distance past the bottom edge before the ball counts as lost
    pub const LOSS_MARGIN: f32 = 50.0;

    /// Playfield-relative sizing ratios
    pub const PADDLE_WIDTH_RATIO: f32 = 0.4;
    pub const PADDLE_SPEED_RATIO: f32 = 0.015;
    pub const BALL_SPEED_RATIO: f32 = 0.009;
    pub const BALL_RADIUS_RATIO: f32 = 0.012;

    /// Floors for the derived values above
    pub const MIN_PADDLE_SPEED: f32 = 5.0;
    pub const MIN_BALL_SPEED: f32 = 3.0;
    pub const MIN_BALL_RADIUS: f32 = 4.0;

    pub const PADDLE_HEIGHT: f32 = 4.0;
    pub const DESTRUCTION_RADIUS: f32 = 30.0;

    /// Ball spawn offset from the top-right corner
    pub const BALL_SPAWN_INSET: f32 = 50.0;

    /// Particle counts for the two effect kinds
    pub const DESTRUCTION_PARTICLES: usize = 15;
    pub const AREA_EFFECT_PARTICLES: usize = 3;
    pub const IMPACT_PARTICLES: usize = 8;
}

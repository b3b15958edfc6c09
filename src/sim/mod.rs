//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Explicit millisecond clock, no wall-time reads
//! - Seeded RNG only
//! - Stable block iteration in generation order
//! - No rendering or platform dependencies

pub mod ball;
pub mod blocks;
pub mod engine;
pub mod fonts;
pub mod layout;
pub mod paddle;
pub mod particles;

pub use ball::{BallPhysics, BlockCollision};
pub use blocks::{Block, BlockField, RecoveryState};
pub use engine::{GameEngine, SessionState};
pub use fonts::{FontScript, font_stack_for};
pub use layout::{ElementSpan, LayoutParams, generate_blocks};
pub use paddle::PaddleController;
pub use particles::{Particle, ParticleSystem};

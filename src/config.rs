//! Session configuration and card data
//!
//! Everything the engine needs is supplied explicitly at construction; there
//! is no module-level mutable state. Ratios mirror the way the playfield
//! scales gameplay values with its logical width.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Layout variant for the generated block field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum CardLayout {
    #[default]
    Standard,
    Professional,
    Minimal,
}

/// Semantic element of a business card; drives block coloring only
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ElementKind {
    Name,
    NameEn,
    Title,
    Tagline,
    Company,
    Email,
    Phone,
    Sns,
    Website,
}

/// Business-card text fields; empty/missing fields are skipped entirely by
/// the layout pass (no gap is reserved for them)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CardInfo {
    pub name: Option<String>,
    pub name_en: Option<String>,
    pub title: Option<String>,
    pub tagline: Option<String>,
    pub company: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub sns: Option<String>,
    pub website: Option<String>,
}

impl CardInfo {
    /// Fetch a field, treating whitespace-only strings as absent
    pub fn field(&self, kind: ElementKind) -> Option<&str> {
        let raw = match kind {
            ElementKind::Name => &self.name,
            ElementKind::NameEn => &self.name_en,
            ElementKind::Title => &self.title,
            ElementKind::Tagline => &self.tagline,
            ElementKind::Company => &self.company,
            ElementKind::Email => &self.email,
            ElementKind::Phone => &self.phone,
            ElementKind::Sns => &self.sns,
            ElementKind::Website => &self.website,
        };
        raw.as_deref().filter(|s| !s.trim().is_empty())
    }

    /// Sample card used by the demo binary and tests
    pub fn sample() -> Self {
        Self {
            name: Some("山田　太郎".into()),
            name_en: Some("Taro Yamada".into()),
            title: Some("Senior Software Engineer".into()),
            tagline: Some("Building the future, one line at a time.".into()),
            company: Some("Tech Solutions Inc.".into()),
            email: Some("taro.yamada@example.com".into()),
            phone: Some("+81-90-0000-0000".into()),
            sns: Some("https://example.com/taroy".into()),
            website: Some("https://www.example.com/".into()),
        }
    }
}

/// Per-element block colors (0xRRGGBB)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ElementPalette {
    pub name: u32,
    pub name_en: u32,
    pub title: u32,
    pub tagline: u32,
    pub company: u32,
    pub email: u32,
    pub phone: u32,
    pub sns: u32,
    pub website: u32,
    /// Fallback for rows outside every element span
    pub fallback: u32,
}

impl Default for ElementPalette {
    fn default() -> Self {
        Self {
            company: 0x60A5FA,
            tagline: 0xC084FC,
            name: 0xF16584,
            name_en: 0x34D399,
            title: 0xA78BFA,
            email: 0x4ECDC4,
            phone: 0xFB923C,
            sns: 0xEC4899,
            website: 0xFBBF24,
            fallback: 0xFFFFFF,
        }
    }
}

impl ElementPalette {
    pub fn color_for(&self, kind: ElementKind) -> u32 {
        match kind {
            ElementKind::Name => self.name,
            ElementKind::NameEn => self.name_en,
            ElementKind::Title => self.title,
            ElementKind::Tagline => self.tagline,
            ElementKind::Company => self.company,
            ElementKind::Email => self.email,
            ElementKind::Phone => self.phone,
            ElementKind::Sns => self.sns,
            ElementKind::Website => self.website,
        }
    }
}

/// Fatal configuration problems, surfaced once at session construction
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    InvalidPlayfield { width: f32, height: f32 },
    NonPositiveBallSpeed(f32),
    NonPositiveBallRadius(f32),
    NonPositivePaddleSpeed(f32),
    NonPositivePaddleWidth(f32),
    NegativeRecoveryTime(f64),
    NegativeFadeInTime(f64),
    InvalidDevicePixelRatio(f32),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPlayfield { width, height } => {
                write!(f, "playfield dimensions must be positive, got {width}x{height}")
            }
            ConfigError::NonPositiveBallSpeed(v) => {
                write!(f, "ball base speed must be positive, got {v}")
            }
            ConfigError::NonPositiveBallRadius(v) => {
                write!(f, "ball radius must be positive, got {v}")
            }
            ConfigError::NonPositivePaddleSpeed(v) => {
                write!(f, "paddle speed must be positive, got {v}")
            }
            ConfigError::NonPositivePaddleWidth(v) => {
                write!(f, "paddle width must be positive, got {v}")
            }
            ConfigError::NegativeRecoveryTime(v) => {
                write!(f, "block recovery time must be non-negative, got {v}")
            }
            ConfigError::NegativeFadeInTime(v) => {
                write!(f, "block fade-in time must be non-negative, got {v}")
            }
            ConfigError::InvalidDevicePixelRatio(v) => {
                write!(f, "device pixel ratio must be positive, got {v}")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Complete, immutable-per-session game configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GameConfig {
    /// Playfield size in logical pixels
    pub width: f32,
    pub height: f32,

    /// Pixels per frame
    pub paddle_speed: f32,
    /// Ball base speed (pixels per frame); also the speed floor
    pub ball_speed: f32,
    pub ball_radius: f32,

    pub paddle_width: f32,
    pub paddle_width_ratio: f32,
    pub paddle_height: f32,

    /// Time a destroyed block stays fully hidden (ms)
    pub block_recovery_ms: f64,
    /// Linear fade-in window after the hidden period (ms)
    pub block_fade_in_ms: f64,

    /// Recognized area-of-effect radius option
    pub destruction_radius: f32,

    /// Device-to-logical pixel scale of the rasterization surface
    pub dpr: f32,
    /// Raster scan stride in logical pixels
    pub pixel_size: f32,

    /// RNG seed for launch angle and cosmetic jitter
    pub seed: u64,

    pub palette: ElementPalette,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::for_playfield(640.0, 400.0)
    }
}

impl GameConfig {
    /// Derive gameplay values from the playfield size, with minimum floors so
    /// tiny playfields stay playable
    pub fn for_playfield(width: f32, height: f32) -> Self {
        let paddle_width_ratio = PADDLE_WIDTH_RATIO;
        Self {
            width,
            height,
            paddle_speed: (width * PADDLE_SPEED_RATIO).max(MIN_PADDLE_SPEED),
            ball_speed: (width * BALL_SPEED_RATIO).max(MIN_BALL_SPEED),
            ball_radius: (width * BALL_RADIUS_RATIO).max(MIN_BALL_RADIUS),
            paddle_width: (width * paddle_width_ratio).floor(),
            paddle_width_ratio,
            paddle_height: PADDLE_HEIGHT,
            block_recovery_ms: BLOCK_RECOVERY_MS,
            block_fade_in_ms: BLOCK_FADE_IN_MS,
            destruction_radius: DESTRUCTION_RADIUS,
            dpr: 1.0,
            pixel_size: 1.0,
            seed: 0,
            palette: ElementPalette::default(),
        }
    }

    /// Validate the configuration; the session never starts on error
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.width > 0.0 && self.height > 0.0) {
            return Err(ConfigError::InvalidPlayfield {
                width: self.width,
                height: self.height,
            });
        }
        if !(self.ball_speed > 0.0) {
            return Err(ConfigError::NonPositiveBallSpeed(self.ball_speed));
        }
        if !(self.ball_radius > 0.0) {
            return Err(ConfigError::NonPositiveBallRadius(self.ball_radius));
        }
        if !(self.paddle_speed > 0.0) {
            return Err(ConfigError::NonPositivePaddleSpeed(self.paddle_speed));
        }
        if !(self.paddle_width > 0.0) {
            return Err(ConfigError::NonPositivePaddleWidth(self.paddle_width));
        }
        if self.block_recovery_ms < 0.0 {
            return Err(ConfigError::NegativeRecoveryTime(self.block_recovery_ms));
        }
        if self.block_fade_in_ms < 0.0 {
            return Err(ConfigError::NegativeFadeInTime(self.block_fade_in_ms));
        }
        if !(self.dpr > 0.0) {
            return Err(ConfigError::InvalidDevicePixelRatio(self.dpr));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derived_values_respect_floors() {
        let cfg = GameConfig::for_playfield(100.0, 80.0);
        assert_eq!(cfg.paddle_speed, MIN_PADDLE_SPEED);
        assert_eq!(cfg.ball_speed, MIN_BALL_SPEED);
        assert_eq!(cfg.ball_radius, MIN_BALL_RADIUS);
        assert_eq!(cfg.paddle_width, 40.0);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn test_derived_values_scale_with_width() {
        let cfg = GameConfig::for_playfield(1000.0, 600.0);
        assert_eq!(cfg.paddle_speed, 15.0);
        assert_eq!(cfg.ball_speed, 9.0);
        assert_eq!(cfg.ball_radius, 12.0);
        assert_eq!(cfg.paddle_width, 400.0);
    }

    #[test]
    fn test_invalid_playfield_rejected() {
        let mut cfg = GameConfig::default();
        cfg.width = 0.0;
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::InvalidPlayfield { .. })
        ));
    }

    #[test]
    fn test_zero_ball_speed_rejected() {
        let mut cfg = GameConfig::default();
        cfg.ball_speed = 0.0;
        assert_eq!(
            cfg.validate(),
            Err(ConfigError::NonPositiveBallSpeed(0.0))
        );
    }

    #[test]
    fn test_card_field_skips_blank_strings() {
        let card = CardInfo {
            name: Some("  ".into()),
            email: Some("a@b.c".into()),
            ..CardInfo::default()
        };
        assert_eq!(card.field(ElementKind::Name), None);
        assert_eq!(card.field(ElementKind::Email), Some("a@b.c"));
        assert_eq!(card.field(ElementKind::Phone), None);
    }

    #[test]
    fn test_config_roundtrips_through_json() {
        let cfg = GameConfig::for_playfield(320.0, 200.0);
        let json = serde_json::to_string(&cfg).unwrap();
        let back: GameConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back.width, cfg.width);
        assert_eq!(back.palette, cfg.palette);
    }
}

//! Text rasterization capability
//!
//! The block field generator needs three things from a platform: measure
//! text, paint it into a pixel buffer, and read the alpha channel back.
//! That capability is expressed as traits here so the generation pipeline
//! runs headlessly; a browser host implements them over a 2D canvas, and
//! `GlyphGridRasterizer` provides a deterministic in-memory implementation.

use std::fmt;

/// Horizontal text anchoring
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextAlign {
    /// Text starts at x
    Left,
    /// Text is centered on x
    Center,
}

/// Font parameters for a single draw call
#[derive(Debug, Clone)]
pub struct TextStyle {
    /// Font size in logical pixels
    pub size: f32,
    /// Font stack (platform hint; headless backends may ignore it)
    pub family: &'static str,
}

/// Measured extents of a piece of text
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextMetrics {
    pub width: f32,
    pub ascent: f32,
    pub descent: f32,
}

impl TextMetrics {
    /// Rendered line height (ascent + descent)
    pub fn height(&self) -> f32 {
        self.ascent + self.descent
    }
}

/// Raised when a rasterization surface cannot be acquired
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RasterError {
    pub reason: String,
}

impl RasterError {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

impl fmt::Display for RasterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "raster surface unavailable: {}", self.reason)
    }
}

impl std::error::Error for RasterError {}

/// Allocates raster surfaces
pub trait TextRasterizer {
    type Surface: RasterSurface;

    /// Allocate a surface of the given physical pixel size. Draw coordinates
    /// are logical; the surface multiplies them by `scale` internally.
    fn create_surface(
        &mut self,
        physical_width: u32,
        physical_height: u32,
        scale: f32,
    ) -> Result<Self::Surface, RasterError>;
}

/// A writable alpha surface with text measurement
pub trait RasterSurface {
    /// Physical pixel width
    fn width(&self) -> u32;
    /// Physical pixel height
    fn height(&self) -> u32;

    fn measure(&self, text: &str, style: &TextStyle) -> TextMetrics;

    /// Paint text with its top edge at logical (x, y). `x_scale` compresses
    /// horizontally only; vertical extent is unchanged.
    fn fill_text(
        &mut self,
        text: &str,
        x: f32,
        y: f32,
        style: &TextStyle,
        align: TextAlign,
        x_scale: f32,
    );

    /// Alpha of the physical pixel at (x, y); 0 outside the surface
    fn alpha_at(&self, x: u32, y: u32) -> u8;
}

/// Deterministic headless rasterizer: every non-space character becomes a
/// filled box on a fixed advance grid. Glyph shapes are wrong on purpose;
/// coverage geometry (extents, alignment, compression) is exact, which is
/// all the block scan cares about.
#[derive(Debug, Default)]
pub struct GlyphGridRasterizer {
    /// When set, surface allocation fails; exercises the degraded path
    pub fail_allocation: bool,
}

/// Fraction of the font size one grid cell advances by
const ADVANCE_RATIO: f32 = 0.6;
/// Fraction of the advance actually inked (leaves a gap between glyphs)
const INK_RATIO: f32 = 0.85;
const ASCENT_RATIO: f32 = 0.8;
const DESCENT_RATIO: f32 = 0.2;

impl TextRasterizer for GlyphGridRasterizer {
    type Surface = GridSurface;

    fn create_surface(
        &mut self,
        physical_width: u32,
        physical_height: u32,
        scale: f32,
    ) -> Result<Self::Surface, RasterError> {
        if self.fail_allocation {
            return Err(RasterError::new("allocation disabled"));
        }
        if physical_width == 0 || physical_height == 0 {
            return Err(RasterError::new(format!(
                "degenerate surface {physical_width}x{physical_height}"
            )));
        }
        Ok(GridSurface {
            width: physical_width,
            height: physical_height,
            scale,
            alpha: vec![0; physical_width as usize * physical_height as usize],
        })
    }
}

/// In-memory alpha buffer produced by [`GlyphGridRasterizer`]
#[derive(Debug, Clone)]
pub struct GridSurface {
    width: u32,
    height: u32,
    scale: f32,
    alpha: Vec<u8>,
}

impl GridSurface {
    fn fill_rect(&mut self, x0: f32, y0: f32, x1: f32, y1: f32) {
        let px0 = (x0 * self.scale).round().max(0.0) as u32;
        let py0 = (y0 * self.scale).round().max(0.0) as u32;
        let px1 = ((x1 * self.scale).round() as u32).min(self.width);
        let py1 = ((y1 * self.scale).round() as u32).min(self.height);
        for py in py0..py1 {
            for px in px0..px1 {
                self.alpha[(py * self.width + px) as usize] = 255;
            }
        }
    }
}

impl RasterSurface for GridSurface {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn measure(&self, text: &str, style: &TextStyle) -> TextMetrics {
        let advance = style.size * ADVANCE_RATIO;
        TextMetrics {
            width: text.chars().count() as f32 * advance,
            ascent: style.size * ASCENT_RATIO,
            descent: style.size * DESCENT_RATIO,
        }
    }

    fn fill_text(
        &mut self,
        text: &str,
        x: f32,
        y: f32,
        style: &TextStyle,
        align: TextAlign,
        x_scale: f32,
    ) {
        let metrics = self.measure(text, style);
        let advance = style.size * ADVANCE_RATIO * x_scale;
        let drawn_width = metrics.width * x_scale;
        let start_x = match align {
            TextAlign::Left => x,
            TextAlign::Center => x - drawn_width / 2.0,
        };
        let glyph_height = metrics.height();

        for (i, ch) in text.chars().enumerate() {
            if ch.is_whitespace() {
                continue;
            }
            let gx = start_x + i as f32 * advance;
            self.fill_rect(gx, y, gx + advance * INK_RATIO, y + glyph_height);
        }
    }

    fn alpha_at(&self, x: u32, y: u32) -> u8 {
        if x >= self.width || y >= self.height {
            return 0;
        }
        self.alpha[(y * self.width + x) as usize]
    }
}

//! Block field generation from card text
//!
//! One parameterized pipeline serves all three layout variants: render each
//! populated field onto an offscreen raster surface, record the vertical
//! span of every element, then scan the alpha channel into unit blocks
//! colored by the element span containing (or nearest to) their row. The
//! variants differ only in padding/size/alignment tables, never in the
//! algorithm.

use std::collections::HashSet;

use log::{debug, warn};

use crate::config::{CardInfo, CardLayout, ElementKind, ElementPalette, GameConfig};
use crate::consts::ALPHA_THRESHOLD;
use crate::raster::{RasterSurface, TextAlign, TextRasterizer, TextStyle};

use super::blocks::Block;
use super::fonts;

/// Vertical extent of one rendered element, in surface-logical coordinates
#[derive(Debug, Clone, Copy)]
pub struct ElementSpan {
    pub start: f32,
    pub end: f32,
    pub kind: ElementKind,
}

/// Where a rendered line's text comes from
#[derive(Debug, Clone, Copy)]
enum FieldSource {
    Element(ElementKind),
    /// Title and company joined on one line (minimal layout)
    TitleCompany,
}

#[derive(Debug, Clone, Copy)]
struct FieldSpec {
    source: FieldSource,
    /// Font size as a fraction of the playfield height
    size_ratio: f32,
    min_size: f32,
    /// Line advance as a multiple of the rendered text height
    line_gap: f32,
    align: TextAlign,
    /// Extra pixels advanced after this field
    post_gap: f32,
    /// Contact row rendered as a label column plus data column
    labeled: bool,
}

impl FieldSpec {
    const fn new(
        source: FieldSource,
        size_ratio: f32,
        min_size: f32,
        line_gap: f32,
        align: TextAlign,
    ) -> Self {
        Self {
            source,
            size_ratio,
            min_size,
            line_gap,
            align,
            post_gap: 1.0,
            labeled: false,
        }
    }

    fn resolve(&self, card: &CardInfo) -> Option<(String, ElementKind)> {
        match self.source {
            FieldSource::Element(kind) => {
                card.field(kind).map(|text| (text.to_string(), kind))
            }
            FieldSource::TitleCompany => {
                let parts: Vec<&str> = [ElementKind::Title, ElementKind::Company]
                    .iter()
                    .filter_map(|&k| card.field(k))
                    .collect();
                if parts.is_empty() {
                    None
                } else {
                    Some((parts.join(" | "), ElementKind::Title))
                }
            }
        }
    }
}

/// Presentation parameters for one layout variant
#[derive(Debug)]
pub struct LayoutParams {
    padding_ratio: f32,
    width_ratio: f32,
    height_ratio: f32,
    /// Label column width as a fraction of the usable width (labeled rows)
    label_width_ratio: f32,
    /// Gap between label and data columns, same basis
    label_gap_ratio: f32,
    fields: Vec<FieldSpec>,
}

impl LayoutParams {
    pub fn for_layout(layout: CardLayout) -> Self {
        use ElementKind::*;
        use FieldSource::Element;
        use TextAlign::{Center, Left};

        match layout {
            CardLayout::Standard => Self {
                padding_ratio: 0.08,
                width_ratio: 0.85,
                height_ratio: 0.81,
                label_width_ratio: 0.17,
                label_gap_ratio: 0.01,
                fields: vec![
                    FieldSpec::new(Element(Name), 0.095, 16.0, 1.5, Left),
                    FieldSpec::new(Element(Title), 0.055, 16.0, 1.6, Left),
                    FieldSpec::new(Element(Company), 0.065, 16.0, 1.8, Left),
                    FieldSpec::new(Element(Email), 0.040, 12.0, 1.5, Left),
                    FieldSpec::new(Element(Phone), 0.040, 12.0, 1.5, Left),
                    FieldSpec::new(Element(Sns), 0.040, 12.0, 1.5, Left),
                    FieldSpec::new(Element(Website), 0.040, 12.0, 1.5, Left),
                ],
            },
            CardLayout::Professional => Self {
                padding_ratio: 0.02,
                width_ratio: 0.85,
                height_ratio: 0.81,
                label_width_ratio: 0.17,
                label_gap_ratio: 0.01,
                fields: vec![
                    FieldSpec::new(Element(Company), 0.09, 12.0, 1.3, Center),
                    FieldSpec::new(Element(Tagline), 0.04, 10.0, 1.9, Center),
                    FieldSpec::new(Element(Name), 0.120, 12.0, 1.35, Left),
                    FieldSpec {
                        // Extra breathing room before the title block
                        post_gap: 12.0,
                        ..FieldSpec::new(Element(NameEn), 0.05, 10.0, 1.4, Left)
                    },
                    FieldSpec::new(Element(Title), 0.052, 12.0, 1.8, Left),
                    FieldSpec {
                        labeled: true,
                        ..FieldSpec::new(Element(Email), 0.04, 10.0, 1.4, Left)
                    },
                    FieldSpec {
                        labeled: true,
                        ..FieldSpec::new(Element(Phone), 0.04, 10.0, 1.4, Left)
                    },
                    FieldSpec {
                        labeled: true,
                        ..FieldSpec::new(Element(Sns), 0.04, 10.0, 1.4, Left)
                    },
                    FieldSpec {
                        labeled: true,
                        ..FieldSpec::new(Element(Website), 0.04, 10.0, 1.4, Left)
                    },
                ],
            },
            CardLayout::Minimal => Self {
                padding_ratio: 0.08,
                width_ratio: 0.8,
                height_ratio: 0.81,
                label_width_ratio: 0.17,
                label_gap_ratio: 0.01,
                fields: vec![
                    FieldSpec::new(Element(Name), 0.120, 16.0, 1.6, Center),
                    FieldSpec::new(FieldSource::TitleCompany, 0.045, 16.0, 2.5, Center),
                    FieldSpec::new(Element(Email), 0.035, 12.0, 1.6, Center),
                    FieldSpec::new(Element(Phone), 0.035, 12.0, 1.6, Center),
                    FieldSpec::new(Element(Sns), 0.035, 12.0, 1.6, Center),
                    FieldSpec::new(Element(Website), 0.035, 12.0, 1.6, Center),
                ],
            },
        }
    }
}

fn font_size(canvas_height: f32, ratio: f32, min_size: f32) -> f32 {
    (canvas_height * ratio).round().max(min_size)
}

fn contact_label(kind: ElementKind) -> &'static str {
    match kind {
        ElementKind::Email => "Email",
        ElementKind::Phone => "Phone",
        ElementKind::Sns => "SNS",
        ElementKind::Website => "Website",
        _ => "",
    }
}

/// Draw text capped to `max_width` by horizontal-only compression; the line
/// height is preserved. Returns the rendered text height.
fn draw_fit_to_width<S: RasterSurface>(
    surface: &mut S,
    text: &str,
    x: f32,
    y: f32,
    max_width: f32,
    style: &TextStyle,
    align: TextAlign,
) -> f32 {
    let metrics = surface.measure(text, style);
    let x_scale = if metrics.width > max_width {
        max_width / metrics.width
    } else {
        1.0
    };
    surface.fill_text(text, x, y, style, align, x_scale);
    metrics.height()
}

/// Generate the complete block field for a card and layout variant. The
/// result replaces any previous field wholesale. A failed surface
/// acquisition degrades to an empty field (which the orchestrator treats as
/// an immediate clear) rather than an error.
pub fn generate_blocks<R: TextRasterizer>(
    rasterizer: &mut R,
    card: &CardInfo,
    config: &GameConfig,
    layout: CardLayout,
) -> Vec<Block> {
    let params = LayoutParams::for_layout(layout);

    let padding = (config.height * params.padding_ratio).round();
    let logical_w = (config.width * params.width_ratio).round();
    let logical_h = (config.height * params.height_ratio).round();
    let physical_w = (logical_w * config.dpr).round() as u32;
    let physical_h = (logical_h * config.dpr).round() as u32;

    let mut surface = match rasterizer.create_surface(physical_w, physical_h, config.dpr) {
        Ok(surface) => surface,
        Err(err) => {
            warn!("block generation degraded to an empty field: {err}");
            return Vec::new();
        }
    };

    let max_width = logical_w - padding * 2.0;
    let mut cursor = padding;
    let mut spans: Vec<ElementSpan> = Vec::new();

    for spec in &params.fields {
        let Some((text, kind)) = spec.resolve(card) else {
            continue;
        };

        let style = TextStyle {
            size: font_size(config.height, spec.size_ratio, spec.min_size),
            family: fonts::font_stack_for(&text),
        };
        let start = cursor;

        let text_height = if spec.labeled {
            let label = contact_label(kind);
            let label_max = max_width * params.label_width_ratio;
            let gap = max_width * params.label_gap_ratio;
            let data_max = max_width - label_max - gap;

            let label_style = TextStyle {
                size: style.size,
                family: fonts::font_stack_for(label),
            };
            let label_height = draw_fit_to_width(
                &mut surface,
                label,
                padding,
                cursor,
                label_max,
                &label_style,
                TextAlign::Left,
            );
            let data_height = draw_fit_to_width(
                &mut surface,
                &text,
                padding + label_max + gap,
                cursor,
                data_max,
                &style,
                TextAlign::Left,
            );
            label_height.max(data_height)
        } else {
            let x = match spec.align {
                TextAlign::Left => padding,
                TextAlign::Center => logical_w / 2.0,
            };
            draw_fit_to_width(&mut surface, &text, x, cursor, max_width, &style, spec.align)
        };

        let step = text_height * spec.line_gap;
        spans.push(ElementSpan {
            start,
            end: start + step,
            kind,
        });
        cursor += step + spec.post_gap;
    }

    let blocks = blocks_from_surface(&surface, config, &spans);
    debug!(
        "generated {} blocks from {} element spans ({layout:?})",
        blocks.len(),
        spans.len()
    );
    blocks
}

/// Color for a surface row: the containing element span wins; otherwise the
/// span whose center is nearest; white fallback when nothing was rendered
fn color_for_row(logical_y: f32, spans: &[ElementSpan], palette: &ElementPalette) -> u32 {
    for span in spans {
        if logical_y >= span.start && logical_y <= span.end {
            return palette.color_for(span.kind);
        }
    }

    let nearest = spans.iter().min_by(|a, b| {
        let da = (logical_y - (a.start + a.end) / 2.0).abs();
        let db = (logical_y - (b.start + b.end) / 2.0).abs();
        da.partial_cmp(&db).unwrap_or(std::cmp::Ordering::Equal)
    });

    match nearest {
        Some(span) => palette.color_for(span.kind),
        None => palette.fallback,
    }
}

/// Scan the surface alpha channel into unit blocks, translated and centered
/// into playfield coordinates. Coordinates are rounded (not truncated)
/// before block creation, and duplicates are collapsed to one block per
/// logical coordinate.
fn blocks_from_surface<S: RasterSurface>(
    surface: &S,
    config: &GameConfig,
    spans: &[ElementSpan],
) -> Vec<Block> {
    let dpr_scale = 1.0 / config.dpr;
    let logical_w = surface.width() as f32 * dpr_scale;
    let logical_h = surface.height() as f32 * dpr_scale;
    let start_x = (config.width - logical_w) / 2.0;
    let start_y = (config.height - logical_h) / 2.0;

    let scan_step = ((config.pixel_size * config.dpr).round() as u32).max(1);

    let mut seen: HashSet<(i64, i64)> = HashSet::new();
    let mut blocks = Vec::new();

    let mut py = 0;
    while py < surface.height() {
        let logical_y = py as f32 * dpr_scale;
        let color = color_for_row(logical_y, spans, &config.palette);

        let mut px = 0;
        while px < surface.width() {
            // Sample the center pixel of each stride cell.
            let cy = (py + scan_step / 2).min(surface.height() - 1);
            let cx = (px + scan_step / 2).min(surface.width() - 1);

            if surface.alpha_at(cx, cy) > ALPHA_THRESHOLD {
                let logical_x = (px as f32 * dpr_scale).round();
                let block_x = (start_x + logical_x).round();
                let block_y = (start_y + logical_y).round();

                if seen.insert((block_x as i64, block_y as i64)) {
                    blocks.push(Block::new(block_x, block_y, 1.0, color));
                }
            }
            px += scan_step;
        }
        py += scan_step;
    }

    blocks
}

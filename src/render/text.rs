use std::borrow::Cow;

use crate::foundation::color::Color;
use crate::foundation::core::Point;
use crate::foundation::error::{RelingoError, RelingoResult};

/// How one caption line is painted.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LinePaint {
    /// Glyph fill.
    pub fill: Color,
    /// Optional outline drawn beneath the fill: color and stroke width in pixels.
    pub outline: Option<(Color, f64)>,
}

/// Text measurement and drawing used by the compositor.
///
/// `origin` passed to [`TextShaper::draw_line`] is the left end of the line's bottom edge.
pub trait TextShaper: Send {
    /// Advance width of `text` at `font_size`.
    fn measure(&mut self, text: &str, font_size: f64) -> f64;

    /// Draw one line of text into `ctx`.
    fn draw_line(
        &mut self,
        ctx: &mut vello_cpu::RenderContext,
        text: &str,
        font_size: f64,
        origin: Point,
        paint: LinePaint,
    ) -> RelingoResult<()>;
}

/// Advance of one character for [`BlockShaper`], in font sizes.
pub const BLOCK_ADVANCE_FACTOR: f64 = 0.55;

/// Deterministic shaper with a fixed advance per character that draws each visible character
/// as a solid cell. Used when no font is configured.
#[derive(Clone, Copy, Debug, Default)]
pub struct BlockShaper;

impl TextShaper for BlockShaper {
    fn measure(&mut self, text: &str, font_size: f64) -> f64 {
        text.chars().count() as f64 * font_size * BLOCK_ADVANCE_FACTOR
    }

    fn draw_line(
        &mut self,
        ctx: &mut vello_cpu::RenderContext,
        text: &str,
        font_size: f64,
        origin: Point,
        paint: LinePaint,
    ) -> RelingoResult<()> {
        let advance = font_size * BLOCK_ADVANCE_FACTOR;
        let cells: Vec<vello_cpu::kurbo::Rect> = text
            .chars()
            .enumerate()
            .filter(|(_, ch)| !ch.is_whitespace())
            .map(|(i, _)| {
                let x = origin.x + i as f64 * advance;
                vello_cpu::kurbo::Rect::new(
                    x + advance * 0.1,
                    origin.y - font_size * 0.8,
                    x + advance * 0.9,
                    origin.y - font_size * 0.1,
                )
            })
            .collect();

        ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
        if let Some((color, width)) = paint.outline {
            let grow = width / 2.0;
            ctx.set_paint(color.to_cpu());
            for cell in &cells {
                ctx.fill_rect(&cell.inflate(grow, grow));
            }
        }
        ctx.set_paint(paint.fill.to_cpu());
        for cell in &cells {
            ctx.fill_rect(cell);
        }
        Ok(())
    }
}

/// Shaper backed by a real font: `parley` for shaping, `vello_cpu` for glyph rasterization.
pub struct FontShaper {
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<()>,
    family_name: String,
    font: vello_cpu::peniko::FontData,
}

impl std::fmt::Debug for FontShaper {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FontShaper")
            .field("family_name", &self.family_name)
            .finish_non_exhaustive()
    }
}

impl FontShaper {
    /// Build a shaper from TrueType/OpenType font bytes.
    pub fn from_bytes(font_bytes: Vec<u8>) -> RelingoResult<Self> {
        let mut font_ctx = parley::FontContext::default();
        let families = font_ctx
            .collection
            .register_fonts(parley::fontique::Blob::from(font_bytes.clone()), None);
        let family_id = families.first().map(|(id, _)| *id).ok_or_else(|| {
            RelingoError::validation("no font families registered from font bytes")
        })?;
        let family_name = font_ctx
            .collection
            .family_name(family_id)
            .ok_or_else(|| RelingoError::validation("registered font family has no name"))?
            .to_string();

        let font = vello_cpu::peniko::FontData::new(vello_cpu::peniko::Blob::from(font_bytes), 0);
        tracing::debug!(family = %family_name, "loaded caption font");
        Ok(Self {
            font_ctx,
            layout_ctx: parley::LayoutContext::new(),
            family_name,
            font,
        })
    }

    /// Read a font file and build a shaper from it.
    pub fn from_path(path: &std::path::Path) -> RelingoResult<Self> {
        let bytes = std::fs::read(path).map_err(|e| {
            RelingoError::validation(format!("failed to read font '{}': {e}", path.display()))
        })?;
        Self::from_bytes(bytes)
    }

    fn layout(&mut self, text: &str, font_size: f64) -> parley::Layout<()> {
        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut self.font_ctx, text, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(Cow::Owned(self.family_name.clone())),
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(font_size as f32));
        let mut layout: parley::Layout<()> = builder.build(text);
        layout.break_all_lines(None);
        layout
    }
}

impl TextShaper for FontShaper {
    fn measure(&mut self, text: &str, font_size: f64) -> f64 {
        f64::from(self.layout(text, font_size).width())
    }

    fn draw_line(
        &mut self,
        ctx: &mut vello_cpu::RenderContext,
        text: &str,
        font_size: f64,
        origin: Point,
        paint: LinePaint,
    ) -> RelingoResult<()> {
        let layout = self.layout(text, font_size);
        let top = origin.y - f64::from(layout.height());
        ctx.set_transform(vello_cpu::kurbo::Affine::translate((origin.x, top)));

        let mut runs: Vec<(f32, Vec<(u32, f32, f32)>)> = Vec::new();
        for line in layout.lines() {
            for item in line.items() {
                let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                    continue;
                };
                let glyphs = run.glyphs().map(|g| (g.id, g.x, g.y)).collect();
                runs.push((run.run().font_size(), glyphs));
            }
        }
        let to_cpu = |glyphs: &[(u32, f32, f32)]| -> Vec<vello_cpu::Glyph> {
            glyphs
                .iter()
                .map(|&(id, x, y)| vello_cpu::Glyph { id, x, y })
                .collect()
        };

        if let Some((color, width)) = paint.outline {
            ctx.set_stroke(vello_cpu::kurbo::Stroke::new(width));
            ctx.set_paint(color.to_cpu());
            for (size, glyphs) in &runs {
                ctx.glyph_run(&self.font)
                    .font_size(*size)
                    .stroke_glyphs(to_cpu(glyphs).into_iter());
            }
        }
        ctx.set_paint(paint.fill.to_cpu());
        for (size, glyphs) in &runs {
            ctx.glyph_run(&self.font)
                .font_size(*size)
                .fill_glyphs(to_cpu(glyphs).into_iter());
        }
        ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/text.rs"]
mod tests;

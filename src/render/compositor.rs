use crate::captions::model::CaptionId;
use crate::captions::store::CaptionStore;
use crate::foundation::color::Color;
use crate::foundation::core::{Canvas, Point, Rect};
use crate::foundation::error::{RelingoError, RelingoResult};
use crate::foundation::resources::ResourceTracker;
use crate::render::frame::FrameRGBA;
use crate::render::layout::CaptionLayout;
use crate::render::surface::RasterSurface;
use crate::render::text::{LinePaint, TextShaper};

/// Caption appearance. Immutable for the duration of a render.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CaptionStyle {
    /// Glyph fill color.
    pub text_color: Color,
    /// Box behind the text; `transparent` draws no box.
    pub background_color: Color,
    /// Multiplier of the base font size (5% of the surface height).
    pub font_scale: f64,
}

impl Default for CaptionStyle {
    fn default() -> Self {
        Self {
            text_color: Color::WHITE,
            background_color: Color::TRANSPARENT,
            font_scale: 1.0,
        }
    }
}

impl CaptionStyle {
    /// Check the style before use.
    pub fn validate(&self) -> RelingoResult<()> {
        if !self.font_scale.is_finite() || self.font_scale <= 0.0 {
            return Err(RelingoError::validation(format!(
                "fontScale must be finite and > 0, got {}",
                self.font_scale
            )));
        }
        Ok(())
    }

    /// Parse a style from JSON; missing fields take their defaults.
    pub fn from_json_str(json: &str) -> RelingoResult<Self> {
        let style: Self = serde_json::from_str(json)
            .map_err(|e| RelingoError::validation(format!("invalid caption style: {e}")))?;
        style.validate()?;
        Ok(style)
    }

    /// Whether glyphs get a black outline beneath the fill.
    pub fn outlined(&self) -> bool {
        self.text_color.is_white()
    }
}

/// What was burned into a frame.
#[derive(Clone, Debug, PartialEq)]
pub struct CaptionOverlay {
    /// Caption that was active.
    pub caption_id: CaptionId,
    /// Wrapped lines in reading order.
    pub lines: Vec<String>,
    /// Font size in pixels.
    pub font_size: f64,
    /// Bottom edge of each line, in reading order.
    pub line_bottoms: Vec<f64>,
    /// Background box, when the style draws one.
    pub background: Option<Rect>,
    /// Whether glyphs were outlined.
    pub outlined: bool,
}

impl CaptionOverlay {
    /// Lines joined with single spaces.
    pub fn text(&self) -> String {
        self.lines.join(" ")
    }
}

/// One composited output frame.
#[derive(Clone, Debug)]
pub struct ComposedFrame {
    /// Playback time of the frame in seconds.
    pub time: f64,
    /// Composited pixels (premultiplied).
    pub frame: FrameRGBA,
    /// Caption overlay, if one was active.
    pub overlay: Option<CaptionOverlay>,
}

/// Draws source frames with the caption active at their timestamp.
pub struct FrameCompositor {
    surface: RasterSurface,
    shaper: Box<dyn TextShaper>,
    style: CaptionStyle,
}

impl std::fmt::Debug for FrameCompositor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FrameCompositor")
            .field("surface", &self.surface)
            .field("style", &self.style)
            .finish_non_exhaustive()
    }
}

impl FrameCompositor {
    /// Allocate a compositor (and its raster surface) at `canvas` resolution.
    pub fn new(
        canvas: Canvas,
        style: CaptionStyle,
        shaper: Box<dyn TextShaper>,
        tracker: &ResourceTracker,
    ) -> RelingoResult<Self> {
        style.validate()?;
        Ok(Self {
            surface: RasterSurface::new(canvas, tracker),
            shaper,
            style,
        })
    }

    /// Surface dimensions.
    pub fn canvas(&self) -> Canvas {
        self.surface.canvas()
    }

    /// Style in use.
    pub fn style(&self) -> &CaptionStyle {
        &self.style
    }

    /// Composite `frame` at playback `time` against one caption snapshot.
    ///
    /// The active caption is resolved once; the output depends only on the arguments.
    pub fn compose(
        &mut self,
        frame: &FrameRGBA,
        time: f64,
        captions: &CaptionStore,
    ) -> RelingoResult<ComposedFrame> {
        let active = captions.active_at(time).cloned();
        let canvas = self.surface.canvas();
        let style = self.style;
        let shaper = &mut self.shaper;

        let layout = active.as_ref().and_then(|c| {
            CaptionLayout::compute(&c.text, canvas, style.font_scale, |s, fs| {
                shaper.measure(s, fs)
            })
        });

        let out = self.surface.render(frame, |ctx| {
            let Some(layout) = &layout else {
                return Ok(());
            };
            if !style.background_color.is_transparent() {
                ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
                ctx.set_paint(style.background_color.to_cpu());
                let bg = layout.background;
                ctx.fill_rect(&vello_cpu::kurbo::Rect::new(bg.x0, bg.y0, bg.x1, bg.y1));
            }
            let paint = LinePaint {
                fill: style.text_color,
                outline: style
                    .outlined()
                    .then(|| (Color::BLACK, layout.outline_width())),
            };
            for line in layout.lines.iter().rev() {
                shaper.draw_line(
                    ctx,
                    &line.text,
                    layout.font_size,
                    Point::new(line.left, line.bottom),
                    paint,
                )?;
            }
            Ok(())
        })?;

        let overlay = match (active, layout) {
            (Some(caption), Some(layout)) => Some(CaptionOverlay {
                caption_id: caption.id,
                line_bottoms: layout.lines.iter().map(|l| l.bottom).collect(),
                lines: layout.lines.into_iter().map(|l| l.text).collect(),
                font_size: layout.font_size,
                background: (!style.background_color.is_transparent())
                    .then_some(layout.background),
                outlined: style.outlined(),
            }),
            _ => None,
        };

        Ok(ComposedFrame {
            time,
            frame: out,
            overlay,
        })
    }

    /// Release the compositor and its surface.
    pub fn release(self) {
        self.surface.release();
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/compositor.rs"]
mod tests;

use crate::foundation::core::{Canvas, Rect};

/// Base font size as a fraction of surface height.
pub const BASE_FONT_FRACTION: f64 = 0.05;
/// Maximum wrapped line width as a fraction of surface width.
pub const MAX_LINE_WIDTH_FRACTION: f64 = 0.8;
/// Bottom of the lowest caption line as a fraction of surface height.
pub const BOTTOM_LINE_FRACTION: f64 = 0.9;
/// Distance between stacked lines, in font sizes.
pub const LINE_ADVANCE_FACTOR: f64 = 1.3;
/// Background box padding, in font sizes.
pub const BOX_PADDING_FACTOR: f64 = 0.4;
/// Glyph outline width, in font sizes.
pub const OUTLINE_WIDTH_FACTOR: f64 = 0.1;

/// Font size in pixels for a surface of `canvas_height` and a style scale.
pub fn font_size_for(canvas_height: u32, font_scale: f64) -> f64 {
    f64::from(canvas_height) * BASE_FONT_FRACTION * font_scale
}

/// Greedy word wrap.
///
/// Words are separated by whitespace and joined with single spaces. A word is appended to the
/// current line unless the result would be wider than `max_width`; a word that is too wide on its
/// own still gets a line of its own. Empty or whitespace-only input yields no lines.
pub fn wrap_words(text: &str, max_width: f64, mut measure: impl FnMut(&str) -> f64) -> Vec<String> {
    let mut lines = Vec::new();
    let mut line = String::new();
    for word in text.split_whitespace() {
        if line.is_empty() {
            line.push_str(word);
            continue;
        }
        let candidate = format!("{line} {word}");
        if measure(&candidate) > max_width {
            lines.push(std::mem::replace(&mut line, word.to_owned()));
        } else {
            line = candidate;
        }
    }
    if !line.is_empty() {
        lines.push(line);
    }
    lines
}

/// One positioned caption line.
#[derive(Clone, Debug, PartialEq)]
pub struct LineBox {
    /// Line text.
    pub text: String,
    /// Measured width in pixels.
    pub width: f64,
    /// Left edge (the line is centered horizontally).
    pub left: f64,
    /// Bottom edge of the line.
    pub bottom: f64,
}

/// Geometry of a caption overlay on one surface.
#[derive(Clone, Debug, PartialEq)]
pub struct CaptionLayout {
    /// Font size in pixels.
    pub font_size: f64,
    /// Lines in reading order (top to bottom).
    pub lines: Vec<LineBox>,
    /// Box behind the lines, padded on every side.
    pub background: Rect,
}

impl CaptionLayout {
    /// Lay out `text` on `canvas`. Returns `None` when there is nothing to draw.
    ///
    /// The last line sits with its bottom at 90% of the height and earlier lines stack upward one
    /// line advance at a time.
    pub fn compute(
        text: &str,
        canvas: Canvas,
        font_scale: f64,
        mut measure: impl FnMut(&str, f64) -> f64,
    ) -> Option<Self> {
        let font_size = font_size_for(canvas.height, font_scale);
        if !font_size.is_finite() || font_size <= 0.0 {
            return None;
        }
        let max_width = f64::from(canvas.width) * MAX_LINE_WIDTH_FRACTION;
        let wrapped = wrap_words(text, max_width, |s| measure(s, font_size));
        if wrapped.is_empty() {
            return None;
        }

        let center_x = f64::from(canvas.width) / 2.0;
        let bottom0 = f64::from(canvas.height) * BOTTOM_LINE_FRACTION;
        let advance = font_size * LINE_ADVANCE_FACTOR;
        let n = wrapped.len();

        let lines: Vec<LineBox> = wrapped
            .into_iter()
            .enumerate()
            .map(|(i, text)| {
                let width = measure(&text, font_size);
                let from_bottom = (n - 1 - i) as f64;
                LineBox {
                    left: center_x - width / 2.0,
                    bottom: bottom0 - from_bottom * advance,
                    width,
                    text,
                }
            })
            .collect();

        let widest = lines.iter().map(|l| l.width).fold(0.0, f64::max);
        let pad = font_size * BOX_PADDING_FACTOR;
        let top_line_top = bottom0 - (n - 1) as f64 * advance - font_size;
        let background = Rect::new(
            center_x - widest / 2.0 - pad,
            top_line_top - pad,
            center_x + widest / 2.0 + pad,
            bottom0 + pad,
        );

        Some(Self {
            font_size,
            lines,
            background,
        })
    }

    /// Outline stroke width for this font size.
    pub fn outline_width(&self) -> f64 {
        self.font_size * OUTLINE_WIDTH_FACTOR
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/layout.rs"]
mod tests;

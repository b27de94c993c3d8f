use crate::foundation::color::Color;
use crate::foundation::core::Canvas;
use crate::foundation::error::{RelingoError, RelingoResult};
use crate::foundation::math::{flatten_premul_over_bg, premultiply_rgba8_in_place};

/// A frame as RGBA8 pixels.
///
/// Decoded source frames are straight alpha; composited frames come back premultiplied. The
/// `premultiplied` flag makes this explicit at API boundaries.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameRGBA {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// RGBA8 bytes, tightly packed, row-major.
    pub data: Vec<u8>,
    /// Whether the `data` is premultiplied alpha.
    pub premultiplied: bool,
}

impl FrameRGBA {
    /// Wrap straight-alpha bytes, checking the length against the dimensions.
    pub fn from_straight(width: u32, height: u32, data: Vec<u8>) -> RelingoResult<Self> {
        let expected = (width as usize) * (height as usize) * 4;
        if width == 0 || height == 0 || data.len() != expected {
            return Err(RelingoError::decode(format!(
                "frame {width}x{height} expects {expected} bytes, got {}",
                data.len()
            )));
        }
        Ok(Self {
            width,
            height,
            data,
            premultiplied: false,
        })
    }

    /// A frame filled with one color.
    pub fn solid(canvas: Canvas, color: Color) -> Self {
        let px = [color.r, color.g, color.b, color.a];
        let mut data = Vec::with_capacity(canvas.rgba_len());
        for _ in 0..(canvas.width as usize * canvas.height as usize) {
            data.extend_from_slice(&px);
        }
        Self {
            width: canvas.width,
            height: canvas.height,
            data,
            premultiplied: false,
        }
    }

    /// Frame dimensions.
    pub fn canvas(&self) -> Canvas {
        Canvas {
            width: self.width,
            height: self.height,
        }
    }

    /// RGBA of the pixel at `(x, y)`; `None` outside the frame.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = ((y as usize) * (self.width as usize) + (x as usize)) * 4;
        Some([
            self.data[i],
            self.data[i + 1],
            self.data[i + 2],
            self.data[i + 3],
        ])
    }

    /// Premultiplied copy of the pixel data.
    pub fn premultiplied_bytes(&self) -> Vec<u8> {
        let mut out = self.data.clone();
        if !self.premultiplied {
            premultiply_rgba8_in_place(&mut out);
        }
        out
    }

    /// Flatten over an opaque background, yielding straight opaque RGBA.
    pub fn flatten_over(&self, bg: Color) -> Vec<u8> {
        let src = self.premultiplied_bytes();
        let mut out = vec![0u8; src.len()];
        flatten_premul_over_bg(&mut out, &src, [bg.r, bg.g, bg.b]);
        out
    }

    /// Encode as PNG (flattened over black).
    pub fn to_png(&self) -> RelingoResult<Vec<u8>> {
        let img = image::RgbaImage::from_raw(self.width, self.height, self.flatten_over(Color::BLACK))
            .ok_or_else(|| RelingoError::encode("frame buffer does not match its dimensions"))?;
        let mut out = std::io::Cursor::new(Vec::new());
        img.write_to(&mut out, image::ImageFormat::Png)
            .map_err(|e| RelingoError::encode(format!("png encode failed: {e}")))?;
        Ok(out.into_inner())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/frame.rs"]
mod tests;

use std::sync::Arc;

use crate::foundation::core::Canvas;
use crate::foundation::error::{RelingoError, RelingoResult};
use crate::foundation::resources::{ResourceKind, ResourceLease, ResourceTracker};
use crate::render::frame::FrameRGBA;

/// In-memory compositing target at a fixed native resolution.
///
/// Each [`RasterSurface::render`] call starts from a cleared context, so nothing carries over from
/// one frame to the next.
pub struct RasterSurface {
    canvas: Canvas,
    ctx: vello_cpu::RenderContext,
    pixmap: vello_cpu::Pixmap,
    _lease: ResourceLease,
}

impl std::fmt::Debug for RasterSurface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RasterSurface")
            .field("canvas", &self.canvas)
            .finish_non_exhaustive()
    }
}

impl RasterSurface {
    /// Allocate a surface, counted against `tracker` until dropped.
    pub fn new(canvas: Canvas, tracker: &ResourceTracker) -> Self {
        let (w, h) = canvas.as_u16();
        Self {
            canvas,
            ctx: vello_cpu::RenderContext::new(w, h),
            pixmap: vello_cpu::Pixmap::new(w, h),
            _lease: tracker.acquire(ResourceKind::Surface),
        }
    }

    /// Surface dimensions.
    pub fn canvas(&self) -> Canvas {
        self.canvas
    }

    /// Draw `base` unscaled at the origin, then run `overlay`, and read back the result
    /// (premultiplied).
    pub fn render(
        &mut self,
        base: &FrameRGBA,
        overlay: impl FnOnce(&mut vello_cpu::RenderContext) -> RelingoResult<()>,
    ) -> RelingoResult<FrameRGBA> {
        if base.canvas() != self.canvas {
            return Err(RelingoError::decode(format!(
                "source frame is {}x{} but the surface is {}x{}",
                base.width, base.height, self.canvas.width, self.canvas.height
            )));
        }

        self.ctx.reset();
        self.ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
        self.ctx.set_paint(frame_paint(base)?);
        self.ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
            0.0,
            0.0,
            f64::from(base.width),
            f64::from(base.height),
        ));
        overlay(&mut self.ctx)?;
        self.ctx.flush();
        self.ctx.render_to_pixmap(&mut self.pixmap);

        Ok(FrameRGBA {
            width: self.canvas.width,
            height: self.canvas.height,
            data: self.pixmap.data_as_u8_slice().to_vec(),
            premultiplied: true,
        })
    }

    /// Release the surface.
    pub fn release(self) {
        tracing::debug!(
            width = self.canvas.width,
            height = self.canvas.height,
            "raster surface released"
        );
    }
}

fn frame_paint(frame: &FrameRGBA) -> RelingoResult<vello_cpu::Image> {
    let (w, h) = frame.canvas().as_u16();
    let bytes = frame.premultiplied_bytes();
    let pixels: Vec<vello_cpu::peniko::color::PremulRgba8> = bytes
        .chunks_exact(4)
        .map(|px| vello_cpu::peniko::color::PremulRgba8::from_u8_array([px[0], px[1], px[2], px[3]]))
        .collect();
    if pixels.len() != usize::from(w) * usize::from(h) {
        return Err(RelingoError::decode("source frame byte length mismatch"));
    }
    let may_have_opacities = bytes.chunks_exact(4).any(|px| px[3] != 255);
    let pixmap = vello_cpu::Pixmap::from_parts_with_opacity(pixels, w, h, may_have_opacities);
    Ok(vello_cpu::Image {
        image: vello_cpu::ImageSource::Pixmap(Arc::new(pixmap)),
        sampler: vello_cpu::peniko::ImageSampler::default(),
    })
}

#[cfg(test)]
#[path = "../../tests/unit/render/surface.rs"]
mod tests;

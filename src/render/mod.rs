//! Per-frame compositing: raster surface, caption layout, text shaping and the frame compositor.

/// Caption overlay compositing.
pub mod compositor;
/// RGBA frame buffers.
pub mod frame;
/// Caption geometry (font size, word wrap, line stacking, background box).
pub mod layout;
/// Raster surface backed by `vello_cpu`.
pub mod surface;
/// Text measurement and glyph drawing.
pub mod text;

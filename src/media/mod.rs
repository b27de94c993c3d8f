//! Source media access: probing, frame streaming and the runtime abstraction over them.

/// `ffprobe` metadata.
pub mod probe;
/// The media runtime trait and its `ffmpeg` implementation.
pub mod runtime;
/// Decoded video frame streams.
pub mod source;

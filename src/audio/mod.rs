//! Audio buffers, the PCM/WAV codec, source-audio decoding and the output-track mixer.

/// Decoded sample buffers.
pub mod buffer;
/// `ffmpeg`-backed audio decoding.
pub mod decode;
/// Output audio track preparation.
pub mod mix;
/// Minimal 16-bit PCM WAV container codec.
pub mod wav;

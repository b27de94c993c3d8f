/// Encoded output blobs.
pub mod blob;
/// Output container/codec formats and negotiation.
pub mod container;
/// `ffmpeg`-backed streaming encoder.
pub mod ffmpeg;
/// Frame sink contract and the in-memory sink.
pub mod sink;

//! Relingo burns timed captions into a video and re-encodes it, optionally replacing the audio
//! with synthesized narration.
//!
//! The flow is session-oriented:
//!
//! - Build a [`CaptionStore`] (from a transcriber, JSON or SubRip) and wrap it in
//!   [`LiveCaptions`] so it can be edited while a render runs
//! - Create a [`Renderer`] over a [`MediaRuntime`] ([`FfmpegRuntime`] in production)
//! - Call [`Renderer::render`] with a [`RenderRequest`] and collect the [`MediaBlob`]
#![forbid(unsafe_code)]

mod foundation;

pub mod audio;
pub mod captions;
/// Output containers, encoder sinks and the produced blob.
pub mod encode;
pub mod media;
pub mod pipeline;
pub mod render;
pub mod services;

pub use crate::foundation::color::Color;
pub use crate::foundation::core::{Canvas, Fps, FrameIndex, Point, Rect};
pub use crate::foundation::error::{RelingoError, RelingoResult};
pub use crate::foundation::resources::{ResourceKind, ResourceStats, ResourceTracker};

pub use crate::audio::buffer::{ChannelSelect, Pcm16, RawAudioBuffer};
pub use crate::audio::mix::{AudioOrigin, OriginalAudio, SubstituteAudio};
pub use crate::audio::wav::{decode_wav, encode_wav, wrap_pcm};
pub use crate::captions::live::LiveCaptions;
pub use crate::captions::model::{Caption, CaptionId};
pub use crate::captions::srt::{export_srt, parse_srt};
pub use crate::captions::store::CaptionStore;
pub use crate::encode::blob::MediaBlob;
pub use crate::encode::container::{FORMAT_PREFERENCE, OutputFormat};
pub use crate::encode::sink::{FrameSink, InMemorySink, SinkConfig};
pub use crate::media::probe::VideoInfo;
pub use crate::media::runtime::{FfmpegRuntime, MediaRuntime};
pub use crate::media::source::{SourceFrame, VideoSource};
pub use crate::pipeline::opts::RenderOpts;
pub use crate::pipeline::orchestrator::{RenderOutput, RenderRequest, Renderer};
pub use crate::pipeline::state::RenderState;
pub use crate::render::compositor::{CaptionOverlay, CaptionStyle, ComposedFrame, FrameCompositor};
pub use crate::render::frame::FrameRGBA;
pub use crate::services::collaborator::{SpeechSynthesizer, Transcriber, Translator};

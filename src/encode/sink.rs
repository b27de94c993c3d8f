use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use crate::encode::blob::MediaBlob;
use crate::encode::container::OutputFormat;
use crate::foundation::core::{Canvas, Fps, FrameIndex};
use crate::foundation::error::{RelingoError, RelingoResult};
use crate::render::compositor::ComposedFrame;

/// Configuration provided to a [`FrameSink`] before the first frame.
#[derive(Debug, Clone, PartialEq)]
pub struct SinkConfig {
    /// Output resolution.
    pub canvas: Canvas,
    /// Output frames-per-second.
    pub fps: Fps,
    /// Negotiated container/codec pair.
    pub format: OutputFormat,
    /// Target video bitrate in bits per second.
    pub video_bitrate: u32,
    /// Audio track to mux.
    pub audio: AudioInput,
}

/// Audio track handed to a sink.
#[derive(Debug, Clone, PartialEq)]
pub enum AudioInput {
    /// Interleaved `f32le` PCM in a file.
    Samples {
        /// Path to interleaved `f32le` data.
        path: PathBuf,
        /// Sample rate in Hz.
        sample_rate: u32,
        /// Channel count.
        channels: u16,
    },
    /// A silent track of the video's length.
    Silence {
        /// Sample rate in Hz.
        sample_rate: u32,
        /// Channel count.
        channels: u16,
    },
}

/// Sink contract for consuming composited frames.
///
/// Ordering contract: `push_frame` is called in strictly increasing [`FrameIndex`] order. Exactly
/// one of `finish` or `abort` ends a session.
pub trait FrameSink: Send {
    /// Called once before any frames are pushed.
    fn begin(&mut self, cfg: SinkConfig) -> RelingoResult<()>;
    /// Push one frame in strictly increasing order.
    fn push_frame(&mut self, idx: FrameIndex, frame: &ComposedFrame) -> RelingoResult<()>;
    /// Finalize the stream and hand back the assembled output.
    fn finish(&mut self) -> RelingoResult<MediaBlob>;
    /// Stop and discard any in-flight output.
    fn abort(&mut self);
}

/// Everything an [`InMemorySink`] received.
#[derive(Debug, Default, Clone)]
pub struct SinkRecording {
    /// Configuration passed to `begin`.
    pub config: Option<SinkConfig>,
    /// Frames in push order.
    pub frames: Vec<(FrameIndex, ComposedFrame)>,
    /// Set once `finish` succeeded.
    pub finished: bool,
    /// Set once `abort` was called.
    pub aborted: bool,
}

/// In-memory sink for tests and previews.
///
/// The recording is shared, so a clone of [`InMemorySink::recording`] taken before the sink is
/// handed off can be inspected afterwards.
#[derive(Debug, Default, Clone)]
pub struct InMemorySink {
    recording: Arc<Mutex<SinkRecording>>,
    last_idx: Option<FrameIndex>,
}

impl InMemorySink {
    /// Create a new in-memory sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Shared handle to the recording.
    pub fn recording(&self) -> Arc<Mutex<SinkRecording>> {
        Arc::clone(&self.recording)
    }

    fn with_recording<R>(&self, f: impl FnOnce(&mut SinkRecording) -> R) -> R {
        let mut guard = match self.recording.lock() {
            Ok(g) => g,
            Err(poisoned) => poisoned.into_inner(),
        };
        f(&mut guard)
    }
}

impl FrameSink for InMemorySink {
    fn begin(&mut self, cfg: SinkConfig) -> RelingoResult<()> {
        self.last_idx = None;
        self.with_recording(|r| *r = SinkRecording {
            config: Some(cfg),
            ..SinkRecording::default()
        });
        Ok(())
    }

    fn push_frame(&mut self, idx: FrameIndex, frame: &ComposedFrame) -> RelingoResult<()> {
        if let Some(last) = self.last_idx
            && idx <= last
        {
            return Err(RelingoError::encode("sink received out-of-order frame index"));
        }
        self.last_idx = Some(idx);
        self.with_recording(|r| {
            if r.config.is_none() {
                return Err(RelingoError::encode("sink not started"));
            }
            r.frames.push((idx, frame.clone()));
            Ok(())
        })
    }

    fn finish(&mut self) -> RelingoResult<MediaBlob> {
        self.with_recording(|r| {
            let cfg = r
                .config
                .as_ref()
                .ok_or_else(|| RelingoError::encode("sink not started"))?;
            r.finished = true;
            let chunks = r.frames.iter().map(|(_, f)| f.frame.data.clone()).collect();
            Ok(MediaBlob::from_chunks(cfg.format, chunks))
        })
    }

    fn abort(&mut self) {
        self.with_recording(|r| r.aborted = true);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/encode/sink.rs"]
mod tests;

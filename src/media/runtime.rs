use std::path::Path;

use async_trait::async_trait;

use crate::audio::buffer::RawAudioBuffer;
use crate::audio::decode::decode_audio_file;
use crate::encode::container::{EncoderSet, OutputFormat};
use crate::encode::ffmpeg::{FfmpegSink, probe_encoders};
use crate::encode::sink::FrameSink;
use crate::foundation::core::Fps;
use crate::foundation::error::{RelingoError, RelingoResult};
use crate::media::probe::{VideoInfo, probe_video};
use crate::media::source::{FfmpegVideoSource, VideoSource};

/// The environment a render runs in: where frames come from, whether the original audio can be
/// captured and which output formats can be produced.
#[async_trait]
pub trait MediaRuntime: Send + Sync {
    /// Resolve metadata and start a frame stream. `fps` overrides the native rate.
    async fn open_video(&self, path: &Path, fps: Option<Fps>) -> RelingoResult<Box<dyn VideoSource>>;

    /// The source's own audio, or `None` when the runtime cannot provide it.
    async fn capture_original_audio(
        &self,
        info: &VideoInfo,
        sample_rate: u32,
        channels: u16,
    ) -> RelingoResult<Option<RawAudioBuffer>>;

    /// Whether `format` can be encoded.
    async fn supports(&self, format: OutputFormat) -> bool;

    /// A fresh encoder for `format`; the caller starts it with [`FrameSink::begin`].
    async fn open_encoder(&self, format: OutputFormat) -> RelingoResult<Box<dyn FrameSink>>;
}

/// Run blocking work (subprocesses, file IO) off the async executor.
pub(crate) async fn run_blocking<T, F>(f: F) -> RelingoResult<T>
where
    T: Send + 'static,
    F: FnOnce() -> RelingoResult<T> + Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| RelingoError::Other(anyhow::anyhow!("blocking task failed: {e}")))?
}

/// Runtime backed by the system `ffmpeg` and `ffprobe` binaries.
#[derive(Debug)]
pub struct FfmpegRuntime {
    capture_audio: bool,
    encoders: tokio::sync::OnceCell<EncoderSet>,
}

impl Default for FfmpegRuntime {
    fn default() -> Self {
        Self::new()
    }
}

impl FfmpegRuntime {
    /// Runtime that captures original audio when a source has it.
    pub fn new() -> Self {
        Self {
            capture_audio: true,
            encoders: tokio::sync::OnceCell::new(),
        }
    }

    /// Enable or disable original-audio capture.
    pub fn with_audio_capture(mut self, enabled: bool) -> Self {
        self.capture_audio = enabled;
        self
    }

    /// Runtime with a fixed encoder list instead of probing `ffmpeg -encoders`.
    pub fn with_encoders(self, encoders: EncoderSet) -> Self {
        Self {
            encoders: tokio::sync::OnceCell::new_with(Some(encoders)),
            ..self
        }
    }

    async fn encoder_set(&self) -> &EncoderSet {
        self.encoders
            .get_or_init(|| async {
                run_blocking(probe_encoders).await.unwrap_or_else(|e| {
                    tracing::warn!(error = %e, "could not list ffmpeg encoders");
                    EncoderSet::default()
                })
            })
            .await
    }
}

#[async_trait]
impl MediaRuntime for FfmpegRuntime {
    #[tracing::instrument(skip(self))]
    async fn open_video(&self, path: &Path, fps: Option<Fps>) -> RelingoResult<Box<dyn VideoSource>> {
        if !path.is_file() {
            return Err(RelingoError::decode(format!(
                "source '{}' does not exist or is not a file",
                path.display()
            )));
        }
        let probe_path = path.to_path_buf();
        let info = run_blocking(move || probe_video(&probe_path)).await?;
        let fps = fps.unwrap_or(info.fps);
        tracing::info!(
            width = info.canvas.width,
            height = info.canvas.height,
            duration = info.duration_secs,
            fps = fps.as_f64(),
            has_audio = info.has_audio,
            "opened source video"
        );
        Ok(Box::new(FfmpegVideoSource::spawn(info, fps)?))
    }

    async fn capture_original_audio(
        &self,
        info: &VideoInfo,
        sample_rate: u32,
        channels: u16,
    ) -> RelingoResult<Option<RawAudioBuffer>> {
        if !self.capture_audio || !info.has_audio {
            return Ok(None);
        }
        let path = info.path.clone();
        run_blocking(move || decode_audio_file(&path, sample_rate, channels)).await
    }

    async fn supports(&self, format: OutputFormat) -> bool {
        self.encoder_set().await.supports(format)
    }

    async fn open_encoder(&self, format: OutputFormat) -> RelingoResult<Box<dyn FrameSink>> {
        if !self.supports(format).await {
            return Err(RelingoError::unsupported_container(format.mime()));
        }
        Ok(Box::new(FfmpegSink::new()))
    }
}

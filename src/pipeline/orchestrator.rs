use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::watch;
use tokio_util::sync::CancellationToken;

use crate::audio::mix::{AudioMixer, AudioOrigin, OriginalAudio, SubstituteAudio};
use crate::captions::live::LiveCaptions;
use crate::encode::blob::MediaBlob;
use crate::encode::container::negotiate;
use crate::encode::sink::{AudioInput, FrameSink, SinkConfig};
use crate::foundation::core::{Canvas, Fps, FrameIndex};
use crate::foundation::error::{RelingoError, RelingoResult};
use crate::foundation::resources::ResourceTracker;
use crate::media::runtime::{MediaRuntime, run_blocking};
use crate::media::source::VideoSource;
use crate::pipeline::opts::RenderOpts;
use crate::pipeline::state::RenderState;
use crate::render::compositor::{CaptionStyle, ComposedFrame, FrameCompositor};
use crate::render::text::{BlockShaper, FontShaper, TextShaper};

/// Inputs of one render.
#[derive(Clone, Debug)]
pub struct RenderRequest {
    /// Source video.
    pub source: PathBuf,
    /// Captions; edits made while rendering show up from the next frame on.
    pub captions: LiveCaptions,
    /// Caption appearance.
    pub style: CaptionStyle,
    /// Narration replacing the original audio.
    pub substitute: Option<SubstituteAudio>,
}

impl RenderRequest {
    /// Request with the default style and no narration.
    pub fn new(source: impl Into<PathBuf>, captions: impl Into<LiveCaptions>) -> Self {
        Self {
            source: source.into(),
            captions: captions.into(),
            style: CaptionStyle::default(),
            substitute: None,
        }
    }

    /// Set the caption style.
    pub fn with_style(mut self, style: CaptionStyle) -> Self {
        self.style = style;
        self
    }

    /// Replace the original audio with `audio`.
    pub fn with_substitute(mut self, audio: SubstituteAudio) -> Self {
        self.substitute = Some(audio);
        self
    }
}

/// Result of a completed render.
#[derive(Clone, Debug)]
pub struct RenderOutput {
    /// The encoded file.
    pub blob: MediaBlob,
    /// Frames composited and encoded.
    pub frames: u64,
    /// Source duration in seconds.
    pub duration_secs: f64,
    /// Output resolution.
    pub canvas: Canvas,
    /// Output frame rate.
    pub fps: Fps,
    /// Where the audio track came from.
    pub audio_origin: AudioOrigin,
}

/// Emits strictly increasing progress values below 1.0; 1.0 itself is reserved for completion.
#[derive(Debug)]
struct ProgressReporter {
    duration_secs: f64,
    last: f64,
}

impl ProgressReporter {
    fn new(duration_secs: f64) -> Self {
        Self {
            duration_secs,
            last: 0.0,
        }
    }

    fn at(&mut self, playback_secs: f64) -> Option<f64> {
        if !(self.duration_secs > 0.0) {
            return None;
        }
        let p = (playback_secs / self.duration_secs).clamp(0.0, 1.0);
        (p > self.last && p < 1.0).then(|| {
            self.last = p;
            p
        })
    }
}

/// Drives renders one at a time.
///
/// Starting a render cancels the one in flight (if any) and waits for it to release its
/// resources before preparing the new session.
pub struct Renderer {
    runtime: Arc<dyn MediaRuntime>,
    opts: RenderOpts,
    tracker: ResourceTracker,
    active: Mutex<Option<(u64, CancellationToken)>>,
    generation: AtomicU64,
    session: tokio::sync::Mutex<()>,
    state: watch::Sender<RenderState>,
}

impl std::fmt::Debug for Renderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Renderer")
            .field("opts", &self.opts)
            .field("state", &*self.state.borrow())
            .finish_non_exhaustive()
    }
}

impl Renderer {
    /// Renderer over `runtime`.
    pub fn new(runtime: Arc<dyn MediaRuntime>, opts: RenderOpts) -> Self {
        Self {
            runtime,
            opts,
            tracker: ResourceTracker::new(),
            active: Mutex::new(None),
            generation: AtomicU64::new(0),
            session: tokio::sync::Mutex::new(()),
            state: watch::channel(RenderState::Idle).0,
        }
    }

    /// Options in use.
    pub fn opts(&self) -> &RenderOpts {
        &self.opts
    }

    /// Live resource counts of this renderer's sessions.
    pub fn tracker(&self) -> &ResourceTracker {
        &self.tracker
    }

    /// Current state.
    pub fn state(&self) -> RenderState {
        self.state.borrow().clone()
    }

    /// Watch state transitions.
    pub fn subscribe_state(&self) -> watch::Receiver<RenderState> {
        self.state.subscribe()
    }

    /// Cancel the render in flight, if any. Returns whether there was one.
    pub fn cancel(&self) -> bool {
        let active = self.active.lock().unwrap_or_else(PoisonError::into_inner);
        match active.as_ref() {
            Some((_, token)) => {
                token.cancel();
                true
            }
            None => false,
        }
    }

    fn set_state(&self, state: RenderState) {
        tracing::debug!(%state, "render state");
        self.state.send_replace(state);
    }

    fn install_token(&self) -> (u64, CancellationToken) {
        let id = self.generation.fetch_add(1, Ordering::AcqRel) + 1;
        let token = CancellationToken::new();
        let mut active = self.active.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some((prev_id, prev)) = active.replace((id, token.clone())) {
            tracing::info!(previous = prev_id, "cancelling render in flight");
            prev.cancel();
        }
        (id, token)
    }

    fn clear_token(&self, id: u64) {
        let mut active = self.active.lock().unwrap_or_else(PoisonError::into_inner);
        if active.as_ref().is_some_and(|(cur, _)| *cur == id) {
            *active = None;
        }
    }

    /// Render `req`, reporting progress in `[0, 1]`.
    ///
    /// Progress starts at 0, increases strictly and ends at exactly 1 on success. Cancellation
    /// (through [`Renderer::cancel`] or a newer render) resolves to [`RelingoError::Aborted`].
    #[tracing::instrument(skip_all, fields(source = %req.source.display()))]
    pub async fn render(
        &self,
        req: RenderRequest,
        mut progress: impl FnMut(f64) + Send,
    ) -> RelingoResult<RenderOutput> {
        let (id, token) = self.install_token();

        let session = tokio::select! {
            guard = self.session.lock() => Some(guard),
            _ = token.cancelled() => None,
        };
        let Some(_session) = session else {
            self.clear_token(id);
            return Err(RelingoError::Aborted);
        };

        self.set_state(RenderState::Preparing);
        let result = self.run_session(&req, &token, &mut progress).await;
        self.clear_token(id);

        match &result {
            Ok(out) => {
                tracing::info!(
                    frames = out.frames,
                    bytes = out.blob.len(),
                    format = %out.blob.format(),
                    "render completed"
                );
                self.set_state(RenderState::Completed);
            }
            Err(e) if e.is_abort() => {
                tracing::info!("render aborted");
                self.set_state(RenderState::Aborted);
            }
            Err(e) => {
                tracing::warn!(error = %e, "render failed");
                self.set_state(RenderState::Failed(e.to_string()));
            }
        }
        result
    }

    fn make_shaper(&self) -> RelingoResult<Box<dyn TextShaper>> {
        match &self.opts.font_path {
            Some(path) => Ok(Box::new(FontShaper::from_path(path).map_err(|e| {
                RelingoError::configuration(format!("caption font: {e}"))
            })?)),
            None => {
                tracing::warn!("no caption font configured; drawing block glyphs");
                Ok(Box::new(BlockShaper))
            }
        }
    }

    async fn run_session(
        &self,
        req: &RenderRequest,
        token: &CancellationToken,
        progress: &mut (impl FnMut(f64) + Send),
    ) -> RelingoResult<RenderOutput> {
        let opts = &self.opts;
        opts.validate()?;
        req.style.validate()?;

        let mut source = self.runtime.open_video(&req.source, opts.fps).await?;
        let info = source.info().clone();
        let fps = source.fps();

        let mut compositor =
            FrameCompositor::new(info.canvas, req.style, self.make_shaper()?, &self.tracker)?;

        let substitute = req.substitute.as_ref().map(SubstituteAudio::decode).transpose()?;
        let original = if substitute.is_none() && opts.original_audio == OriginalAudio::Passthrough
        {
            self.runtime
                .capture_original_audio(&info, opts.mix_sample_rate, opts.mix_channels)
                .await
                .unwrap_or_else(|e| {
                    tracing::warn!(error = %e, "original audio capture failed");
                    None
                })
        } else {
            None
        };
        let mixer = AudioMixer::new(opts.mix_sample_rate, opts.mix_channels)?;
        let mut graph = mixer.prepare(
            substitute.as_ref(),
            original.as_ref(),
            info.duration_secs,
            &self.tracker,
        );
        drop(original);
        drop(substitute);

        let mut supported = Vec::with_capacity(opts.formats.len());
        for &format in &opts.formats {
            if self.runtime.supports(format).await {
                supported.push(format);
            }
        }
        let format = negotiate(&opts.formats, |f| supported.contains(&f))?;
        tracing::info!(%format, "negotiated output format");

        let mut sink = self.runtime.open_encoder(format).await?;
        let audio = match graph.spill_f32le(&opts.temp_dir)? {
            Some(path) => AudioInput::Samples {
                path,
                sample_rate: graph.sample_rate(),
                channels: graph.channels(),
            },
            None => AudioInput::Silence {
                sample_rate: graph.sample_rate(),
                channels: graph.channels(),
            },
        };
        sink.begin(SinkConfig {
            canvas: info.canvas,
            fps,
            format,
            video_bitrate: opts.video_bitrate,
            audio,
        })?;

        self.set_state(RenderState::Encoding);
        progress(0.0);

        let mut reporter = ProgressReporter::new(info.duration_secs);
        let looped = drive_frames(
            source.as_mut(),
            &mut compositor,
            sink.as_mut(),
            req,
            token,
            fps,
            &mut reporter,
            progress,
        )
        .await;

        let frames = match looped {
            Ok(0) => {
                sink.abort();
                return Err(RelingoError::decode(format!(
                    "'{}' produced no frames",
                    req.source.display()
                )));
            }
            Ok(n) if token.is_cancelled() => {
                tracing::debug!(frames = n, "cancelled before finalization");
                sink.abort();
                return Err(RelingoError::Aborted);
            }
            Ok(n) => n,
            Err(e) => {
                sink.abort();
                return Err(e);
            }
        };
        drop(source);

        let blob = run_blocking(move || sink.finish()).await?;
        compositor.release();
        let audio_origin = graph.origin();
        graph.close();

        progress(1.0);
        Ok(RenderOutput {
            blob,
            frames,
            duration_secs: info.duration_secs,
            canvas: info.canvas,
            fps,
            audio_origin,
        })
    }
}

#[allow(clippy::too_many_arguments)]
async fn drive_frames(
    source: &mut dyn VideoSource,
    compositor: &mut FrameCompositor,
    sink: &mut dyn FrameSink,
    req: &RenderRequest,
    token: &CancellationToken,
    fps: Fps,
    reporter: &mut ProgressReporter,
    progress: &mut (impl FnMut(f64) + Send),
) -> RelingoResult<u64> {
    let mut frames = 0u64;
    loop {
        if token.is_cancelled() {
            return Err(RelingoError::Aborted);
        }
        let next = tokio::select! {
            biased;
            _ = token.cancelled() => return Err(RelingoError::Aborted),
            next = source.next_frame() => next?,
        };
        let Some(src) = next else {
            return Ok(frames);
        };

        let captions = req.captions.snapshot();
        let composed = compositor.compose(&src.frame, src.time, &captions)?;
        push_frame_blocking(sink, src.index, &composed)?;
        frames += 1;

        if let Some(p) = reporter.at(src.time + fps.frame_duration_secs()) {
            progress(p);
        }
        tokio::task::yield_now().await;
    }
}

/// Hand a frame to the sink, moving the wait off the worker thread on a multi-thread runtime.
fn push_frame_blocking(
    sink: &mut dyn FrameSink,
    idx: FrameIndex,
    frame: &ComposedFrame,
) -> RelingoResult<()> {
    match tokio::runtime::Handle::try_current().map(|h| h.runtime_flavor()) {
        Ok(tokio::runtime::RuntimeFlavor::MultiThread) => {
            tokio::task::block_in_place(|| sink.push_frame(idx, frame))
        }
        _ => sink.push_frame(idx, frame),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/pipeline/orchestrator.rs"]
mod tests;

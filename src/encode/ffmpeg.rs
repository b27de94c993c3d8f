use std::io::{Read, Write};
use std::process::{Child, Command, Stdio};
use std::sync::mpsc::{SyncSender, sync_channel};
use std::thread::JoinHandle;

use crate::encode::blob::MediaBlob;
use crate::encode::container::{EncoderSet, OutputFormat};
use crate::encode::sink::{AudioInput, FrameSink, SinkConfig};
use crate::foundation::core::{Fps, FrameIndex};
use crate::foundation::error::{RelingoError, RelingoResult};
use crate::foundation::math::flatten_premul_over_bg;
use crate::render::compositor::ComposedFrame;

const STDOUT_CHUNK: usize = 64 * 1024;

/// Frames buffered between the render loop and the encoder's stdin.
pub(crate) const FRAME_QUEUE_DEPTH: usize = 4;

/// Dedicated thread that writes queued frames to a blocking output.
///
/// `send` only waits when [`FRAME_QUEUE_DEPTH`] frames are already queued. The output is dropped
/// (closing a pipe) once the queue is closed.
pub(crate) struct FrameWriter {
    tx: Option<SyncSender<Vec<u8>>>,
    handle: Option<JoinHandle<std::io::Result<()>>>,
}

impl FrameWriter {
    pub(crate) fn spawn<W: Write + Send + 'static>(mut out: W, depth: usize) -> Self {
        let (tx, rx) = sync_channel::<Vec<u8>>(depth);
        let handle = std::thread::spawn(move || {
            for frame in rx {
                out.write_all(&frame)?;
            }
            out.flush()
        });
        Self {
            tx: Some(tx),
            handle: Some(handle),
        }
    }

    /// Queue one frame. A failed writer surfaces its error here.
    pub(crate) fn send(&mut self, frame: Vec<u8>) -> RelingoResult<()> {
        let Some(tx) = self.tx.as_ref() else {
            return Err(RelingoError::encode("frame writer is closed"));
        };
        if tx.send(frame).is_ok() {
            return Ok(());
        }
        Err(self
            .close()
            .err()
            .unwrap_or_else(|| RelingoError::encode("frame writer stopped early")))
    }

    /// Close the queue and wait for every queued frame to be written.
    pub(crate) fn close(&mut self) -> RelingoResult<()> {
        drop(self.tx.take());
        match self.handle.take().map(JoinHandle::join) {
            Some(Ok(Ok(()))) | None => Ok(()),
            Some(Ok(Err(e))) => Err(RelingoError::encode(format!(
                "failed to write frame to ffmpeg stdin: {e}"
            ))),
            Some(Err(_)) => Err(RelingoError::encode("frame writer thread panicked")),
        }
    }
}

/// Sink that spawns the system `ffmpeg`, streams raw RGBA frames to stdin and collects the muxed
/// container from stdout as a sequence of chunks.
pub struct FfmpegSink {
    child: Option<Child>,
    writer: Option<FrameWriter>,
    stdout_drain: Option<JoinHandle<std::io::Result<Vec<Vec<u8>>>>>,
    stderr_drain: Option<JoinHandle<std::io::Result<Vec<u8>>>>,

    cfg: Option<SinkConfig>,
    last_idx: Option<FrameIndex>,
}

impl std::fmt::Debug for FfmpegSink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FfmpegSink")
            .field("running", &self.child.is_some())
            .field("cfg", &self.cfg)
            .field("last_idx", &self.last_idx)
            .finish()
    }
}

impl Default for FfmpegSink {
    fn default() -> Self {
        Self::new()
    }
}

impl FfmpegSink {
    /// Create an idle sink; `begin` spawns the encoder.
    pub fn new() -> Self {
        Self {
            child: None,
            writer: None,
            stdout_drain: None,
            stderr_drain: None,
            cfg: None,
            last_idx: None,
        }
    }

    fn join_drains(&mut self) -> (Vec<Vec<u8>>, Vec<u8>, Option<String>) {
        let mut problem = None;
        let chunks = match self.stdout_drain.take().map(JoinHandle::join) {
            Some(Ok(Ok(chunks))) => chunks,
            Some(Ok(Err(e))) => {
                problem = Some(format!("ffmpeg stdout read failed: {e}"));
                Vec::new()
            }
            Some(Err(_)) => {
                problem = Some("ffmpeg stdout drain thread panicked".to_owned());
                Vec::new()
            }
            None => Vec::new(),
        };
        let stderr = match self.stderr_drain.take().map(JoinHandle::join) {
            Some(Ok(Ok(bytes))) => bytes,
            _ => Vec::new(),
        };
        (chunks, stderr, problem)
    }
}

/// Build the `ffmpeg` argument list for `cfg` (everything after the program name).
pub(crate) fn encoder_args(cfg: &SinkConfig) -> Vec<String> {
    let mut args: Vec<String> = Vec::new();
    let mut push = |items: &[&str]| args.extend(items.iter().map(|s| (*s).to_owned()));

    push(&["-hide_banner", "-loglevel", "error", "-nostdin"]);
    push(&[
        "-f",
        "rawvideo",
        "-pix_fmt",
        "rgba",
        "-s",
        &format!("{}x{}", cfg.canvas.width, cfg.canvas.height),
        "-r",
        &fps_arg(cfg.fps),
        "-i",
        "pipe:0",
    ]);

    match &cfg.audio {
        AudioInput::Samples {
            path,
            sample_rate,
            channels,
        } => push(&[
            "-f",
            "f32le",
            "-ar",
            &sample_rate.to_string(),
            "-ac",
            &channels.to_string(),
            "-i",
            &path.to_string_lossy(),
        ]),
        AudioInput::Silence {
            sample_rate,
            channels,
        } => {
            let layout = if *channels == 1 { "mono" } else { "stereo" };
            push(&[
                "-f",
                "lavfi",
                "-i",
                &format!("anullsrc=r={sample_rate}:cl={layout}"),
            ]);
        }
    }

    let bitrate = cfg.video_bitrate.to_string();
    push(&[
        "-map",
        "0:v:0",
        "-map",
        "1:a:0",
        // yuv420p needs even dimensions.
        "-vf",
        "pad=ceil(iw/2)*2:ceil(ih/2)*2",
        "-pix_fmt",
        "yuv420p",
        "-c:v",
        cfg.format.video_encoder(),
        "-b:v",
        &bitrate,
    ]);
    match cfg.format {
        OutputFormat::WebmVp9Opus => push(&["-deadline", "realtime", "-cpu-used", "8", "-row-mt", "1"]),
        OutputFormat::WebmVp8Opus | OutputFormat::Webm => {
            push(&["-deadline", "realtime", "-cpu-used", "8"])
        }
        OutputFormat::Mp4 => push(&["-preset", "veryfast"]),
    }
    push(&["-c:a", cfg.format.audio_encoder(), "-shortest"]);
    if cfg.format == OutputFormat::Mp4 {
        // A seekable moov atom is impossible on a pipe.
        push(&["-movflags", "frag_keyframe+empty_moov"]);
    }
    push(&["-f", cfg.format.muxer(), "pipe:1"]);
    args
}

fn fps_arg(fps: Fps) -> String {
    format!("{}/{}", fps.num, fps.den)
}

impl FrameSink for FfmpegSink {
    fn begin(&mut self, cfg: SinkConfig) -> RelingoResult<()> {
        if self.child.is_some() {
            return Err(RelingoError::encode("ffmpeg sink already started"));
        }
        if cfg.video_bitrate == 0 {
            return Err(RelingoError::validation("video bitrate must be non-zero"));
        }

        let args = encoder_args(&cfg);
        tracing::debug!(format = %cfg.format, ?args, "spawning ffmpeg encoder");
        let mut child = Command::new("ffmpeg")
            .args(&args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| {
                RelingoError::encode(format!(
                    "failed to spawn ffmpeg (is it installed and on PATH?): {e}"
                ))
            })?;

        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| RelingoError::encode("failed to open ffmpeg stdin (unexpected)"))?;
        let mut stdout = child
            .stdout
            .take()
            .ok_or_else(|| RelingoError::encode("failed to open ffmpeg stdout (unexpected)"))?;
        let mut stderr = child
            .stderr
            .take()
            .ok_or_else(|| RelingoError::encode("failed to open ffmpeg stderr (unexpected)"))?;

        let stdout_drain = std::thread::spawn(move || {
            let mut chunks = Vec::new();
            loop {
                let mut buf = vec![0u8; STDOUT_CHUNK];
                let n = stdout.read(&mut buf)?;
                if n == 0 {
                    break;
                }
                buf.truncate(n);
                chunks.push(buf);
            }
            Ok(chunks)
        });
        let stderr_drain = std::thread::spawn(move || {
            let mut stderr_bytes = Vec::new();
            stderr.read_to_end(&mut stderr_bytes)?;
            Ok(stderr_bytes)
        });

        self.child = Some(child);
        self.writer = Some(FrameWriter::spawn(stdin, FRAME_QUEUE_DEPTH));
        self.stdout_drain = Some(stdout_drain);
        self.stderr_drain = Some(stderr_drain);
        self.cfg = Some(cfg);
        self.last_idx = None;
        Ok(())
    }

    fn push_frame(&mut self, idx: FrameIndex, frame: &ComposedFrame) -> RelingoResult<()> {
        let cfg = self
            .cfg
            .as_ref()
            .ok_or_else(|| RelingoError::encode("ffmpeg sink not started"))?;
        if let Some(last) = self.last_idx
            && idx <= last
        {
            return Err(RelingoError::encode(
                "ffmpeg sink received out-of-order frame index",
            ));
        }
        self.last_idx = Some(idx);

        let f = &frame.frame;
        if f.canvas() != cfg.canvas || f.data.len() != cfg.canvas.rgba_len() {
            return Err(RelingoError::encode(format!(
                "frame size mismatch: got {}x{}, expected {}x{}",
                f.width, f.height, cfg.canvas.width, cfg.canvas.height
            )));
        }

        let Some(writer) = self.writer.as_mut() else {
            return Err(RelingoError::encode("ffmpeg sink is already finalized"));
        };
        let rgba = if f.premultiplied {
            let mut out = vec![0u8; f.data.len()];
            flatten_premul_over_bg(&mut out, &f.data, [0, 0, 0]);
            out
        } else {
            f.data.clone()
        };
        writer.send(rgba)
    }

    fn finish(&mut self) -> RelingoResult<MediaBlob> {
        let written = match self.writer.take() {
            Some(mut writer) => writer.close(),
            None => Ok(()),
        };
        let mut child = self
            .child
            .take()
            .ok_or_else(|| RelingoError::encode("ffmpeg sink not started"))?;
        let status = child
            .wait()
            .map_err(|e| RelingoError::encode(format!("failed to wait for ffmpeg: {e}")))?;
        let (chunks, stderr, problem) = self.join_drains();
        let cfg = self
            .cfg
            .take()
            .ok_or_else(|| RelingoError::encode("ffmpeg sink not started"))?;

        if !status.success() {
            return Err(RelingoError::encode(format!(
                "ffmpeg exited with status {status}: {}",
                String::from_utf8_lossy(&stderr).trim()
            )));
        }
        written?;
        if let Some(problem) = problem {
            return Err(RelingoError::encode(problem));
        }
        tracing::debug!(chunks = chunks.len(), "ffmpeg encoder finished");
        Ok(MediaBlob::from_chunks(cfg.format, chunks))
    }

    fn abort(&mut self) {
        // Killing the child first unblocks a writer stuck on a full pipe.
        let writer = self.writer.take();
        if let Some(mut child) = self.child.take() {
            let _ = child.kill();
            let _ = child.wait();
            tracing::debug!("ffmpeg encoder aborted");
        }
        if let Some(mut writer) = writer {
            let _ = writer.close();
        }
        let _ = self.join_drains();
        self.cfg = None;
    }
}

impl Drop for FfmpegSink {
    fn drop(&mut self) {
        if self.child.is_some() {
            self.abort();
        }
    }
}

/// Return `true` when `ffmpeg` can be invoked from `PATH`.
pub fn is_ffmpeg_on_path() -> bool {
    tool_on_path("ffmpeg")
}

/// Return `true` when `ffprobe` can be invoked from `PATH`.
pub fn is_ffprobe_on_path() -> bool {
    tool_on_path("ffprobe")
}

fn tool_on_path(tool: &str) -> bool {
    Command::new(tool)
        .arg("-version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}

/// List the encoders of the `ffmpeg` on `PATH`.
pub fn probe_encoders() -> RelingoResult<EncoderSet> {
    let out = Command::new("ffmpeg")
        .args(["-hide_banner", "-encoders"])
        .stdin(Stdio::null())
        .output()
        .map_err(|e| RelingoError::unsupported_container(format!("failed to run ffmpeg: {e}")))?;
    if !out.status.success() {
        return Err(RelingoError::unsupported_container(format!(
            "ffmpeg -encoders failed: {}",
            String::from_utf8_lossy(&out.stderr).trim()
        )));
    }
    Ok(EncoderSet::parse_listing(&String::from_utf8_lossy(&out.stdout)))
}

#[cfg(test)]
#[path = "../../tests/unit/encode/ffmpeg.rs"]
mod tests;

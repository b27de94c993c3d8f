use std::process::Stdio;

use async_trait::async_trait;
use tokio::io::AsyncReadExt as _;

use crate::foundation::core::{Fps, FrameIndex};
use crate::foundation::error::{RelingoError, RelingoResult};
use crate::media::probe::VideoInfo;
use crate::render::frame::FrameRGBA;

/// One decoded source frame.
#[derive(Clone, Debug)]
pub struct SourceFrame {
    /// Position in output order.
    pub index: FrameIndex,
    /// Playback time in seconds.
    pub time: f64,
    /// Straight-alpha pixels at native resolution.
    pub frame: FrameRGBA,
}

/// A stream of decoded frames in strictly increasing playback time.
#[async_trait]
pub trait VideoSource: Send {
    /// Source metadata.
    fn info(&self) -> &VideoInfo;

    /// Rate at which frames are delivered.
    fn fps(&self) -> Fps;

    /// Next frame, or `None` once playback is complete.
    async fn next_frame(&mut self) -> RelingoResult<Option<SourceFrame>>;
}

/// Frames decoded by an `ffmpeg` child process writing raw RGBA to a pipe.
pub struct FfmpegVideoSource {
    info: VideoInfo,
    fps: Fps,
    child: tokio::process::Child,
    stdout: tokio::process::ChildStdout,
    stderr: Option<tokio::task::JoinHandle<Vec<u8>>>,
    next_index: u64,
    done: bool,
}

impl std::fmt::Debug for FfmpegVideoSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FfmpegVideoSource")
            .field("info", &self.info)
            .field("fps", &self.fps)
            .field("next_index", &self.next_index)
            .finish_non_exhaustive()
    }
}

impl FfmpegVideoSource {
    /// Start decoding `info.path`, resampled to `fps`. Must be called inside a Tokio runtime.
    pub fn spawn(info: VideoInfo, fps: Fps) -> RelingoResult<Self> {
        let mut child = tokio::process::Command::new("ffmpeg")
            .args(["-v", "error", "-nostdin", "-i"])
            .arg(&info.path)
            .args([
                "-an",
                "-vf",
                &format!("fps={}/{}", fps.num, fps.den),
                "-f",
                "rawvideo",
                "-pix_fmt",
                "rgba",
                "pipe:1",
            ])
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| RelingoError::decode(format!("failed to run ffmpeg for video decode: {e}")))?;

        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| RelingoError::decode("failed to open ffmpeg stdout (unexpected)"))?;
        let stderr = child.stderr.take().map(|mut stderr| {
            tokio::spawn(async move {
                let mut bytes = Vec::new();
                let _ = stderr.read_to_end(&mut bytes).await;
                bytes
            })
        });

        Ok(Self {
            info,
            fps,
            child,
            stdout,
            stderr,
            next_index: 0,
            done: false,
        })
    }

    async fn finish_stream(&mut self) -> RelingoResult<()> {
        self.done = true;
        let status = self
            .child
            .wait()
            .await
            .map_err(|e| RelingoError::decode(format!("failed to wait for ffmpeg: {e}")))?;
        let stderr = match self.stderr.take() {
            Some(handle) => handle.await.unwrap_or_default(),
            None => Vec::new(),
        };
        if !status.success() {
            return Err(RelingoError::decode(format!(
                "ffmpeg video decode failed for '{}': {}",
                self.info.path.display(),
                String::from_utf8_lossy(&stderr).trim()
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl VideoSource for FfmpegVideoSource {
    fn info(&self) -> &VideoInfo {
        &self.info
    }

    fn fps(&self) -> Fps {
        self.fps
    }

    async fn next_frame(&mut self) -> RelingoResult<Option<SourceFrame>> {
        if self.done {
            return Ok(None);
        }
        let mut buf = vec![0u8; self.info.canvas.rgba_len()];
        let mut filled = 0usize;
        while filled < buf.len() {
            let n = self
                .stdout
                .read(&mut buf[filled..])
                .await
                .map_err(|e| RelingoError::decode(format!("failed to read decoded frame: {e}")))?;
            if n == 0 {
                break;
            }
            filled += n;
        }

        if filled == 0 {
            self.finish_stream().await?;
            return Ok(None);
        }
        if filled < buf.len() {
            self.done = true;
            return Err(RelingoError::decode(format!(
                "truncated frame from ffmpeg: {filled} of {} bytes",
                buf.len()
            )));
        }

        let index = FrameIndex(self.next_index);
        self.next_index += 1;
        let frame = FrameRGBA::from_straight(self.info.canvas.width, self.info.canvas.height, buf)?;
        Ok(Some(SourceFrame {
            index,
            time: self.fps.frame_time_secs(index),
            frame,
        }))
    }
}

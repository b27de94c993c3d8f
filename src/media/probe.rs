use std::path::{Path, PathBuf};

use crate::foundation::core::{Canvas, Fps};
use crate::foundation::error::{RelingoError, RelingoResult};

/// Frame rate assumed when the container does not report a usable one.
pub const FALLBACK_FPS: Fps = Fps { num: 30, den: 1 };

/// Metadata of a source video.
#[derive(Clone, Debug, PartialEq)]
pub struct VideoInfo {
    /// Source path.
    pub path: PathBuf,
    /// Native resolution.
    pub canvas: Canvas,
    /// Native frame rate.
    pub fps: Fps,
    /// Duration in seconds.
    pub duration_secs: f64,
    /// Whether at least one audio stream exists.
    pub has_audio: bool,
}

#[derive(serde::Deserialize)]
struct ProbeStream {
    codec_type: Option<String>,
    width: Option<u32>,
    height: Option<u32>,
    avg_frame_rate: Option<String>,
    r_frame_rate: Option<String>,
    duration: Option<String>,
}

#[derive(serde::Deserialize)]
struct ProbeFormat {
    duration: Option<String>,
}

#[derive(serde::Deserialize)]
struct ProbeOut {
    #[serde(default)]
    streams: Vec<ProbeStream>,
    format: Option<ProbeFormat>,
}

/// Probe `path` through `ffprobe`.
pub fn probe_video(path: &Path) -> RelingoResult<VideoInfo> {
    let out = std::process::Command::new("ffprobe")
        .args([
            "-v",
            "error",
            "-print_format",
            "json",
            "-show_streams",
            "-show_format",
        ])
        .arg(path)
        .output()
        .map_err(|e| RelingoError::decode(format!("failed to run ffprobe: {e}")))?;
    if !out.status.success() {
        return Err(RelingoError::decode(format!(
            "ffprobe failed for '{}': {}",
            path.display(),
            String::from_utf8_lossy(&out.stderr).trim()
        )));
    }
    parse_probe_json(&out.stdout, path)
}

/// Interpret `ffprobe -print_format json` output.
pub fn parse_probe_json(json: &[u8], path: &Path) -> RelingoResult<VideoInfo> {
    let parsed: ProbeOut = serde_json::from_slice(json)
        .map_err(|e| RelingoError::decode(format!("ffprobe json parse failed: {e}")))?;
    let video = parsed
        .streams
        .iter()
        .find(|s| s.codec_type.as_deref() == Some("video"))
        .ok_or_else(|| RelingoError::decode(format!("no video stream in '{}'", path.display())))?;
    let width = video
        .width
        .ok_or_else(|| RelingoError::decode("missing video width from ffprobe"))?;
    let height = video
        .height
        .ok_or_else(|| RelingoError::decode("missing video height from ffprobe"))?;
    let canvas =
        Canvas::new(width, height).map_err(|e| RelingoError::decode(format!("bad video size: {e}")))?;

    let fps = [&video.avg_frame_rate, &video.r_frame_rate]
        .into_iter()
        .flatten()
        .find_map(|s| Fps::parse(s).ok())
        .unwrap_or(FALLBACK_FPS);

    let duration_secs = parsed
        .format
        .as_ref()
        .and_then(|f| f.duration.as_deref())
        .or(video.duration.as_deref())
        .and_then(|d| d.trim().parse::<f64>().ok())
        .filter(|d| d.is_finite() && *d > 0.0)
        .ok_or_else(|| RelingoError::decode("source reports no usable duration"))?;

    let has_audio = parsed
        .streams
        .iter()
        .any(|s| s.codec_type.as_deref() == Some("audio"));

    Ok(VideoInfo {
        path: path.to_path_buf(),
        canvas,
        fps,
        duration_secs,
        has_audio,
    })
}

#[cfg(test)]
#[path = "../../tests/unit/media/probe.rs"]
mod tests;

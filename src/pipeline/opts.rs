use std::path::PathBuf;

use crate::audio::buffer::ChannelSelect;
use crate::audio::mix::{MIX_CHANNELS, MIX_SAMPLE_RATE, OriginalAudio};
use crate::encode::container::{DEFAULT_VIDEO_BITRATE, FORMAT_PREFERENCE, OutputFormat};
use crate::foundation::core::Fps;
use crate::foundation::error::{RelingoError, RelingoResult};

/// Options controlling a render.
#[derive(Clone, Debug, PartialEq)]
pub struct RenderOpts {
    /// Output frame rate; `None` keeps the source's native rate.
    pub fps: Option<Fps>,
    /// Target video bitrate in bits per second.
    pub video_bitrate: u32,
    /// Sample rate of the output audio track.
    pub mix_sample_rate: u32,
    /// Channel count of the output audio track.
    pub mix_channels: u16,
    /// Channel reduction used when preparing transcription audio.
    pub channel_select: ChannelSelect,
    /// What happens to the source audio when no narration is supplied.
    pub original_audio: OriginalAudio,
    /// Caption font; without one a fixed-advance block shaper is used.
    pub font_path: Option<PathBuf>,
    /// Output formats in preference order.
    pub formats: Vec<OutputFormat>,
    /// Directory for intermediate files.
    pub temp_dir: PathBuf,
}

impl Default for RenderOpts {
    fn default() -> Self {
        Self {
            fps: None,
            video_bitrate: DEFAULT_VIDEO_BITRATE,
            mix_sample_rate: MIX_SAMPLE_RATE,
            mix_channels: MIX_CHANNELS,
            channel_select: ChannelSelect::default(),
            original_audio: OriginalAudio::default(),
            font_path: None,
            formats: FORMAT_PREFERENCE.to_vec(),
            temp_dir: std::env::temp_dir(),
        }
    }
}

impl RenderOpts {
    /// Defaults overlaid with `RELINGO_FPS`, `RELINGO_VIDEO_BITRATE`, `RELINGO_FONT`,
    /// `RELINGO_CHANNEL` and `RELINGO_ORIGINAL_AUDIO`.
    pub fn from_env() -> RelingoResult<Self> {
        Self::default().overlay_env(|key| std::env::var(key).ok())
    }

    /// Overlay values found through `lookup`; unset or empty values are ignored.
    pub fn overlay_env(mut self, lookup: impl Fn(&str) -> Option<String>) -> RelingoResult<Self> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(v) = get("RELINGO_FPS") {
            self.fps = Some(Fps::parse(&v)?);
        }
        if let Some(v) = get("RELINGO_VIDEO_BITRATE") {
            self.video_bitrate = parse_bitrate(&v)?;
        }
        if let Some(v) = get("RELINGO_FONT") {
            self.font_path = Some(PathBuf::from(v));
        }
        if let Some(v) = get("RELINGO_CHANNEL") {
            self.channel_select = v.parse()?;
        }
        if let Some(v) = get("RELINGO_ORIGINAL_AUDIO") {
            self.original_audio = v.parse()?;
        }
        self.validate()?;
        Ok(self)
    }

    /// Check option consistency.
    pub fn validate(&self) -> RelingoResult<()> {
        if self.video_bitrate == 0 {
            return Err(RelingoError::validation("video bitrate must be non-zero"));
        }
        if self.mix_sample_rate == 0 || self.mix_channels == 0 {
            return Err(RelingoError::validation(
                "mix sample rate and channel count must be non-zero",
            ));
        }
        if self.formats.is_empty() {
            return Err(RelingoError::validation(
                "at least one output format must be listed",
            ));
        }
        Ok(())
    }
}

/// Parse a bitrate such as `5000000`, `5M` or `800k`.
pub fn parse_bitrate(s: &str) -> RelingoResult<u32> {
    let s = s.trim();
    let (digits, mul) = match s.chars().last() {
        Some('k' | 'K') => (&s[..s.len() - 1], 1_000u64),
        Some('m' | 'M') => (&s[..s.len() - 1], 1_000_000u64),
        _ => (s, 1u64),
    };
    digits
        .trim()
        .parse::<u64>()
        .ok()
        .and_then(|n| n.checked_mul(mul))
        .filter(|&n| n > 0)
        .and_then(|n| u32::try_from(n).ok())
        .ok_or_else(|| RelingoError::validation(format!("invalid bitrate '{s}'")))
}

#[cfg(test)]
#[path = "../../tests/unit/pipeline/opts.rs"]
mod tests;

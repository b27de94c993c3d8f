use std::collections::BTreeSet;

use crate::foundation::error::{RelingoError, RelingoResult};

/// Default video bitrate in bits per second.
pub const DEFAULT_VIDEO_BITRATE: u32 = 5_000_000;

/// An output container with its video and audio codec pair.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OutputFormat {
    /// `video/webm;codecs=vp9,opus`
    WebmVp9Opus,
    /// `video/webm;codecs=vp8,opus`
    WebmVp8Opus,
    /// `video/webm` (VP8 + Vorbis)
    Webm,
    /// `video/mp4` (H.264 + AAC, fragmented)
    Mp4,
}

/// Formats in preference order: higher-efficiency pairs first, the universal container last.
pub const FORMAT_PREFERENCE: [OutputFormat; 4] = [
    OutputFormat::WebmVp9Opus,
    OutputFormat::WebmVp8Opus,
    OutputFormat::Webm,
    OutputFormat::Mp4,
];

impl OutputFormat {
    /// MIME type, including codecs where the container leaves them open.
    pub fn mime(self) -> &'static str {
        match self {
            Self::WebmVp9Opus => "video/webm;codecs=vp9,opus",
            Self::WebmVp8Opus => "video/webm;codecs=vp8,opus",
            Self::Webm => "video/webm",
            Self::Mp4 => "video/mp4",
        }
    }

    /// File extension without the dot.
    pub fn extension(self) -> &'static str {
        match self {
            Self::Mp4 => "mp4",
            _ => "webm",
        }
    }

    /// `ffmpeg` muxer name.
    pub fn muxer(self) -> &'static str {
        match self {
            Self::Mp4 => "mp4",
            _ => "webm",
        }
    }

    /// `ffmpeg` video encoder.
    pub fn video_encoder(self) -> &'static str {
        match self {
            Self::WebmVp9Opus => "libvpx-vp9",
            Self::WebmVp8Opus | Self::Webm => "libvpx",
            Self::Mp4 => "libx264",
        }
    }

    /// `ffmpeg` audio encoder.
    pub fn audio_encoder(self) -> &'static str {
        match self {
            Self::WebmVp9Opus | Self::WebmVp8Opus => "libopus",
            Self::Webm => "libvorbis",
            Self::Mp4 => "aac",
        }
    }

    /// Look a format up by MIME type (whitespace inside the codecs list is ignored).
    pub fn from_mime(mime: &str) -> Option<Self> {
        let norm: String = mime
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect::<String>()
            .to_ascii_lowercase();
        FORMAT_PREFERENCE.into_iter().find(|f| f.mime() == norm)
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.mime())
    }
}

impl std::str::FromStr for OutputFormat {
    type Err = RelingoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "vp9" | "webm-vp9" => Ok(Self::WebmVp9Opus),
            "vp8" | "webm-vp8" => Ok(Self::WebmVp8Opus),
            "webm" => Ok(Self::Webm),
            "mp4" => Ok(Self::Mp4),
            other => Self::from_mime(other).ok_or_else(|| {
                RelingoError::validation(format!("unknown output format '{other}'"))
            }),
        }
    }
}

/// Pick the first format in `preference` for which `supported` holds.
pub fn negotiate(
    preference: &[OutputFormat],
    mut supported: impl FnMut(OutputFormat) -> bool,
) -> RelingoResult<OutputFormat> {
    preference
        .iter()
        .copied()
        .find(|&f| supported(f))
        .ok_or_else(|| {
            let tried: Vec<&str> = preference.iter().map(|f| f.mime()).collect();
            RelingoError::unsupported_container(format!(
                "none of the candidate formats is supported: [{}]",
                tried.join(", ")
            ))
        })
}

/// Encoder names an `ffmpeg` build provides.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EncoderSet {
    names: BTreeSet<String>,
}

impl EncoderSet {
    /// Set from explicit names.
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            names: names.into_iter().map(Into::into).collect(),
        }
    }

    /// Parse the listing printed by `ffmpeg -encoders`.
    ///
    /// Entries follow a dashed separator line and look like ` V....D libx264  description`.
    pub fn parse_listing(text: &str) -> Self {
        let names = text
            .lines()
            .skip_while(|l| !l.trim_start().starts_with("---"))
            .skip(1)
            .filter_map(|l| {
                let mut cols = l.split_whitespace();
                let flags = cols.next()?;
                let name = cols.next()?;
                (flags.len() == 6).then(|| name.to_owned())
            })
            .collect();
        Self { names }
    }

    /// `true` when `encoder` is available.
    pub fn contains(&self, encoder: &str) -> bool {
        self.names.contains(encoder)
    }

    /// `true` when both codecs of `format` are available.
    pub fn supports(&self, format: OutputFormat) -> bool {
        self.contains(format.video_encoder()) && self.contains(format.audio_encoder())
    }

    /// Number of known encoders.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// `true` when no encoders are known.
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/encode/container.rs"]
mod tests;

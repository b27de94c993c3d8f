use crate::foundation::error::{RelingoError, RelingoResult};

/// Decoded audio as interleaved `f32` samples in `[-1, 1]`.
#[derive(Clone, Debug, PartialEq)]
pub struct RawAudioBuffer {
    /// Sample rate in Hz.
    pub sample_rate: u32,
    /// Channel count.
    pub channels: u16,
    /// Interleaved samples (`frames * channels` values).
    pub interleaved: Vec<f32>,
}

impl RawAudioBuffer {
    /// Create a validated buffer.
    pub fn new(sample_rate: u32, channels: u16, interleaved: Vec<f32>) -> RelingoResult<Self> {
        if sample_rate == 0 {
            return Err(RelingoError::validation("audio sample_rate must be non-zero"));
        }
        if channels == 0 {
            return Err(RelingoError::validation("audio channels must be non-zero"));
        }
        if !interleaved.len().is_multiple_of(usize::from(channels)) {
            return Err(RelingoError::validation(
                "interleaved sample count is not a multiple of the channel count",
            ));
        }
        Ok(Self {
            sample_rate,
            channels,
            interleaved,
        })
    }

    /// Mono buffer from a single channel of samples.
    pub fn mono(sample_rate: u32, samples: Vec<f32>) -> RelingoResult<Self> {
        Self::new(sample_rate, 1, samples)
    }

    /// Number of sample frames (samples per channel).
    pub fn frames(&self) -> usize {
        self.interleaved.len() / usize::from(self.channels.max(1))
    }

    /// Duration in seconds.
    pub fn duration_secs(&self) -> f64 {
        self.frames() as f64 / f64::from(self.sample_rate)
    }

    /// `true` when the buffer holds no samples.
    pub fn is_empty(&self) -> bool {
        self.interleaved.is_empty()
    }

    /// Iterate one channel's samples.
    pub fn channel(&self, index: u16) -> impl Iterator<Item = f32> + '_ {
        self.interleaved
            .iter()
            .skip(usize::from(index))
            .step_by(usize::from(self.channels.max(1)))
            .copied()
    }

    /// Reduce to one channel using `select`.
    pub fn to_mono(&self, select: ChannelSelect) -> RelingoResult<Vec<f32>> {
        match select {
            ChannelSelect::First => Ok(self.channel(0).collect()),
            ChannelSelect::Index(i) => {
                if i >= self.channels {
                    return Err(RelingoError::validation(format!(
                        "channel {i} requested from a {}-channel buffer",
                        self.channels
                    )));
                }
                Ok(self.channel(i).collect())
            }
            ChannelSelect::Average => {
                let n = usize::from(self.channels);
                let scale = 1.0 / f32::from(self.channels);
                Ok(self
                    .interleaved
                    .chunks_exact(n)
                    .map(|frame| frame.iter().sum::<f32>() * scale)
                    .collect())
            }
        }
    }
}

/// How a multi-channel buffer becomes mono before WAV encoding.
///
/// `First` keeps only channel 0. It is lossy for stereo material and is the default because the
/// transcription input only needs one intelligible channel.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChannelSelect {
    /// Take channel 0.
    #[default]
    First,
    /// Take the given channel.
    Index(u16),
    /// Average all channels.
    Average,
}

impl std::str::FromStr for ChannelSelect {
    type Err = RelingoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "first" => Ok(Self::First),
            "average" | "mix" => Ok(Self::Average),
            other => other.parse::<u16>().map(Self::Index).map_err(|_| {
                RelingoError::validation(format!(
                    "channel select must be 'first', 'average' or an index, got '{other}'"
                ))
            }),
        }
    }
}

/// Interleaved signed 16-bit PCM.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Pcm16 {
    /// Sample rate in Hz.
    pub sample_rate: u32,
    /// Channel count.
    pub channels: u16,
    /// Interleaved samples.
    pub samples: Vec<i16>,
}

impl Pcm16 {
    /// Quantize float samples (clamped to `[-1, 1]`).
    pub fn from_f32(sample_rate: u32, channels: u16, samples: &[f32]) -> Self {
        Self {
            sample_rate,
            channels,
            samples: samples.iter().map(|&s| quantize_sample(s)).collect(),
        }
    }

    /// Little-endian sample bytes.
    pub fn to_le_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.samples.len() * 2);
        for s in &self.samples {
            out.extend_from_slice(&s.to_le_bytes());
        }
        out
    }
}

/// Clamp to `[-1, 1]` and scale to 16-bit: negatives by 32768, positives by 32767.
pub fn quantize_sample(s: f32) -> i16 {
    let s = if s.is_nan() { 0.0 } else { s.clamp(-1.0, 1.0) };
    if s < 0.0 {
        (s * 32768.0) as i16
    } else {
        (s * 32767.0) as i16
    }
}

/// Inverse of [`quantize_sample`].
pub fn dequantize_sample(s: i16) -> f32 {
    if s < 0 {
        f32::from(s) / 32768.0
    } else {
        f32::from(s) / 32767.0
    }
}

#[cfg(test)]
#[path = "../../tests/unit/audio/buffer.rs"]
mod tests;

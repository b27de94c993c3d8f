use std::path::{Path, PathBuf};

use crate::audio::buffer::RawAudioBuffer;
use crate::audio::wav;
use crate::foundation::error::{RelingoError, RelingoResult};
use crate::foundation::resources::{ResourceKind, ResourceLease, ResourceTracker};

/// Sample rate of the output audio track.
pub const MIX_SAMPLE_RATE: u32 = 48_000;
/// Channel count of the output audio track.
pub const MIX_CHANNELS: u16 = 2;

/// What to do with the source's own audio when no substitute narration is supplied.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OriginalAudio {
    /// Carry the original track through when the runtime can capture it.
    #[default]
    Passthrough,
    /// Always produce a silent track.
    Drop,
}

impl std::str::FromStr for OriginalAudio {
    type Err = RelingoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "passthrough" | "keep" => Ok(Self::Passthrough),
            "drop" | "mute" => Ok(Self::Drop),
            other => Err(RelingoError::validation(format!(
                "original audio policy must be 'passthrough' or 'drop', got '{other}'"
            ))),
        }
    }
}

/// Where the prepared output track came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AudioOrigin {
    /// A substitute narration replaced the original audio.
    Substitute,
    /// The source's original track was carried through.
    Original,
    /// No audio was available; the track is silence.
    Silent,
}

/// Substitute narration as handed to a render.
#[derive(Clone, Debug)]
pub enum SubstituteAudio {
    /// A WAV container (as produced by [`wav::encode_wav`] or [`wav::wrap_pcm`]).
    Wav(Vec<u8>),
    /// Already decoded samples.
    Buffer(RawAudioBuffer),
}

impl SubstituteAudio {
    /// Decode into samples. Unreadable payloads are decode errors.
    pub fn decode(&self) -> RelingoResult<RawAudioBuffer> {
        match self {
            Self::Wav(bytes) => wav::decode_wav(bytes),
            Self::Buffer(buf) => Ok(buf.clone()),
        }
    }
}

/// Prepares the single audio track muxed with the rendered video.
#[derive(Clone, Debug)]
pub struct AudioMixer {
    sample_rate: u32,
    channels: u16,
}

impl Default for AudioMixer {
    fn default() -> Self {
        Self {
            sample_rate: MIX_SAMPLE_RATE,
            channels: MIX_CHANNELS,
        }
    }
}

impl AudioMixer {
    /// Mixer producing `channels` interleaved channels at `sample_rate`.
    pub fn new(sample_rate: u32, channels: u16) -> RelingoResult<Self> {
        if sample_rate == 0 || channels == 0 {
            return Err(RelingoError::validation(
                "mix sample rate and channel count must be non-zero",
            ));
        }
        Ok(Self {
            sample_rate,
            channels,
        })
    }

    /// Output sample rate.
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Output channel count.
    pub fn channels(&self) -> u16 {
        self.channels
    }

    /// Build the output track for a video lasting `duration_secs`.
    ///
    /// A substitute wins over the original and is placed at output time zero. With neither, the
    /// track is silent; that fallback is intentional and logged.
    pub(crate) fn prepare(
        &self,
        substitute: Option<&RawAudioBuffer>,
        original: Option<&RawAudioBuffer>,
        duration_secs: f64,
        tracker: &ResourceTracker,
    ) -> AudioGraph {
        let frames = output_frames(duration_secs, self.sample_rate);
        let (origin, samples) = match (substitute, original) {
            (Some(src), _) => (AudioOrigin::Substitute, Some(self.place(src, frames))),
            (None, Some(src)) if !src.is_empty() => {
                (AudioOrigin::Original, Some(self.place(src, frames)))
            }
            _ => {
                tracing::warn!(
                    "no substitute narration and original audio unavailable; output audio is silent"
                );
                (AudioOrigin::Silent, None)
            }
        };
        tracing::debug!(?origin, frames, "prepared audio graph");

        AudioGraph {
            origin,
            sample_rate: self.sample_rate,
            channels: self.channels,
            frames,
            samples,
            spill: None,
            _lease: tracker.acquire(ResourceKind::AudioGraph),
        }
    }

    /// Resample `src` into a zeroed track of `frames` frames starting at t=0.
    fn place(&self, src: &RawAudioBuffer, frames: usize) -> Vec<f32> {
        let dst_channels = usize::from(self.channels);
        let src_channels = usize::from(src.channels);
        let mut out = vec![0.0f32; frames * dst_channels];
        let src_frames = src.frames();
        if src_frames == 0 {
            return out;
        }

        let step = f64::from(src.sample_rate) / f64::from(self.sample_rate);
        for dst_frame in 0..frames {
            let src_pos = dst_frame as f64 * step;
            let f0 = src_pos.floor() as usize;
            if f0 >= src_frames {
                break;
            }
            let f1 = (f0 + 1).min(src_frames - 1);
            let frac = (src_pos - f0 as f64) as f32;

            for c in 0..dst_channels {
                let sc = c.min(src_channels - 1);
                let v0 = src.interleaved[f0 * src_channels + sc];
                let v1 = src.interleaved[f1 * src_channels + sc];
                out[dst_frame * dst_channels + c] = (v0 + (v1 - v0) * frac).clamp(-1.0, 1.0);
            }
        }
        out
    }
}

fn output_frames(duration_secs: f64, sample_rate: u32) -> usize {
    if !duration_secs.is_finite() || duration_secs <= 0.0 {
        return 0;
    }
    (duration_secs * f64::from(sample_rate)).round() as usize
}

/// The prepared output audio track, owned by one render session.
///
/// Holding a graph counts as a live resource; dropping it (or calling [`AudioGraph::close`])
/// releases the count and deletes any spilled sample file.
#[derive(Debug)]
pub struct AudioGraph {
    origin: AudioOrigin,
    sample_rate: u32,
    channels: u16,
    frames: usize,
    samples: Option<Vec<f32>>,
    spill: Option<TempFileGuard>,
    _lease: ResourceLease,
}

impl AudioGraph {
    /// Where the track came from.
    pub fn origin(&self) -> AudioOrigin {
        self.origin
    }

    /// Sample rate in Hz.
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Channel count.
    pub fn channels(&self) -> u16 {
        self.channels
    }

    /// Track length in sample frames.
    pub fn frames(&self) -> usize {
        self.frames
    }

    /// Interleaved samples; `None` for a silent track.
    pub fn samples(&self) -> Option<&[f32]> {
        self.samples.as_deref()
    }

    /// `true` when the track carries no audio.
    pub fn is_silent(&self) -> bool {
        self.samples.is_none()
    }

    /// Write the samples as raw little-endian `f32` into `dir` and return the file path.
    ///
    /// The file lives as long as the graph. Silent graphs have nothing to write.
    pub(crate) fn spill_f32le(&mut self, dir: &Path) -> RelingoResult<Option<PathBuf>> {
        let Some(samples) = self.samples.as_deref() else {
            return Ok(None);
        };
        if let Some(spill) = &self.spill {
            return Ok(Some(spill.0.clone()));
        }
        let path = dir.join(format!("relingo_audio_{}.f32le", uuid::Uuid::new_v4()));
        write_f32le_file(samples, &path)?;
        self.spill = Some(TempFileGuard(path.clone()));
        Ok(Some(path))
    }

    /// Release the graph.
    pub fn close(self) {
        tracing::debug!(origin = ?self.origin, "audio graph closed");
    }
}

/// Write interleaved `f32` PCM samples to a raw little-endian `.f32le` file.
pub(crate) fn write_f32le_file(samples: &[f32], out_path: &Path) -> RelingoResult<()> {
    if let Some(parent) = out_path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| {
            RelingoError::encode(format!(
                "failed to create audio spill directory '{}': {e}",
                parent.display()
            ))
        })?;
    }

    let mut bytes = Vec::<u8>::with_capacity(samples.len() * 4);
    for &sample in samples {
        bytes.extend_from_slice(&sample.to_le_bytes());
    }
    std::fs::write(out_path, bytes).map_err(|e| {
        RelingoError::encode(format!(
            "failed to write audio spill file '{}': {e}",
            out_path.display()
        ))
    })
}

#[derive(Debug)]
struct TempFileGuard(PathBuf);

impl Drop for TempFileGuard {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.0);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/audio/mix.rs"]
mod tests;

use std::path::Path;

use crate::audio::buffer::{ChannelSelect, RawAudioBuffer};
use crate::audio::wav;
use crate::foundation::error::{RelingoError, RelingoResult};

/// Sample rate expected by the transcription collaborator.
pub const TRANSCRIPTION_SAMPLE_RATE: u32 = 16_000;

/// Decode the first audio stream of `path` to interleaved `f32` PCM through `ffmpeg`.
///
/// Returns `Ok(None)` when the file has no audio stream.
pub fn decode_audio_file(
    path: &Path,
    sample_rate: u32,
    channels: u16,
) -> RelingoResult<Option<RawAudioBuffer>> {
    let out = std::process::Command::new("ffmpeg")
        .args(["-v", "error", "-nostdin", "-i"])
        .arg(path)
        .args([
            "-vn",
            "-f",
            "f32le",
            "-acodec",
            "pcm_f32le",
            "-ac",
            &channels.to_string(),
            "-ar",
            &sample_rate.to_string(),
            "pipe:1",
        ])
        .output()
        .map_err(|e| RelingoError::decode(format!("failed to run ffmpeg for audio decode: {e}")))?;

    if !out.status.success() {
        let msg = String::from_utf8_lossy(&out.stderr);
        // ffmpeg reports a missing audio stream as an error.
        if msg.contains("Stream specifier")
            || msg.contains("matches no streams")
            || msg.contains("Output file #0 does not contain any stream")
            || msg.contains("does not contain any stream")
        {
            return Ok(None);
        }
        return Err(RelingoError::decode(format!(
            "ffmpeg audio decode failed for '{}': {}",
            path.display(),
            msg.trim()
        )));
    }

    if out.stdout.is_empty() {
        return Ok(None);
    }
    let samples = f32le_to_samples(&out.stdout)?;
    RawAudioBuffer::new(sample_rate, channels, samples).map(Some)
}

/// Parse little-endian `f32` bytes.
pub(crate) fn f32le_to_samples(bytes: &[u8]) -> RelingoResult<Vec<f32>> {
    if !bytes.len().is_multiple_of(4) {
        return Err(RelingoError::decode(
            "decoded audio byte length is not aligned to f32 samples",
        ));
    }
    Ok(bytes
        .chunks_exact(4)
        .map(|c| f32::from_le_bytes([c[0], c[1], c[2], c[3]]))
        .collect())
}

/// Extract the audio of a video as a 16 kHz mono WAV for transcription.
///
/// A video without audio yields a decode error; there is nothing to transcribe.
#[tracing::instrument(skip(select))]
pub fn extract_transcription_audio(path: &Path, select: ChannelSelect) -> RelingoResult<Vec<u8>> {
    let channels = match select {
        ChannelSelect::First | ChannelSelect::Average => 2,
        ChannelSelect::Index(i) => i.saturating_add(1).max(2),
    };
    let buf = decode_audio_file(path, TRANSCRIPTION_SAMPLE_RATE, channels)?.ok_or_else(|| {
        RelingoError::decode(format!("'{}' has no audio stream", path.display()))
    })?;
    tracing::debug!(
        frames = buf.frames(),
        secs = buf.duration_secs(),
        "decoded transcription audio"
    );
    wav::encode_wav(&buf, select)
}

#[cfg(test)]
#[path = "../../tests/unit/audio/decode.rs"]
mod tests;

use base64::Engine as _;

use crate::audio::buffer::{dequantize_sample, ChannelSelect, Pcm16, RawAudioBuffer};
use crate::foundation::error::{RelingoError, RelingoResult};

/// Size of the canonical PCM WAV header.
pub const WAV_HEADER_LEN: usize = 44;

const BITS_PER_SAMPLE: u16 = 16;
const FORMAT_PCM: u16 = 1;

/// Build the 44-byte little-endian header for `data_len` bytes of 16-bit PCM.
///
/// Fails when the block align or byte rate does not fit its header field.
pub fn wav_header(
    data_len: u32,
    sample_rate: u32,
    channels: u16,
) -> RelingoResult<[u8; WAV_HEADER_LEN]> {
    let block_align = channels.checked_mul(BITS_PER_SAMPLE / 8).ok_or_else(|| {
        RelingoError::decode(format!("{channels} channels overflow the wav block align"))
    })?;
    let byte_rate = sample_rate.checked_mul(u32::from(block_align)).ok_or_else(|| {
        RelingoError::decode(format!(
            "{sample_rate} Hz x {channels} channels overflows the wav byte rate"
        ))
    })?;
    let riff_len = data_len
        .checked_add(36)
        .ok_or_else(|| RelingoError::decode("pcm payload too large for a wav container"))?;

    let mut h = [0u8; WAV_HEADER_LEN];
    h[0..4].copy_from_slice(b"RIFF");
    h[4..8].copy_from_slice(&riff_len.to_le_bytes());
    h[8..12].copy_from_slice(b"WAVE");
    h[12..16].copy_from_slice(b"fmt ");
    h[16..20].copy_from_slice(&16u32.to_le_bytes());
    h[20..22].copy_from_slice(&FORMAT_PCM.to_le_bytes());
    h[22..24].copy_from_slice(&channels.to_le_bytes());
    h[24..28].copy_from_slice(&sample_rate.to_le_bytes());
    h[28..32].copy_from_slice(&byte_rate.to_le_bytes());
    h[32..34].copy_from_slice(&block_align.to_le_bytes());
    h[34..36].copy_from_slice(&BITS_PER_SAMPLE.to_le_bytes());
    h[36..40].copy_from_slice(b"data");
    h[40..44].copy_from_slice(&data_len.to_le_bytes());
    Ok(h)
}

/// Encode `buf` as a mono 16-bit WAV, reducing channels with `select`.
#[tracing::instrument(skip(buf), fields(frames = buf.frames(), rate = buf.sample_rate))]
pub fn encode_wav(buf: &RawAudioBuffer, select: ChannelSelect) -> RelingoResult<Vec<u8>> {
    let mono = buf.to_mono(select)?;
    encode_pcm16(&Pcm16::from_f32(buf.sample_rate, 1, &mono))
}

/// Encode interleaved 16-bit PCM with its own channel count.
pub fn encode_pcm16(pcm: &Pcm16) -> RelingoResult<Vec<u8>> {
    wrap_pcm(&pcm.to_le_bytes(), pcm.sample_rate, pcm.channels)
}

/// Wrap a raw little-endian 16-bit PCM payload in a WAV header.
pub fn wrap_pcm(payload: &[u8], sample_rate: u32, channels: u16) -> RelingoResult<Vec<u8>> {
    if sample_rate == 0 || channels == 0 {
        return Err(RelingoError::decode(
            "pcm payload needs a non-zero sample rate and channel count",
        ));
    }
    let frame_bytes = usize::from(channels) * usize::from(BITS_PER_SAMPLE / 8);
    if !payload.len().is_multiple_of(frame_bytes) {
        return Err(RelingoError::decode(format!(
            "pcm payload of {} bytes is not a whole number of {frame_bytes}-byte frames",
            payload.len()
        )));
    }
    let data_len = u32::try_from(payload.len())
        .map_err(|_| RelingoError::decode("pcm payload too large for a wav container"))?;
    let header = wav_header(data_len, sample_rate, channels)?;

    let mut out = Vec::with_capacity(WAV_HEADER_LEN + payload.len());
    out.extend_from_slice(&header);
    out.extend_from_slice(payload);
    Ok(out)
}

/// Decode a WAV container into float samples.
///
/// Integer PCM of 8 to 32 bits and 32-bit float are accepted. 16-bit input is the exact inverse
/// of [`encode_wav`]; wider integers scale by their full range. Any structural problem, a
/// truncated data chunk included, is a decode error and no partial result is returned.
pub fn decode_wav(bytes: &[u8]) -> RelingoResult<RawAudioBuffer> {
    let reader = hound::WavReader::new(std::io::Cursor::new(bytes))
        .map_err(|e| RelingoError::decode(format!("invalid wav container: {e}")))?;
    let spec = reader.spec();
    if spec.channels == 0 || spec.sample_rate == 0 {
        return Err(RelingoError::decode("wav fmt chunk has zero channels or rate"));
    }
    let read_err = |e: hound::Error| RelingoError::decode(format!("invalid wav samples: {e}"));

    let interleaved = match (spec.sample_format, spec.bits_per_sample) {
        (hound::SampleFormat::Int, 16) => reader
            .into_samples::<i16>()
            .map(|s| s.map(dequantize_sample))
            .collect::<Result<Vec<_>, _>>()
            .map_err(read_err)?,
        (hound::SampleFormat::Int, bits @ 1..=32) => {
            let full_scale = (1u64 << (bits - 1)) as f64;
            reader
                .into_samples::<i32>()
                .map(|s| s.map(|v| (f64::from(v) / full_scale) as f32))
                .collect::<Result<Vec<_>, _>>()
                .map_err(read_err)?
        }
        (hound::SampleFormat::Float, 32) => reader
            .into_samples::<f32>()
            .map(|s| s.map(|v| if v.is_nan() { 0.0 } else { v.clamp(-1.0, 1.0) }))
            .collect::<Result<Vec<_>, _>>()
            .map_err(read_err)?,
        (format, bits) => {
            return Err(RelingoError::decode(format!(
                "unsupported wav encoding ({format:?}, {bits} bits)"
            )));
        }
    };

    RawAudioBuffer::new(spec.sample_rate, spec.channels, interleaved)
        .map_err(|e| RelingoError::decode(e.to_string()))
}

/// Base64 text form of a binary payload.
pub fn to_portable_text(bytes: &[u8]) -> String {
    base64::engine::general_purpose::STANDARD.encode(bytes)
}

/// Inverse of [`to_portable_text`]. A `data:<mime>;base64,` prefix and surrounding whitespace are
/// accepted.
pub fn from_portable_text(text: &str) -> RelingoResult<Vec<u8>> {
    let text = text.trim();
    let payload = match text.strip_prefix("data:") {
        Some(rest) => rest
            .split_once(',')
            .map(|(_, p)| p)
            .ok_or_else(|| RelingoError::decode("data url without a payload"))?,
        None => text,
    };
    base64::engine::general_purpose::STANDARD
        .decode(payload)
        .map_err(|e| RelingoError::decode(format!("invalid base64 payload: {e}")))
}

#[cfg(test)]
#[path = "../../tests/unit/audio/wav.rs"]
mod tests;

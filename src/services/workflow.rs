use std::path::Path;

use crate::audio::buffer::ChannelSelect;
use crate::audio::decode::extract_transcription_audio;
use crate::audio::mix::SubstituteAudio;
use crate::audio::wav::wrap_pcm;
use crate::captions::live::LiveCaptions;
use crate::captions::store::CaptionStore;
use crate::foundation::error::{RelingoError, RelingoResult};
use crate::media::runtime::run_blocking;
use crate::services::collaborator::{SpeechSynthesizer, Transcriber, Translator};

/// Longest narration text handed to a synthesizer, in characters.
pub const MAX_NARRATION_CHARS: usize = 4000;

/// Truncate `text` to at most `max_chars` characters without splitting a code point.
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((byte, _)) => &text[..byte],
        None => text,
    }
}

/// Transcribe an already extracted 16 kHz mono WAV.
#[tracing::instrument(skip_all, fields(provider = transcriber.name()))]
pub async fn transcribe_wav(
    transcriber: &dyn Transcriber,
    wav: Vec<u8>,
) -> RelingoResult<CaptionStore> {
    transcriber.check_configured()?;
    let captions = transcriber
        .transcribe(wav)
        .await
        .map_err(|e| e.into_service("transcribe"))?;
    if captions.is_empty() {
        tracing::info!("no speech detected");
    }
    CaptionStore::from_captions(captions).map_err(|e| e.into_service("transcribe"))
}

/// Extract the speech track of `video` and transcribe it.
///
/// Unreadable media is a decode error; everything the transcriber does wrong is a `transcribe`
/// service error.
pub async fn transcribe_video(
    transcriber: &dyn Transcriber,
    video: &Path,
    select: ChannelSelect,
) -> RelingoResult<CaptionStore> {
    transcriber.check_configured()?;
    let path = video.to_path_buf();
    let wav = run_blocking(move || extract_transcription_audio(&path, select)).await?;
    tracing::debug!(bytes = wav.len(), "transcription audio extracted");
    transcribe_wav(transcriber, wav).await
}

/// Translate `captions` in place into `target_language`.
///
/// The response must keep every id and timing; otherwise the captions are left unchanged and a
/// `translate` service error is returned.
#[tracing::instrument(skip_all, fields(provider = translator.name(), target_language))]
pub async fn translate_captions(
    translator: &dyn Translator,
    captions: &LiveCaptions,
    target_language: &str,
) -> RelingoResult<()> {
    translator.check_configured()?;
    if target_language.trim().is_empty() {
        return Err(RelingoError::validation("target language must not be empty"));
    }
    let snapshot = captions.snapshot();
    if snapshot.is_empty() {
        return Ok(());
    }
    let translated = translator
        .translate(snapshot.as_slice(), target_language)
        .await
        .map_err(|e| e.into_service("translate"))?;

    // Compare against the snapshot that was sent, not whatever the store holds now.
    let mut checked = (*snapshot).clone();
    checked.apply_translation(translated)?;
    captions.replace_all(checked.into_vec());
    tracing::info!(count = snapshot.len(), "captions translated");
    Ok(())
}

/// Synthesize narration for `text` and wrap it as a WAV substitute track.
///
/// Text longer than [`MAX_NARRATION_CHARS`] is truncated before the call.
#[tracing::instrument(skip_all, fields(provider = synthesizer.name()))]
pub async fn synthesize_narration(
    synthesizer: &dyn SpeechSynthesizer,
    text: &str,
) -> RelingoResult<SubstituteAudio> {
    synthesizer.check_configured()?;
    let text = text.trim();
    if text.is_empty() {
        return Err(RelingoError::validation("narration text is empty"));
    }
    let clipped = truncate_chars(text, MAX_NARRATION_CHARS);
    if clipped.len() < text.len() {
        tracing::warn!(max = MAX_NARRATION_CHARS, "narration text truncated");
    }

    let pcm = synthesizer
        .synthesize(clipped)
        .await
        .map_err(|e| e.into_service("synthesize"))?;
    if pcm.is_empty() {
        return Err(RelingoError::service("synthesize", "no audio returned"));
    }
    let wav = wrap_pcm(&pcm, synthesizer.sample_rate(), 1)
        .map_err(|e| e.into_service("synthesize"))?;
    Ok(SubstituteAudio::Wav(wav))
}

/// Voice the current caption texts, in order, as one narration track.
pub async fn narrate_captions(
    synthesizer: &dyn SpeechSynthesizer,
    captions: &LiveCaptions,
) -> RelingoResult<SubstituteAudio> {
    let text = captions.snapshot().joined_text();
    tracing::debug!(chars = text.chars().count(), "narrating captions");
    synthesize_narration(synthesizer, &text).await
}

#[cfg(test)]
#[path = "../../tests/unit/services/workflow.rs"]
mod tests;

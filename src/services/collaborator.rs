use async_trait::async_trait;

use crate::captions::model::Caption;
use crate::foundation::error::RelingoResult;

/// Sample rate of synthesized speech unless the provider says otherwise.
pub const SPEECH_SAMPLE_RATE: u32 = 24_000;

/// Turns speech audio into timed captions.
#[async_trait]
pub trait Transcriber: Send + Sync {
    /// Provider name, for logs.
    fn name(&self) -> &str;

    /// Fail with a configuration error when credentials or settings are missing.
    fn check_configured(&self) -> RelingoResult<()> {
        Ok(())
    }

    /// Transcribe a mono 16 kHz WAV file. An empty list means no speech was found.
    async fn transcribe(&self, wav: Vec<u8>) -> RelingoResult<Vec<Caption>>;
}

/// Translates caption texts, keeping ids and timings.
#[async_trait]
pub trait Translator: Send + Sync {
    /// Provider name, for logs.
    fn name(&self) -> &str;

    /// Fail with a configuration error when credentials or settings are missing.
    fn check_configured(&self) -> RelingoResult<()> {
        Ok(())
    }

    /// Translate every caption into `target_language` (a human-readable language name).
    async fn translate(
        &self,
        captions: &[Caption],
        target_language: &str,
    ) -> RelingoResult<Vec<Caption>>;
}

/// Produces raw speech audio from text.
#[async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    /// Provider name, for logs.
    fn name(&self) -> &str;

    /// Fail with a configuration error when credentials or settings are missing.
    fn check_configured(&self) -> RelingoResult<()> {
        Ok(())
    }

    /// Sample rate of the PCM returned by [`SpeechSynthesizer::synthesize`].
    fn sample_rate(&self) -> u32 {
        SPEECH_SAMPLE_RATE
    }

    /// Synthesize `text` as headerless 16-bit little-endian mono PCM.
    async fn synthesize(&self, text: &str) -> RelingoResult<Vec<u8>>;
}

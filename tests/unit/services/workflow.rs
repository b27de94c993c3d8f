use super::*;

use crate::captions::model::Caption;
use async_trait::async_trait;
use std::sync::Mutex;

struct FixedTranscriber(RelingoResult<Vec<Caption>>);

#[async_trait]
impl Transcriber for FixedTranscriber {
    fn name(&self) -> &str {
        "fixed"
    }

    async fn transcribe(&self, _wav: Vec<u8>) -> RelingoResult<Vec<Caption>> {
        match &self.0 {
            Ok(v) => Ok(v.clone()),
            Err(e) => Err(RelingoError::service("upstream", e.to_string())),
        }
    }
}

struct Unconfigured;

#[async_trait]
impl Translator for Unconfigured {
    fn name(&self) -> &str {
        "unconfigured"
    }

    fn check_configured(&self) -> RelingoResult<()> {
        Err(RelingoError::configuration("API key missing"))
    }

    async fn translate(&self, _: &[Caption], _: &str) -> RelingoResult<Vec<Caption>> {
        panic!("must not be called");
    }
}

struct Upper;

#[async_trait]
impl Translator for Upper {
    fn name(&self) -> &str {
        "upper"
    }

    async fn translate(&self, captions: &[Caption], _: &str) -> RelingoResult<Vec<Caption>> {
        Ok(captions
            .iter()
            .map(|c| Caption {
                text: c.text.to_uppercase(),
                ..c.clone()
            })
            .collect())
    }
}

struct DropsOne;

#[async_trait]
impl Translator for DropsOne {
    fn name(&self) -> &str {
        "drops-one"
    }

    async fn translate(&self, captions: &[Caption], _: &str) -> RelingoResult<Vec<Caption>> {
        Ok(captions[1..].to_vec())
    }
}

#[derive(Default)]
struct RecordingSynth {
    seen: Mutex<Option<String>>,
}

#[async_trait]
impl SpeechSynthesizer for RecordingSynth {
    fn name(&self) -> &str {
        "recording"
    }

    async fn synthesize(&self, text: &str) -> RelingoResult<Vec<u8>> {
        *self.seen.lock().unwrap() = Some(text.to_owned());
        Ok(vec![0u8; 480])
    }
}

struct Failing;

struct HugeRate;

#[async_trait]
impl SpeechSynthesizer for HugeRate {
    fn name(&self) -> &str {
        "huge-rate"
    }

    fn sample_rate(&self) -> u32 {
        4_000_000_000
    }

    async fn synthesize(&self, _: &str) -> RelingoResult<Vec<u8>> {
        Ok(vec![0u8; 4])
    }
}

#[async_trait]
impl SpeechSynthesizer for Failing {
    fn name(&self) -> &str {
        "failing"
    }

    async fn synthesize(&self, _: &str) -> RelingoResult<Vec<u8>> {
        Err(RelingoError::Other(anyhow::anyhow!("HTTP 500")))
    }
}

fn store() -> LiveCaptions {
    LiveCaptions::new(
        CaptionStore::from_captions(vec![
            Caption::new("1", 0.0, 2.0, "hello").unwrap(),
            Caption::new("2", 2.0, 4.0, "world").unwrap(),
        ])
        .unwrap(),
    )
}

#[test]
fn truncate_respects_char_boundaries() {
    assert_eq!(truncate_chars("héllo", 2), "hé");
    assert_eq!(truncate_chars("abc", 10), "abc");
    assert_eq!(truncate_chars("", 3), "");
}

#[tokio::test]
async fn empty_transcription_is_valid() {
    let store = transcribe_wav(&FixedTranscriber(Ok(Vec::new())), Vec::new())
        .await
        .unwrap();
    assert!(store.is_empty());
}

#[tokio::test]
async fn transcription_failure_is_tagged() {
    let t = FixedTranscriber(Err(RelingoError::validation("x")));
    let err = transcribe_wav(&t, Vec::new()).await.unwrap_err();
    match err {
        RelingoError::Service { operation, message } => {
            assert_eq!(operation, "transcribe");
            assert!(message.starts_with("upstream: "));
            assert!(message.contains('x'));
        }
        other => panic!("unexpected {other:?}"),
    }
}

#[tokio::test]
async fn duplicate_ids_from_transcriber_are_rejected() {
    let dup = vec![
        Caption::new("a", 0.0, 1.0, "x").unwrap(),
        Caption::new("a", 1.0, 2.0, "y").unwrap(),
    ];
    let err = transcribe_wav(&FixedTranscriber(Ok(dup)), Vec::new())
        .await
        .unwrap_err();
    assert!(matches!(err, RelingoError::Service { ref operation, .. } if operation == "transcribe"));
}

#[tokio::test]
async fn translation_replaces_text_only() {
    let live = store();
    translate_captions(&Upper, &live, "Urdu").await.unwrap();
    let snap = live.snapshot();
    assert_eq!(snap.len(), 2);
    assert_eq!(snap.as_slice()[0].id.as_str(), "1");
    assert_eq!(snap.as_slice()[0].text, "HELLO");
    assert_eq!(snap.as_slice()[1].start, 2.0);
    assert_eq!(snap.as_slice()[1].text, "WORLD");
}

#[tokio::test]
async fn mismatched_translation_leaves_store_untouched() {
    let live = store();
    let err = translate_captions(&DropsOne, &live, "Urdu").await.unwrap_err();
    assert!(matches!(err, RelingoError::Service { ref operation, .. } if operation == "translate"));
    assert_eq!(live.snapshot().as_slice()[0].text, "hello");
}

#[tokio::test]
async fn configuration_is_checked_before_work() {
    let err = translate_captions(&Unconfigured, &store(), "Urdu")
        .await
        .unwrap_err();
    assert!(matches!(err, RelingoError::Configuration(_)));
}

#[tokio::test]
async fn narration_is_truncated_and_wrapped() {
    let synth = RecordingSynth::default();
    let long = "x".repeat(MAX_NARRATION_CHARS + 50);
    let audio = synthesize_narration(&synth, &long).await.unwrap();
    assert_eq!(
        synth.seen.lock().unwrap().as_deref().map(str::len),
        Some(MAX_NARRATION_CHARS)
    );

    let buf = audio.decode().unwrap();
    assert_eq!(buf.sample_rate, 24_000);
    assert_eq!(buf.channels, 1);
    assert_eq!(buf.frames(), 240);
}

#[tokio::test]
async fn synthesis_failure_is_tagged() {
    let err = synthesize_narration(&Failing, "hi").await.unwrap_err();
    match err {
        RelingoError::Service { operation, message } => {
            assert_eq!(operation, "synthesize");
            assert!(message.contains("HTTP 500"));
        }
        other => panic!("unexpected {other:?}"),
    }
}

#[tokio::test]
async fn empty_narration_is_rejected() {
    let err = synthesize_narration(&RecordingSynth::default(), "   ")
        .await
        .unwrap_err();
    assert!(matches!(err, RelingoError::Validation(_)));
}

#[tokio::test]
async fn unrepresentable_sample_rate_is_a_service_error() {
    let err = synthesize_narration(&HugeRate, "hi").await.unwrap_err();
    assert!(matches!(err, RelingoError::Service { ref operation, .. } if operation == "synthesize"));
}

#[tokio::test]
async fn captions_are_narrated_in_order() {
    let synth = RecordingSynth::default();
    let live = store();
    live.replace_all(vec![
        Caption::new("1", 0.0, 2.0, " hello ").unwrap(),
        Caption::new("2", 2.0, 3.0, "").unwrap(),
        Caption::new("3", 3.0, 4.0, "world").unwrap(),
    ]);
    let audio = narrate_captions(&synth, &live).await.unwrap();
    assert_eq!(synth.seen.lock().unwrap().as_deref(), Some("hello world"));
    assert_eq!(audio.decode().unwrap().sample_rate, 24_000);
}

#[tokio::test]
async fn narrating_empty_captions_is_rejected() {
    let live = LiveCaptions::new(CaptionStore::new());
    let err = narrate_captions(&RecordingSynth::default(), &live)
        .await
        .unwrap_err();
    assert!(matches!(err, RelingoError::Validation(_)));
}

use super::*;

fn mono(rate: u32, samples: Vec<f32>) -> RawAudioBuffer {
    RawAudioBuffer::mono(rate, samples).unwrap()
}

#[test]
fn substitute_wins_and_is_placed_at_zero() {
    let tracker = ResourceTracker::new();
    let mixer = AudioMixer::new(4, 2).unwrap();
    let narration = mono(4, vec![0.5, -0.5]);
    let original = mono(4, vec![0.9; 8]);

    let graph = mixer.prepare(Some(&narration), Some(&original), 1.0, &tracker);
    assert_eq!(graph.origin(), AudioOrigin::Substitute);
    assert_eq!(graph.frames(), 4);
    assert_eq!(
        graph.samples().unwrap(),
        &[0.5, 0.5, -0.5, -0.5, 0.0, 0.0, 0.0, 0.0]
    );
}

#[test]
fn longer_audio_is_truncated_to_video_duration() {
    let tracker = ResourceTracker::new();
    let mixer = AudioMixer::new(4, 1).unwrap();
    let original = mono(4, vec![0.25; 40]);
    let graph = mixer.prepare(None, Some(&original), 0.5, &tracker);
    assert_eq!(graph.origin(), AudioOrigin::Original);
    assert_eq!(graph.samples().unwrap(), &[0.25, 0.25]);
}

#[test]
fn resampling_interpolates_linearly() {
    let tracker = ResourceTracker::new();
    let mixer = AudioMixer::new(4, 1).unwrap();
    let src = mono(2, vec![0.0, 1.0, 0.0]);
    let graph = mixer.prepare(Some(&src), None, 1.0, &tracker);
    let s = graph.samples().unwrap();
    assert_eq!(s.len(), 4);
    assert!((s[0] - 0.0).abs() < 1e-6);
    assert!((s[1] - 0.5).abs() < 1e-6);
    assert!((s[2] - 1.0).abs() < 1e-6);
    assert!((s[3] - 0.5).abs() < 1e-6);
}

#[test]
fn missing_audio_falls_back_to_silence() {
    let tracker = ResourceTracker::new();
    let mixer = AudioMixer::default();
    let graph = mixer.prepare(None, None, 2.0, &tracker);
    assert_eq!(graph.origin(), AudioOrigin::Silent);
    assert!(graph.is_silent());
    assert_eq!(graph.frames(), 96_000);

    let empty = mono(48_000, Vec::new());
    let graph2 = mixer.prepare(None, Some(&empty), 2.0, &tracker);
    assert_eq!(graph2.origin(), AudioOrigin::Silent);
}

#[test]
fn graph_lease_and_spill_file_released_on_close() {
    let tracker = ResourceTracker::new();
    let dir = tempfile::tempdir().unwrap();
    let mixer = AudioMixer::new(8, 1).unwrap();
    let mut graph = mixer.prepare(Some(&mono(8, vec![0.5; 8])), None, 1.0, &tracker);
    assert_eq!(tracker.stats().audio_graphs, 1);

    let path = graph.spill_f32le(dir.path()).unwrap().unwrap();
    assert_eq!(std::fs::metadata(&path).unwrap().len(), 32);
    assert_eq!(graph.spill_f32le(dir.path()).unwrap().unwrap(), path);

    graph.close();
    assert!(!path.exists());
    assert!(tracker.stats().all_released());
}

#[test]
fn substitute_wav_decodes_or_fails_cleanly() {
    let wav_bytes = wav::wrap_pcm(&[0xff, 0x7f, 0x00, 0x80], 24_000, 1).unwrap();
    let buf = SubstituteAudio::Wav(wav_bytes).decode().unwrap();
    assert_eq!(buf.interleaved, vec![1.0, -1.0]);

    assert!(matches!(
        SubstituteAudio::Wav(b"garbage".to_vec()).decode(),
        Err(RelingoError::Decode(_))
    ));
}

#[test]
fn original_audio_policy_parses() {
    assert_eq!(
        "drop".parse::<OriginalAudio>().unwrap(),
        OriginalAudio::Drop
    );
    assert_eq!(
        "Passthrough".parse::<OriginalAudio>().unwrap(),
        OriginalAudio::Passthrough
    );
    assert!("loud".parse::<OriginalAudio>().is_err());
}

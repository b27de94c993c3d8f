use super::*;

const SAMPLE: &str = r#"{
  "streams": [
    {"codec_type": "video", "width": 1280, "height": 720,
     "avg_frame_rate": "30000/1001", "r_frame_rate": "30000/1001", "duration": "5.9"},
    {"codec_type": "audio", "sample_rate": "48000"}
  ],
  "format": {"duration": "6.006000"}
}"#;

#[test]
fn parses_video_metadata() {
    let info = parse_probe_json(SAMPLE.as_bytes(), Path::new("in.mp4")).unwrap();
    assert_eq!(info.canvas, Canvas::new(1280, 720).unwrap());
    assert_eq!(info.fps, Fps::new(30_000, 1001).unwrap());
    assert!((info.duration_secs - 6.006).abs() < 1e-9);
    assert!(info.has_audio);
    assert_eq!(info.path, PathBuf::from("in.mp4"));
}

#[test]
fn falls_back_on_unusable_frame_rates_and_stream_duration() {
    let json = r#"{"streams":[{"codec_type":"video","width":2,"height":2,
        "avg_frame_rate":"0/0","r_frame_rate":"25/1","duration":"1.5"}]}"#;
    let info = parse_probe_json(json.as_bytes(), Path::new("x")).unwrap();
    assert_eq!(info.fps, Fps::new(25, 1).unwrap());
    assert_eq!(info.duration_secs, 1.5);
    assert!(!info.has_audio);

    let json = r#"{"streams":[{"codec_type":"video","width":2,"height":2,"duration":"1"}]}"#;
    let info = parse_probe_json(json.as_bytes(), Path::new("x")).unwrap();
    assert_eq!(info.fps, FALLBACK_FPS);
}

#[test]
fn unreadable_metadata_is_a_decode_error() {
    for json in [
        "not json",
        r#"{"streams":[{"codec_type":"audio"}]}"#,
        r#"{"streams":[{"codec_type":"video","width":2}]}"#,
        r#"{"streams":[{"codec_type":"video","width":2,"height":2}]}"#,
    ] {
        let err = parse_probe_json(json.as_bytes(), Path::new("x")).unwrap_err();
        assert!(matches!(err, RelingoError::Decode(_)), "{json}");
    }
}

use super::*;

#[test]
fn chunks_are_concatenated_in_order() {
    let blob = MediaBlob::from_chunks(OutputFormat::Webm, vec![vec![1, 2], vec![], vec![3]]);
    assert_eq!(blob.bytes(), &[1, 2, 3]);
    assert_eq!(blob.mime(), "video/webm");
    assert_eq!(blob.len(), 3);
}

#[test]
fn file_name_has_timestamp_suffix_and_extension() {
    let blob = MediaBlob::new(OutputFormat::Mp4, vec![0]);
    let name = blob.file_name("my clip");
    let expected_ts = blob.created_at().format("%Y%m%d_%H%M%S").to_string();
    assert_eq!(name, format!("my_clip_{expected_ts}.mp4"));
    assert_eq!(expected_ts.len(), 15);

    assert!(blob.file_name("  ").starts_with("captioned_"));
}

#[test]
fn write_to_creates_the_file() {
    let dir = tempfile::tempdir().unwrap();
    let blob = MediaBlob::new(OutputFormat::WebmVp9Opus, b"webm".to_vec());
    let path = blob.write_to(&dir.path().join("out"), "video").unwrap();
    assert_eq!(std::fs::read(&path).unwrap(), b"webm");
    assert_eq!(path.extension().unwrap(), "webm");
}

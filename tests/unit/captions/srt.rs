use super::*;

fn abc() -> CaptionStore {
    CaptionStore::from_captions(vec![
        Caption::new("a", 0.0, 2.0, "A").unwrap(),
        Caption::new("b", 2.0, 4.0, "B").unwrap(),
        Caption::new("c", 4.0, 6.0, "C").unwrap(),
    ])
    .unwrap()
}

#[test]
fn exports_three_numbered_blocks() {
    let srt = export_srt(&abc());
    let blocks: Vec<&str> = srt.trim_end().split("\n\n").collect();
    assert_eq!(blocks.len(), 3);
    assert_eq!(blocks[0], "1\n00:00:00,000 --> 00:00:02,000\nA");
    assert_eq!(blocks[1], "2\n00:00:02,000 --> 00:00:04,000\nB");
    assert_eq!(blocks[2], "3\n00:00:04,000 --> 00:00:06,000\nC");
}

#[test]
fn empty_store_exports_empty_text() {
    assert_eq!(export_srt(&CaptionStore::new()), "");
}

#[test]
fn time_formatting_covers_hours_and_rounding() {
    assert_eq!(format_srt_time(0.0), "00:00:00,000");
    assert_eq!(format_srt_time(61.2346), "00:01:01,235");
    assert_eq!(format_srt_time(3723.5), "01:02:03,500");
}

#[test]
fn parse_accepts_exported_text() {
    let store = abc();
    let parsed = parse_srt(&export_srt(&store)).unwrap();
    assert_eq!(parsed.len(), 3);
    let ids: Vec<_> = parsed.iter().map(|c| c.id.as_str()).collect();
    assert_eq!(ids, vec!["1", "2", "3"]);
    for (a, b) in store.iter().zip(parsed.iter()) {
        assert_eq!(a.start, b.start);
        assert_eq!(a.end, b.end);
        assert_eq!(a.text, b.text);
    }
}

#[test]
fn parse_handles_crlf_multiline_and_bad_stamps() {
    let text = "1\r\n00:00:01,000 --> 00:00:02,500\r\nline one\r\nline two\r\n\r\n";
    let parsed = parse_srt(text).unwrap();
    assert_eq!(parsed.as_slice()[0].text, "line one\nline two");
    assert_eq!(parsed.as_slice()[0].end, 2.5);

    assert!(parse_srt("1\n00:00:01 --> 00:00:02,000\nx\n").is_err());
    assert!(parse_srt_time("00:61:00,000").is_err());
}

#[test]
fn oversized_hour_field_is_a_validation_error() {
    let text = "1\n9999999999999999:00:00,000 --> 9999999999999999:00:01,000\nx\n";
    assert!(matches!(parse_srt(text), Err(RelingoError::Validation(_))));
    assert!(matches!(
        parse_srt_time("18446744073709551615:00:00,000"),
        Err(RelingoError::Validation(_))
    ));
    assert_eq!(parse_srt_time("100:00:00,001").unwrap(), 360_000.001);
}

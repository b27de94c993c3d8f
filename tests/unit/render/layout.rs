use super::*;

/// Ten pixels per character, spaces included.
fn ten_px(s: &str) -> f64 {
    s.chars().count() as f64 * 10.0
}

#[test]
fn wrap_matches_hand_computed_lines() {
    // max 100px = 10 chars per line.
    let lines = wrap_words("the quick brown fox jumps over the lazy dog", 100.0, ten_px);
    assert_eq!(
        lines,
        vec!["the quick", "brown fox", "jumps over", "the lazy", "dog"]
    );
}

#[test]
fn overlong_word_stays_alone() {
    let lines = wrap_words("a incomprehensibilities b", 100.0, ten_px);
    assert_eq!(lines, vec!["a", "incomprehensibilities", "b"]);

    let lines = wrap_words("incomprehensibilities", 100.0, ten_px);
    assert_eq!(lines, vec!["incomprehensibilities"]);
}

#[test]
fn exact_fit_does_not_wrap() {
    assert_eq!(wrap_words("abcd efghi", 100.0, ten_px), vec!["abcd efghi"]);
    assert_eq!(
        wrap_words("abcd efghij", 100.0, ten_px),
        vec!["abcd", "efghij"]
    );
}

#[test]
fn whitespace_is_collapsed_and_empty_text_has_no_lines() {
    assert_eq!(wrap_words("  hi \n there ", 1000.0, ten_px), vec!["hi there"]);
    assert!(wrap_words("   ", 1000.0, ten_px).is_empty());
}

#[test]
fn font_size_scales_with_height() {
    assert_eq!(font_size_for(1000, 1.0), 50.0);
    assert_eq!(font_size_for(1000, 1.5), 75.0);
}

#[test]
fn lines_stack_upward_from_ninety_percent() {
    // 1000x1000 -> font 50px, max width 800px; measure 50px per char.
    let canvas = Canvas::new(1000, 1000).unwrap();
    let text = "aaaaaaaaaa bbbbbbbbbb cccc";
    let layout =
        CaptionLayout::compute(text, canvas, 1.0, |s, fs| s.chars().count() as f64 * fs).unwrap();

    assert_eq!(layout.font_size, 50.0);
    let texts: Vec<&str> = layout.lines.iter().map(|l| l.text.as_str()).collect();
    assert_eq!(texts, vec!["aaaaaaaaaa", "bbbbbbbbbb cccc"]);

    let last = &layout.lines[1];
    assert_eq!(last.bottom, 900.0);
    assert_eq!(last.width, 750.0);
    assert_eq!(last.left, 125.0);

    let first = &layout.lines[0];
    assert!((first.bottom - (900.0 - 65.0)).abs() < 1e-9);
    assert_eq!(first.left, 250.0);

    // Widest line 750, padding 20 on each side; top = 835 - 50 - 20.
    let bg = layout.background;
    assert!((bg.x0 - 105.0).abs() < 1e-9);
    assert!((bg.x1 - 895.0).abs() < 1e-9);
    assert!((bg.y0 - 765.0).abs() < 1e-9);
    assert!((bg.y1 - 920.0).abs() < 1e-9);
    assert!((layout.outline_width() - 5.0).abs() < 1e-9);
}

#[test]
fn empty_caption_has_no_layout() {
    let canvas = Canvas::new(100, 100).unwrap();
    assert!(CaptionLayout::compute("", canvas, 1.0, |_, _| 0.0).is_none());
    assert!(CaptionLayout::compute("x", canvas, 0.0, |_, _| 0.0).is_none());
}

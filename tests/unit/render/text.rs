use super::*;

#[test]
fn block_shaper_uses_fixed_advance() {
    let mut s = BlockShaper;
    assert!((s.measure("abcd", 20.0) - 44.0).abs() < 1e-9);
    assert!((s.measure("a b", 10.0) - 16.5).abs() < 1e-9);
    assert_eq!(s.measure("", 10.0), 0.0);
}

#[test]
fn font_shaper_rejects_non_font_bytes() {
    assert!(FontShaper::from_bytes(b"definitely not a font".to_vec()).is_err());
}

#[test]
fn font_shaper_missing_file_is_an_error() {
    let err = FontShaper::from_path(std::path::Path::new("/nonexistent/font.ttf")).unwrap_err();
    assert!(matches!(err, RelingoError::Validation(_)));
}

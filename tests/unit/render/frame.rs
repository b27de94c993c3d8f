use super::*;

#[test]
fn from_straight_checks_length() {
    assert!(FrameRGBA::from_straight(2, 2, vec![0; 16]).is_ok());
    assert!(matches!(
        FrameRGBA::from_straight(2, 2, vec![0; 15]),
        Err(RelingoError::Decode(_))
    ));
    assert!(FrameRGBA::from_straight(0, 2, Vec::new()).is_err());
}

#[test]
fn pixel_lookup_and_bounds() {
    let canvas = Canvas::new(3, 2).unwrap();
    let f = FrameRGBA::solid(canvas, Color::rgb(1, 2, 3));
    assert_eq!(f.pixel(2, 1), Some([1, 2, 3, 255]));
    assert_eq!(f.pixel(3, 0), None);
    assert_eq!(f.canvas(), canvas);
}

#[test]
fn flatten_over_background() {
    let f = FrameRGBA::from_straight(1, 1, vec![255, 0, 0, 0]).unwrap();
    assert_eq!(f.flatten_over(Color::rgb(0, 0, 255)), vec![0, 0, 255, 255]);

    let half = FrameRGBA::from_straight(1, 1, vec![255, 255, 255, 128]).unwrap();
    let out = half.flatten_over(Color::BLACK);
    assert_eq!(out[3], 255);
    assert_eq!(out[0], 128);
}

#[test]
fn png_encoding_has_signature() {
    let f = FrameRGBA::solid(Canvas::new(4, 4).unwrap(), Color::WHITE);
    let png = f.to_png().unwrap();
    assert_eq!(&png[..8], b"\x89PNG\r\n\x1a\n");
}

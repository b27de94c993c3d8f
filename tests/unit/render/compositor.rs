use super::*;
use crate::captions::model::Caption;
use crate::render::text::BlockShaper;

const BLUE: Color = Color::rgb(0, 0, 255);

fn store() -> CaptionStore {
    CaptionStore::from_captions(vec![
        Caption::new("a", 0.0, 2.0, "A").unwrap(),
        Caption::new("b", 2.0, 4.0, "B").unwrap(),
    ])
    .unwrap()
}

fn compositor(style: CaptionStyle, tracker: &ResourceTracker) -> FrameCompositor {
    FrameCompositor::new(
        Canvas::new(200, 100).unwrap(),
        style,
        Box::new(BlockShaper),
        tracker,
    )
    .unwrap()
}

#[test]
fn overlay_tracks_the_active_caption() {
    let tracker = ResourceTracker::new();
    let mut c = compositor(CaptionStyle::default(), &tracker);
    let base = FrameRGBA::solid(c.canvas(), BLUE);
    let captions = store();

    let f = c.compose(&base, 1.0, &captions).unwrap();
    let overlay = f.overlay.unwrap();
    assert_eq!(overlay.caption_id.as_str(), "a");
    assert_eq!(overlay.lines, vec!["A"]);
    assert_eq!(overlay.font_size, 5.0);
    assert_eq!(overlay.line_bottoms, vec![90.0]);
    assert!(overlay.background.is_none());
    assert!(overlay.outlined);

    let f = c.compose(&base, 2.0, &captions).unwrap();
    assert_eq!(f.overlay.unwrap().caption_id.as_str(), "a");

    let f = c.compose(&base, 9.0, &captions).unwrap();
    assert!(f.overlay.is_none());
    assert_eq!(f.frame.data, c.compose(&base, 9.0, &CaptionStore::new()).unwrap().frame.data);
}

#[test]
fn background_box_and_glyph_pixels() {
    let tracker = ResourceTracker::new();
    let style = CaptionStyle {
        background_color: Color::rgb(255, 0, 0),
        ..CaptionStyle::default()
    };
    let mut c = compositor(style, &tracker);
    let base = FrameRGBA::solid(c.canvas(), BLUE);
    let f = c.compose(&base, 1.0, &store()).unwrap();

    let bg = f.overlay.as_ref().unwrap().background.unwrap();
    assert!((bg.y1 - 92.0).abs() < 1e-9);
    assert!((bg.y0 - 83.0).abs() < 1e-9);

    // Untouched source pixel.
    assert_eq!(f.frame.pixel(10, 10), Some([0, 0, 255, 255]));
    // Inside the box, below the glyph cell.
    assert_eq!(f.frame.pixel(97, 91), Some([255, 0, 0, 255]));
    // Inside the glyph cell.
    assert_eq!(f.frame.pixel(99, 87), Some([255, 255, 255, 255]));
}

#[test]
fn non_white_text_is_not_outlined() {
    let tracker = ResourceTracker::new();
    let style = CaptionStyle {
        text_color: Color::rgb(255, 255, 0),
        ..CaptionStyle::default()
    };
    let mut c = compositor(style, &tracker);
    let base = FrameRGBA::solid(c.canvas(), BLUE);
    let f = c.compose(&base, 1.0, &store()).unwrap();
    assert!(!f.overlay.unwrap().outlined);
}

#[test]
fn compositing_is_pure_across_frames() {
    let tracker = ResourceTracker::new();
    let mut c = compositor(CaptionStyle::default(), &tracker);
    let base = FrameRGBA::solid(c.canvas(), BLUE);
    let captions = store();
    let first = c.compose(&base, 1.0, &captions).unwrap();
    let _ = c.compose(&base, 3.0, &captions).unwrap();
    let again = c.compose(&base, 1.0, &captions).unwrap();
    assert_eq!(first.frame, again.frame);
    assert_eq!(first.overlay, again.overlay);
}

#[test]
fn surface_is_released_with_the_compositor() {
    let tracker = ResourceTracker::new();
    let c = compositor(CaptionStyle::default(), &tracker);
    assert_eq!(tracker.stats().surfaces, 1);
    c.release();
    assert!(tracker.stats().all_released());
}

#[test]
fn style_json_uses_camel_case_and_defaults() {
    let style =
        CaptionStyle::from_json_str(r##"{"backgroundColor":"#000000aa","fontScale":1.5}"##)
            .unwrap();
    assert_eq!(style.text_color, Color::WHITE);
    assert_eq!(style.background_color, Color::rgba(0, 0, 0, 0xaa));
    assert_eq!(style.font_scale, 1.5);

    assert!(CaptionStyle::from_json_str(r#"{"fontScale":0}"#).is_err());
    assert!(CaptionStyle::from_json_str(r#"{"textColor":"chartreuse-ish"}"#).is_err());
}

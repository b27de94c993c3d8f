use super::*;

#[test]
fn fps_parses_ffprobe_ratios() {
    let ntsc = Fps::parse("30000/1001").unwrap();
    assert_eq!(ntsc, Fps { num: 30_000, den: 1001 });
    assert!((ntsc.as_f64() - 29.97).abs() < 0.01);

    assert_eq!(Fps::parse("25").unwrap(), Fps { num: 25, den: 1 });
    assert!(Fps::parse("0/0").is_err());
    assert!(Fps::parse("abc").is_err());
}

#[test]
fn frame_times_follow_rational_rate() {
    let fps = Fps::new(4, 1).unwrap();
    assert_eq!(fps.frame_time_secs(FrameIndex(0)), 0.0);
    assert!((fps.frame_time_secs(FrameIndex(3)) - 0.75).abs() < 1e-12);
    assert_eq!(fps.frames_for_secs_ceil(6.0), 24);
    assert_eq!(fps.frames_for_secs_ceil(6.1), 25);
    assert_eq!(fps.frames_for_secs_ceil(0.0), 0);
}

#[test]
fn canvas_rejects_degenerate_sizes() {
    assert!(Canvas::new(0, 10).is_err());
    assert!(Canvas::new(70_000, 10).is_err());
    let c = Canvas::new(4, 2).unwrap();
    assert_eq!(c.rgba_len(), 32);
    assert_eq!(c.as_u16(), (4, 2));
}

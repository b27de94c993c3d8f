use super::*;

#[test]
fn progress_is_strictly_increasing_and_below_one() {
    let mut r = ProgressReporter::new(2.0);
    assert_eq!(r.at(0.0), None);
    assert_eq!(r.at(0.5), Some(0.25));
    assert_eq!(r.at(0.5), None);
    assert_eq!(r.at(0.25), None);
    assert_eq!(r.at(1.0), Some(0.5));
    assert_eq!(r.at(2.0), None);
    assert_eq!(r.at(5.0), None);
}

#[test]
fn zero_duration_reports_nothing() {
    let mut r = ProgressReporter::new(0.0);
    assert_eq!(r.at(1.0), None);
    let mut r = ProgressReporter::new(f64::NAN);
    assert_eq!(r.at(1.0), None);
}

#[test]
fn request_builder() {
    let req = RenderRequest::new("in.mp4", crate::captions::store::CaptionStore::new())
        .with_substitute(SubstituteAudio::Wav(Vec::new()));
    assert_eq!(req.source, PathBuf::from("in.mp4"));
    assert!(req.substitute.is_some());
    assert_eq!(req.style, CaptionStyle::default());
}

use std::collections::HashMap;

use super::*;

fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
        .collect();
    move |k| map.get(k).cloned()
}

#[test]
fn defaults() {
    let o = RenderOpts::default();
    assert_eq!(o.video_bitrate, 5_000_000);
    assert_eq!(o.mix_sample_rate, 48_000);
    assert_eq!(o.mix_channels, 2);
    assert_eq!(o.formats, FORMAT_PREFERENCE.to_vec());
    assert_eq!(o.original_audio, OriginalAudio::Passthrough);
    assert_eq!(o.channel_select, ChannelSelect::First);
    assert!(o.fps.is_none());
}

#[test]
fn env_overlay_applies_values() {
    let o = RenderOpts::default()
        .overlay_env(env(&[
            ("RELINGO_FPS", "30000/1001"),
            ("RELINGO_VIDEO_BITRATE", "2M"),
            ("RELINGO_FONT", "/fonts/Inter.ttf"),
            ("RELINGO_CHANNEL", "average"),
            ("RELINGO_ORIGINAL_AUDIO", "drop"),
        ]))
        .unwrap();
    assert_eq!(o.fps, Some(Fps::new(30_000, 1001).unwrap()));
    assert_eq!(o.video_bitrate, 2_000_000);
    assert_eq!(o.font_path, Some(PathBuf::from("/fonts/Inter.ttf")));
    assert_eq!(o.original_audio, OriginalAudio::Drop);
    assert_eq!(o.channel_select, ChannelSelect::Average);
}

#[test]
fn channel_overlay_accepts_an_index() {
    let o = RenderOpts::default()
        .overlay_env(env(&[("RELINGO_CHANNEL", "1")]))
        .unwrap();
    assert_eq!(o.channel_select, ChannelSelect::Index(1));
    assert!(
        RenderOpts::default()
            .overlay_env(env(&[("RELINGO_CHANNEL", "left")]))
            .is_err()
    );
}

#[test]
fn empty_values_are_ignored_and_bad_values_rejected() {
    let o = RenderOpts::default()
        .overlay_env(env(&[("RELINGO_FPS", "  ")]))
        .unwrap();
    assert!(o.fps.is_none());

    assert!(
        RenderOpts::default()
            .overlay_env(env(&[("RELINGO_FPS", "fast")]))
            .is_err()
    );
    assert!(
        RenderOpts::default()
            .overlay_env(env(&[("RELINGO_ORIGINAL_AUDIO", "maybe")]))
            .is_err()
    );
}

#[test]
fn bitrate_parsing() {
    assert_eq!(parse_bitrate("5000000").unwrap(), 5_000_000);
    assert_eq!(parse_bitrate("800k").unwrap(), 800_000);
    assert_eq!(parse_bitrate("5M").unwrap(), 5_000_000);
    assert!(parse_bitrate("0").is_err());
    assert!(parse_bitrate("lots").is_err());
    assert!(parse_bitrate("99999M").is_err());
}

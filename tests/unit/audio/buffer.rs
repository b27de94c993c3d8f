use super::*;

fn stereo() -> RawAudioBuffer {
    RawAudioBuffer::new(8, 2, vec![0.5, -0.5, 1.0, 0.0, -1.0, 1.0]).unwrap()
}

#[test]
fn channel_selection_strategies() {
    let buf = stereo();
    assert_eq!(buf.frames(), 3);
    assert_eq!(buf.to_mono(ChannelSelect::First).unwrap(), vec![0.5, 1.0, -1.0]);
    assert_eq!(buf.to_mono(ChannelSelect::Index(1)).unwrap(), vec![-0.5, 0.0, 1.0]);
    assert_eq!(buf.to_mono(ChannelSelect::Average).unwrap(), vec![0.0, 0.5, 0.0]);
    assert!(buf.to_mono(ChannelSelect::Index(2)).is_err());
}

#[test]
fn quantization_hits_full_scale_and_clips() {
    assert_eq!(quantize_sample(0.0), 0);
    assert_eq!(quantize_sample(1.0), i16::MAX);
    assert_eq!(quantize_sample(-1.0), i16::MIN);
    assert_eq!(quantize_sample(1.7), i16::MAX);
    assert_eq!(quantize_sample(-3.0), i16::MIN);
    assert_eq!(quantize_sample(f32::NAN), 0);

    assert_eq!(dequantize_sample(i16::MAX), 1.0);
    assert_eq!(dequantize_sample(i16::MIN), -1.0);
    assert_eq!(dequantize_sample(0), 0.0);
}

#[test]
fn buffer_validation() {
    assert!(RawAudioBuffer::new(0, 1, vec![]).is_err());
    assert!(RawAudioBuffer::new(8, 0, vec![]).is_err());
    assert!(RawAudioBuffer::new(8, 2, vec![0.0; 3]).is_err());
    assert!((stereo().duration_secs() - 0.375).abs() < 1e-12);
}

#[test]
fn channel_select_parses() {
    assert_eq!("first".parse::<ChannelSelect>().unwrap(), ChannelSelect::First);
    assert_eq!("average".parse::<ChannelSelect>().unwrap(), ChannelSelect::Average);
    assert_eq!("1".parse::<ChannelSelect>().unwrap(), ChannelSelect::Index(1));
    assert!("left".parse::<ChannelSelect>().is_err());
}

use super::*;

#[test]
fn f32le_parsing() {
    let mut bytes = Vec::new();
    for s in [0.0f32, -1.0, 0.25] {
        bytes.extend_from_slice(&s.to_le_bytes());
    }
    assert_eq!(f32le_to_samples(&bytes).unwrap(), vec![0.0, -1.0, 0.25]);
    assert!(matches!(
        f32le_to_samples(&bytes[..5]),
        Err(RelingoError::Decode(_))
    ));
}

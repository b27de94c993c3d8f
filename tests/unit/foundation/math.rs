use super::*;

#[test]
fn mul_div255_rounds_to_nearest() {
    assert_eq!(mul_div255_u16(255, 255), 255);
    assert_eq!(mul_div255_u16(255, 0), 0);
    assert_eq!(mul_div255_u16(128, 255), 128);
    assert_eq!(mul_div255_u8(200, 128), 100);
}

#[test]
fn premultiply_zeroes_transparent_pixels() {
    let mut px = vec![100u8, 50, 200, 0, 100, 50, 200, 128];
    premultiply_rgba8_in_place(&mut px);
    assert_eq!(&px[0..4], &[0, 0, 0, 0]);
    assert_eq!(px[4], ((100u16 * 128 + 127) / 255) as u8);
    assert_eq!(px[7], 128);
}

#[test]
fn flatten_over_background() {
    let src = vec![0u8, 0, 0, 0, 1, 2, 3, 255];
    let mut dst = vec![0u8; 8];
    flatten_premul_over_bg(&mut dst, &src, [10, 20, 30]);
    assert_eq!(dst, vec![10, 20, 30, 255, 1, 2, 3, 255]);
}

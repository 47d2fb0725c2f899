use super::*;

#[test]
fn test_mirror_index() {
    assert_eq!(mirror(-1, 4), 1);
    assert_eq!(mirror(-2, 4), 2);
    assert_eq!(mirror(4, 4), 2);
    assert_eq!(mirror(5, 4), 1);
    assert_eq!(mirror(3, 4), 3);
    assert_eq!(mirror(-7, 1), 0);
}

#[test]
fn test_same_shape_is_identity() {
    let src = Buffer2::from_fn(7, 5, |x, y| (x * 3 + y) as f64 * 0.1);
    assert_eq!(resize_bilinear(&src, 7, 5), src);
}

#[test]
fn test_downsample_by_two_averages_blocks() {
    // value = x + 4y
    let src = Buffer2::from_fn(4, 4, |x, y| (x + 4 * y) as f64);
    let out = resize_bilinear(&src, 2, 2);
    assert_eq!(out.pixels(), &[2.5, 4.5, 10.5, 12.5]);
}

#[test]
fn test_upsample_mirrors_at_edges() {
    let src = Buffer2::new(2, 1, vec![0.0f64, 1.0]);
    let out = resize_bilinear(&src, 4, 1);
    assert_eq!(out.pixels(), &[0.25, 0.25, 0.75, 0.75]);
}

#[test]
fn test_constant_image_stays_constant() {
    let src = Buffer2::new_filled(33, 17, 0.6f64);
    let down = resize_bilinear(&src, 8, 4);
    let up = resize_bilinear(&down, 33, 17);
    assert!(down.iter().all(|&v| (v - 0.6).abs() < 1e-6));
    assert!(up.iter().all(|&v| (v - 0.6).abs() < 1e-6));
}

#[test]
fn test_non_square_shapes() {
    let src = Buffer2::new_filled(100, 60, 1.0f64);
    let out = resize_bilinear(&src, 25, 15);
    assert_eq!(out.dimensions(), (25, 15));
}

#[test]
fn test_resize_mask_upsample_reflects_at_border() {
    // One set pixel in a 4x4 mask, upsampled 4x
    let mut mask = BitBuffer2::new_default(4, 4);
    mask.set_xy(1, 2, true);
    let up = resize_mask(&mask, 16, 16);

    assert_eq!(up.dimensions(), (16, 16));
    // The 4x4 block the pixel maps onto is fully set
    for y in 8..12 {
        for x in 4..8 {
            assert!(up.get_xy(x, y), "({x}, {y}) should be set");
        }
    }
    // Columns 0..2 mirror back onto x = 1 and rows 14..16 onto y = 2,
    // so the set region is x in 0..=9, y in 6..=15
    let expected = BitBuffer2::from_fn(16, 16, |x, y| x <= 9 && y >= 6);
    assert_eq!(up, expected);
    assert_eq!(up.count_ones(), 100);
    assert!(up.get_xy(0, 8));
    assert!(!up.get_xy(0, 0));
    assert!(!up.get_xy(15, 15));
}

#[test]
fn test_resize_mask_empty_stays_empty() {
    let mask = BitBuffer2::new_default(10, 6);
    assert!(resize_mask(&mask, 40, 24).is_clear());
}

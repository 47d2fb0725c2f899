use super::*;

#[test]
fn test_empty_is_none() {
    assert_eq!(otsu_threshold(&[]), None);
}

#[test]
fn test_uniform_returns_value() {
    assert_eq!(otsu_threshold(&[0.37; 50]), Some(0.37));
}

#[test]
fn test_two_levels_picks_first_bin_centre() {
    // Every split between the two occupied bins has the same variance,
    // the first one wins.
    let mut values = vec![0.0f64; 30];
    values.extend(std::iter::repeat(1.0f64).take(70));
    let threshold = otsu_threshold(&values).unwrap();
    assert_eq!(threshold, 0.5 / OTSU_BINS as f64);
    assert_eq!(values.iter().filter(|&&v| v > threshold).count(), 70);
}

#[test]
fn test_bimodal_clusters() {
    let mut values = Vec::new();
    for i in 0..100 {
        values.push(0.1 + 0.2 * (i as f64 / 100.0));
    }
    for i in 0..100 {
        values.push(0.7 + 0.2 * (i as f64 / 100.0));
    }
    let threshold = otsu_threshold(&values).unwrap();
    assert!(
        threshold > 0.25 && threshold < 0.7,
        "threshold {threshold} should separate the clusters"
    );
}

#[test]
fn test_threshold_is_bin_centre() {
    let values: Vec<f64> = (0..1000).map(|i| ((i * 37) % 1000) as f64 / 10.0).collect();
    let threshold = otsu_threshold(&values).unwrap();
    let lo = 0.0f64;
    let hi = 99.9f64;
    let step = (hi - lo) / OTSU_BINS as f64;
    let bin = ((threshold - lo) / step - 0.5).round();
    let expected = lo + (bin + 0.5) * step;
    assert!(
        (threshold - expected).abs() < 1e-9,
        "threshold {threshold} is not a bin centre"
    );
}

#[test]
fn test_invariant_to_affine_rescale() {
    let values: Vec<f64> = vec![0.0, 0.0, 0.1, 0.2, 0.2, 0.6, 0.8, 0.9, 0.9, 1.0];
    let scaled: Vec<f64> = values.iter().map(|&v| 10.0 + v * 5.0).collect();

    let t = otsu_threshold(&values).unwrap();
    let ts = otsu_threshold(&scaled).unwrap();

    let above = values.iter().filter(|&&v| v > t).count();
    let above_scaled = scaled.iter().filter(|&&v| v > ts).count();
    assert_eq!(above, above_scaled);
}

#[test]
fn test_small_bright_population() {
    // Dim cytoplasm with a few bright vesicle pixels
    let mut values = vec![0.3f64; 500];
    values.extend([1.0f64; 12]);
    let threshold = otsu_threshold(&values).unwrap();
    assert!(threshold > 0.3 && threshold < 1.0);
    assert_eq!(values.iter().filter(|&&v| v > threshold).count(), 12);
}

//! Small statistics helpers shared by the normalizer and the cell detector.
//!
//! Accumulation is done in `f64` regardless of the sample type.

/// Minimum and maximum of the finite values, or `None` if there are none.
pub(crate) fn min_max<I>(values: I) -> Option<(f64, f64)>
where
    I: IntoIterator<Item = f64>,
{
    values
        .into_iter()
        .filter(|v| v.is_finite())
        .fold(None, |acc, v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
}

/// Mean and population standard deviation (`ddof = 0`).
pub(crate) fn mean_std(values: &[f64]) -> (f64, f64) {
    if values.is_empty() {
        return (0.0, 0.0);
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let variance = values
        .iter()
        .map(|&v| {
            let d = v - mean;
            d * d
        })
        .sum::<f64>()
        / n;
    (mean, variance.sqrt())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_min_max_skips_non_finite() {
        let values = [3.0, f64::NAN, -2.0, f64::INFINITY, 7.5];
        assert_eq!(min_max(values), Some((-2.0, 7.5)));
        assert_eq!(min_max(Vec::<f64>::new()), None);
    }

    #[test]
    fn test_mean_std_population() {
        let (mean, std) = mean_std(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]);
        assert!((mean - 5.0).abs() < 1e-12);
        assert!((std - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_mean_std_constant() {
        let (mean, std) = mean_std(&[0.5; 10]);
        assert!((mean - 0.5).abs() < 1e-12);
        assert_eq!(std, 0.0);
    }
}

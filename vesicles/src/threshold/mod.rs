//! Otsu's global threshold.
//!
//! The histogram construction follows the usual numpy conventions so the
//! chosen threshold matches reference implementations bin for bin:
//! - 256 equal-width bins spanning `[min, max]` of the samples, the maximum
//!   falling in the last bin,
//! - candidate thresholds are bin centres,
//! - the first bin maximizing the between-class variance wins.
//!
//! Callers binarize with a strict `value > threshold`.

#[cfg(test)]
mod tests;

use crate::math::min_max;

/// Number of histogram bins.
pub const OTSU_BINS: usize = 256;

/// Otsu threshold of `values`.
///
/// Returns `None` for empty input. If every sample has the same value that
/// value is returned, so a strict `>` comparison selects nothing.
pub fn otsu_threshold(values: &[f64]) -> Option<f64> {
    let first = *values.first()?;
    if values.iter().all(|&v| v == first) {
        return Some(first);
    }

    let (lo, hi) = min_max(values.iter().copied())?;
    if hi <= lo {
        return Some(lo);
    }

    let histogram = Histogram::build(values, lo, hi);
    Some(histogram.otsu())
}

/// Equal-width histogram over `[lo, hi]`.
struct Histogram {
    counts: [u64; OTSU_BINS],
    edges: [f64; OTSU_BINS + 1],
}

impl Histogram {
    fn build(values: &[f64], lo: f64, hi: f64) -> Self {
        let mut edges = [0.0f64; OTSU_BINS + 1];
        let step = (hi - lo) / OTSU_BINS as f64;
        for (i, edge) in edges.iter_mut().enumerate() {
            *edge = lo + i as f64 * step;
        }
        edges[OTSU_BINS] = hi;

        let norm = OTSU_BINS as f64 / (hi - lo);
        let last = OTSU_BINS - 1;
        let mut counts = [0u64; OTSU_BINS];

        for &v in values {
            if !v.is_finite() {
                continue;
            }
            let mut bin = (((v - lo) * norm) as usize).min(last);
            // Rounding in `norm` can land a sample one bin off its edges
            if v < edges[bin] {
                bin -= 1;
            } else if bin != last && v >= edges[bin + 1] {
                bin += 1;
            }
            counts[bin] += 1;
        }

        Self { counts, edges }
    }

    #[inline]
    fn center(&self, bin: usize) -> f64 {
        (self.edges[bin] + self.edges[bin + 1]) * 0.5
    }

    /// Bin centre maximizing `w0(t) * w1(t+1) * (m0(t) - m1(t+1))^2`.
    fn otsu(&self) -> f64 {
        // Suffix sums: weight and first moment of bins `t..`
        let mut weight_above = [0.0f64; OTSU_BINS + 1];
        let mut moment_above = [0.0f64; OTSU_BINS + 1];
        for bin in (0..OTSU_BINS).rev() {
            let count = self.counts[bin] as f64;
            weight_above[bin] = weight_above[bin + 1] + count;
            moment_above[bin] = moment_above[bin + 1] + count * self.center(bin);
        }

        let mut weight_below = 0.0f64;
        let mut moment_below = 0.0f64;
        let mut best_bin = 0;
        let mut best_variance = f64::NEG_INFINITY;

        for bin in 0..OTSU_BINS - 1 {
            let count = self.counts[bin] as f64;
            weight_below += count;
            moment_below += count * self.center(bin);

            let w1 = weight_above[bin + 1];
            if weight_below == 0.0 || w1 == 0.0 {
                continue;
            }
            let mean0 = moment_below / weight_below;
            let mean1 = moment_above[bin + 1] / w1;
            let variance = weight_below * w1 * (mean0 - mean1) * (mean0 - mean1);

            if variance > best_variance {
                best_variance = variance;
                best_bin = bin;
            }
        }

        self.center(best_bin)
    }
}

//! Binary morphology on bit-packed masks with disk footprints.
//!
//! Border conventions:
//! - dilation treats pixels outside the frame as background,
//! - erosion treats them as foreground, so a mask touching the frame edge is
//!   never eaten away from the edge,
//! - hole filling treats background 4-connected to the frame edge as outside.
//!
//! A disk of radius `r` is decomposed into one horizontal span per row offset.
//! With per-row prefix counts every span is tested in O(1), giving
//! O(width * height * (2r + 1)) for a dilation.


use common::BitBuffer2;
use rayon::prelude::*;

// ============================================================================
// Footprint
// ============================================================================

/// Disk structuring element: offsets with `dx^2 + dy^2 <= r^2`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Disk {
    radius: usize,
    /// Half-width of the span at row offset `dy`, indexed by `dy + radius`.
    half_widths: Vec<usize>,
}

impl Disk {
    pub fn new(radius: usize) -> Self {
        let r2 = radius * radius;
        let half_widths = (0..=2 * radius)
            .map(|i| {
                let dy = i.abs_diff(radius);
                let rem = r2 - dy * dy;
                let mut w = (rem as f64).sqrt() as usize;
                while w * w > rem {
                    w -= 1;
                }
                while (w + 1) * (w + 1) <= rem {
                    w += 1;
                }
                w
            })
            .collect();
        Self {
            radius,
            half_widths,
        }
    }

    #[inline]
    pub fn radius(&self) -> usize {
        self.radius
    }

    /// Number of pixels in the footprint.
    pub fn area(&self) -> usize {
        self.half_widths.iter().map(|w| 2 * w + 1).sum()
    }

    /// `(dy, half_width)` for every row of the footprint.
    fn spans(&self) -> impl Iterator<Item = (isize, usize)> + '_ {
        let r = self.radius as isize;
        self.half_widths
            .iter()
            .enumerate()
            .map(move |(i, &w)| (i as isize - r, w))
    }
}

// ============================================================================
// Dilation / erosion
// ============================================================================

/// Per-row inclusive prefix counts of set pixels, `width + 1` entries per row.
fn row_prefix_counts(mask: &BitBuffer2) -> Vec<u32> {
    let width = mask.width();
    let stride = width + 1;
    let mut prefix = vec![0u32; stride * mask.height()];
    prefix
        .par_chunks_mut(stride)
        .enumerate()
        .for_each(|(y, row)| {
            let base = y * width;
            for x in 0..width {
                row[x + 1] = row[x] + mask.get(base + x) as u32;
            }
        });
    prefix
}

/// Morphological dilation with a disk of `radius`.
pub fn dilate(mask: &BitBuffer2, radius: usize) -> BitBuffer2 {
    if radius == 0 || mask.is_clear() {
        return mask.clone();
    }

    let (width, height) = mask.dimensions();
    let stride = width + 1;
    let prefix = row_prefix_counts(mask);
    let disk = Disk::new(radius);

    let mut out = vec![false; width * height];
    out.par_chunks_mut(width)
        .enumerate()
        .for_each(|(y, out_row)| {
            for (dy, w) in disk.spans() {
                let sy = y as isize + dy;
                if sy < 0 || sy >= height as isize {
                    continue;
                }
                let row = &prefix[sy as usize * stride..(sy as usize + 1) * stride];
                if row[width] == 0 {
                    continue;
                }
                for (x, out) in out_row.iter_mut().enumerate() {
                    if *out {
                        continue;
                    }
                    let lo = x.saturating_sub(w);
                    let hi = (x + w + 1).min(width);
                    *out = row[hi] > row[lo];
                }
            }
        });

    BitBuffer2::from_slice(width, height, &out)
}

/// Morphological erosion with a disk of `radius`.
///
/// The complement of dilating the complement, with out-of-frame pixels
/// counted as foreground.
pub fn erode(mask: &BitBuffer2, radius: usize) -> BitBuffer2 {
    if radius == 0 {
        return mask.clone();
    }
    let mut inverted = mask.clone();
    inverted.invert();
    let mut out = dilate(&inverted, radius);
    out.invert();
    out
}

/// Dilation followed by erosion with the same disk.
pub fn close(mask: &BitBuffer2, radius: usize) -> BitBuffer2 {
    if radius == 0 {
        return mask.clone();
    }
    erode(&dilate(mask, radius), radius)
}

// ============================================================================
// Hole filling
// ============================================================================

/// Set every background region that does not touch the frame border.
pub fn fill_holes(mask: &BitBuffer2) -> BitBuffer2 {
    let (width, height) = mask.dimensions();
    if width == 0 || height == 0 {
        return mask.clone();
    }

    // Flood the outside background from every border pixel
    let mut outside = BitBuffer2::new_default(width, height);
    let mut stack: Vec<usize> = Vec::new();
    let seed = |idx: usize, outside: &mut BitBuffer2, stack: &mut Vec<usize>| {
        if !mask.get(idx) && !outside.get(idx) {
            outside.set(idx, true);
            stack.push(idx);
        }
    };

    for x in 0..width {
        seed(x, &mut outside, &mut stack);
        seed((height - 1) * width + x, &mut outside, &mut stack);
    }
    for y in 0..height {
        seed(y * width, &mut outside, &mut stack);
        seed(y * width + width - 1, &mut outside, &mut stack);
    }

    while let Some(idx) = stack.pop() {
        let x = idx % width;
        let y = idx / width;
        if x > 0 {
            seed(idx - 1, &mut outside, &mut stack);
        }
        if x + 1 < width {
            seed(idx + 1, &mut outside, &mut stack);
        }
        if y > 0 {
            seed(idx - width, &mut outside, &mut stack);
        }
        if y + 1 < height {
            seed(idx + width, &mut outside, &mut stack);
        }
    }

    outside.invert();
    outside
}

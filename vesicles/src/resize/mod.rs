//! Bilinear resampling without anti-aliasing.
//!
//! Pixel centres are aligned (`src = (dst + 0.5) * in / out - 0.5`) and
//! samples outside the frame are mirrored about the edge pixel. Resizing to
//! the same shape is the identity.

#[cfg(test)]
mod tests;

use common::{BitBuffer2, Buffer2};
use rayon::prelude::*;

/// Source taps and weight of the second tap for one output coordinate.
#[derive(Debug, Clone, Copy)]
struct Tap {
    i0: usize,
    i1: usize,
    frac: f64,
}

/// Mirror an index into `0..len` without repeating the edge sample.
#[inline]
fn mirror(i: isize, len: usize) -> usize {
    if len == 1 {
        return 0;
    }
    let period = 2 * (len as isize - 1);
    let i = i.rem_euclid(period);
    if i >= len as isize {
        (period - i) as usize
    } else {
        i as usize
    }
}

fn taps(in_len: usize, out_len: usize) -> Vec<Tap> {
    let scale = in_len as f64 / out_len as f64;
    (0..out_len)
        .map(|o| {
            let src = (o as f64 + 0.5) * scale - 0.5;
            let base = src.floor();
            Tap {
                i0: mirror(base as isize, in_len),
                i1: mirror(base as isize + 1, in_len),
                frac: src - base,
            }
        })
        .collect()
}

/// Resample `src` to `out_width x out_height`.
pub fn resize_bilinear(src: &Buffer2<f64>, out_width: usize, out_height: usize) -> Buffer2<f64> {
    assert!(
        out_width > 0 && out_height > 0,
        "output dimensions must be non-zero"
    );
    if src.dimensions() == (out_width, out_height) {
        return src.clone();
    }

    let x_taps = taps(src.width(), out_width);
    let y_taps = taps(src.height(), out_height);

    let mut pixels = vec![0.0f64; out_width * out_height];
    pixels
        .par_chunks_mut(out_width)
        .zip(y_taps.par_iter())
        .for_each(|(out_row, ty)| {
            let row0 = src.row(ty.i0);
            let row1 = src.row(ty.i1);
            for (out, tx) in out_row.iter_mut().zip(&x_taps) {
                let top = row0[tx.i0] + (row0[tx.i1] - row0[tx.i0]) * tx.frac;
                let bottom = row1[tx.i0] + (row1[tx.i1] - row1[tx.i0]) * tx.frac;
                *out = top + (bottom - top) * ty.frac;
            }
        });

    Buffer2::new(out_width, out_height, pixels)
}

/// Resample a binary mask and re-binarize with `> 0`.
///
/// Any output pixel that draws weight from a set input pixel is set, so
/// upsampling slightly grows the mask boundary rather than shrinking it.
pub fn resize_mask(mask: &BitBuffer2, out_width: usize, out_height: usize) -> BitBuffer2 {
    if mask.dimensions() == (out_width, out_height) {
        return mask.clone();
    }
    let values = Buffer2::new(
        mask.width(),
        mask.height(),
        mask.iter().map(|b| if b { 1.0f64 } else { 0.0 }).collect(),
    );
    let resized = resize_bilinear(&values, out_width, out_height);
    let bits: Vec<bool> = resized.iter().map(|&v| v > 0.0).collect();
    BitBuffer2::from_slice(out_width, out_height, &bits)
}

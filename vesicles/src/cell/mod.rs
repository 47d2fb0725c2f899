//! Cell body detection on a single 2D frame.
//!
//! The frame is optionally downsampled, outlier-clipped and rescaled to
//! `[0, 1]`, then split with Otsu's threshold. The foreground is cleaned up
//! with a closing, hole filling and an erosion that strips the bright
//! membrane rim, and finally resized back to the input resolution.
//!
//! Morphology radii are in downsampled pixels, so the effective radius in the
//! input frame is `radius * downsizing_ratio`.


use common::{BitBuffer2, Buffer2};
use num_traits::AsPrimitive;

use crate::config::CellParams;
use crate::error::{Error, Result};
use crate::math::{mean_std, min_max};
use crate::morphology::{close, erode, fill_holes};
use crate::resize::{resize_bilinear, resize_mask};
use crate::threshold::otsu_threshold;

/// Detect the cell body in `frame`.
///
/// Returns a mask with the same dimensions as `frame`. A frame without any
/// intensity variation has no foreground and yields an empty mask.
pub fn detect_cell<T>(frame: &Buffer2<T>, params: &CellParams) -> Result<BitBuffer2>
where
    T: AsPrimitive<f64>,
{
    params.validate()?;

    let (width, height) = frame.dimensions();
    let ratio = params.downsizing_ratio;
    let (small_width, small_height) = (width / ratio, height / ratio);
    if small_width == 0 || small_height == 0 {
        return Err(Error::FrameTooSmall {
            width,
            height,
            ratio,
        });
    }

    let values: Buffer2<f64> = frame.map(|&v| v.as_());
    let mut small = resize_bilinear(&values, small_width, small_height);

    if params.n_sigma > 0.0 {
        clip_outliers(&mut small, params.n_sigma);
    }
    if !rescale_unit(&mut small) {
        return Ok(BitBuffer2::new_default(width, height));
    }

    let Some(threshold) = otsu_threshold(small.pixels()) else {
        return Ok(BitBuffer2::new_default(width, height));
    };
    let foreground: Vec<bool> = small.iter().map(|&v| v > threshold).collect();
    let mut mask = BitBuffer2::from_slice(small_width, small_height, &foreground);

    mask = close(&mask, params.closing_size);
    mask = fill_holes(&mask);
    mask = erode(&mask, params.membrane_erosion);

    Ok(resize_mask(&mask, width, height))
}

/// Standardize to `(v - mean) / (std * n_sigma)` and clip to `[-1, 1]`.
///
/// Skipped when the frame has zero spread.
fn clip_outliers(frame: &mut Buffer2<f64>, n_sigma: f32) {
    let (mean, std) = mean_std(frame.pixels());
    if std == 0.0 {
        return;
    }
    let scale = 1.0 / (std * n_sigma as f64);
    for v in frame.iter_mut() {
        *v = ((*v - mean) * scale).clamp(-1.0, 1.0);
    }
}

/// Rescale to `[0, 1]` by the frame's own range.
///
/// Returns `false` and leaves the frame untouched if it is uniform.
fn rescale_unit(frame: &mut Buffer2<f64>) -> bool {
    let Some((lo, hi)) = min_max(frame.iter().copied()) else {
        return false;
    };
    if hi <= lo {
        return false;
    }
    let range = hi - lo;
    for v in frame.iter_mut() {
        *v = (*v - lo) / range;
    }
    true
}

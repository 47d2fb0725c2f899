//! End-to-end segmentation of an intensity stack.
//!
//! ```text
//! raw stack -> normalize -> max projection -> detect_cell -> vesicle threshold
//!                        -> per frame: threshold, detect_cell, refine
//!                        -> label whole volume
//! ```


use std::time::Instant;

use num_traits::AsPrimitive;

use crate::config::{SegmentationConfig, SegmentationMode};
use crate::error::Result;
use crate::labeling::LabelImage;
use crate::refine::refine_masks;
use crate::stack::{normalize, Stack};
use crate::vesicle::extract_vesicles;

/// Result of a segmentation run.
#[derive(Debug, Clone)]
pub struct Segmentation {
    pub labels: LabelImage,
    /// Derived from the source name and the mode, see
    /// [`SegmentationMode::layer_name`].
    pub name: String,
    pub mode: SegmentationMode,
    /// Global vesicle threshold on the normalized scale, `None` when the
    /// projection contained no cell.
    pub vesicle_threshold: Option<f64>,
}

/// Segment vesicles (or cells, in display mode) in `stack`.
///
/// The configuration is validated first. Any failure aborts the whole run;
/// no partial label image is returned.
pub fn segment<T>(stack: &Stack<T>, name: &str, config: &SegmentationConfig) -> Result<Segmentation>
where
    T: AsPrimitive<f64> + Sync,
{
    config.validate()?;
    let start = Instant::now();

    let normalized = normalize(stack);
    let extraction = extract_vesicles(&normalized, &config.cell_params())?;

    let mut masks = extraction.masks;
    refine_masks(&normalized, &mut masks, config)?;

    let labels = LabelImage::from_masks(&masks)?;
    let mode = config.mode();

    tracing::info!(
        name,
        frames = stack.depth(),
        width = stack.width(),
        height = stack.height(),
        objects = labels.num_labels(),
        elapsed_ms = start.elapsed().as_millis() as u64,
        "Segmentation finished"
    );

    Ok(Segmentation {
        labels,
        name: mode.layer_name(name),
        mode,
        vesicle_threshold: extraction.threshold,
    })
}

//! Global vesicle threshold and raw per-frame vesicle masks.
//!
//! The threshold is computed once per run from the maximum-intensity
//! projection, restricted to the cell detected on that projection at full
//! resolution, and then applied unchanged to every frame.


use common::BitBuffer2;
use rayon::prelude::*;

use crate::cell::detect_cell;
use crate::config::CellParams;
use crate::error::Result;
use crate::stack::{max_projection, Stack};
use crate::threshold::otsu_threshold;

/// Raw vesicle masks and the threshold that produced them.
#[derive(Debug, Clone)]
pub struct VesicleExtraction {
    /// `None` when the projection had no cell to calibrate on.
    pub threshold: Option<f64>,
    /// One mask per frame, `value > threshold`.
    pub masks: Vec<BitBuffer2>,
}

/// Threshold every frame of a normalized stack against one global vesicle
/// threshold.
///
/// `params.downsizing_ratio` is ignored: the projection is always analysed at
/// full resolution.
pub fn extract_vesicles(stack: &Stack<f64>, params: &CellParams) -> Result<VesicleExtraction> {
    let projection = max_projection(stack);
    let cell = detect_cell(&projection, &params.at_full_resolution())?;

    let in_cell: Vec<f64> = projection
        .iter()
        .zip(cell.iter())
        .filter_map(|(&v, inside)| inside.then_some(v))
        .collect();

    let Some(threshold) = otsu_threshold(&in_cell) else {
        tracing::warn!("No cell found in the maximum projection, no vesicles extracted");
        let masks = vec![BitBuffer2::new_default(stack.width(), stack.height()); stack.depth()];
        return Ok(VesicleExtraction {
            threshold: None,
            masks,
        });
    };
    tracing::debug!(
        threshold,
        cell_area = in_cell.len(),
        "Vesicle threshold from maximum projection"
    );

    let masks = stack
        .frames()
        .par_iter()
        .map(|frame| {
            let bits: Vec<bool> = frame.iter().map(|&v| v > threshold).collect();
            BitBuffer2::from_slice(frame.width(), frame.height(), &bits)
        })
        .collect();

    Ok(VesicleExtraction {
        threshold: Some(threshold),
        masks,
    })
}

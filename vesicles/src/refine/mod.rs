//! Per-frame refinement of the raw vesicle masks.
//!
//! Each frame gets its own cell mask, detected at the configured downsizing
//! ratio. The vesicle mask is then restricted to that cell (or replaced by it
//! in cell display mode) and cleared of components below the minimum size.
//! Frames are independent and processed in parallel.

#[cfg(test)]
mod tests;

use common::BitBuffer2;
use rayon::prelude::*;

use crate::cell::detect_cell;
use crate::config::{SegmentationConfig, SegmentationMode};
use crate::error::{Error, Result};
use crate::labeling::{check_mask_shapes, remove_small_objects};
use crate::stack::Stack;

/// Refine `masks` in place, one mask per frame of `stack`.
///
/// The masks must match the stack in count and frame size; nothing is
/// modified otherwise.
pub fn refine_masks(stack: &Stack<f64>, masks: &mut [BitBuffer2], config: &SegmentationConfig) -> Result<()> {
    if masks.len() != stack.depth() {
        return Err(Error::MaskCount {
            expected: stack.depth(),
            actual: masks.len(),
        });
    }
    check_mask_shapes(masks, (stack.width(), stack.height()))?;
    let params = config.cell_params();
    let mode = config.mode();

    masks
        .par_iter_mut()
        .zip(stack.frames().par_iter())
        .enumerate()
        .try_for_each(|(index, (mask, frame))| -> Result<()> {
            let cell = detect_cell(frame, &params)?;
            tracing::debug!(frame = index, cell_area = cell.count_ones(), "Cell detected");

            match mode {
                SegmentationMode::Cell => *mask = cell,
                SegmentationMode::Vesicle => mask.and_assign(&cell),
            }
            if config.min_size > 0 {
                *mask = remove_small_objects(mask, config.min_size);
            }
            Ok(())
        })
}

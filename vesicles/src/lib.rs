//! Vesicles - cell and vesicle segmentation for fluorescence image stacks.
//!
//! A stack of frames (time points or z slices) is segmented in four steps:
//! - the whole stack is normalized to `[0, 1]`,
//! - one vesicle threshold is derived from the cell in the maximum projection,
//! - every frame is thresholded, restricted to its own detected cell and
//!   cleared of small objects,
//! - the resulting masks are labeled as one volume.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use vesicles::{segment, SegmentationConfig, Stack};
//!
//! let stack = Stack::from_volume(width, height, depth, samples)?;
//! let config = SegmentationConfig::from_file("segmentation.yaml")?;
//! let result = segment(&stack, "cell01", &config)?;
//!
//! println!("{}: {} vesicles", result.name, result.labels.num_labels());
//! ```

mod cell;
mod config;
mod error;
pub mod labeling;
pub(crate) mod math;
pub mod morphology;
mod pipeline;
mod refine;
pub(crate) mod resize;
mod stack;
mod task;
pub mod threshold;
mod vesicle;

#[cfg(test)]
pub(crate) mod testing;

pub use common::{BitBuffer2, Buffer2, SerdeFormat};

// ============================================================================
// Configuration and errors
// ============================================================================

pub use config::{CellParams, Connectivity, SegmentationConfig, SegmentationMode};
pub use error::{Error, Result};

// ============================================================================
// Pipeline stages
// ============================================================================

pub use cell::detect_cell;
pub use refine::refine_masks;
pub use stack::{max_projection, normalize, Stack};
pub use vesicle::{extract_vesicles, VesicleExtraction};

// ============================================================================
// Output
// ============================================================================

pub use labeling::{remove_small_objects, LabelImage, LabelMap, RegionProps};
pub use pipeline::{segment, Segmentation};
pub use task::SegmentationTask;

//! Error type shared by every stage of the segmentation pipeline.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors that can abort a segmentation run.
///
/// A failing run never yields a partial label image: the first error from any
/// stage is returned from [`crate::segment`] as-is.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Invalid parameter '{name}' = {value}: {reason}")]
    InvalidParameter {
        name: &'static str,
        value: String,
        reason: &'static str,
    },

    #[error("Image stack is empty")]
    EmptyStack,

    #[error("Frame {index} has shape {actual:?}, expected {expected:?} (width, height)")]
    ShapeMismatch {
        index: usize,
        expected: (usize, usize),
        actual: (usize, usize),
    },

    #[error("Got {actual} masks for a stack of {expected} frames")]
    MaskCount { expected: usize, actual: usize },

    #[error("Volume data has {actual} samples, expected {expected}")]
    VolumeSize { expected: usize, actual: usize },

    #[error("Frame {width}x{height} is too small for downsizing ratio {ratio}")]
    FrameTooSmall {
        width: usize,
        height: usize,
        ratio: usize,
    },

    #[error("Failed to parse segmentation config: {0}")]
    Config(#[from] common::SerdeFormatError),

    #[error("Unsupported config file '{path}': {source}")]
    ConfigFormat {
        path: PathBuf,
        #[source]
        source: common::FileExtensionError,
    },

    #[error("Failed to read config file '{path}': {source}")]
    ConfigFile {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Segmentation task failed: {0}")]
    TaskFailed(String),
}

pub type Result<T> = std::result::Result<T, Error>;

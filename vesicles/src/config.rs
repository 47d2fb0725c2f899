//! Configuration types for the segmentation pipeline.
//!
//! [`SegmentationConfig`] is the single parameter object handed to
//! [`crate::segment`]. It is validated once at the pipeline boundary; the
//! stages below trust the values they receive.
//!
//! Morphology radii are expressed in *downsampled* pixels: with
//! `downsizing_ratio = 2`, `membrane_erosion = 3` erodes roughly 6 pixels of
//! the original frame. The radii are not rescaled automatically.

use std::path::Path;

use common::SerdeFormat;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

// ============================================================================
// Enums
// ============================================================================

/// Pixel connectivity for connected component labeling.
///
/// `Four` links only face neighbours (4 in a frame, 6 in a volume), `Eight`
/// links every touching pixel including diagonals (8 in a frame, 26 in a
/// volume).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Connectivity {
    /// Horizontal and vertical neighbours only.
    /// Used for small-object removal inside a single frame.
    #[default]
    Four,
    /// All touching neighbours. Used when labeling the final mask stack.
    Eight,
}

/// What the output label image represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SegmentationMode {
    /// Vesicles inside the per-frame cell mask.
    #[default]
    Vesicle,
    /// The per-frame cell masks themselves, for checking cell detection.
    Cell,
}

impl SegmentationMode {
    /// Name of the result derived from the source image name.
    ///
    /// The host uses it to decide whether to create a new result or overwrite
    /// the one produced by a previous run on the same image.
    pub fn layer_name(self, source: &str) -> String {
        match self {
            SegmentationMode::Vesicle => format!("{source}_vesicle"),
            SegmentationMode::Cell => format!("{source}_cell"),
        }
    }
}

// ============================================================================
// Cell detection parameters
// ============================================================================

/// Parameters of [`crate::detect_cell`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellParams {
    /// Disk radius used to strip the membrane rim after hole filling.
    pub membrane_erosion: usize,
    /// Disk radius of the closing applied before hole filling. 0 disables it.
    pub closing_size: usize,
    /// Outlier clip in standard deviations. 0 disables standardization.
    pub n_sigma: f32,
    /// Integer shrink factor applied before thresholding and morphology.
    pub downsizing_ratio: usize,
}

impl Default for CellParams {
    fn default() -> Self {
        SegmentationConfig::default().cell_params()
    }
}

impl CellParams {
    /// Same parameters without downsampling.
    pub fn at_full_resolution(self) -> Self {
        Self {
            downsizing_ratio: 1,
            ..self
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.downsizing_ratio == 0 {
            return Err(Error::InvalidParameter {
                name: "downsizing_ratio",
                value: self.downsizing_ratio.to_string(),
                reason: "must be at least 1",
            });
        }
        if !self.n_sigma.is_finite() || self.n_sigma < 0.0 {
            return Err(Error::InvalidParameter {
                name: "n_sigma",
                value: self.n_sigma.to_string(),
                reason: "must be a finite, non-negative number",
            });
        }
        Ok(())
    }
}

// ============================================================================
// Pipeline configuration
// ============================================================================

/// User-facing parameters of a segmentation run.
///
/// Defaults match the parameter form the tool ships with.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SegmentationConfig {
    /// Vesicles smaller than this many pixels (per frame) are removed.
    pub min_size: usize,
    /// Cell erosion radius in downsampled pixels.
    pub membrane_erosion: usize,
    /// Cell closing radius in downsampled pixels.
    pub closing_size: usize,
    /// Outlier clip in standard deviations, 0 disables it.
    pub n_sigma: f32,
    /// Downsampling factor for the per-frame cell detection.
    pub downsizing_ratio: usize,
    /// Output the per-frame cell masks instead of the vesicles.
    pub display_cell_detection: bool,
}

impl Default for SegmentationConfig {
    fn default() -> Self {
        Self {
            min_size: 0,
            membrane_erosion: 3,
            closing_size: 0,
            n_sigma: 3.0,
            downsizing_ratio: 4,
            display_cell_detection: false,
        }
    }
}

impl SegmentationConfig {
    pub fn validate(&self) -> Result<()> {
        self.cell_params().validate()
    }

    pub fn cell_params(&self) -> CellParams {
        CellParams {
            membrane_erosion: self.membrane_erosion,
            closing_size: self.closing_size,
            n_sigma: self.n_sigma,
            downsizing_ratio: self.downsizing_ratio,
        }
    }

    pub fn mode(&self) -> SegmentationMode {
        if self.display_cell_detection {
            SegmentationMode::Cell
        } else {
            SegmentationMode::Vesicle
        }
    }

    /// Parse and validate a config from YAML or JSON text.
    pub fn parse(text: &str, format: SerdeFormat) -> Result<Self> {
        let config: Self = common::deserialize(text, format)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a config file, picking the format from its extension.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let format = SerdeFormat::from_file_name(path).map_err(|source| Error::ConfigFormat {
            path: path.to_path_buf(),
            source,
        })?;
        let text = std::fs::read_to_string(path).map_err(|source| Error::ConfigFile {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&text, format)
    }

    pub fn to_string(&self, format: SerdeFormat) -> Result<String> {
        Ok(common::serialize(self, format)?)
    }
}

//! Crop-size estimation boundary.
//!
//! A local raster engine knows which box it will cut for a given source and
//! transform. This crate never reimplements that algorithm; it asks a
//! [`CropSizeEstimator`] when the produced file cannot be read back.

use crate::transform::TransformSpec;
use crate::types::Dimensions;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EstimateError {
    #[error("Cannot estimate crop from source size {0}")]
    InvalidSource(Dimensions),
    #[error("Crop estimation failed: {0}")]
    Failed(String),
}

/// Computes the crop box a local raster engine would produce.
///
/// Pure from this crate's point of view: identical inputs must give
/// identical output.
pub trait CropSizeEstimator: Sync {
    fn estimate(
        &self,
        source: Dimensions,
        spec: &TransformSpec,
        allow_upscale: bool,
    ) -> Result<Dimensions, EstimateError>;
}

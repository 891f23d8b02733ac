//! Image-facing collaborators and dimension math.
//!
//! | Concern | Where |
//! |---|---|
//! | **Probe** dimensions from a file header | [`ImageProber`] + [`HeaderProber`] |
//! | **Estimate** a local crop box | [`CropSizeEstimator`] (supplied by the raster engine) |
//! | **Calculate** aspect-preserving sizes | [`calculations`] |
//!
//! The module is split into:
//! - **Calculations**: Pure functions for dimension math (unit testable)
//! - **Probe**: [`ImageProber`] trait + [`HeaderProber`]
//! - **Estimate**: [`CropSizeEstimator`] boundary trait

pub mod calculations;
pub mod estimate;
pub mod header;
pub mod probe;

pub use estimate::{CropSizeEstimator, EstimateError};
pub use header::HeaderProber;
pub use probe::{ImageProber, ProbeError};

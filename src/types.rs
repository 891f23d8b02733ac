//! Shared geometry types used by the predictor, the resolver and srcset output.
//!
//! [`Dimensions`] doubles as the "unknown" marker: `0x0` never describes a real
//! image, so every consumer must check [`Dimensions::is_known`] before trusting
//! a box that came from a lookup which may have failed.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A pixel box (`width` x `height`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

impl Dimensions {
    /// Sentinel for "dimensions could not be determined".
    pub const UNKNOWN: Dimensions = Dimensions {
        width: 0,
        height: 0,
    };

    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// True for the `0x0` sentinel.
    pub fn is_unknown(self) -> bool {
        self == Self::UNKNOWN
    }

    /// True when both axes are positive, i.e. the box describes a real image.
    pub fn is_known(self) -> bool {
        self.width > 0 && self.height > 0
    }

    /// Width divided by height. Only meaningful for known boxes.
    pub fn aspect_ratio(self) -> f64 {
        self.width as f64 / self.height as f64
    }
}

impl fmt::Display for Dimensions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

impl From<(u32, u32)> for Dimensions {
    fn from((width, height): (u32, u32)) -> Self {
        Self { width, height }
    }
}

/// Where a resolved box came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Provenance {
    /// Read from the header of a file that actually exists.
    Introspected,
    /// Computed by the crop-size estimator because the file could not be read.
    Estimated,
    /// Predicted analytically for a remote delivery network.
    Predicted,
    /// No transform applied; the source box is served unchanged.
    PassThrough,
}

/// A resolved box together with how it was obtained.
///
/// Callers usually only need [`dimensions`](Self::dimensions); the provenance
/// is kept so tests and debug output can tell ground truth from estimates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedGeometry {
    pub dimensions: Dimensions,
    pub provenance: Provenance,
}

impl ResolvedGeometry {
    pub fn new(dimensions: Dimensions, provenance: Provenance) -> Self {
        Self {
            dimensions,
            provenance,
        }
    }

    pub fn width(&self) -> u32 {
        self.dimensions.width
    }

    pub fn height(&self) -> u32 {
        self.dimensions.height
    }
}

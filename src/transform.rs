//! Transform requests: which axes were asked for and under which fit policy.
//!
//! ## Fit modes
//!
//! Fit keywords follow the delivery network's `fit=` parameter:
//!
//! | Keyword | Group | Two-axis result |
//! |---|---|---|
//! | `clip`, `fill`, `crop`, `clamp`, `scale` | exact-box | the literal requested box |
//! | `min`, `max` | bounded-aspect | requested aspect, never past the source |
//! | anything else | unrecognized | the raw requested values |
//!
//! Unknown keywords (`facearea`, `fillmax`, typos) are kept verbatim in
//! [`FitMode::Unrecognized`] rather than rejected, so a template carrying a
//! newer keyword still gets a box back.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransformError {
    #[error("Invalid transform spec: requested {axis} must be a positive pixel count, got {value}")]
    InvalidTransformSpec { axis: Axis, value: i64 },
}

/// An image axis, used in error messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Width,
    Height,
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Axis::Width => f.write_str("width"),
            Axis::Height => f.write_str("height"),
        }
    }
}

/// Fit policy reconciling the requested box with the source aspect ratio.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum FitMode {
    Clip,
    Fill,
    Crop,
    Clamp,
    Scale,
    Min,
    Max,
    /// Any keyword outside the known set, stored as given.
    Unrecognized(String),
}

/// Coarse grouping of fit modes that drives the prediction case table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FitGroup {
    /// Crop or pad server-side to the literal requested box.
    ExactBox,
    /// Preserve aspect ratio and never grow past the source.
    BoundedAspect,
    Unrecognized,
}

impl FitMode {
    pub fn group(&self) -> FitGroup {
        match self {
            FitMode::Clip | FitMode::Fill | FitMode::Crop | FitMode::Clamp | FitMode::Scale => {
                FitGroup::ExactBox
            }
            FitMode::Min | FitMode::Max => FitGroup::BoundedAspect,
            FitMode::Unrecognized(_) => FitGroup::Unrecognized,
        }
    }

    /// The delivery-network keyword for this mode.
    pub fn as_str(&self) -> &str {
        match self {
            FitMode::Clip => "clip",
            FitMode::Fill => "fill",
            FitMode::Crop => "crop",
            FitMode::Clamp => "clamp",
            FitMode::Scale => "scale",
            FitMode::Min => "min",
            FitMode::Max => "max",
            FitMode::Unrecognized(raw) => raw,
        }
    }
}

impl From<&str> for FitMode {
    fn from(keyword: &str) -> Self {
        match keyword {
            "clip" => FitMode::Clip,
            "fill" => FitMode::Fill,
            "crop" => FitMode::Crop,
            "clamp" => FitMode::Clamp,
            "scale" => FitMode::Scale,
            "min" => FitMode::Min,
            "max" => FitMode::Max,
            _ => FitMode::Unrecognized(keyword.to_string()),
        }
    }
}

impl From<String> for FitMode {
    fn from(keyword: String) -> Self {
        FitMode::from(keyword.as_str())
    }
}

impl From<FitMode> for String {
    fn from(mode: FitMode) -> Self {
        match mode {
            FitMode::Unrecognized(raw) => raw,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for FitMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A transform request as far as geometry is concerned.
///
/// Axes are signed so that a present but non-positive request (`w=0`,
/// `h=-5`) can be represented and rejected instead of silently clamped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransformSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<i64>,
    pub fit: FitMode,
}

impl TransformSpec {
    pub fn new(width: Option<i64>, height: Option<i64>, fit: FitMode) -> Self {
        Self { width, height, fit }
    }

    /// Both axes requested.
    pub fn sized(width: i64, height: i64, fit: FitMode) -> Self {
        Self::new(Some(width), Some(height), fit)
    }

    pub fn width_only(width: i64, fit: FitMode) -> Self {
        Self::new(Some(width), None, fit)
    }

    pub fn height_only(height: i64, fit: FitMode) -> Self {
        Self::new(None, Some(height), fit)
    }

    /// No resize requested; the source is served as-is.
    pub fn pass_through(fit: FitMode) -> Self {
        Self::new(None, None, fit)
    }

    /// Validate and classify the requested axes.
    pub fn requested(&self) -> Result<RequestedAxes, TransformError> {
        RequestedAxes::classify(self.width, self.height)
    }
}

/// Which axes a request names, after validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestedAxes {
    Both { width: u32, height: u32 },
    WidthOnly(u32),
    HeightOnly(u32),
    Neither,
}

impl RequestedAxes {
    pub fn classify(width: Option<i64>, height: Option<i64>) -> Result<Self, TransformError> {
        let width = width.map(|w| positive_axis(Axis::Width, w)).transpose()?;
        let height = height.map(|h| positive_axis(Axis::Height, h)).transpose()?;

        Ok(match (width, height) {
            (Some(width), Some(height)) => RequestedAxes::Both { width, height },
            (Some(width), None) => RequestedAxes::WidthOnly(width),
            (None, Some(height)) => RequestedAxes::HeightOnly(height),
            (None, None) => RequestedAxes::Neither,
        })
    }
}

fn positive_axis(axis: Axis, value: i64) -> Result<u32, TransformError> {
    u32::try_from(value)
        .ok()
        .filter(|&v| v > 0)
        .ok_or(TransformError::InvalidTransformSpec { axis, value })
}

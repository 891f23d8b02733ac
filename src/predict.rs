//! Output size prediction for remote delivery-network transforms.
//!
//! When resizing is delegated to an imgix-style delivery network no output
//! file ever exists locally, so the size that ends up in `width`/`height`
//! attributes and srcset descriptors has to be derived from the source box,
//! the requested box and the `fit` policy alone.
//!
//! ## Case table
//!
//! | Requested | Exact-box fit | Bounded-aspect fit (`min`/`max`) | Unrecognized fit |
//! |---|---|---|---|
//! | both | literal request | requested aspect, clamped to source | literal request |
//! | one | other axis from source aspect (may upscale) | given axis clamped to source, then scaled | given axis, other is 0 |
//! | neither | source box | source box | source box |
//!
//! An unknown source box (`0x0`) short-circuits the single-axis row: the
//! given axis is echoed and the other stays 0, which callers must read as
//! "not computed".
//!
//! `min` and `max` behave identically here, and unrecognized fit keywords
//! pass the raw request through. Both match what downstream templates
//! already rely on and are kept as-is.

use crate::imaging::calculations::{fit_requested_aspect, height_for_width, width_for_height};
use crate::transform::{FitGroup, FitMode, RequestedAxes, TransformError, TransformSpec};
use crate::types::{Dimensions, Provenance, ResolvedGeometry};

/// Predict the output box for a delivery-network transform.
///
/// Pure and deterministic. Fails only when a requested axis is present but
/// not a positive pixel count.
///
/// # Examples
/// ```
/// # use transform_geometry::{predict, Dimensions, FitMode};
/// let dims = predict(Dimensions::new(400, 300), None, Some(600), &FitMode::Max).unwrap();
/// // `max` never upscales past the source
/// assert_eq!(dims, Dimensions::new(400, 300));
/// ```
pub fn predict(
    source: Dimensions,
    width: Option<i64>,
    height: Option<i64>,
    fit: &FitMode,
) -> Result<Dimensions, TransformError> {
    let requested = RequestedAxes::classify(width, height)?;
    Ok(predict_requested(source, requested, fit.group()))
}

/// Predict for a whole [`TransformSpec`], tagging the result's provenance.
///
/// A request naming no axis serves the source unchanged and is tagged
/// [`Provenance::PassThrough`]; everything else is [`Provenance::Predicted`].
pub fn predict_geometry(
    source: Dimensions,
    spec: &TransformSpec,
) -> Result<ResolvedGeometry, TransformError> {
    let requested = spec.requested()?;
    let provenance = match requested {
        RequestedAxes::Neither => Provenance::PassThrough,
        _ => Provenance::Predicted,
    };
    Ok(ResolvedGeometry::new(
        predict_requested(source, requested, spec.fit.group()),
        provenance,
    ))
}

fn predict_requested(source: Dimensions, requested: RequestedAxes, group: FitGroup) -> Dimensions {
    use FitGroup::*;
    use RequestedAxes::*;

    match (requested, group) {
        // Case A
        (Both { width, height }, BoundedAspect) if source.is_known() => {
            fit_requested_aspect(source, width, height)
        }
        // Case B, plus bounded-aspect without a usable source ratio
        (Both { width, height }, _) => Dimensions::new(width, height),

        // Case C
        (WidthOnly(width), _) if !source.is_known() => Dimensions::new(width, 0),
        (HeightOnly(height), _) if !source.is_known() => Dimensions::new(0, height),
        (WidthOnly(width), ExactBox) => {
            Dimensions::new(width, height_for_width(width, source))
        }
        (HeightOnly(height), ExactBox) => {
            Dimensions::new(width_for_height(height, source), height)
        }
        (WidthOnly(width), BoundedAspect) => {
            let width = width.min(source.width);
            Dimensions::new(width, height_for_width(width, source))
        }
        (HeightOnly(height), BoundedAspect) => {
            let height = height.min(source.height);
            Dimensions::new(width_for_height(height, source), height)
        }
        (WidthOnly(width), Unrecognized) => Dimensions::new(width, 0),
        (HeightOnly(height), Unrecognized) => Dimensions::new(0, height),

        // Case D
        (Neither, _) => source,
    }
}

//! Pure calculation functions for predicted dimensions.
//!
//! All functions here are pure and testable without any I/O or images.
//! Rounding is nearest-integer with ties away from zero, which is what the
//! delivery network reports for its own output sizes.
//!
//! Ratios are never materialized as floats: a ratio like 7:20 has no exact
//! binary representation, and scaling by it can turn a `.5` tie into
//! `.4999…`. Every scaled axis is computed from the integer dimensions.

use crate::types::Dimensions;

/// `value * num / den`, rounded to the nearest pixel with ties away from zero.
///
/// Saturates at `u32::MAX`. `den` must be non-zero.
pub fn scale_px(value: u32, num: u32, den: u32) -> u32 {
    let (value, num, den) = (u128::from(value), u128::from(num), u128::from(den));
    let rounded = (2 * value * num + den) / (2 * den);
    u32::try_from(rounded).unwrap_or(u32::MAX)
}

/// Height that keeps the `source` aspect ratio for the given width.
pub fn height_for_width(width: u32, source: Dimensions) -> u32 {
    scale_px(width, source.height, source.width)
}

/// Width that keeps the `source` aspect ratio for the given height.
pub fn width_for_height(height: u32, source: Dimensions) -> u32 {
    scale_px(height, source.width, source.height)
}

/// Fit a box of the requested aspect ratio inside both the request and the source.
///
/// The constraining axis is picked by comparing aspect ratios: a source
/// narrower than the request is bound by width, otherwise by height. The
/// bound axis is clamped to the smaller of request and source, and the other
/// axis follows the *requested* aspect ratio.
///
/// # Examples
/// ```
/// # use transform_geometry::imaging::calculations::fit_requested_aspect;
/// # use transform_geometry::Dimensions;
/// // 2:1 source, 8:3 request → width-bound, no clamping needed
/// assert_eq!(
///     fit_requested_aspect(Dimensions::new(1000, 500), 800, 300),
///     Dimensions::new(800, 300)
/// );
/// ```
pub fn fit_requested_aspect(source: Dimensions, width: u32, height: u32) -> Dimensions {
    // sw/sh < rw/rh, cross-multiplied
    let source_narrower =
        u64::from(source.width) * u64::from(height) < u64::from(width) * u64::from(source.height);

    if source_narrower {
        let w = width.min(source.width);
        Dimensions::new(w, scale_px(w, height, width))
    } else {
        let h = height.min(source.height);
        Dimensions::new(scale_px(h, width, height), h)
    }
}

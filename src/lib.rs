//! # Transform Geometry
//!
//! Reports the final pixel dimensions of an image transform, for output that
//! needs them up front: explicit `width`/`height` attributes and responsive
//! `srcset` candidate lists. Pixels are never touched here; the crate only
//! computes, reads back, or predicts sizes.
//!
//! # Two Ways To A Box
//!
//! ```text
//! local raster engine wrote a file  →  resolve::LocalResultResolver  (probe, else estimate)
//! remote delivery network resizes   →  predict::predict              (pure arithmetic)
//! ```
//!
//! Both fall back on [`source::SourceDescriptor`] for the intrinsic size of
//! the source image when nothing better is available.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`predict`] | Analytic output size for a delivery-network `fit` policy |
//! | [`resolve`] | Ground-truth size of a produced file, with crop-estimate fallback |
//! | [`source`] | Request-scoped source dimension lookup and memoization |
//! | [`transform`] | Fit modes, transform requests, axis validation |
//! | [`types`] | [`Dimensions`], [`ResolvedGeometry`], [`Provenance`] |
//! | [`imaging`] | Header prober, crop estimator boundary, dimension math |
//! | [`srcset`] | `srcset` rendering from resolved geometries |
//! | [`config`] | TOML policy: external lookups, upscale default, default fit |
//!
//! # Design Decisions
//!
//! ## `0x0` Means Unknown
//!
//! A failed source lookup is an expected state, not an error. It is reported
//! as [`Dimensions::UNKNOWN`] and every consumer branches on it explicitly.
//! Errors are reserved for cases where returning a box would be a lie: an
//! invalid request, or a produced file that can neither be read nor estimated.
//!
//! ## No Shared State
//!
//! Source sizes are memoized in a [`source::SourceMemo`] that the caller
//! creates per request. Probers and estimators are `Sync` and stateless, so
//! concurrent requests need no coordination.
//!
//! ## Logging
//!
//! Fallbacks are reported through [`tracing`]. The crate never installs a
//! subscriber; the host application decides where events go.

pub mod config;
pub mod imaging;
pub mod predict;
pub mod resolve;
pub mod source;
pub mod srcset;
pub mod transform;
pub mod types;

pub use config::{ConfigError, GeometryConfig, load_config};
pub use imaging::{CropSizeEstimator, EstimateError, HeaderProber, ImageProber, ProbeError};
pub use predict::{predict, predict_geometry};
pub use resolve::{LocalResultResolver, ResolveError};
pub use source::{
    LocalCopyMaterializer, LocalFileMaterializer, MaterializeError, SourceDescriptor, SourceMemo,
    SourceRef,
};
pub use srcset::{Candidate, Descriptor, srcset};
pub use transform::{FitMode, TransformError, TransformSpec};
pub use types::{Dimensions, Provenance, ResolvedGeometry};

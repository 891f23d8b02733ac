//! Dimensions of a locally produced transform result.
//!
//! When a local raster engine wrote the output (or a pass-through serves the
//! source file unchanged) the file on disk is the ground truth. Its header is
//! probed first; only when that fails (unreadable file, non-image upload,
//! zero-byte output) does the resolver ask the [`CropSizeEstimator`] what the
//! engine would have produced.
//!
//! ```text
//! probe(output) ──ok──────────────────────────► Introspected
//!      │ fail
//!      ▼
//! estimate(source, spec, upscale) ──ok────────► Estimated
//!      │ fail
//!      ▼
//! ResolveError::GeometryResolution
//! ```
//!
//! Neither step is retried. A box that silently disagrees with the real file
//! corrupts explicit `width`/`height` attributes and srcset descriptors, so a
//! double failure is always surfaced.

use crate::config::LocalConfig;
use crate::imaging::{CropSizeEstimator, EstimateError, ImageProber, ProbeError};
use crate::source::{LocalCopyMaterializer, SourceDescriptor, SourceMemo, SourceRef};
use crate::transform::TransformSpec;
use crate::types::{Dimensions, Provenance, ResolvedGeometry};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Error, Debug)]
pub enum ResolveError {
    #[error(
        "Could not resolve geometry for {}: introspection failed ({probe}), estimation failed ({estimate})",
        .path.display()
    )]
    GeometryResolution {
        path: PathBuf,
        probe: ProbeError,
        estimate: EstimateError,
    },
}

/// Resolves the real or estimated size of a locally produced file.
pub struct LocalResultResolver<'a, P: ImageProber, E: CropSizeEstimator> {
    prober: &'a P,
    estimator: &'a E,
}

impl<'a, P: ImageProber, E: CropSizeEstimator> LocalResultResolver<'a, P, E> {
    pub fn new(prober: &'a P, estimator: &'a E) -> Self {
        Self { prober, estimator }
    }

    /// Resolve the size of `local_path`, falling back to a crop estimate.
    pub fn resolve(
        &self,
        local_path: &Path,
        source: Dimensions,
        spec: &TransformSpec,
        allow_upscale: bool,
    ) -> Result<ResolvedGeometry, ResolveError> {
        self.resolve_inner(local_path, spec, allow_upscale, || source)
    }

    /// [`resolve`](Self::resolve) with the upscale policy taken from `[local]` config.
    pub fn resolve_with_config(
        &self,
        local_path: &Path,
        source: Dimensions,
        spec: &TransformSpec,
        config: &LocalConfig,
    ) -> Result<ResolvedGeometry, ResolveError> {
        self.resolve(local_path, source, spec, config.allow_upscale)
    }

    /// Like [`resolve`](Self::resolve), but looks the source size up only if
    /// the fallback path actually needs it.
    pub fn resolve_with_source<Q: ImageProber, M: LocalCopyMaterializer>(
        &self,
        local_path: &Path,
        source: &SourceRef,
        descriptor: &SourceDescriptor<'_, Q, M>,
        memo: &mut SourceMemo,
        spec: &TransformSpec,
        allow_upscale: bool,
    ) -> Result<ResolvedGeometry, ResolveError> {
        self.resolve_inner(local_path, spec, allow_upscale, || {
            descriptor.dimensions(source, memo)
        })
    }

    fn resolve_inner(
        &self,
        local_path: &Path,
        spec: &TransformSpec,
        allow_upscale: bool,
        source: impl FnOnce() -> Dimensions,
    ) -> Result<ResolvedGeometry, ResolveError> {
        let probe_error = match self.prober.probe(local_path) {
            Ok(dims) if dims.is_known() => {
                debug!(path = %local_path.display(), dims = %dims, "introspected transform result");
                return Ok(ResolvedGeometry::new(dims, Provenance::Introspected));
            }
            Ok(dims) => ProbeError::Unreadable(format!("header reports empty box {dims}")),
            Err(e) => e,
        };

        let source = source();
        warn!(
            path = %local_path.display(),
            error = %probe_error,
            source = %source,
            "could not introspect transform result, estimating crop size"
        );

        let estimate = match self.estimator.estimate(source, spec, allow_upscale) {
            Ok(dims) if dims.is_known() => {
                return Ok(ResolvedGeometry::new(dims, Provenance::Estimated));
            }
            Ok(dims) => EstimateError::Failed(format!("estimator returned empty box {dims}")),
            Err(e) => e,
        };

        Err(ResolveError::GeometryResolution {
            path: local_path.to_path_buf(),
            probe: probe_error,
            estimate,
        })
    }
}

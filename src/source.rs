//! Source image dimension lookup.
//!
//! Every resolution request needs the intrinsic size of its source image at
//! most once. [`SourceDescriptor::dimensions`] answers that question in order
//! of cost:
//!
//! 1. **Recorded**: a managed asset already knows its size → returned as-is.
//! 2. **External**: anything else is materialized to a local file by a
//!    [`LocalCopyMaterializer`] and its header is probed.
//!
//! Lookup never fails. Any problem along the way (lookup disabled by config,
//! materialization error, unreadable header) yields [`Dimensions::UNKNOWN`],
//! and callers branch on that sentinel explicitly.
//!
//! ## Memoization
//!
//! The answer is cached in a [`SourceMemo`] owned by the caller and scoped to
//! one request. There is no process-wide cache: two requests for the same
//! source probe it twice, which keeps the descriptor free of shared state.

use crate::config::SourceConfig;
use crate::imaging::ImageProber;
use crate::types::Dimensions;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum MaterializeError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Source not found: {0}")]
    NotFound(String),
}

/// Where a source image's size can be found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceRef {
    /// A managed asset whose dimensions were recorded when it was stored.
    Recorded(Dimensions),
    /// A URL or path that has to be fetched locally before it can be probed.
    External(String),
}

/// Produces a local file for an external source reference.
pub trait LocalCopyMaterializer: Sync {
    fn materialize(&self, source: &str) -> Result<PathBuf, MaterializeError>;
}

/// Materializer for sources that already live on the local filesystem.
///
/// Relative references are joined onto `root`; the file must exist.
#[derive(Debug, Clone)]
pub struct LocalFileMaterializer {
    root: PathBuf,
}

impl LocalFileMaterializer {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl LocalCopyMaterializer for LocalFileMaterializer {
    fn materialize(&self, source: &str) -> Result<PathBuf, MaterializeError> {
        let path = self.root.join(Path::new(source));
        match std::fs::metadata(&path) {
            Ok(meta) if meta.is_file() => Ok(path),
            Ok(_) => Err(MaterializeError::NotFound(path.display().to_string())),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(MaterializeError::NotFound(path.display().to_string()))
            }
            Err(e) => Err(MaterializeError::Io(e)),
        }
    }
}

/// Request-scoped memo for a source lookup.
///
/// Create one per resolution request and drop it afterwards.
#[derive(Debug, Default)]
pub struct SourceMemo {
    resolved: Option<(SourceRef, Dimensions)>,
}

impl SourceMemo {
    pub fn new() -> Self {
        Self::default()
    }

    /// The memoized answer for `source`, if this memo has seen it.
    pub fn get(&self, source: &SourceRef) -> Option<Dimensions> {
        self.resolved
            .as_ref()
            .filter(|(memo_source, _)| memo_source == source)
            .map(|(_, dims)| *dims)
    }

    fn store(&mut self, source: &SourceRef, dims: Dimensions) {
        self.resolved = Some((source.clone(), dims));
    }
}

/// Resolves a source image's intrinsic dimensions.
pub struct SourceDescriptor<'a, P: ImageProber, M: LocalCopyMaterializer> {
    prober: &'a P,
    materializer: &'a M,
    config: SourceConfig,
}

impl<'a, P: ImageProber, M: LocalCopyMaterializer> SourceDescriptor<'a, P, M> {
    pub fn new(prober: &'a P, materializer: &'a M, config: SourceConfig) -> Self {
        Self {
            prober,
            materializer,
            config,
        }
    }

    /// Intrinsic size of `source`, or [`Dimensions::UNKNOWN`].
    pub fn dimensions(&self, source: &SourceRef, memo: &mut SourceMemo) -> Dimensions {
        if let Some(dims) = memo.get(source) {
            return dims;
        }
        let dims = self.lookup(source);
        memo.store(source, dims);
        dims
    }

    fn lookup(&self, source: &SourceRef) -> Dimensions {
        match source {
            SourceRef::Recorded(dims) => *dims,
            SourceRef::External(_) if !self.config.external_dimensions => {
                debug!("external dimension lookup disabled; source size unknown");
                Dimensions::UNKNOWN
            }
            SourceRef::External(reference) => self.probe_external(reference),
        }
    }

    fn probe_external(&self, reference: &str) -> Dimensions {
        let path = match self.materializer.materialize(reference) {
            Ok(path) => path,
            Err(e) => {
                debug!(source = reference, error = %e, "could not materialize source");
                return Dimensions::UNKNOWN;
            }
        };

        match self.prober.probe(&path) {
            Ok(dims) if dims.is_known() => dims,
            Ok(dims) => {
                debug!(path = %path.display(), dims = %dims, "source probe returned empty box");
                Dimensions::UNKNOWN
            }
            Err(e) => {
                debug!(path = %path.display(), error = %e, "could not probe source");
                Dimensions::UNKNOWN
            }
        }
    }
}

#[cfg(test)]
pub mod tests {
    use super::*;
    use crate::imaging::probe::tests::MockProber;
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// Mock materializer mapping references to paths and recording calls.
    #[derive(Default)]
    pub struct MockMaterializer {
        pub paths: HashMap<String, PathBuf>,
        pub calls: Mutex<Vec<String>>,
    }

    impl MockMaterializer {
        pub fn with(entries: &[(&str, &str)]) -> Self {
            Self {
                paths: entries
                    .iter()
                    .map(|(r, p)| (r.to_string(), PathBuf::from(p)))
                    .collect(),
                calls: Mutex::new(Vec::new()),
            }
        }

        pub fn get_calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    impl LocalCopyMaterializer for MockMaterializer {
        fn materialize(&self, source: &str) -> Result<PathBuf, MaterializeError> {
            self.calls.lock().unwrap().push(source.to_string());
            self.paths
                .get(source)
                .cloned()
                .ok_or_else(|| MaterializeError::NotFound(source.to_string()))
        }
    }

    const REMOTE: &str = "https://cdn.example.com/photo.jpg";
    const LOCAL_COPY: &str = "/tmp/copies/photo.jpg";

    fn enabled() -> SourceConfig {
        SourceConfig {
            external_dimensions: true,
        }
    }

    // =========================================================================
    // Lookup order
    // =========================================================================

    #[test]
    fn recorded_dimensions_skip_io() {
        let prober = MockProber::new();
        let materializer = MockMaterializer::default();
        let descriptor = SourceDescriptor::new(&prober, &materializer, enabled());

        let mut memo = SourceMemo::new();
        let dims = descriptor.dimensions(
            &SourceRef::Recorded(Dimensions::new(3000, 2000)),
            &mut memo,
        );

        assert_eq!(dims, Dimensions::new(3000, 2000));
        assert!(prober.get_calls().is_empty());
        assert!(materializer.get_calls().is_empty());
    }

    #[test]
    fn external_source_is_materialized_then_probed() {
        let prober = MockProber::with(&[(LOCAL_COPY, Dimensions::new(1200, 800))]);
        let materializer = MockMaterializer::with(&[(REMOTE, LOCAL_COPY)]);
        let descriptor = SourceDescriptor::new(&prober, &materializer, enabled());

        let mut memo = SourceMemo::new();
        let dims = descriptor.dimensions(&SourceRef::External(REMOTE.into()), &mut memo);

        assert_eq!(dims, Dimensions::new(1200, 800));
        assert_eq!(materializer.get_calls(), vec![REMOTE.to_string()]);
        assert_eq!(prober.get_calls(), vec![LOCAL_COPY.to_string()]);
    }

    // =========================================================================
    // Failures become the unknown sentinel
    // =========================================================================

    #[test]
    fn disabled_lookup_is_unknown_without_io() {
        let prober = MockProber::with(&[(LOCAL_COPY, Dimensions::new(1200, 800))]);
        let materializer = MockMaterializer::with(&[(REMOTE, LOCAL_COPY)]);
        let config = SourceConfig {
            external_dimensions: false,
        };
        let descriptor = SourceDescriptor::new(&prober, &materializer, config);

        let mut memo = SourceMemo::new();
        let dims = descriptor.dimensions(&SourceRef::External(REMOTE.into()), &mut memo);

        assert_eq!(dims, Dimensions::UNKNOWN);
        assert!(materializer.get_calls().is_empty());
    }

    #[test]
    fn materialize_failure_is_unknown() {
        let prober = MockProber::new();
        let materializer = MockMaterializer::default();
        let descriptor = SourceDescriptor::new(&prober, &materializer, enabled());

        let mut memo = SourceMemo::new();
        let dims = descriptor.dimensions(&SourceRef::External(REMOTE.into()), &mut memo);

        assert_eq!(dims, Dimensions::UNKNOWN);
        assert!(prober.get_calls().is_empty());
    }

    #[test]
    fn probe_failure_is_unknown() {
        let prober = MockProber::new();
        let materializer = MockMaterializer::with(&[(REMOTE, LOCAL_COPY)]);
        let descriptor = SourceDescriptor::new(&prober, &materializer, enabled());

        let mut memo = SourceMemo::new();
        let dims = descriptor.dimensions(&SourceRef::External(REMOTE.into()), &mut memo);
        assert_eq!(dims, Dimensions::UNKNOWN);
    }

    #[test]
    fn zero_area_probe_is_unknown() {
        let prober = MockProber::with(&[(LOCAL_COPY, Dimensions::new(640, 0))]);
        let materializer = MockMaterializer::with(&[(REMOTE, LOCAL_COPY)]);
        let descriptor = SourceDescriptor::new(&prober, &materializer, enabled());

        let mut memo = SourceMemo::new();
        let dims = descriptor.dimensions(&SourceRef::External(REMOTE.into()), &mut memo);
        assert_eq!(dims, Dimensions::UNKNOWN);
    }

    // =========================================================================
    // Memoization
    // =========================================================================

    #[test]
    fn memo_answers_repeat_lookups() {
        let prober = MockProber::with(&[(LOCAL_COPY, Dimensions::new(1200, 800))]);
        let materializer = MockMaterializer::with(&[(REMOTE, LOCAL_COPY)]);
        let descriptor = SourceDescriptor::new(&prober, &materializer, enabled());
        let source = SourceRef::External(REMOTE.into());

        let mut memo = SourceMemo::new();
        descriptor.dimensions(&source, &mut memo);
        descriptor.dimensions(&source, &mut memo);

        assert_eq!(prober.get_calls().len(), 1);
        assert_eq!(memo.get(&source), Some(Dimensions::new(1200, 800)));
    }

    #[test]
    fn memo_caches_unknown_too() {
        let prober = MockProber::new();
        let materializer = MockMaterializer::with(&[(REMOTE, LOCAL_COPY)]);
        let descriptor = SourceDescriptor::new(&prober, &materializer, enabled());
        let source = SourceRef::External(REMOTE.into());

        let mut memo = SourceMemo::new();
        descriptor.dimensions(&source, &mut memo);
        descriptor.dimensions(&source, &mut memo);

        assert_eq!(materializer.get_calls().len(), 1);
    }

    #[test]
    fn fresh_memo_probes_again() {
        let prober = MockProber::with(&[(LOCAL_COPY, Dimensions::new(1200, 800))]);
        let materializer = MockMaterializer::with(&[(REMOTE, LOCAL_COPY)]);
        let descriptor = SourceDescriptor::new(&prober, &materializer, enabled());
        let source = SourceRef::External(REMOTE.into());

        descriptor.dimensions(&source, &mut SourceMemo::new());
        descriptor.dimensions(&source, &mut SourceMemo::new());

        assert_eq!(prober.get_calls().len(), 2);
    }

    #[test]
    fn memo_is_replaced_for_a_different_source() {
        let prober = MockProber::new();
        let materializer = MockMaterializer::default();
        let descriptor = SourceDescriptor::new(&prober, &materializer, enabled());

        let first = SourceRef::Recorded(Dimensions::new(10, 10));
        let second = SourceRef::Recorded(Dimensions::new(20, 20));

        let mut memo = SourceMemo::new();
        assert_eq!(
            descriptor.dimensions(&first, &mut memo),
            Dimensions::new(10, 10)
        );
        assert_eq!(
            descriptor.dimensions(&second, &mut memo),
            Dimensions::new(20, 20)
        );
        assert_eq!(memo.get(&first), None);
    }

    // =========================================================================
    // LocalFileMaterializer
    // =========================================================================

    #[test]
    fn local_materializer_finds_relative_file() {
        let tmp = tempfile::TempDir::new().unwrap();
        std::fs::create_dir_all(tmp.path().join("uploads")).unwrap();
        std::fs::write(tmp.path().join("uploads/a.jpg"), b"x").unwrap();

        let materializer = LocalFileMaterializer::new(tmp.path());
        let path = materializer.materialize("uploads/a.jpg").unwrap();
        assert_eq!(path, tmp.path().join("uploads/a.jpg"));
    }

    #[test]
    fn local_materializer_accepts_absolute_path() {
        let tmp = tempfile::TempDir::new().unwrap();
        let file = tmp.path().join("b.png");
        std::fs::write(&file, b"x").unwrap();

        let materializer = LocalFileMaterializer::new("/somewhere/else");
        let path = materializer.materialize(file.to_str().unwrap()).unwrap();
        assert_eq!(path, file);
    }

    #[test]
    fn local_materializer_rejects_missing_and_directories() {
        let tmp = tempfile::TempDir::new().unwrap();
        let materializer = LocalFileMaterializer::new(tmp.path());

        assert!(matches!(
            materializer.materialize("missing.jpg"),
            Err(MaterializeError::NotFound(_))
        ));
        assert!(materializer.materialize(".").is_err());
    }
}

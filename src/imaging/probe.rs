//! Image dimension probing trait and shared error type.
//!
//! The [`ImageProber`] trait is the single seam through which this crate
//! reads pixel dimensions from disk. The production implementation is
//! [`HeaderProber`](super::header::HeaderProber), which reads only file
//! headers and container metadata, never pixel data.

use crate::types::Dimensions;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProbeError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Unreadable image: {0}")]
    Unreadable(String),
}

/// Reads the pixel dimensions of an image file.
///
/// Implementations must not require a full pixel decode when the header
/// carries the size. `Sync` so a single prober can serve concurrent requests.
pub trait ImageProber: Sync {
    fn probe(&self, path: &Path) -> Result<Dimensions, ProbeError>;
}

impl<P: ImageProber + ?Sized> ImageProber for &P {
    fn probe(&self, path: &Path) -> Result<Dimensions, ProbeError> {
        (**self).probe(path)
    }
}

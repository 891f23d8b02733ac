//! Header-only dimension prober.
//!
//! ## Crate mapping
//!
//! | Format | Crate / function |
//! |---|---|
//! | JPEG, PNG, TIFF, WebP | `image::ImageReader::into_dimensions` (format sniffed from magic bytes, header read only) |
//! | AVIF | `avif-parse` container metadata (`ispe` box), no AV1 decode |
//!
//! The file extension is never consulted. The `image` crate's `"avif"`
//! feature only enables the encoder, so AVIF files are recognized by their
//! `ftyp` box and routed to `avif-parse` before `image` sees them.

use super::probe::{ImageProber, ProbeError};
use crate::types::Dimensions;
use image::ImageReader;
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Bytes read up front to sniff the container; enough for a typical `ftyp` box.
const SNIFF_LEN: u64 = 64;

/// ISOBMFF brands that mark an AVIF still image or sequence.
const AVIF_BRANDS: &[&[u8; 4]] = &[b"avif", b"avis"];

/// Production prober backed by the `image` and `avif-parse` crates.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeaderProber;

impl HeaderProber {
    pub fn new() -> Self {
        Self
    }
}

/// Whether `head` starts with an `ftyp` box naming an AVIF brand.
///
/// Checks the major brand and every compatible brand inside the box.
fn is_avif_container(head: &[u8]) -> bool {
    if head.len() < 12 || &head[4..8] != b"ftyp" {
        return false;
    }
    let box_len = u32::from_be_bytes([head[0], head[1], head[2], head[3]]) as usize;
    let end = box_len.clamp(12, head.len());
    let major = &head[8..12];
    // bytes 12..16 hold the minor version
    let compatible = head.get(16..end).unwrap_or_default().chunks_exact(4);
    std::iter::once(major)
        .chain(compatible)
        .any(|brand| AVIF_BRANDS.iter().any(|b| brand == &b[..]))
}

fn read_head(path: &Path) -> Result<Vec<u8>, ProbeError> {
    let mut head = Vec::with_capacity(SNIFF_LEN as usize);
    File::open(path)?.take(SNIFF_LEN).read_to_end(&mut head)?;
    Ok(head)
}

/// Extract dimensions from an AVIF file's container metadata.
fn probe_avif(path: &Path) -> Result<Dimensions, ProbeError> {
    let file_data = std::fs::read(path)?;
    let avif = avif_parse::read_avif(&mut std::io::Cursor::new(&file_data)).map_err(|e| {
        ProbeError::Unreadable(format!("Failed to parse AVIF {}: {e:?}", path.display()))
    })?;
    let meta = avif.primary_item_metadata().map_err(|e| {
        ProbeError::Unreadable(format!(
            "Failed to read AVIF metadata {}: {e:?}",
            path.display()
        ))
    })?;
    Ok(Dimensions::new(
        meta.max_frame_width.get(),
        meta.max_frame_height.get(),
    ))
}

impl ImageProber for HeaderProber {
    fn probe(&self, path: &Path) -> Result<Dimensions, ProbeError> {
        if is_avif_container(&read_head(path)?) {
            return probe_avif(path);
        }
        let reader = ImageReader::open(path)?.with_guessed_format()?;
        let (width, height) = reader.into_dimensions().map_err(|e| match e {
            image::ImageError::IoError(io) => ProbeError::Io(io),
            other => ProbeError::Unreadable(format!(
                "Failed to read dimensions of {}: {other}",
                path.display()
            )),
        })?;
        Ok(Dimensions::new(width, height))
    }
}

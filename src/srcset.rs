//! Responsive image candidate sets.
//!
//! Renders resolved geometries as an HTML `srcset` attribute value:
//!
//! ```text
//! /img/photo-400.jpg 400w, /img/photo-800.jpg 800w
//! ```
//!
//! A candidate whose descriptor axis is 0 (a single-axis prediction on an
//! unknown source) is left out: the browser would trust the bogus value and
//! pick the wrong candidate.

use crate::types::ResolvedGeometry;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unknown srcset descriptor '{0}' (expected 'w' or 'h')")]
pub struct DescriptorError(pub String);

/// Which axis a srcset entry advertises.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Descriptor {
    #[default]
    Width,
    Height,
}

impl Descriptor {
    fn value(self, geometry: &ResolvedGeometry) -> u32 {
        match self {
            Descriptor::Width => geometry.width(),
            Descriptor::Height => geometry.height(),
        }
    }

    fn suffix(self) -> char {
        match self {
            Descriptor::Width => 'w',
            Descriptor::Height => 'h',
        }
    }
}

impl FromStr for Descriptor {
    type Err = DescriptorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "w" => Ok(Descriptor::Width),
            "h" => Ok(Descriptor::Height),
            other => Err(DescriptorError(other.to_string())),
        }
    }
}

impl fmt::Display for Descriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.suffix())
    }
}

/// One image variant: where it is served from and how big it is.
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate<'a> {
    pub url: &'a str,
    pub geometry: ResolvedGeometry,
}

impl<'a> Candidate<'a> {
    pub fn new(url: &'a str, geometry: ResolvedGeometry) -> Self {
        Self { url, geometry }
    }
}

/// Render candidates as a `srcset` value, in the order given.
pub fn srcset(candidates: &[Candidate<'_>], descriptor: Descriptor) -> String {
    candidates
        .iter()
        .filter_map(|c| {
            let value = descriptor.value(&c.geometry);
            (value > 0).then(|| format!("{} {}{}", c.url, value, descriptor.suffix()))
        })
        .collect::<Vec<_>>()
        .join(", ")
}

//! Geometry policy configuration.
//!
//! Handles loading, validating, and merging a TOML config file. Every key is
//! optional: the file is layered on top of stock defaults, so it only needs
//! to name what it changes.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [source]
//! external_dimensions = true  # Materialize and probe sources without recorded dimensions
//!
//! [local]
//! allow_upscale = true        # Default upscale policy forwarded to the crop estimator
//!
//! [predict]
//! default_fit = "clip"        # Fit keyword used when a request names none
//! ```
//!
//! Unknown keys are rejected to catch typos early. An unrecognized
//! `default_fit` keyword is rejected too: per-request keywords degrade
//! gracefully, but a misspelled default would silently change every request.

use crate::transform::{FitGroup, FitMode, TransformSpec};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("TOML serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Full configuration, loaded from TOML.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GeometryConfig {
    /// Source dimension lookup policy.
    pub source: SourceConfig,
    /// Local transform result policy.
    pub local: LocalConfig,
    /// Remote prediction defaults.
    pub predict: PredictConfig,
}

impl GeometryConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.predict.default_fit.group() == FitGroup::Unrecognized {
            return Err(ConfigError::Validation(format!(
                "predict.default_fit: unknown fit mode '{}'",
                self.predict.default_fit
            )));
        }
        Ok(())
    }

    /// Build a transform request, using the configured fit when `fit` is absent.
    pub fn transform(
        &self,
        width: Option<i64>,
        height: Option<i64>,
        fit: Option<&str>,
    ) -> TransformSpec {
        let fit = fit
            .map(FitMode::from)
            .unwrap_or_else(|| self.predict.default_fit.clone());
        TransformSpec::new(width, height, fit)
    }
}

/// Source dimension lookup settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SourceConfig {
    /// When false, sources without recorded dimensions are reported as
    /// unknown instead of being materialized and probed.
    pub external_dimensions: bool,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            external_dimensions: true,
        }
    }
}

/// Local transform result settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LocalConfig {
    /// Whether the local raster engine may produce boxes larger than the source.
    pub allow_upscale: bool,
}

impl Default for LocalConfig {
    fn default() -> Self {
        Self {
            allow_upscale: true,
        }
    }
}

/// Remote prediction settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PredictConfig {
    pub default_fit: FitMode,
}

impl Default for PredictConfig {
    fn default() -> Self {
        Self {
            default_fit: FitMode::Clip,
        }
    }
}

/// Returns the stock default config as a `toml::Value::Table`.
///
/// This is the base layer user overrides are merged onto.
pub fn stock_defaults_value() -> Result<toml::Value, ConfigError> {
    Ok(toml::Value::try_from(GeometryConfig::default())?)
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Merge an optional overlay onto the stock defaults, then deserialize and validate.
pub fn resolve_config(overlay: Option<toml::Value>) -> Result<GeometryConfig, ConfigError> {
    let base = stock_defaults_value()?;
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: GeometryConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load config from the TOML file at `path`.
///
/// A missing file yields stock defaults. Unknown keys, malformed TOML and
/// invalid values are errors.
pub fn load_config(path: &Path) -> Result<GeometryConfig, ConfigError> {
    if !path.exists() {
        return resolve_config(None);
    }
    let content = fs::read_to_string(path)?;
    let overlay: toml::Value = toml::from_str(&content)?;
    resolve_config(Some(overlay))
}

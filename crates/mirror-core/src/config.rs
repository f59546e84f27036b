//! Conversion options
//!
//! Options are plain serde data so they can be embedded in a host
//! application's own configuration file, loaded from JSON, and overridden
//! from the environment.
//!
//! Copyright (c) 2025 Specado Team
//! Licensed under the Apache-2.0 license

use crate::error::{ConversionMode, Error, Result};
use serde::{Deserialize, Serialize};

/// Default nesting limit of a single conversion
pub const DEFAULT_MAX_DEPTH: usize = 128;

/// Options for one top-level conversion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConvertOptions {
    /// Strict or best-effort coercion
    pub mode: ConversionMode,
    /// Maximum nesting depth before failing with `TooDeep`; `None` disables
    /// the guard
    pub max_depth: Option<usize>,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            mode: ConversionMode::Strict,
            max_depth: Some(DEFAULT_MAX_DEPTH),
        }
    }
}

impl ConvertOptions {
    pub fn strict() -> Self {
        Self::default()
    }

    pub fn best_effort() -> Self {
        Self {
            mode: ConversionMode::BestEffort,
            ..Self::default()
        }
    }

    pub fn with_mode(mut self, mode: ConversionMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = Some(max_depth);
        self
    }

    /// Disable the depth guard
    pub fn unbounded(mut self) -> Self {
        self.max_depth = None;
        self
    }

    /// Load options from a JSON document; missing keys keep their defaults
    pub fn from_json_str(json: &str) -> Result<Self> {
        let options: ConvertOptions =
            serde_json::from_str(json).map_err(|e| Error::Configuration {
                message: format!("Invalid conversion options: {}", e),
                source: Some(e),
            })?;
        options.validate()?;
        Ok(options)
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_depth == Some(0) {
            return Err(Error::Configuration {
                message: "max_depth must be at least 1".to_string(),
                source: None,
            });
        }
        Ok(())
    }

    /// Apply `MIRROR_MODE` and `MIRROR_MAX_DEPTH` overrides
    ///
    /// Unrecognized values are logged and ignored.
    pub fn merge_with_env(&mut self) {
        if let Ok(mode) = std::env::var("MIRROR_MODE") {
            match mode.to_lowercase().as_str() {
                "strict" => self.mode = ConversionMode::Strict,
                "best_effort" | "besteffort" | "smart" => self.mode = ConversionMode::BestEffort,
                _ => tracing::warn!("Invalid MIRROR_MODE: {}, keeping {}", mode, self.mode),
            }
        }

        if let Ok(depth) = std::env::var("MIRROR_MAX_DEPTH") {
            match depth.to_lowercase().as_str() {
                "none" | "unbounded" => self.max_depth = None,
                raw => match raw.parse::<usize>() {
                    Ok(n) if n > 0 => self.max_depth = Some(n),
                    _ => tracing::warn!("Invalid MIRROR_MAX_DEPTH: {}, keeping {:?}", depth, self.max_depth),
                },
            }
        }
    }
}

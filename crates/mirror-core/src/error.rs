//! Error types for the Mirror core library
//!
//! This module defines the error handling system for Mirror, using thiserror
//! for ergonomic error definitions. Conversion errors carry the path of the
//! destination slot that failed so callers can locate the offending field.
//!
//! Copyright (c) 2025 Specado Team
//! Licensed under the Apache-2.0 license

use std::fmt;
use thiserror::Error;
use serde::{Deserialize, Serialize};

/// Main error type for Mirror operations
#[derive(Error, Debug)]
pub enum Error {
    /// The destination handle cannot be written through
    #[error("Destination is not settable: {message}")]
    NotSettable {
        message: String,
    },

    /// No conversion rule connects the source kind to the destination kind
    #[error("Type mismatch at {path}: cannot convert {found} into {expected} (mode: {mode})")]
    TypeMismatch {
        expected: String,
        found: String,
        path: String,
        mode: ConversionMode,
    },

    /// A string could not be parsed into a scalar destination
    #[error("Parse error at {path}: cannot parse {input:?} as {target}: {message}")]
    Parse {
        target: String,
        input: String,
        message: String,
        path: String,
    },

    /// The recursion depth guard tripped
    #[error("Conversion exceeded the maximum depth of {limit} at {path}")]
    TooDeep {
        limit: usize,
        path: String,
    },

    /// A record was built or updated inconsistently with its shape
    #[error("Invalid record {record}: {message}")]
    InvalidRecord {
        record: String,
        message: String,
    },

    /// Invalid conversion options
    #[error("Configuration error: {message}")]
    Configuration {
        message: String,
        #[source]
        source: Option<serde_json::Error>,
    },

    /// JSON parsing and serialization errors
    #[error("JSON error: {message}")]
    Json {
        message: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Convenience type alias for Results using our Error type
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Path of the destination slot the error was raised for, if any
    pub fn path(&self) -> Option<&str> {
        match self {
            Error::TypeMismatch { path, .. }
            | Error::Parse { path, .. }
            | Error::TooDeep { path, .. } => Some(path),
            _ => None,
        }
    }

    pub fn is_type_mismatch(&self) -> bool {
        matches!(self, Error::TypeMismatch { .. })
    }

    pub fn is_parse(&self) -> bool {
        matches!(self, Error::Parse { .. })
    }

    pub fn is_not_settable(&self) -> bool {
        matches!(self, Error::NotSettable { .. })
    }

    pub fn is_too_deep(&self) -> bool {
        matches!(self, Error::TooDeep { .. })
    }
}

/// Conversion modes, fixed for the duration of one top-level conversion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConversionMode {
    /// Exact kind equality on every leaf, every error propagates
    #[default]
    Strict,
    /// Coerce scalars and drop unconvertible map entries and list elements
    BestEffort,
}

impl ConversionMode {
    pub fn is_best_effort(self) -> bool {
        self == ConversionMode::BestEffort
    }
}

impl fmt::Display for ConversionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConversionMode::Strict => write!(f, "Strict"),
            ConversionMode::BestEffort => write!(f, "BestEffort"),
        }
    }
}

// Conversion implementations
impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Json {
            message: err.to_string(),
            source: err,
        }
    }
}

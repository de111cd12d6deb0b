use std::path::PathBuf;
use thiserror::Error;

use crate::model::OwnerId;
use crate::validation::ValidationReport;

/// The main error type for annorect operations.
#[derive(Debug, Error)]
pub enum AnnorectError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse annotation records from {path}: {source}")]
    RecordsJsonParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to write annotation records to {path}: {source}")]
    RecordsJsonWrite {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to parse session script from {path}: {source}")]
    ScriptParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to parse options from {path}: {source}")]
    OptionsParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to serialize output: {0}")]
    OutputWrite(#[source] serde_json::Error),

    #[error("Validation failed with {error_count} error(s) and {warning_count} warning(s)")]
    ValidationFailed {
        error_count: usize,
        warning_count: usize,
        report: ValidationReport,
    },

    #[error("Invalid surface: {0}")]
    InvalidSurface(String),
}

/// Reasons a rectangle cannot be normalized or accepted.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum GeometryError {
    #[error("surface has no usable size ({width}x{height})")]
    EmptySurface { width: f64, height: f64 },

    #[error("rectangle has non-finite coordinates")]
    NonFinite,

    #[error("rectangle {width}x{height} must exceed 1 unit on both axes")]
    Degenerate { width: f64, height: f64 },
}

/// Reasons the annotation store refuses an insertion.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum StoreError {
    #[error("identifier {0} is already in use")]
    DuplicateIdentifier(OwnerId),

    #[error("record {0} has an inverted or non-finite position")]
    InvalidPosition(OwnerId),
}

/// A coordinate string that is not a number with an optional `%` suffix.
#[derive(Clone, Debug, Error, PartialEq)]
#[error("invalid coordinate '{input}'")]
pub struct CoordParseError {
    pub input: String,
}

//! Error types
//!
//! Source errors never reach the presentation shell: `load_reference_data`
//! logs them and degrades to an empty table.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("reference source not found: {0}")]
    Missing(PathBuf),

    #[error("failed to read reference source {path}: {source}")]
    Unreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Neither UTF-8 nor the legacy Korean encoding decoded the bytes
    #[error("reference source is neither UTF-8 nor EUC-KR")]
    Decode,

    #[error("failed to parse reference table: {0}")]
    Parse(String),

    #[error("reference table is missing required column '{0}'")]
    Schema(String),
}

/// Malformed scenario rule
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RuleError {
    #[error("rule {region}/{crop} has no stages")]
    Empty { region: String, crop: String },

    #[error("rule {region}/{crop} has no open-ended first stage")]
    NoOpenStage { region: String, crop: String },

    #[error("rule {region}/{crop} has two stages starting at {year:?}")]
    OverlappingStages {
        region: String,
        crop: String,
        year: Option<i32>,
    },
}

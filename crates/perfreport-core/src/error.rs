//! Error taxonomy for the report pipeline.
//!
//! Every variant is fatal: the pipeline never retries and never emits a
//! partial report. Messages name the stage and the column or line that
//! triggered the failure.

use std::path::PathBuf;

use thiserror::Error;

use crate::window::PhaseWindow;

/// Result type alias for pipeline operations.
pub type Result<T> = std::result::Result<T, ReportError>;

/// Errors raised while loading, analyzing or rendering a telemetry log.
#[derive(Error, Debug)]
pub enum ReportError {
    /// Input log file does not exist.
    #[error("input file not found: {}", .0.display())]
    MissingInput(PathBuf),

    /// Header/units rows disagree or produce duplicate identifiers.
    #[error("schema error: {0}")]
    Schema(String),

    /// A data row does not line up with the recovered header.
    #[error("malformed row at line {line}: {reason}")]
    MalformedRow { line: usize, reason: String },

    /// A phase window selects no samples of a series.
    #[error("empty window {window} for '{identifier}' ({sample_count} samples)")]
    EmptyWindow {
        identifier: String,
        window: PhaseWindow,
        sample_count: usize,
    },

    /// A required metric is absent, or matched more than once.
    #[error("missing metric: {0}")]
    MissingMetric(String),

    /// Window bounds are inverted or zero-width.
    #[error("invalid window: end {end} must be greater than start {start}")]
    InvalidWindow { start: usize, end: usize },

    /// Chart output directory has not been created.
    #[error("chart output directory does not exist: {}", .0.display())]
    OutputDirMissing(PathBuf),

    /// Plotting backend failure.
    #[error("chart rendering failed for '{}': {reason}", .path.display())]
    Chart { path: PathBuf, reason: String },

    /// Configuration file could not be parsed.
    #[error("config error: {0}")]
    Config(String),

    /// Underlying I/O failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

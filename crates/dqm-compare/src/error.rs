//! Error types for comparisons.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while setting up or running a comparison.
///
/// Variants marked per-histogram are recorded in the score table and never
/// abort a run; the rest are setup failures.
#[derive(Debug, Error)]
pub enum CompareError {
    /// ROOT reading failed.
    #[error("ROOT error: {0}")]
    Root(#[from] dqm_root::RootError),

    /// Figure rendering failed (per-histogram).
    #[error("render error: {0}")]
    Render(#[from] dqm_viz_render::RenderError),

    /// Filesystem error with the path involved.
    #[error("{path}: {source}")]
    Io {
        /// Path being read or written.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// Base name does not follow `<measurable>_<wheel>_<station>_<sector>`
    /// (per-histogram).
    #[error("malformed histogram name {0:?}: expected at least 4 '_'-separated tokens")]
    MalformedName(String),

    /// Object missing from one of the files (per-histogram).
    #[error("histogram not found in {file}: {path}")]
    HistogramNotFound {
        /// Which input the lookup ran against.
        file: String,
        /// Path looked up.
        path: String,
    },

    /// Current and reference binning differ (per-histogram).
    #[error("incompatible binning: {0}")]
    IncompatibleBinning(String),

    /// A run identifier is not six digits.
    #[error("invalid run id {0:?}: expected 6 digits")]
    InvalidRunId(String),

    /// Score table could not be serialized.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration could not be loaded or is inconsistent.
    #[error("config error: {0}")]
    Config(String),
}

impl CompareError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io { path: path.into(), source }
    }
}

/// Result type for this crate.
pub type Result<T> = std::result::Result<T, CompareError>;

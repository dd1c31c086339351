//! Error types for the analysis core and its collaborators.

use std::path::PathBuf;

/// Conditions under which a summary is mathematically undefined.
///
/// These are recoverable: the caller decides whether to abort, warn, or
/// substitute a default. Statistics are never reported as zero instead.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AnalysisError {
    /// Fewer than two samples were given to the pairwise estimator.
    #[error("not enough data points to compute pairwise rates (found {found}, need at least 2)")]
    InsufficientData { found: usize },

    /// Enough samples, but no pair has positive values and distinct times.
    #[error("no valid pairs among {samples} samples (check for values > 0 and distinct times)")]
    NoValidPairs { samples: usize },

    /// No samples were given to the residual analyzer.
    #[error("no samples to compare against the model")]
    EmptyInput,
}

/// Failures that prevent an input source from being read at all.
#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    #[error("failed to open '{}'", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to map '{}'", path.display())]
    Map {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to read input")]
    Read(#[source] std::io::Error),
}

/// Why a single row was dropped during ingestion.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RowIssue {
    #[error("expected at least 2 columns, found {found}")]
    TooFewColumns { found: usize },

    #[error("field '{field}' is not a number")]
    NotNumeric { field: String },

    #[error("field '{field}' is not finite")]
    NonFinite { field: String },

    #[error("unreadable record: {reason}")]
    Unreadable { reason: String },
}

/// Errors building a model from user input.
#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    #[error("invalid expression '{source_text}'")]
    Parse {
        source_text: String,
        #[source]
        source: evalexpr::EvalexprError,
    },

    #[error("expression '{source_text}' cannot be evaluated at x = {at}")]
    Evaluate {
        source_text: String,
        at: f64,
        #[source]
        source: evalexpr::EvalexprError,
    },
}

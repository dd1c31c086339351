//! Exponential decay-rate estimation for time series such as foam height.
//!
//! The analysis core is [`pairwise::estimate`] and [`residuals::analyze`]. Both
//! are pure functions over in-memory samples; everything else in the crate
//! reads, writes, or displays their inputs and results.

pub mod error;
pub mod export;
pub mod formatting;
pub mod model;
pub mod pairwise;
pub mod parsing;
pub mod plotting;
pub mod report;
pub mod residuals;
pub mod sample;
pub mod stats;
pub mod units;

pub use error::{AnalysisError, IngestError, ModelError, RowIssue};
pub use model::{Affine, Exponential, Expression, Model};
pub use pairwise::{EstimationSummary, PairResult, RateStatistic, estimate};
pub use residuals::{ResidualPoint, ResidualSummary, analyze};
pub use sample::Sample;

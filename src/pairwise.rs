//! Pairwise decay-rate estimation.
//!
//! Every pair of samples `(i, j)` with `i < j` implies a decay constant under
//! `v(t) = v(t0) * e^{k (t - t0)}`:
//!
//! ```text
//! k_ij = (ln v_j - ln v_i) / (t_j - t_i)
//! ```
//!
//! All pairs are kept, not just adjacent ones, so the mean and median are taken
//! over the full combinatorial set. Pairs touching a non-positive value or
//! sharing a timestamp have no defined rate and are excluded from both the
//! rows and the statistics.

use rayon::prelude::*;
use tracing::debug;

use crate::error::AnalysisError;
use crate::sample::Sample;
use crate::stats::RateStats;

/// Inputs at least this long are enumerated across the rayon pool.
pub const PARALLEL_MIN_SAMPLES: usize = 512;

/// Rate implied by two samples, with their input positions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PairResult {
    pub i: usize,
    pub j: usize,
    pub first: Sample,
    pub second: Sample,
    pub rate: f64,
}

/// Which aggregate to treat as the canonical estimate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum RateStatistic {
    #[default]
    #[value(name = "median")]
    Median,
    #[value(name = "mean")]
    Mean,
}

/// How to enumerate the pair space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Parallelism {
    /// Parallel from `PARALLEL_MIN_SAMPLES` samples upward.
    #[default]
    Auto,
    Sequential,
    Parallel,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EstimationSummary {
    /// Included pairs in `(i, j)` order.
    pub pairs: Vec<PairResult>,
    pub mean_rate: f64,
    pub median_rate: f64,
    /// Pairs skipped for a non-positive value or a repeated time.
    pub excluded_pairs: usize,
    pub stats: RateStats,
}

impl EstimationSummary {
    pub fn rate(&self, statistic: RateStatistic) -> f64 {
        match statistic {
            RateStatistic::Mean => self.mean_rate,
            RateStatistic::Median => self.median_rate,
        }
    }

    /// Time for the quantity to halve; only defined for a decaying series.
    pub fn half_life(&self, statistic: RateStatistic) -> Option<f64> {
        let rate = self.rate(statistic);
        (rate < 0.0).then(|| std::f64::consts::LN_2 / -rate)
    }
}

/// Estimate the decay rate from all sample pairs.
pub fn estimate(samples: &[Sample]) -> Result<EstimationSummary, AnalysisError> {
    estimate_with(samples, Parallelism::Auto)
}

pub fn estimate_with(
    samples: &[Sample],
    parallelism: Parallelism,
) -> Result<EstimationSummary, AnalysisError> {
    let n = samples.len();
    if n < 2 {
        return Err(AnalysisError::InsufficientData { found: n });
    }

    let parallel = match parallelism {
        Parallelism::Auto => n >= PARALLEL_MIN_SAMPLES,
        Parallelism::Sequential => false,
        Parallelism::Parallel => true,
    };

    // Rows are produced per `i` and concatenated in order, so both paths
    // yield the same sequence.
    let pairs: Vec<PairResult> = if parallel {
        (0..n)
            .into_par_iter()
            .flat_map_iter(|i| pairs_from(samples, i))
            .collect()
    } else {
        (0..n).flat_map(|i| pairs_from(samples, i)).collect()
    };

    let total = n * (n - 1) / 2;
    let excluded_pairs = total - pairs.len();
    debug!(
        samples = n,
        included = pairs.len(),
        excluded = excluded_pairs,
        parallel,
        "enumerated sample pairs"
    );

    let stats = RateStats::new(pairs.iter().map(|p| p.rate).collect())
        .ok_or(AnalysisError::NoValidPairs { samples: n })?;

    Ok(EstimationSummary {
        pairs,
        mean_rate: stats.mean,
        median_rate: stats.median(),
        excluded_pairs,
        stats,
    })
}

/// All valid pairs whose first index is `i`.
fn pairs_from(samples: &[Sample], i: usize) -> impl Iterator<Item = PairResult> + '_ {
    let first = samples[i];
    samples
        .iter()
        .enumerate()
        .skip(i + 1)
        .filter_map(move |(j, &second)| {
            pair_rate(first, second).map(|rate| PairResult {
                i,
                j,
                first,
                second,
                rate,
            })
        })
}

/// `None` where the logarithm or the slope is undefined.
pub fn pair_rate(a: Sample, b: Sample) -> Option<f64> {
    // NaN fails this test too
    let positive = |v: f64| v > 0.0;
    if !positive(a.v) || !positive(b.v) {
        return None;
    }
    if a.t == b.t {
        return None;
    }
    Some((b.v.ln() - a.v.ln()) / (b.t - a.t))
}

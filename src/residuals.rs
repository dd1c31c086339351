//! Residuals of log-space observations against a candidate model.
//!
//! Residuals are signed (`observed - model`). Positive ones accumulate into
//! `distance_above`, the magnitudes of the rest into `distance_below`, and every
//! residual contributes its square to `sum_of_squares`.

use tracing::debug;

use crate::error::AnalysisError;
use crate::model::Model;
use crate::sample::Sample;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResidualPoint {
    pub t: f64,
    pub observed: f64,
    pub model: f64,
    pub residual: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResidualSummary {
    /// One point per input sample, in input order.
    pub points: Vec<ResidualPoint>,
    pub distance_above: f64,
    pub distance_below: f64,
    pub net_distance: f64,
    pub sum_of_squares: f64,
}

impl ResidualSummary {
    pub fn mean_squared(&self) -> f64 {
        self.sum_of_squares / self.points.len() as f64
    }

    pub fn rms(&self) -> f64 {
        self.mean_squared().sqrt()
    }

    /// Points where the model has no finite value, e.g. the log of a curve
    /// that dips to zero or below.
    pub fn undefined_points(&self) -> usize {
        self.points.iter().filter(|p| !p.model.is_finite()).count()
    }
}

/// Compare `(t, ln v)` samples against `model`.
pub fn analyze<M: Model + ?Sized>(
    samples: &[Sample],
    model: &M,
) -> Result<ResidualSummary, AnalysisError> {
    if samples.is_empty() {
        return Err(AnalysisError::EmptyInput);
    }

    let mut points = Vec::with_capacity(samples.len());
    let mut distance_above = 0.0;
    let mut distance_below = 0.0;
    let mut sum_of_squares = 0.0;

    for s in samples {
        let fitted = model.evaluate(s.t);
        let residual = s.v - fitted;

        if residual > 0.0 {
            distance_above += residual;
        } else {
            distance_below += residual.abs();
        }
        sum_of_squares += residual * residual;

        points.push(ResidualPoint {
            t: s.t,
            observed: s.v,
            model: fitted,
            residual,
        });
    }

    debug!(
        points = points.len(),
        distance_above, distance_below, sum_of_squares, "accumulated residuals"
    );

    Ok(ResidualSummary {
        points,
        distance_above,
        distance_below,
        net_distance: distance_above - distance_below,
        sum_of_squares,
    })
}

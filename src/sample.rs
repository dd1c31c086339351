use tracing::warn;

/// One `(time, value)` observation, kept in input order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    pub t: f64,
    pub v: f64,
}

impl Sample {
    pub fn new(t: f64, v: f64) -> Self {
        Sample { t, v }
    }
}

impl From<(f64, f64)> for Sample {
    fn from((t, v): (f64, f64)) -> Self {
        Sample { t, v }
    }
}

/// Samples moved into log space, plus how many could not be.
#[derive(Debug, Clone, PartialEq)]
pub struct LogSeries {
    pub samples: Vec<Sample>,
    pub rejected: usize,
}

/// Maps each `(t, v)` to `(t, ln v)`.
///
/// Non-positive values have no logarithm; they are dropped and counted so the
/// residual analyzer only ever sees log-domain data.
pub fn log_transform(samples: &[Sample]) -> LogSeries {
    let mut out = Vec::with_capacity(samples.len());
    let mut rejected = 0;

    for s in samples {
        if s.v > 0.0 {
            out.push(Sample::new(s.t, s.v.ln()));
        } else {
            rejected += 1;
        }
    }

    if rejected > 0 {
        warn!(rejected, "dropped non-positive values before log transform");
    }

    LogSeries {
        samples: out,
        rejected,
    }
}

//! CSV exports of analysis results.
//!
//! Numbers are written in their shortest round-trip form so the files can be
//! re-read without loss.

use std::io::Write;
use std::path::{Path, PathBuf};

use crate::model::{Exponential, Model};
use crate::pairwise::EstimationSummary;
use crate::residuals::ResidualSummary;
use crate::sample::Sample;

pub const PAIRWISE_SUFFIX: &str = "_pairwise_calc";
pub const FITTED_SUFFIX: &str = "_fitted_output";
pub const RESIDUALS_SUFFIX: &str = "_residuals";

/// `<dir>/<stem><suffix>.csv` next to the input file.
pub fn derived_path(input: &Path, suffix: &str) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    input.with_file_name(format!("{stem}{suffix}.csv"))
}

/// One row per pair, a blank line, then `Average` and `Median` trailer rows.
pub fn write_pairwise_csv<W: Write>(out: W, summary: &EstimationSummary) -> csv::Result<()> {
    let mut writer = csv::WriterBuilder::new().flexible(true).from_writer(out);

    writer.write_record(["t_i", "H_i", "t_j", "H_j", "Value"])?;
    for pair in &summary.pairs {
        writer.write_record([
            pair.first.t.to_string(),
            pair.first.v.to_string(),
            pair.second.t.to_string(),
            pair.second.v.to_string(),
            pair.rate.to_string(),
        ])?;
    }

    let mut writer = blank_line(writer)?;

    let mean = summary.mean_rate.to_string();
    let median = summary.median_rate.to_string();
    writer.write_record(["Average", "", "", "", mean.as_str()])?;
    writer.write_record(["Median", "", "", "", median.as_str()])?;
    writer.flush()?;
    Ok(())
}

/// `Time, Actual Value, Fitted Value`; the fitted column is empty without a curve.
pub fn write_fitted_csv<W: Write>(
    out: W,
    samples: &[Sample],
    curve: Option<&Exponential>,
) -> csv::Result<()> {
    let mut writer = csv::Writer::from_writer(out);

    writer.write_record(["Time", "Actual Value", "Fitted Value"])?;
    for s in samples {
        let fitted = curve
            .map(|c| c.evaluate(s.t).to_string())
            .unwrap_or_default();
        writer.write_record([s.t.to_string(), s.v.to_string(), fitted])?;
    }

    writer.flush()?;
    Ok(())
}

/// Per-point residuals followed by the accumulated distances.
pub fn write_residuals_csv<W: Write>(out: W, summary: &ResidualSummary) -> csv::Result<()> {
    let mut writer = csv::WriterBuilder::new().flexible(true).from_writer(out);

    writer.write_record(["t", "observed", "model", "residual"])?;
    for p in &summary.points {
        writer.write_record([
            p.t.to_string(),
            p.observed.to_string(),
            p.model.to_string(),
            p.residual.to_string(),
        ])?;
    }

    let mut writer = blank_line(writer)?;

    let trailer = [
        ("Distance Above", summary.distance_above),
        ("Distance Below", summary.distance_below),
        ("Net Distance", summary.net_distance),
        ("Sum of Squares", summary.sum_of_squares),
    ];
    for (label, value) in trailer {
        writer.write_record([label.to_string(), value.to_string()])?;
    }
    writer.flush()?;
    Ok(())
}

/// Ends the table with an empty line and resumes writing after it.
fn blank_line<W: Write>(writer: csv::Writer<W>) -> csv::Result<csv::Writer<W>> {
    let mut out = writer
        .into_inner()
        .map_err(|e| csv::Error::from(e.into_error()))?;
    out.write_all(b"\n")?;
    Ok(csv::WriterBuilder::new().flexible(true).from_writer(out))
}

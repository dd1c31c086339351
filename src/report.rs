use std::fmt::Write;

use crate::formatting::{Format, format_duration};
use crate::pairwise::{EstimationSummary, RateStatistic};
use crate::residuals::ResidualSummary;

/// Two-column summary of the pairwise rates: counts and moments on the left,
/// order statistics on the right.
pub fn render_estimation(
    summary: &EstimationSummary,
    statistic: RateStatistic,
    format: Format,
) -> String {
    let stats = &summary.stats;
    let estimate_label = match statistic {
        RateStatistic::Mean => "rate(μ)",
        RateStatistic::Median => "rate(M)",
    };

    let mut left_items = vec![
        ("pairs", stats.n.to_string()),
        ("excluded", summary.excluded_pairs.to_string()),
        ("mean", format.format(summary.mean_rate)),
        ("std dev", format.format(stats.std_dev)),
        (estimate_label, format.format(summary.rate(statistic))),
    ];

    if let Some(half_life) = summary.half_life(statistic) {
        left_items.push(("half-life", format_duration(half_life)));
    }

    let right_items = vec![
        ("min", format.format(stats.min)),
        ("25%ile", format.format(stats.quantile(0.25))),
        ("median", format.format(summary.median_rate)),
        ("75%ile", format.format(stats.quantile(0.75))),
        ("max", format.format(stats.max)),
    ];

    two_columns(&left_items, &right_items)
}

/// Per-point residual table followed by the accumulated distances.
pub fn render_residuals(summary: &ResidualSummary, format: Format) -> String {
    let mut out = String::new();

    let _ = writeln!(
        out,
        "{:>12}  {:>12}  {:>12}  {:>12}",
        "t", "ln(y)", "model", "residual"
    );
    for p in &summary.points {
        let _ = writeln!(
            out,
            "{:>12}  {:>12}  {:>12}  {:>12}",
            format.format(p.t),
            format.format(p.observed),
            format.format(p.model),
            format.format(p.residual)
        );
    }
    let _ = writeln!(out);

    let totals = [
        ("Distance Above", summary.distance_above),
        ("Distance Below", summary.distance_below),
        ("Total (A-B)", summary.net_distance),
        ("Area of squares", summary.sum_of_squares),
        ("RMS", summary.rms()),
    ];
    for (label, value) in totals {
        let _ = writeln!(out, "{:>16}  {}", label, format.format(value));
    }

    out
}

fn two_columns(left: &[(&str, String)], right: &[(&str, String)]) -> String {
    let mut out = String::new();
    let max_rows = left.len().max(right.len());

    for i in 0..max_rows {
        // Left column
        if let Some((label, value)) = left.get(i) {
            let _ = write!(out, "{:>9}  {:<20}", label, value);
        } else {
            let _ = write!(out, "{:31}", "");
        }

        // Right column
        if let Some((label, value)) = right.get(i) {
            let _ = writeln!(out, "{:>8}  {}", label, value);
        } else {
            let _ = writeln!(out);
        }
    }

    out
}

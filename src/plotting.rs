use textplots::{Chart, Plot, Shape};
use tracing::warn;

use crate::model::Model;
use crate::pairwise::EstimationSummary;
use crate::residuals::ResidualSummary;
use crate::sample::Sample;

const HISTOGRAM_BINS: usize = 40;

/// Caller-owned rendering state: chart size and a running series counter used
/// to label successive plots.
#[derive(Debug, Clone)]
pub struct PlotContext {
    pub width: u32,
    pub height: u32,
    series: usize,
}

impl Default for PlotContext {
    fn default() -> Self {
        PlotContext::new(160, 40)
    }
}

impl PlotContext {
    /// textplots needs at least 32x3 cells.
    pub fn new(width: u32, height: u32) -> Self {
        PlotContext {
            width: width.max(32),
            height: height.max(3),
            series: 0,
        }
    }

    pub fn next_label(&mut self, name: &str) -> String {
        self.series += 1;
        format!("Series {}: {}", self.series, name)
    }

    pub fn series_plotted(&self) -> usize {
        self.series
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlotStyle {
    #[default]
    Scatter,
    Connected,
}

/// Raw series, optionally with a model curve over the same time range.
pub fn plot_series(
    ctx: &mut PlotContext,
    name: &str,
    samples: &[Sample],
    style: PlotStyle,
    overlay: Option<&dyn Model>,
) {
    if samples.is_empty() {
        warn!(name, "nothing to plot");
        return;
    }

    println!("{}", ctx.next_label(name));
    let points = to_points(samples);
    let (min_x, max_x) = bounds(samples.iter().map(|s| s.t));
    let data = match style {
        PlotStyle::Scatter => Shape::Points(&points),
        PlotStyle::Connected => Shape::Lines(&points),
    };

    match overlay {
        Some(model) => {
            let curve = Shape::Continuous(Box::new(|x| model.evaluate(x as f64) as f32));
            Chart::new(ctx.width, ctx.height, min_x, max_x)
                .lineplot(&data)
                .lineplot(&curve)
                .nice();
        }
        None => {
            Chart::new(ctx.width, ctx.height, min_x, max_x)
                .lineplot(&data)
                .nice();
        }
    }
}

/// Log-space observations with the model line through the same times.
pub fn plot_residuals(ctx: &mut PlotContext, name: &str, summary: &ResidualSummary) {
    println!("{}", ctx.next_label(name));

    let observed: Vec<(f32, f32)> = summary
        .points
        .iter()
        .map(|p| (p.t as f32, p.observed as f32))
        .collect();
    let mut line: Vec<(f32, f32)> = summary
        .points
        .iter()
        .map(|p| (p.t as f32, p.model as f32))
        .collect();
    line.sort_by(|a, b| a.0.total_cmp(&b.0));

    let (min_x, max_x) = bounds(summary.points.iter().map(|p| p.t));
    Chart::new(ctx.width, ctx.height, min_x, max_x)
        .lineplot(&Shape::Points(&observed))
        .lineplot(&Shape::Lines(&line))
        .nice();
}

/// Histogram of the pairwise rates.
pub fn plot_rate_distribution(ctx: &mut PlotContext, name: &str, summary: &EstimationSummary) {
    println!("{}", ctx.next_label(name));

    let stats = &summary.stats;
    let bars = histogram(&stats.data, stats.min, stats.max, HISTOGRAM_BINS);
    let (min_x, max_x) = widen(stats.min as f32, stats.max as f32);
    Chart::new(ctx.width, ctx.height, min_x, max_x)
        .lineplot(&Shape::Bars(&bars))
        .nice();
}

pub fn to_points(samples: &[Sample]) -> Vec<(f32, f32)> {
    samples.iter().map(|s| (s.t as f32, s.v as f32)).collect()
}

/// Get bounds for plotting (data range + 10% padding)
pub fn bounds(xs: impl Iterator<Item = f64>) -> (f32, f32) {
    let (min, max) = xs
        .filter(|x| x.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), x| {
            (lo.min(x), hi.max(x))
        });
    if min > max {
        return (0.0, 1.0);
    }

    let padding = (max - min) * 0.1;

    // Clamp lower bound to 0 if all data is non-negative
    let lower = if min >= 0.0 {
        (min - padding).max(0.0)
    } else {
        min - padding
    };

    widen(lower as f32, (max + padding) as f32)
}

/// A zero-width range cannot be drawn.
fn widen(min: f32, max: f32) -> (f32, f32) {
    if max > min {
        (min, max)
    } else {
        (min - 1.0, max + 1.0)
    }
}

/// Counts per equal-width bin, as `(bin centre, count)`.
pub fn histogram(data: &[f64], min: f64, max: f64, bins: usize) -> Vec<(f32, f32)> {
    let bins = bins.max(1);
    let width = (max - min) / bins as f64;
    let mut counts = vec![0usize; bins];

    for &x in data.iter().filter(|x| x.is_finite()) {
        let idx = if width > 0.0 {
            (((x - min) / width) as usize).min(bins - 1)
        } else {
            0
        };
        counts[idx] += 1;
    }

    counts
        .iter()
        .enumerate()
        .map(|(i, &c)| ((min + width * (i as f64 + 0.5)) as f32, c as f32))
        .collect()
}

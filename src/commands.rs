//! Subcommand implementations: read input, run the analysis, then report,
//! export and plot. Analysis errors return before anything is written.

use std::fs::File;
use std::io::{self, BufWriter};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use tracing::{info, info_span, warn};

use decay_cli::export::{
    self, FITTED_SUFFIX, PAIRWISE_SUFFIX, RESIDUALS_SUFFIX, derived_path,
};
use decay_cli::model::{Exponential, Expression, Model};
use decay_cli::parsing::{self, Ingested};
use decay_cli::plotting::{self, PlotContext, PlotStyle};
use decay_cli::units::TimeUnit;
use decay_cli::{pairwise, report, residuals, sample};

use crate::cli::{PairwiseArgs, PlotArgs, ResidualsArgs};

pub fn run_pairwise(args: PairwiseArgs) -> Result<()> {
    let _cmd = info_span!("pairwise").entered();
    let ingested = load(args.input.as_deref(), args.time_unit)?;

    let summary = pairwise::estimate(&ingested.samples)?;
    info!(
        pairs = summary.pairs.len(),
        excluded = summary.excluded_pairs,
        "pairwise rates computed"
    );

    print!("{}", report::render_estimation(&summary, args.stat, args.fmt));

    match pairwise_target(&args) {
        ExportTarget::To(path) => {
            let writer = create(&path)?;
            export::write_pairwise_csv(writer, &summary)
                .with_context(|| format!("failed to write {}", path.display()))?;
            println!(
                "Created '{}' with {} pairwise results.",
                path.display(),
                summary.pairs.len()
            );
        }
        ExportTarget::Disabled => {}
        ExportTarget::NoPath => info!("reading from stdin without --output, skipping export"),
    }

    if !args.no_plot {
        println!();
        let mut ctx = PlotContext::default();
        let name = display_name(args.input.as_deref());
        plotting::plot_rate_distribution(&mut ctx, &name, &summary);
    }

    Ok(())
}

pub fn run_residuals(args: ResidualsArgs) -> Result<()> {
    let _cmd = info_span!("residuals").entered();
    let model = build_log_model(args.line.as_deref(), args.exp.as_deref())?;

    let ingested = load(args.input.as_deref(), args.time_unit)?;
    let log_series = sample::log_transform(&ingested.samples);

    let summary = residuals::analyze(&log_series.samples, model.as_ref())?;
    info!(
        points = summary.points.len(),
        sum_of_squares = summary.sum_of_squares,
        "residuals computed"
    );

    let undefined = summary.undefined_points();
    if undefined > 0 {
        warn!(
            undefined,
            "model is undefined at some times; distances and sum of squares are NaN"
        );
    }

    print!("{}", report::render_residuals(&summary, args.fmt));

    let out_path = match (args.output, args.export) {
        (Some(path), _) => Some(path),
        (None, true) => {
            let input = args
                .input
                .as_deref()
                .context("--export needs an input file; use --output when reading stdin")?;
            Some(derived_path(input, RESIDUALS_SUFFIX))
        }
        (None, false) => None,
    };
    if let Some(path) = out_path {
        let writer = create(&path)?;
        export::write_residuals_csv(writer, &summary)
            .with_context(|| format!("failed to write {}", path.display()))?;
        println!("Residuals saved to {}.", path.display());
    }

    if !args.no_plot {
        println!();
        let mut ctx = PlotContext::default();
        let name = display_name(args.input.as_deref());
        plotting::plot_residuals(&mut ctx, &name, &summary);
    }

    Ok(())
}

pub fn run_plot(args: PlotArgs) -> Result<()> {
    let _cmd = info_span!("plot").entered();
    let curve = args
        .exp
        .as_deref()
        .map(triple)
        .transpose()?
        .map(Exponential::from_triple);
    let style = if args.connect {
        PlotStyle::Connected
    } else {
        PlotStyle::Scatter
    };

    let mut ctx = PlotContext::new(args.width, args.height);
    for path in &args.files {
        let ingested = load(Some(path), args.time_unit)?;

        let overlay = curve.as_ref().map(|c| c as &dyn Model);
        plotting::plot_series(
            &mut ctx,
            &path.display().to_string(),
            &ingested.samples,
            style,
            overlay,
        );

        if args.save {
            let out = derived_path(path, FITTED_SUFFIX);
            let writer = create(&out)?;
            export::write_fitted_csv(writer, &ingested.samples, curve.as_ref())
                .with_context(|| format!("failed to write {}", out.display()))?;
            println!("Data saved to {}.", out.display());
        }
    }

    Ok(())
}

#[derive(Debug, PartialEq)]
enum ExportTarget {
    To(PathBuf),
    Disabled,
    /// Stdin input with no `--output`.
    NoPath,
}

fn pairwise_target(args: &PairwiseArgs) -> ExportTarget {
    if args.no_export {
        return ExportTarget::Disabled;
    }
    match (&args.output, &args.input) {
        (Some(path), _) => ExportTarget::To(path.clone()),
        (None, Some(input)) => ExportTarget::To(derived_path(input, PAIRWISE_SUFFIX)),
        (None, None) => ExportTarget::NoPath,
    }
}

/// The model for ln(y): a formula as given, or the log of an exponential.
fn build_log_model(line: Option<&str>, exp: Option<&[f64]>) -> Result<Box<dyn Model>> {
    if let Some(source) = line {
        return Ok(Box::new(Expression::parse(source)?));
    }

    let values = exp.context("either --line or --exp is required")?;
    let curve = Exponential::from_triple(triple(values)?);
    match curve.log_line() {
        Some(line) => Ok(Box::new(line)),
        None => {
            warn!(
                %curve,
                "curve is not a line in log space; comparing against ln(curve), \
                 which is undefined where the curve is not positive"
            );
            Ok(Box::new(move |t: f64| curve.evaluate(t).ln()))
        }
    }
}

fn triple(values: &[f64]) -> Result<[f64; 3]> {
    values
        .try_into()
        .map_err(|_| anyhow!("--exp takes exactly three values: A B C"))
}

fn load(input: Option<&Path>, unit: TimeUnit) -> Result<Ingested> {
    let ingested = match input {
        Some(path) => {
            info!(path = %path.display(), "reading samples");
            parsing::read_file(path, unit)
                .with_context(|| format!("failed to read {}", path.display()))?
        }
        None => {
            info!("reading samples from stdin");
            parsing::read_reader(io::stdin().lock(), unit).context("failed to read stdin")?
        }
    };

    if !ingested.skipped.is_empty() {
        warn!(skipped = ingested.skipped.len(), "skipped malformed rows");
    }
    info!(samples = ingested.samples.len(), "samples loaded");
    Ok(ingested)
}

fn create(path: &Path) -> Result<BufWriter<File>> {
    let file =
        File::create(path).with_context(|| format!("failed to create {}", path.display()))?;
    Ok(BufWriter::new(file))
}

fn display_name(input: Option<&Path>) -> String {
    input
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "stdin".to_string())
}

use std::path::PathBuf;

use clap::{ArgGroup, Parser, Subcommand};

use decay_cli::formatting::Format;
use decay_cli::pairwise::RateStatistic;
use decay_cli::units::TimeUnit;

/// Exponential decay-rate estimation from time series.
#[derive(Parser)]
#[command(
    name = "decay",
    version,
    about = "Estimates exponential decay rates from time series"
)]
pub struct Cli {
    /// Increase verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Decay rate from every pair of samples, with mean and median.
    Pairwise(PairwiseArgs),
    /// Residuals of ln(value) against a model line.
    Residuals(ResidualsArgs),
    /// Plot one or more series, optionally with an exponential curve.
    Plot(PlotArgs),
}

#[derive(clap::Args)]
pub struct PairwiseArgs {
    /// Input CSV file (stdin if not specified)
    pub input: Option<PathBuf>,

    /// Export path (defaults to <input>_pairwise_calc.csv)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Skip writing the pairwise CSV
    #[arg(long)]
    pub no_export: bool,

    /// Skip the rate histogram
    #[arg(long)]
    pub no_plot: bool,

    /// Statistic reported as the rate estimate
    #[arg(short, long, default_value = "median")]
    pub stat: RateStatistic,

    /// Output number format
    #[arg(short, long, default_value = "float")]
    pub fmt: Format,

    /// Unit of the time column
    #[arg(short = 'u', long, default_value = "s")]
    pub time_unit: TimeUnit,
}

#[derive(clap::Args)]
#[command(group(ArgGroup::new("model").required(true).args(["line", "exp"])))]
pub struct ResidualsArgs {
    /// Input CSV file (stdin if not specified)
    pub input: Option<PathBuf>,

    /// Model line in x, e.g. "0.0033335*x + 2.8"
    #[arg(short, long)]
    pub line: Option<String>,

    /// Exponential y = A * exp(B * x) + C, compared in log space
    #[arg(long, num_args = 3, value_names = ["A", "B", "C"], allow_negative_numbers = true)]
    pub exp: Option<Vec<f64>>,

    /// Export path for the residual table
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Write the residual table next to the input file
    #[arg(long)]
    pub export: bool,

    /// Skip the log-space plot
    #[arg(long)]
    pub no_plot: bool,

    /// Output number format
    #[arg(short, long, default_value = "float")]
    pub fmt: Format,

    /// Unit of the time column
    #[arg(short = 'u', long, default_value = "s")]
    pub time_unit: TimeUnit,
}

#[derive(clap::Args)]
pub struct PlotArgs {
    /// Input CSV files, one chart each
    #[arg(required = true)]
    pub files: Vec<PathBuf>,

    /// Connect the dots with lines
    #[arg(short, long)]
    pub connect: bool,

    /// Overlay y = A * exp(B * x) + C
    #[arg(long, num_args = 3, value_names = ["A", "B", "C"], allow_negative_numbers = true)]
    pub exp: Option<Vec<f64>>,

    /// Save <input>_fitted_output.csv with time, actual and fitted values
    #[arg(long)]
    pub save: bool,

    /// Unit of the time column
    #[arg(short = 'u', long, default_value = "s")]
    pub time_unit: TimeUnit,

    /// Chart width in terminal cells
    #[arg(long, default_value_t = 160)]
    pub width: u32,

    /// Chart height in terminal cells
    #[arg(long, default_value_t = 40)]
    pub height: u32,
}

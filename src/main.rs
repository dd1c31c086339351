mod cli;
mod commands;
mod logging;

use std::process;

use anyhow::Result;
use clap::Parser;

use crate::cli::{Cli, Command};

fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    if let Err(e) = run(cli.command) {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}

fn run(command: Command) -> Result<()> {
    match command {
        Command::Pairwise(args) => commands::run_pairwise(args),
        Command::Residuals(args) => commands::run_residuals(args),
        Command::Plot(args) => commands::run_plot(args),
    }
}

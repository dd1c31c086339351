//! End-to-end: CSV file in, analysis, CSV file out.

use std::fs;
use std::io::Write;

use approx::assert_abs_diff_eq;
use decay_cli::export::{self, PAIRWISE_SUFFIX, derived_path};
use decay_cli::model::{Exponential, Expression};
use decay_cli::parsing::read_file;
use decay_cli::units::TimeUnit;
use decay_cli::{AnalysisError, Model, RateStatistic, RowIssue, analyze, estimate, sample};
use tempfile::TempDir;

fn write_csv(dir: &TempDir, name: &str, contents: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    let mut file = fs::File::create(&path).unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    path
}

#[test]
fn pairwise_from_file_with_bad_rows() {
    let dir = TempDir::new().unwrap();
    let input = write_csv(
        &dir,
        "beer1.csv",
        "time,brand,height\n0,x,8.0\n1,x,oops\n1,x,4.0\n\n2,x,2.0\n3\n",
    );

    let ingested = read_file(&input, TimeUnit::Seconds).unwrap();
    assert_eq!(ingested.samples.len(), 3);
    assert_eq!(ingested.skipped.len(), 2);
    assert_eq!(ingested.skipped[0].line, 3);
    assert_eq!(ingested.skipped[1].issue, RowIssue::TooFewColumns { found: 1 });

    let summary = estimate(&ingested.samples).unwrap();
    assert_eq!(summary.pairs.len(), 3);
    assert_abs_diff_eq!(
        summary.rate(RateStatistic::Median),
        -std::f64::consts::LN_2,
        epsilon = 1e-12
    );

    let out = derived_path(&input, PAIRWISE_SUFFIX);
    assert_eq!(out, dir.path().join("beer1_pairwise_calc.csv"));
    export::write_pairwise_csv(fs::File::create(&out).unwrap(), &summary).unwrap();

    let written = fs::read_to_string(&out).unwrap();
    assert!(written.starts_with("t_i,H_i,t_j,H_j,Value\n"));
    assert!(written.contains("\n\nAverage,,,,"));
    assert!(written.trim_end().lines().last().unwrap().starts_with("Median,,,,"));
}

#[test]
fn pairwise_reports_no_valid_pairs() {
    let dir = TempDir::new().unwrap();
    let input = write_csv(&dir, "flat.csv", "t,h\n5,1.0\n5,2.0\n5,3.0\n");

    let ingested = read_file(&input, TimeUnit::Seconds).unwrap();
    let err = estimate(&ingested.samples).unwrap_err();
    assert_eq!(err, AnalysisError::NoValidPairs { samples: 3 });
}

#[test]
fn pairwise_reports_insufficient_data() {
    let dir = TempDir::new().unwrap();
    let input = write_csv(&dir, "one.csv", "t,h\n0,8.0\n");

    let ingested = read_file(&input, TimeUnit::Seconds).unwrap();
    let err = estimate(&ingested.samples).unwrap_err();
    assert_eq!(err, AnalysisError::InsufficientData { found: 1 });
}

#[test]
fn residuals_against_user_line() {
    let dir = TempDir::new().unwrap();
    let e2 = 2.0_f64.exp();
    let input = write_csv(&dir, "beer2.csv", &format!("t,h\n0,{e2}\n1,{e2}\n2,-1\n"));

    let ingested = read_file(&input, TimeUnit::Seconds).unwrap();
    let log_series = sample::log_transform(&ingested.samples);
    assert_eq!(log_series.rejected, 1);

    let line = Expression::parse("x + 2").unwrap();
    let summary = analyze(&log_series.samples, &line).unwrap();

    assert_eq!(summary.points.len(), 2);
    assert_abs_diff_eq!(summary.points[0].residual, 0.0, epsilon = 1e-12);
    assert_abs_diff_eq!(summary.points[1].residual, -1.0, epsilon = 1e-12);
    assert_abs_diff_eq!(summary.distance_below, 1.0, epsilon = 1e-12);
    assert_abs_diff_eq!(summary.net_distance, -1.0, epsilon = 1e-12);
    assert_abs_diff_eq!(summary.sum_of_squares, 1.0, epsilon = 1e-12);
}

#[test]
fn residuals_of_empty_log_series() {
    let log_series = sample::log_transform(&[decay_cli::Sample::new(0.0, -1.0)]);
    let err = analyze(&log_series.samples, &|x: f64| x).unwrap_err();
    assert_eq!(err, AnalysisError::EmptyInput);
}

#[test]
fn pairwise_rate_matches_exponential_in_minutes() {
    let dir = TempDir::new().unwrap();
    let curve = Exponential::new(12.0, -0.3, 0.0);
    let mut contents = String::from("minute,height\n");
    for m in 0..6 {
        contents.push_str(&format!("{m},{}\n", curve.evaluate(m as f64)));
    }
    let input = write_csv(&dir, "minutes.csv", &contents);

    let ingested = read_file(&input, TimeUnit::Minutes).unwrap();
    let summary = estimate(&ingested.samples).unwrap();

    // -0.3 per minute is -0.005 per second
    assert_abs_diff_eq!(summary.mean_rate, -0.005, epsilon = 1e-12);
    assert_abs_diff_eq!(summary.median_rate, -0.005, epsilon = 1e-12);
}

#[test]
fn fitted_export_next_to_input() {
    let dir = TempDir::new().unwrap();
    let input = write_csv(&dir, "beer3.csv", "t,h\n0,9\n1,5\n");
    let ingested = read_file(&input, TimeUnit::Seconds).unwrap();

    let out = derived_path(&input, export::FITTED_SUFFIX);
    let curve = Exponential::new(8.0, 0.0, 1.0);
    export::write_fitted_csv(fs::File::create(&out).unwrap(), &ingested.samples, Some(&curve))
        .unwrap();

    let written = fs::read_to_string(&out).unwrap();
    assert_eq!(written, "Time,Actual Value,Fitted Value\n0,9,9\n1,5,9\n");
}

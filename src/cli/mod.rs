//! Command-line parsing for the surface fitter/optimizer.
//!
//! The goal of this module is to keep **argument parsing** and **command dispatch**
//! separate from the fitting/optimization code.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(
    name = "surfopt",
    version,
    about = "Fit linear and kernel surfaces to (x1, x2, z) data and maximize them under a resource budget"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run the full pipeline on a CSV and print the report.
    Run(RunArgs),
    /// Write a synthetic observation CSV drawn from a known quadratic surface.
    Sample(SampleArgs),
}

/// Options for `surfopt run`.
#[derive(Debug, Parser, Clone)]
pub struct RunArgs {
    /// CSV with `x1`, `x2`, `z` columns.
    #[arg(long, value_name = "CSV")]
    pub data: PathBuf,

    /// Budget weight of x1.
    #[arg(long, default_value_t = 2.0, allow_hyphen_values = true)]
    pub x1_weight: f64,

    /// Budget weight of x2.
    #[arg(long, default_value_t = 5.0, allow_hyphen_values = true)]
    pub x2_weight: f64,

    /// Budget capacity.
    #[arg(long, default_value_t = 98.0, allow_hyphen_values = true)]
    pub capacity: f64,

    /// SVR regularization strength.
    #[arg(long, default_value_t = 1.0)]
    pub c: f64,

    /// SVR epsilon-insensitive tube width.
    #[arg(long, default_value_t = 0.1)]
    pub epsilon: f64,

    /// Objective evaluation budget for COBYLA.
    #[arg(long, default_value_t = 1000)]
    pub max_evals: usize,

    /// Initial COBYLA trust-region radius.
    #[arg(long, default_value_t = 1.0)]
    pub rhobeg: f64,

    /// Relative step tolerance for COBYLA.
    #[arg(long, default_value_t = 1e-4)]
    pub xtol_rel: f64,

    /// Allowed constraint violation of the reported nonlinear optimum.
    #[arg(long, default_value_t = 1e-6)]
    pub feasibility_tol: f64,

    /// Start the nonlinear search at this x1 instead of the LP optimum (requires --guess-x2).
    #[arg(long, requires = "guess_x2", allow_hyphen_values = true)]
    pub guess_x1: Option<f64>,

    /// Start the nonlinear search at this x2 instead of the LP optimum (requires --guess-x1).
    #[arg(long, requires = "guess_x1", allow_hyphen_values = true)]
    pub guess_x2: Option<f64>,

    /// Export the run report to JSON.
    #[arg(long, value_name = "JSON")]
    pub export: Option<PathBuf>,
}

/// Options for `surfopt sample`.
#[derive(Debug, Parser, Clone)]
pub struct SampleArgs {
    /// Output CSV path.
    #[arg(long, value_name = "CSV")]
    pub out: PathBuf,

    /// Number of observations.
    #[arg(short = 'n', long, default_value_t = 100)]
    pub count: usize,

    /// Random seed.
    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    /// Standard deviation of the Gaussian noise on z.
    #[arg(long, default_value_t = 250.0)]
    pub noise: f64,

    /// Upper bound of generated x1 values.
    #[arg(long, default_value_t = 60.0)]
    pub x1_max: f64,

    /// Upper bound of generated x2 values.
    #[arg(long, default_value_t = 25.0)]
    pub x2_max: f64,
}

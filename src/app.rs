//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - sets up logging
//! - parses CLI arguments
//! - loads observations and runs the pipeline
//! - prints the report and writes the optional export

use clap::Parser;
use env_logger::{Builder, Env};
use log::info;

use crate::cli::{Command, RunArgs, SampleArgs};
use crate::data::{SampleConfig, generate_sample, write_observations_csv};
use crate::domain::{KernelParams, PipelineConfig, ResourceConstraint, SearchParams};
use crate::error::AppError;

pub mod pipeline;

/// Environment variable holding the `env_logger` filter.
pub const SURFOPT_LOG: &str = "SURFOPT_LOG";

/// Entry point for the `surfopt` binary.
pub fn run() -> Result<(), AppError> {
    let env = Env::new().filter_or(SURFOPT_LOG, "warn");
    let mut builder = Builder::from_env(env);
    let builder = builder.target(env_logger::Target::Stderr);
    builder.try_init().ok();

    let cli = crate::cli::Cli::parse();

    match cli.command {
        Command::Run(args) => handle_run(args),
        Command::Sample(args) => handle_sample(args),
    }
}

fn handle_run(args: RunArgs) -> Result<(), AppError> {
    let config = pipeline_config_from_args(&args);
    config.validate()?;

    let ingest = crate::io::ingest::load_observations(&args.data)?;
    let run = pipeline::run_pipeline(&ingest.observations, &config)?;

    println!("{}", crate::report::format_input_summary(&ingest, &config));
    println!("{}", crate::report::format_run_report(&run));

    if let Some(path) = &args.export {
        crate::io::export::write_run_json(path, &run, &config)?;
        info!("wrote run report to {}", path.display());
    }

    // Stages 1-3 are already printed; a failed search still sets the exit code.
    match run.nonlinear_optimum {
        Ok(_) => Ok(()),
        Err(e) => Err(e.into()),
    }
}

fn handle_sample(args: SampleArgs) -> Result<(), AppError> {
    let config = SampleConfig {
        n: args.count,
        seed: args.seed,
        x1_max: args.x1_max,
        x2_max: args.x2_max,
        noise: args.noise,
        ..SampleConfig::default()
    };
    let observations = generate_sample(&config)?;
    write_observations_csv(&args.out, &observations)?;
    info!("wrote {} observations to {}", observations.len(), args.out.display());
    Ok(())
}

pub fn pipeline_config_from_args(args: &RunArgs) -> PipelineConfig {
    let initial_guess = match (args.guess_x1, args.guess_x2) {
        (Some(x1), Some(x2)) => Some([x1, x2]),
        _ => None,
    };

    PipelineConfig {
        constraint: ResourceConstraint {
            x1_weight: args.x1_weight,
            x2_weight: args.x2_weight,
            capacity: args.capacity,
        },
        kernel: KernelParams {
            c: args.c,
            epsilon: args.epsilon,
        },
        search: SearchParams {
            max_evals: args.max_evals,
            rhobeg: args.rhobeg,
            xtol_rel: args.xtol_rel,
            feasibility_tol: args.feasibility_tol,
            initial_guess,
        },
    }
}

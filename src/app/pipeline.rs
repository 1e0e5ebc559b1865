//! Shared pipeline logic used by the CLI and by tests.
//!
//! Keeping this in one place avoids duplicating the core workflow:
//! observations -> (linear fit || kernel fits) -> LP -> surrogate search
//!
//! The two fits do not depend on each other and run in parallel; both complete
//! before either optimizer starts.
//!
//! Stages 1-3 fail fast. The surrogate search is different: its failure is
//! recorded in the output so the earlier results can still be reported.

use log::{info, warn};

use crate::domain::{CandidatePoint, DatasetStats, LinearFit, Observation, PipelineConfig};
use crate::error::PipelineError;
use crate::fit::{fit_linear, fit_nonlinear};
use crate::models::NonlinearModel;
use crate::optimize::{SearchOutcome, maximize_linear, maximize_surrogate};

/// All computed outputs of a single pipeline run.
#[derive(Debug)]
pub struct RunOutput {
    pub stats: DatasetStats,
    pub linear: LinearFit,
    pub linear_optimum: CandidatePoint,
    pub nonlinear: NonlinearModel,
    /// Starting point handed to the surrogate search.
    pub initial_guess: [f64; 2],
    pub nonlinear_optimum: Result<SearchOutcome, PipelineError>,
}

impl RunOutput {
    /// Linear model prediction at the LP optimum, intercept included.
    pub fn linear_predicted_z(&self) -> f64 {
        self.linear
            .model
            .predict(self.linear_optimum.x1, self.linear_optimum.x2)
    }
}

/// Execute the full pipeline and return the computed outputs.
pub fn run_pipeline(observations: &[Observation], config: &PipelineConfig) -> Result<RunOutput, PipelineError> {
    let stats = DatasetStats::from_observations(observations)
        .ok_or_else(|| PipelineError::data("observation set is empty"))?;

    // 1) + 3) Fit both models.
    let (linear, nonlinear) = rayon::join(
        || fit_linear(observations),
        || fit_nonlinear(observations, &config.kernel),
    );
    let linear = linear?;
    let nonlinear = nonlinear?;

    // 2) Exact optimum of the linear model.
    let linear_optimum = maximize_linear(&linear.model, &config.constraint)?;

    // 4) Surrogate search, seeded from the LP unless overridden.
    let initial_guess = config
        .search
        .initial_guess
        .unwrap_or_else(|| linear_optimum.as_guess());
    let nonlinear_optimum = maximize_surrogate(&nonlinear, &config.constraint, &config.search, initial_guess);
    match &nonlinear_optimum {
        Ok(out) => info!("pipeline complete: surrogate z={:.4}", out.point.z),
        Err(e) => warn!("surrogate search failed: {e}"),
    }

    Ok(RunOutput {
        stats,
        linear,
        linear_optimum,
        nonlinear,
        initial_guess,
        nonlinear_optimum,
    })
}

//! Export a pipeline run to JSON.
//!
//! The export is a report meant for downstream scripts: it records what was fitted
//! and found, but it is never read back as a model.

use std::fs::File;
use std::path::Path;

use serde::Serialize;

use crate::app::pipeline::RunOutput;
use crate::domain::{CandidatePoint, DatasetStats, FitQuality, LinearModel, PipelineConfig};
use crate::error::AppError;
use crate::models::SurrogateSummary;

#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub tool: String,
    pub generated_at: String,
    pub config: PipelineConfig,
    pub dataset: DatasetStats,
    pub linear: LinearSection,
    pub nonlinear: NonlinearSection,
}

#[derive(Debug, Clone, Serialize)]
pub struct LinearSection {
    pub model: LinearModel,
    pub equation: String,
    pub quality: FitQuality,
    pub optimum: CandidatePoint,
    /// Linear prediction at the optimum, intercept included.
    pub predicted_z: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct NonlinearSection {
    pub surrogate: SurrogateSummary,
    pub initial_guess: [f64; 2],
    pub outcome: SearchReport,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum SearchReport {
    Converged {
        optimum: CandidatePoint,
        evaluations: usize,
        /// Primary kernel fit at the optimum, for comparison with the surrogate.
        kernel_z: Option<f64>,
    },
    Failed {
        message: String,
        evaluations: Option<usize>,
    },
}

impl RunReport {
    pub fn from_run(run: &RunOutput, config: &PipelineConfig) -> Self {
        let outcome = match &run.nonlinear_optimum {
            Ok(out) => SearchReport::Converged {
                optimum: out.point,
                evaluations: out.evaluations,
                kernel_z: run.nonlinear.kernel_prediction(out.point.x1, out.point.x2),
            },
            Err(e) => SearchReport::Failed {
                message: e.to_string(),
                evaluations: e.evaluations(),
            },
        };

        RunReport {
            tool: "surfopt".to_string(),
            generated_at: chrono::Local::now().to_rfc3339(),
            config: config.clone(),
            dataset: run.stats.clone(),
            linear: LinearSection {
                model: run.linear.model,
                equation: run.linear.model.equation(),
                quality: run.linear.quality.clone(),
                optimum: run.linear_optimum,
                predicted_z: run.linear_predicted_z(),
            },
            nonlinear: NonlinearSection {
                surrogate: run.nonlinear.summary(),
                initial_guess: run.initial_guess,
                outcome,
            },
        }
    }
}

/// Write a run report JSON file.
pub fn write_run_json(path: &Path, run: &RunOutput, config: &PipelineConfig) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::new(2, format!("Failed to create report JSON '{}': {e}", path.display())))?;

    serde_json::to_writer_pretty(file, &RunReport::from_run(run, config))
        .map_err(|e| AppError::new(2, format!("Failed to write report JSON: {e}")))?;

    Ok(())
}

//! Shared domain types.
//!
//! These types are intentionally kept lightweight and serializable so they can be:
//!
//! - used in-memory during fitting and optimization
//! - exported to JSON run reports
//! - constructed directly in tests for a single stage

use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// One observed record: two inputs and the measured output.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub x1: f64,
    pub x2: f64,
    pub z: f64,
}

impl Observation {
    pub fn new(x1: f64, x2: f64, z: f64) -> Self {
        Self { x1, x2, z }
    }

    pub fn is_finite(&self) -> bool {
        self.x1.is_finite() && self.x2.is_finite() && self.z.is_finite()
    }
}

/// Summary stats about the observations actually used for fitting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetStats {
    pub n_points: usize,
    pub x1_min: f64,
    pub x1_max: f64,
    pub x2_min: f64,
    pub x2_max: f64,
    pub z_min: f64,
    pub z_max: f64,
}

impl DatasetStats {
    /// Returns `None` for an empty slice.
    pub fn from_observations(observations: &[Observation]) -> Option<Self> {
        let first = observations.first()?;
        let mut stats = DatasetStats {
            n_points: observations.len(),
            x1_min: first.x1,
            x1_max: first.x1,
            x2_min: first.x2,
            x2_max: first.x2,
            z_min: first.z,
            z_max: first.z,
        };
        for o in &observations[1..] {
            stats.x1_min = stats.x1_min.min(o.x1);
            stats.x1_max = stats.x1_max.max(o.x1);
            stats.x2_min = stats.x2_min.min(o.x2);
            stats.x2_max = stats.x2_max.max(o.x2);
            stats.z_min = stats.z_min.min(o.z);
            stats.z_max = stats.z_max.max(o.z);
        }
        Some(stats)
    }
}

/// Ordinary least squares model `z = intercept + slope_x1 * x1 + slope_x2 * x2`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LinearModel {
    pub intercept: f64,
    pub slope_x1: f64,
    pub slope_x2: f64,
}

impl LinearModel {
    pub fn predict(&self, x1: f64, x2: f64) -> f64 {
        self.intercept + self.slope_x1 * x1 + self.slope_x2 * x2
    }

    /// Human-readable equation with 4 decimals.
    pub fn equation(&self) -> String {
        format!(
            "z = {:.4} + {:.4} * x1 + {:.4} * x2",
            self.intercept, self.slope_x1, self.slope_x2
        )
    }
}

/// Fit quality diagnostics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FitQuality {
    pub sse: f64,
    pub rmse: f64,
    pub r_squared: f64,
    pub n: usize,
}

/// Linear fit output: the model plus its diagnostics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearFit {
    pub model: LinearModel,
    pub quality: FitQuality,
}

/// A point in the input plane together with its objective value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CandidatePoint {
    pub x1: f64,
    pub x2: f64,
    pub z: f64,
}

impl CandidatePoint {
    pub fn as_guess(&self) -> [f64; 2] {
        [self.x1, self.x2]
    }
}

/// The shared resource constraint:
///
/// ```text
/// x1_weight * x1 + x2_weight * x2 <= capacity,  x1 >= 0,  x2 >= 0
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ResourceConstraint {
    pub x1_weight: f64,
    pub x2_weight: f64,
    pub capacity: f64,
}

impl Default for ResourceConstraint {
    fn default() -> Self {
        Self {
            x1_weight: 2.0,
            x2_weight: 5.0,
            capacity: 98.0,
        }
    }
}

impl ResourceConstraint {
    /// Remaining capacity at `(x1, x2)`; negative means the budget is exceeded.
    pub fn slack(&self, x1: f64, x2: f64) -> f64 {
        self.capacity - self.x1_weight * x1 - self.x2_weight * x2
    }

    /// Budget and nonnegativity, each allowed to be violated by at most `tol`.
    pub fn is_feasible(&self, x1: f64, x2: f64, tol: f64) -> bool {
        self.slack(x1, x2) >= -tol && x1 >= -tol && x2 >= -tol
    }

    /// Largest constraint violation at `(x1, x2)` (0 when feasible).
    pub fn violation(&self, x1: f64, x2: f64) -> f64 {
        (-self.slack(x1, x2)).max(-x1).max(-x2).max(0.0)
    }

    pub fn describe(&self) -> String {
        format!(
            "{:.4} * x1 + {:.4} * x2 <= {:.4}, x1 >= 0, x2 >= 0",
            self.x1_weight, self.x2_weight, self.capacity
        )
    }
}

/// Hyperparameters shared by both linear-kernel support vector regressions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct KernelParams {
    /// Regularization strength `C`.
    pub c: f64,
    /// Width of the epsilon-insensitive tube.
    pub epsilon: f64,
}

impl Default for KernelParams {
    fn default() -> Self {
        Self { c: 1.0, epsilon: 0.1 }
    }
}

/// COBYLA settings for the surrogate search.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SearchParams {
    /// Objective evaluation budget.
    pub max_evals: usize,
    /// Initial trust-region radius.
    pub rhobeg: f64,
    /// Relative step tolerance; the final radius is `xtol_rel * rhobeg`.
    pub xtol_rel: f64,
    /// Allowed constraint violation of a point reported as converged.
    pub feasibility_tol: f64,
    /// Overrides the LP solution as the starting point when set.
    pub initial_guess: Option<[f64; 2]>,
}

impl Default for SearchParams {
    fn default() -> Self {
        Self {
            max_evals: 1000,
            rhobeg: 1.0,
            xtol_rel: 1e-4,
            feasibility_tol: 1e-6,
            initial_guess: None,
        }
    }
}

/// A full run's configuration as understood by the pipeline.
///
/// This is derived from CLI flags (plus defaults).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PipelineConfig {
    pub constraint: ResourceConstraint,
    pub kernel: KernelParams,
    pub search: SearchParams,
}

impl PipelineConfig {
    /// Reject settings no stage can work with.
    pub fn validate(&self) -> Result<(), AppError> {
        let c = &self.constraint;
        if !(c.x1_weight.is_finite() && c.x2_weight.is_finite() && c.capacity.is_finite()) {
            return Err(AppError::new(2, "Constraint coefficients must be finite."));
        }
        if !(self.kernel.c.is_finite() && self.kernel.c > 0.0) {
            return Err(AppError::new(2, "Kernel regularization C must be > 0."));
        }
        if !(self.kernel.epsilon.is_finite() && self.kernel.epsilon >= 0.0) {
            return Err(AppError::new(2, "Kernel epsilon must be >= 0."));
        }
        if self.search.max_evals == 0 {
            return Err(AppError::new(2, "Search evaluation budget must be > 0."));
        }
        if !(self.search.rhobeg.is_finite() && self.search.rhobeg > 0.0) {
            return Err(AppError::new(2, "Search rhobeg must be > 0."));
        }
        if !(self.search.xtol_rel.is_finite() && self.search.xtol_rel > 0.0) {
            return Err(AppError::new(2, "Search xtol_rel must be > 0."));
        }
        if !(self.search.feasibility_tol.is_finite() && self.search.feasibility_tol >= 0.0) {
            return Err(AppError::new(2, "Feasibility tolerance must be >= 0."));
        }
        if let Some(guess) = self.search.initial_guess {
            if guess.iter().any(|v| !v.is_finite()) {
                return Err(AppError::new(2, "Initial guess must be finite."));
            }
        }
        Ok(())
    }
}

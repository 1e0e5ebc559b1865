//! Derivative-free constrained search over the surrogate surface (COBYLA).
//!
//! COBYLA minimizes, so the objective handed to it is the negated surrogate.
//! Constraints are expressed as `g(x) >= 0`:
//!
//! - `capacity - x1_weight * x1 - x2_weight * x2 >= 0`
//! - `x1 >= 0`
//! - `x2 >= 0`
//!
//! Nonnegativity is passed as two extra inequality constraints and the variable
//! bounds are left infinite. The solver rejects a starting point outside its
//! bounds instead of searching from it, and the search has to accept arbitrary
//! initial guesses.
//!
//! Exhausting the evaluation budget is reported as a failure even though COBYLA
//! itself classifies it as a normal stop: the iterate at that point is not a
//! converged optimum.

use std::cell::Cell;

use cobyla::{Func, RhoBeg, StopTols, SuccessStatus, minimize};
use log::{debug, info, warn};

use crate::domain::{CandidatePoint, ResourceConstraint, SearchParams};
use crate::error::PipelineError;
use crate::models::NonlinearModel;

/// A converged search result.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchOutcome {
    pub point: CandidatePoint,
    pub evaluations: usize,
}

/// Maximize `model` over the constraint set starting from `initial_guess`.
pub fn maximize_surrogate(
    model: &NonlinearModel,
    budget: &ResourceConstraint,
    params: &SearchParams,
    initial_guess: [f64; 2],
) -> Result<SearchOutcome, PipelineError> {
    let evaluations = Cell::new(0usize);
    let objective = |x: &[f64], _: &mut ()| {
        evaluations.set(evaluations.get() + 1);
        -model.predict(x[0], x[1])
    };

    let budget_slack = |x: &[f64], _: &mut ()| budget.slack(x[0], x[1]);
    let x1_nonneg = |x: &[f64], _: &mut ()| x[0];
    let x2_nonneg = |x: &[f64], _: &mut ()| x[1];
    let cons: Vec<&dyn Func<()>> = vec![&budget_slack, &x1_nonneg, &x2_nonneg];

    let unbounded = [(f64::NEG_INFINITY, f64::INFINITY); 2];
    let stop_tol = StopTols {
        ftol_rel: 0.0,
        ftol_abs: 0.0,
        xtol_rel: params.xtol_rel,
        xtol_abs: vec![0.0; 2],
    };
    debug!(
        "cobyla: start=({:.4}, {:.4}), max_evals={}, rhobeg={}, xtol_rel={}",
        initial_guess[0], initial_guess[1], params.max_evals, params.rhobeg, params.xtol_rel
    );

    let result = minimize(
        objective,
        &initial_guess,
        &unbounded,
        &cons,
        (),
        params.max_evals,
        RhoBeg::All(params.rhobeg),
        Some(stop_tol),
    );
    let used = evaluations.get();

    let (x, neg_z) = match result {
        Ok((SuccessStatus::MaxEvalReached, _, _)) => {
            return Err(PipelineError::optimization(
                format!(
                    "maximum number of function evaluations ({}) exceeded before convergence",
                    params.max_evals
                ),
                Some(used),
            ));
        }
        Ok((SuccessStatus::MaxTimeReached, _, _)) => {
            return Err(PipelineError::optimization(
                "time limit reached before convergence",
                Some(used),
            ));
        }
        Ok((status, x, neg_z)) => {
            debug!("cobyla stopped with {status:?} after {used} evaluations");
            (x, neg_z)
        }
        Err((status, _, _)) => {
            return Err(PipelineError::optimization(
                format!("solver failed: {status:?}"),
                Some(used),
            ));
        }
    };

    let (x1, x2) = (x[0], x[1]);
    let violation = budget.violation(x1, x2);
    if violation > params.feasibility_tol {
        warn!("cobyla converged to an infeasible point ({x1:.6}, {x2:.6}), violation={violation:.3e}");
        return Err(PipelineError::optimization(
            format!("converged point ({x1:.6}, {x2:.6}) violates the constraints by {violation:.3e}"),
            Some(used),
        ));
    }

    let point = CandidatePoint { x1, x2, z: -neg_z };
    info!(
        "surrogate optimum: x1={:.4}, x2={:.4}, z={:.4} ({used} evaluations)",
        point.x1, point.x2, point.z
    );
    Ok(SearchOutcome {
        point,
        evaluations: used,
    })
}

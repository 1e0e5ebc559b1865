//! Linear program over the fitted linear model.
//!
//! ```text
//! maximize    slope_x1 * x1 + slope_x2 * x2
//! subject to  x1_weight * x1 + x2_weight * x2 <= capacity
//!             x1 >= 0, x2 >= 0
//! ```
//!
//! The intercept is constant over the feasible set and is left out of the
//! objective. The solver minimizes, so the objective is negated going in and the
//! optimal value is negated coming out.

use good_lp::{ResolutionError, Solution, SolverModel, constraint, default_solver, variable, variables};
use log::{debug, info};

use crate::domain::{CandidatePoint, LinearModel, ResourceConstraint};
use crate::error::PipelineError;

/// Solve the LP and return the optimal vertex.
///
/// `z` of the returned point is the LP objective value (intercept excluded).
pub fn maximize_linear(model: &LinearModel, budget: &ResourceConstraint) -> Result<CandidatePoint, PipelineError> {
    let mut vars = variables!();
    let x1 = vars.add(variable().min(0.0));
    let x2 = vars.add(variable().min(0.0));

    let neg_c1 = -model.slope_x1;
    let neg_c2 = -model.slope_x2;
    debug!(
        "lp: minimize {neg_c1:.6}*x1 + {neg_c2:.6}*x2 s.t. {}",
        budget.describe()
    );

    let solution = vars
        .minimise(neg_c1 * x1 + neg_c2 * x2)
        .using(default_solver)
        .with(constraint!(budget.x1_weight * x1 + budget.x2_weight * x2 <= budget.capacity))
        .solve()
        .map_err(|e| match e {
            ResolutionError::Infeasible => PipelineError::optimization("linear program is infeasible", None),
            ResolutionError::Unbounded => PipelineError::optimization("linear program is unbounded", None),
            other => PipelineError::optimization(format!("linear program failed: {other}"), None),
        })?;

    let x1_opt = solution.value(x1);
    let x2_opt = solution.value(x2);
    let minimized = neg_c1 * x1_opt + neg_c2 * x2_opt;
    let point = CandidatePoint {
        x1: x1_opt,
        x2: x2_opt,
        z: -minimized,
    };
    info!("lp optimum: x1={:.4}, x2={:.4}, z={:.4}", point.x1, point.x2, point.z);
    Ok(point)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn objective(model: &LinearModel, x1: f64, x2: f64) -> f64 {
        model.slope_x1 * x1 + model.slope_x2 * x2
    }

    #[test]
    fn reference_model_hits_x1_vertex() {
        let model = LinearModel {
            intercept: -1621.0695,
            slope_x1: 963.4735,
            slope_x2: -657.5960,
        };
        let p = maximize_linear(&model, &ResourceConstraint::default()).unwrap();
        assert!((p.x1 - 49.0).abs() < 1e-6, "x1={}", p.x1);
        assert!(p.x2.abs() < 1e-6, "x2={}", p.x2);
        assert!((p.z - 47210.2017).abs() < 1e-2, "z={}", p.z);
    }

    #[test]
    fn positive_x2_slope_can_win() {
        // Per unit of budget: x1 gives 1/2, x2 gives 3/5.
        let model = LinearModel {
            intercept: 0.0,
            slope_x1: 1.0,
            slope_x2: 3.0,
        };
        let p = maximize_linear(&model, &ResourceConstraint::default()).unwrap();
        assert!(p.x1.abs() < 1e-6);
        assert!((p.x2 - 19.6).abs() < 1e-6);
        assert!((p.z - 58.8).abs() < 1e-6);
    }

    #[test]
    fn all_negative_slopes_stay_at_origin() {
        let model = LinearModel {
            intercept: 5.0,
            slope_x1: -1.0,
            slope_x2: -2.0,
        };
        let p = maximize_linear(&model, &ResourceConstraint::default()).unwrap();
        assert!(p.x1.abs() < 1e-9 && p.x2.abs() < 1e-9);
        assert!(p.z.abs() < 1e-9);
    }

    #[test]
    fn optimum_is_feasible_and_beats_sampled_points() {
        let budget = ResourceConstraint::default();
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..20 {
            let model = LinearModel {
                intercept: rng.gen_range(-100.0..100.0),
                slope_x1: rng.gen_range(-10.0..10.0),
                slope_x2: rng.gen_range(-10.0..10.0),
            };
            let p = maximize_linear(&model, &budget).unwrap();
            assert!(budget.is_feasible(p.x1, p.x2, 1e-9));

            for _ in 0..500 {
                let x1 = rng.gen_range(0.0..=budget.capacity / budget.x1_weight);
                let x2 = rng.gen_range(0.0..=budget.capacity / budget.x2_weight);
                if !budget.is_feasible(x1, x2, 0.0) {
                    continue;
                }
                assert!(objective(&model, x1, x2) <= p.z + 1e-7);
            }
        }
    }

    #[test]
    fn unbounded_region_is_an_optimization_error() {
        // A negative budget weight lets x1 grow without limit.
        let budget = ResourceConstraint {
            x1_weight: -1.0,
            x2_weight: 5.0,
            capacity: 98.0,
        };
        let model = LinearModel {
            intercept: 0.0,
            slope_x1: 1.0,
            slope_x2: 0.0,
        };
        assert!(matches!(
            maximize_linear(&model, &budget),
            Err(PipelineError::Optimization { .. })
        ));
    }

    #[test]
    fn infeasible_region_is_an_optimization_error() {
        let budget = ResourceConstraint {
            x1_weight: 2.0,
            x2_weight: 5.0,
            capacity: -1.0,
        };
        let model = LinearModel {
            intercept: 0.0,
            slope_x1: 1.0,
            slope_x2: 1.0,
        };
        assert!(matches!(
            maximize_linear(&model, &budget),
            Err(PipelineError::Optimization { .. })
        ));
    }
}

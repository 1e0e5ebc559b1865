//! Linear-kernel support vector regression over polynomial features.
//!
//! Two regressions are fitted with identical hyperparameters:
//!
//! 1. **Primary**: `[x1, x2, x1^2, x1*x2, x2^2]` → standardize → SVR. Kept as a
//!    `KernelSurface` and only re-evaluated.
//! 2. **Secondary**: `[1, x1, x2, x1^2, x1*x2, x2^2]` → standardize → SVR. Its
//!    decision function is linear in the standardized features, so it is probed
//!    for intercept and weights and then mapped back to raw feature space.
//!
//! The secondary fit yields the `NonlinearModel` used by the surrogate search.
//! It is an approximation of the primary fit, not a re-expression of it.

use linfa::prelude::*;
use linfa_svm::Svm;
use log::{debug, info};
use ndarray::{Array1, Array2};

use crate::domain::{KernelParams, Observation};
use crate::error::PipelineError;
use crate::fit::linear::ensure_fittable;
use crate::math::{PolynomialFeatures, Standardizer};
use crate::models::{KernelSurface, NonlinearModel};

/// Fit both kernel regressions and assemble the surrogate.
pub fn fit_nonlinear(observations: &[Observation], params: &KernelParams) -> Result<NonlinearModel, PipelineError> {
    ensure_fittable(observations)?;
    let targets = Array1::from_iter(observations.iter().map(|o| o.z));

    let primary = fit_surface(PolynomialFeatures::without_bias(), observations, &targets, params)?;
    let secondary = fit_surface(PolynomialFeatures::with_bias(), observations, &targets, params)?;

    let (intercept, coefficients) = extract_linear_coefficients(&secondary);
    debug!("secondary kernel fit: intercept={intercept:.6}, coefficients={coefficients:?}");

    let model =
        NonlinearModel::from_coefficients(PolynomialFeatures::without_bias(), intercept, coefficients)?.with_primary(primary);
    info!(
        "nonlinear fit: {} terms (C={}, epsilon={})",
        model.coefficients().len(),
        params.c,
        params.epsilon
    );
    Ok(model)
}

/// Expand, standardize, and fit one SVR.
pub(crate) fn fit_surface(
    features: PolynomialFeatures,
    observations: &[Observation],
    targets: &Array1<f64>,
    params: &KernelParams,
) -> Result<KernelSurface, PipelineError> {
    let raw = features.transform(observations);
    let scaler = Standardizer::fit(&raw)
        .ok_or_else(|| PipelineError::data("cannot standardize an empty observation set"))?;
    let records = scaler.transform(&raw);

    let dataset = Dataset::new(records, targets.clone());
    let svm = Svm::<f64, f64>::params()
        // linfa-svm 0.7.0 spelling of `c_svr(c, Some(loss_eps))`.
        .c_eps(params.c, params.epsilon)
        .linear_kernel()
        .fit(&dataset)
        .map_err(|e| PipelineError::data(format!("kernel regression ({} features): {e}", features.len())))?;

    Ok(KernelSurface::new(features, scaler, svm))
}

/// Recover `(intercept, coefficients)` in raw polynomial space from a bias-inclusive fit.
///
/// The decision function is `b + w · x'` over standardized features `x'`, so it is
/// probed at the origin and at each unit vector. The bias column is constant and
/// standardizes to zero; after unstandardizing, its weight and the intercept shift
/// it induces cancel for any input, so it is folded into the intercept and dropped.
fn extract_linear_coefficients(surface: &KernelSurface) -> (f64, Vec<f64>) {
    let width = surface.features().len();

    // Row 0 is the origin, row i+1 is e_i.
    let mut probes = Array2::zeros((width + 1, width));
    for i in 0..width {
        probes[[i + 1, i]] = 1.0;
    }
    let values = surface.predict_standardized(&probes);
    let b = values[0];
    let w = Array1::from_iter((0..width).map(|i| values[i + 1] - b));

    let (intercept, raw) = surface.scaler().unstandardize_linear(b, &w);
    if surface.features().include_bias() {
        (intercept + raw[0], raw.iter().skip(1).copied().collect())
    } else {
        (intercept, raw.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::N_POLY_TERMS;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn quadratic_bowl(n: usize, seed: u64) -> Vec<Observation> {
        let mut rng = StdRng::seed_from_u64(seed);
        (0..n)
            .map(|_| {
                let x1 = rng.gen_range(0.0..4.0);
                let x2 = rng.gen_range(0.0..3.0);
                let z = 1.0 + 0.5 * x1 - 0.25 * x2 + 0.1 * x1 * x1 - 0.05 * x1 * x2 + 0.2 * x2 * x2;
                Observation::new(x1, x2, z)
            })
            .collect()
    }

    #[test]
    fn surrogate_has_one_coefficient_per_term() {
        let obs = quadratic_bowl(40, 3);
        let model = fit_nonlinear(&obs, &KernelParams::default()).unwrap();
        assert_eq!(model.coefficients().len(), N_POLY_TERMS);
        assert!(!model.features().include_bias());
        assert!(model.intercept().is_finite());
        assert!(model.coefficients().iter().all(|c| c.is_finite()));
    }

    #[test]
    fn extracted_coefficients_reproduce_secondary_predictions() {
        let obs = quadratic_bowl(30, 11);
        let targets = Array1::from_iter(obs.iter().map(|o| o.z));
        let secondary = fit_surface(PolynomialFeatures::with_bias(), &obs, &targets, &KernelParams::default()).unwrap();
        let (intercept, coefficients) = extract_linear_coefficients(&secondary);
        let surrogate =
            NonlinearModel::from_coefficients(PolynomialFeatures::without_bias(), intercept, coefficients).unwrap();

        for o in &obs {
            let direct = secondary.predict(o.x1, o.x2);
            assert!(
                (surrogate.predict(o.x1, o.x2) - direct).abs() < 1e-6 * (1.0 + direct.abs()),
                "surrogate disagrees with the fit it was extracted from at ({}, {})",
                o.x1,
                o.x2
            );
        }
    }

    #[test]
    fn small_smooth_surface_is_tracked() {
        // Targets span ~[1, 5]; with epsilon=0.1 the fit should stay well inside
        // the spread of the data.
        let obs = quadratic_bowl(80, 5);
        let model = fit_nonlinear(&obs, &KernelParams::default()).unwrap();
        let max_err = obs
            .iter()
            .map(|o| (model.predict(o.x1, o.x2) - o.z).abs())
            .fold(0.0, f64::max);
        assert!(max_err < 1.0, "max abs error {max_err}");
        assert!(model.surrogate_gap(1.0, 1.0).unwrap().is_finite());
    }

    #[test]
    fn fails_like_the_linear_fitter() {
        let two = vec![Observation::new(0.0, 0.0, 1.0), Observation::new(1.0, 1.0, 2.0)];
        assert!(matches!(
            fit_nonlinear(&two, &KernelParams::default()),
            Err(PipelineError::Data(_))
        ));
    }

    #[test]
    fn three_rows_fit() {
        let obs = vec![
            Observation::new(0.0, 0.0, 1.0),
            Observation::new(1.0, 0.0, 3.0),
            Observation::new(0.0, 1.0, 0.0),
        ];
        assert!(fit_nonlinear(&obs, &KernelParams::default()).is_ok());
    }
}

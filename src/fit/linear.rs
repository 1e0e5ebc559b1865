//! Ordinary least squares fit of `z` on `[1, x1, x2]`.

use log::info;
use nalgebra::{DMatrix, DVector};

use crate::domain::{FitQuality, LinearFit, LinearModel, Observation};
use crate::error::PipelineError;
use crate::math::solve_least_squares;

/// Parameters of the linear model (intercept + two slopes).
pub const LINEAR_PARAMS: usize = 3;

/// Intercept-augmented design matrix, one row per observation.
pub fn design_matrix(observations: &[Observation]) -> DMatrix<f64> {
    DMatrix::from_fn(observations.len(), LINEAR_PARAMS, |i, j| match j {
        0 => 1.0,
        1 => observations[i].x1,
        _ => observations[i].x2,
    })
}

/// Reject observation sets a 3-parameter fit cannot use.
///
/// Both fitters share this gate so that they fail under the same conditions.
pub fn ensure_fittable(observations: &[Observation]) -> Result<(), PipelineError> {
    if observations.len() < LINEAR_PARAMS {
        return Err(PipelineError::data(format!(
            "need at least {LINEAR_PARAMS} observations, got {}",
            observations.len()
        )));
    }
    if let Some(i) = observations.iter().position(|o| !o.is_finite()) {
        return Err(PipelineError::data(format!(
            "observation {i} has a non-finite value"
        )));
    }
    let rank = crate::math::numerical_rank(&design_matrix(observations));
    if rank < LINEAR_PARAMS {
        return Err(PipelineError::data(format!(
            "design matrix has rank {rank} < {LINEAR_PARAMS}; inputs are collinear"
        )));
    }
    Ok(())
}

/// Fit the linear model and its quality diagnostics.
pub fn fit_linear(observations: &[Observation]) -> Result<LinearFit, PipelineError> {
    ensure_fittable(observations)?;

    let x = design_matrix(observations);
    let y = DVector::from_iterator(observations.len(), observations.iter().map(|o| o.z));
    let beta = solve_least_squares(&x, &y)
        .map_err(|e| PipelineError::data(format!("linear fit: {e}")))?;

    let model = LinearModel {
        intercept: beta[0],
        slope_x1: beta[1],
        slope_x2: beta[2],
    };
    let quality = fit_quality(&model, observations);
    info!(
        "linear fit: {} (n={}, rmse={:.4}, r2={:.4})",
        model.equation(),
        quality.n,
        quality.rmse,
        quality.r_squared
    );

    Ok(LinearFit { model, quality })
}

fn fit_quality(model: &LinearModel, observations: &[Observation]) -> FitQuality {
    let n = observations.len();
    let z_mean = observations.iter().map(|o| o.z).sum::<f64>() / n as f64;

    let mut sse = 0.0;
    let mut sst = 0.0;
    for o in observations {
        let r = o.z - model.predict(o.x1, o.x2);
        sse += r * r;
        sst += (o.z - z_mean) * (o.z - z_mean);
    }

    // A constant response is fitted exactly by the intercept.
    let r_squared = if sst > 0.0 { 1.0 - sse / sst } else { 1.0 };
    FitQuality {
        sse,
        rmse: (sse / n as f64).sqrt(),
        r_squared,
        n,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};
    use rand_distr::Normal;

    fn noisy_plane(n: usize, seed: u64) -> Vec<Observation> {
        let mut rng = StdRng::seed_from_u64(seed);
        let noise = Normal::new(0.0, 3.0).unwrap();
        (0..n)
            .map(|_| {
                let x1 = rng.gen_range(0.0..50.0);
                let x2 = rng.gen_range(0.0..20.0);
                let z = 12.0 + 4.0 * x1 - 7.5 * x2 + rng.sample(noise);
                Observation::new(x1, x2, z)
            })
            .collect()
    }

    #[test]
    fn recovers_exact_plane() {
        let obs: Vec<Observation> = [(0.0, 0.0), (1.0, 0.0), (0.0, 1.0), (2.0, 3.0), (5.0, 1.0)]
            .iter()
            .map(|&(x1, x2)| Observation::new(x1, x2, -3.0 + 2.0 * x1 + 0.5 * x2))
            .collect();
        let fit = fit_linear(&obs).unwrap();
        assert!((fit.model.intercept + 3.0).abs() < 1e-9);
        assert!((fit.model.slope_x1 - 2.0).abs() < 1e-9);
        assert!((fit.model.slope_x2 - 0.5).abs() < 1e-9);
        assert!(fit.quality.sse < 1e-16);
        assert!((fit.quality.r_squared - 1.0).abs() < 1e-12);
    }

    #[test]
    fn residuals_satisfy_normal_equations() {
        let obs = noisy_plane(200, 7);
        let fit = fit_linear(&obs).unwrap();

        // X^T r = 0: residuals sum to zero and are orthogonal to each input.
        let (mut s0, mut s1, mut s2) = (0.0, 0.0, 0.0);
        let mut z_abs = 0.0;
        for o in &obs {
            let r = o.z - fit.model.predict(o.x1, o.x2);
            s0 += r;
            s1 += r * o.x1;
            s2 += r * o.x2;
            z_abs += o.z.abs();
        }
        let tol = 1e-9 * z_abs;
        assert!(s0.abs() < tol, "residual sum {s0}");
        assert!(s1.abs() < tol * 50.0, "x1 · r = {s1}");
        assert!(s2.abs() < tol * 20.0, "x2 · r = {s2}");

        // Perturbing any coefficient cannot reduce the SSE.
        for (di, d1, d2) in [(0.1, 0.0, 0.0), (0.0, 0.01, 0.0), (0.0, 0.0, -0.01)] {
            let other = LinearModel {
                intercept: fit.model.intercept + di,
                slope_x1: fit.model.slope_x1 + d1,
                slope_x2: fit.model.slope_x2 + d2,
            };
            assert!(fit_quality(&other, &obs).sse > fit.quality.sse);
        }
    }

    #[test]
    fn three_independent_rows_are_enough() {
        let obs = vec![
            Observation::new(0.0, 0.0, 1.0),
            Observation::new(1.0, 0.0, 3.0),
            Observation::new(0.0, 1.0, 0.0),
        ];
        let fit = fit_linear(&obs).unwrap();
        assert!((fit.model.intercept - 1.0).abs() < 1e-9);
        assert!((fit.model.slope_x1 - 2.0).abs() < 1e-9);
        assert!((fit.model.slope_x2 + 1.0).abs() < 1e-9);
    }

    #[test]
    fn two_rows_are_a_data_error() {
        let obs = vec![Observation::new(0.0, 0.0, 1.0), Observation::new(1.0, 2.0, 3.0)];
        assert!(matches!(fit_linear(&obs), Err(PipelineError::Data(_))));
    }

    #[test]
    fn collinear_inputs_are_a_data_error() {
        // x2 = 2 * x1 on every row.
        let obs: Vec<Observation> = (0..10)
            .map(|i| Observation::new(i as f64, 2.0 * i as f64, i as f64 * 3.0))
            .collect();
        let err = fit_linear(&obs).unwrap_err();
        assert!(matches!(err, PipelineError::Data(ref m) if m.contains("rank")));
    }

    #[test]
    fn non_finite_values_are_a_data_error() {
        let mut obs = noisy_plane(10, 1);
        obs[4].z = f64::NAN;
        assert!(matches!(fit_linear(&obs), Err(PipelineError::Data(_))));
    }
}

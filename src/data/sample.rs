//! Synthetic observation sets drawn from a known quadratic surface.
//!
//! Inputs are uniform over `[0, x1_max] x [0, x2_max]`; the output is
//!
//! ```text
//! z = Σ surface[i] * [1, x1, x2, x1^2, x1*x2, x2^2][i] + N(0, noise^2)
//! ```
//!
//! The default surface rises steeply in `x1` and falls in `x2`, so the linear fit
//! pushes the LP to the `x2 = 0` edge of the budget.

use std::fs::File;
use std::path::Path;

use rand::prelude::*;
use rand::rngs::StdRng;
use rand_distr::Normal;
use serde::{Deserialize, Serialize};

use crate::domain::Observation;
use crate::error::AppError;
use crate::math::PolynomialFeatures;

/// Settings for `generate_sample`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SampleConfig {
    pub n: usize,
    pub seed: u64,
    pub x1_max: f64,
    pub x2_max: f64,
    /// Standard deviation of the additive Gaussian noise.
    pub noise: f64,
    /// Coefficients over `[1, x1, x2, x1^2, x1*x2, x2^2]`.
    pub surface: [f64; 6],
}

impl Default for SampleConfig {
    fn default() -> Self {
        Self {
            n: 100,
            seed: 42,
            x1_max: 60.0,
            x2_max: 25.0,
            noise: 250.0,
            surface: [-1500.0, 950.0, -650.0, 1.5, -4.0, 6.0],
        }
    }
}

/// Draw `config.n` observations; identical configs give identical samples.
pub fn generate_sample(config: &SampleConfig) -> Result<Vec<Observation>, AppError> {
    if config.n == 0 {
        return Err(AppError::new(2, "Sample count must be > 0."));
    }
    if !(config.x1_max.is_finite() && config.x2_max.is_finite() && config.x1_max > 0.0 && config.x2_max > 0.0) {
        return Err(AppError::new(2, "Invalid input range for sample generation."));
    }
    if !(config.noise.is_finite() && config.noise >= 0.0) {
        return Err(AppError::new(2, "Sample noise must be finite and >= 0."));
    }
    if config.surface.iter().any(|c| !c.is_finite()) {
        return Err(AppError::new(2, "Surface coefficients must be finite."));
    }

    let mut rng = StdRng::seed_from_u64(config.seed);
    let normal = Normal::new(0.0, config.noise)
        .map_err(|e| AppError::new(2, format!("Noise distribution error: {e}")))?;
    let features = PolynomialFeatures::with_bias();

    let mut points = Vec::with_capacity(config.n);
    for _ in 0..config.n {
        let x1 = rng.gen_range(0.0..=config.x1_max);
        let x2 = rng.gen_range(0.0..=config.x2_max);
        let clean: f64 = config
            .surface
            .iter()
            .zip(features.expand(x1, x2))
            .map(|(c, f)| c * f)
            .sum();
        points.push(Observation::new(x1, x2, clean + rng.sample(normal)));
    }

    Ok(points)
}

/// Write observations as a `x1,x2,z` CSV.
pub fn write_observations_csv(path: &Path, observations: &[Observation]) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::new(2, format!("Failed to create sample CSV '{}': {e}", path.display())))?;
    let mut writer = csv::Writer::from_writer(file);
    for o in observations {
        writer
            .serialize(o)
            .map_err(|e| AppError::new(2, format!("Failed to write sample CSV: {e}")))?;
    }
    writer
        .flush()
        .map_err(|e| AppError::new(2, format!("Failed to write sample CSV: {e}")))?;
    Ok(())
}

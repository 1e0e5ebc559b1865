//! Degree-2 polynomial feature map for two inputs.
//!
//! The term order is fixed:
//!
//! ```text
//! [1?, x1, x2, x1^2, x1*x2, x2^2]
//! ```
//!
//! where the leading `1` is only present when the bias term is enabled. Fitted
//! coefficient vectors are matched to features by position, so anything that
//! evaluates a fitted model must expand inputs with the same instance (same bias
//! setting) that was used during fitting.

use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::domain::Observation;

const TERM_NAMES: [&str; 5] = ["x1", "x2", "x1^2", "x1*x2", "x2^2"];

/// Number of non-bias degree-2 terms for two inputs.
pub const N_POLY_TERMS: usize = TERM_NAMES.len();

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolynomialFeatures {
    include_bias: bool,
}

impl PolynomialFeatures {
    /// `[x1, x2, x1^2, x1*x2, x2^2]`
    pub fn without_bias() -> Self {
        Self { include_bias: false }
    }

    /// `[1, x1, x2, x1^2, x1*x2, x2^2]`
    pub fn with_bias() -> Self {
        Self { include_bias: true }
    }

    pub fn include_bias(&self) -> bool {
        self.include_bias
    }

    pub fn len(&self) -> usize {
        N_POLY_TERMS + usize::from(self.include_bias)
    }

    pub fn names(&self) -> Vec<&'static str> {
        let mut out = Vec::with_capacity(self.len());
        if self.include_bias {
            out.push("1");
        }
        out.extend(TERM_NAMES);
        out
    }

    /// Terms of `(x1, x2)` in feature order.
    fn terms(&self, x1: f64, x2: f64) -> impl Iterator<Item = f64> {
        let bias = self.include_bias.then_some(1.0);
        bias.into_iter().chain([x1, x2, x1 * x1, x1 * x2, x2 * x2])
    }

    pub fn expand(&self, x1: f64, x2: f64) -> Vec<f64> {
        self.terms(x1, x2).collect()
    }

    /// Expand every observation into one row of a design matrix.
    pub fn transform(&self, observations: &[Observation]) -> Array2<f64> {
        let mut out = Array2::zeros((observations.len(), self.len()));
        for (i, o) in observations.iter().enumerate() {
            for (j, v) in self.terms(o.x1, o.x2).enumerate() {
                out[[i, j]] = v;
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn term_order_is_fixed() {
        let f = PolynomialFeatures::without_bias();
        assert_eq!(f.expand(2.0, 3.0), vec![2.0, 3.0, 4.0, 6.0, 9.0]);
        assert_eq!(f.names(), vec!["x1", "x2", "x1^2", "x1*x2", "x2^2"]);
    }

    #[test]
    fn bias_is_prepended() {
        let f = PolynomialFeatures::with_bias();
        assert_eq!(f.len(), 6);
        assert_eq!(f.expand(2.0, 3.0), vec![1.0, 2.0, 3.0, 4.0, 6.0, 9.0]);
        assert_eq!(f.expand(2.0, 3.0).len(), f.len());
        assert_eq!(f.names()[0], "1");
    }

    #[test]
    fn transform_builds_one_row_per_observation() {
        let obs = vec![Observation::new(1.0, 2.0, 0.0), Observation::new(-1.0, 0.5, 0.0)];
        let m = PolynomialFeatures::without_bias().transform(&obs);
        assert_eq!(m.dim(), (2, 5));
        assert_eq!(m.row(1).to_vec(), vec![-1.0, 0.5, 1.0, -0.5, 0.25]);
    }
}

//! Column standardization (zero mean, unit variance).
//!
//! Constant columns (such as an explicit bias term) have zero variance; their scale
//! is taken as 1 so they standardize to all zeros instead of NaN.

use ndarray::{Array1, Array2, ArrayView1, Axis};

/// Per-column affine map `x' = (x - mean) / scale`.
#[derive(Debug, Clone, PartialEq)]
pub struct Standardizer {
    mean: Array1<f64>,
    scale: Array1<f64>,
}

impl Standardizer {
    /// Learn column means and population standard deviations.
    ///
    /// Returns `None` when `records` has no rows.
    pub fn fit(records: &Array2<f64>) -> Option<Self> {
        let mean = records.mean_axis(Axis(0))?;
        let scale = records
            .std_axis(Axis(0), 0.0)
            .mapv(|s| if s > f64::EPSILON { s } else { 1.0 });
        Some(Self { mean, scale })
    }

    pub fn mean(&self) -> &Array1<f64> {
        &self.mean
    }

    pub fn scale(&self) -> &Array1<f64> {
        &self.scale
    }

    pub fn transform(&self, records: &Array2<f64>) -> Array2<f64> {
        (records - &self.mean) / &self.scale
    }

    pub fn transform_row(&self, row: ArrayView1<f64>) -> Array1<f64> {
        (&row - &self.mean) / &self.scale
    }

    /// Map a linear function of standardized features back to raw features.
    ///
    /// Given `f(x) = b + w · x'` with `x' = (x - mean) / scale`, returns `(b0, w0)`
    /// such that `f(x) = b0 + w0 · x`.
    pub fn unstandardize_linear(&self, intercept: f64, weights: &Array1<f64>) -> (f64, Array1<f64>) {
        let raw = weights / &self.scale;
        let shift = raw.dot(&self.mean);
        (intercept - shift, raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn standardized_columns_have_zero_mean_unit_variance() {
        let x = array![[1.0, 10.0], [2.0, 20.0], [3.0, 30.0], [4.0, 40.0]];
        let s = Standardizer::fit(&x).unwrap();
        let t = s.transform(&x);
        for col in t.axis_iter(Axis(1)) {
            assert!(col.mean().unwrap().abs() < 1e-12);
            assert!((col.std(0.0) - 1.0).abs() < 1e-12);
        }
    }

    #[test]
    fn constant_column_maps_to_zero() {
        let x = array![[1.0, 3.0], [1.0, 5.0]];
        let s = Standardizer::fit(&x).unwrap();
        assert_eq!(s.scale()[0], 1.0);
        let t = s.transform(&x);
        assert_eq!(t.column(0).to_vec(), vec![0.0, 0.0]);
    }

    #[test]
    fn unstandardize_reproduces_predictions() {
        let x = array![[1.0, 7.0], [2.0, -1.0], [5.0, 3.0]];
        let s = Standardizer::fit(&x).unwrap();
        let w = array![0.7, -1.3];
        let b = 2.5;
        let (b0, w0) = s.unstandardize_linear(b, &w);
        for row in x.axis_iter(Axis(0)) {
            let via_std = b + w.dot(&s.transform_row(row));
            let via_raw = b0 + w0.dot(&row);
            assert!((via_std - via_raw).abs() < 1e-10);
        }
    }

    #[test]
    fn empty_records_cannot_be_fitted() {
        let x = Array2::<f64>::zeros((0, 3));
        assert!(Standardizer::fit(&x).is_none());
    }
}

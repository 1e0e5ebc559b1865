//! Fitted nonlinear models and their evaluation.
//!
//! Two objects come out of the kernel fitting stage:
//!
//! - `KernelSurface`: the primary linear-kernel SVR over standardized polynomial
//!   features. It is only ever evaluated, never decomposed into coefficients.
//! - `NonlinearModel`: intercept + per-feature coefficients in raw polynomial
//!   feature space, recovered from a second, independent fit. This is what the
//!   surrogate search maximizes.
//!
//! The two are not guaranteed to agree; `NonlinearModel::surrogate_gap` reports
//! how far apart they are at a given point.

use linfa::prelude::*;
use linfa_svm::Svm;
use ndarray::{Array1, Array2};
use serde::Serialize;

use crate::error::PipelineError;
use crate::math::{PolynomialFeatures, Standardizer};

/// A fitted SVR together with the feature pipeline its inputs must go through.
pub struct KernelSurface {
    features: PolynomialFeatures,
    scaler: Standardizer,
    svm: Svm<f64, f64>,
}

impl KernelSurface {
    pub(crate) fn new(features: PolynomialFeatures, scaler: Standardizer, svm: Svm<f64, f64>) -> Self {
        Self {
            features,
            scaler,
            svm,
        }
    }

    pub fn features(&self) -> PolynomialFeatures {
        self.features
    }

    pub(crate) fn scaler(&self) -> &Standardizer {
        &self.scaler
    }

    /// Evaluate on rows that are already standardized.
    pub(crate) fn predict_standardized(&self, records: &Array2<f64>) -> Array1<f64> {
        self.svm.predict(records)
    }

    pub fn predict(&self, x1: f64, x2: f64) -> f64 {
        let raw = Array1::from(self.features.expand(x1, x2));
        let row = self.scaler.transform_row(raw.view()).insert_axis(ndarray::Axis(0));
        self.predict_standardized(&row)[0]
    }
}

impl std::fmt::Debug for KernelSurface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KernelSurface")
            .field("features", &self.features)
            .field("scaler", &self.scaler)
            .finish_non_exhaustive()
    }
}

/// Surrogate `z = intercept + Σ coefficients[i] * features(x1, x2)[i]`.
#[derive(Debug)]
pub struct NonlinearModel {
    features: PolynomialFeatures,
    intercept: f64,
    coefficients: Vec<f64>,
    primary: Option<KernelSurface>,
}

impl NonlinearModel {
    /// Build a surrogate from explicit coefficients, one per feature.
    pub fn from_coefficients(
        features: PolynomialFeatures,
        intercept: f64,
        coefficients: Vec<f64>,
    ) -> Result<Self, PipelineError> {
        if coefficients.len() != features.len() {
            return Err(PipelineError::data(format!(
                "expected {} surrogate coefficients, got {}",
                features.len(),
                coefficients.len()
            )));
        }
        Ok(Self {
            features,
            intercept,
            coefficients,
            primary: None,
        })
    }

    pub(crate) fn with_primary(mut self, primary: KernelSurface) -> Self {
        self.primary = Some(primary);
        self
    }

    pub fn features(&self) -> PolynomialFeatures {
        self.features
    }

    pub fn intercept(&self) -> f64 {
        self.intercept
    }

    pub fn coefficients(&self) -> &[f64] {
        &self.coefficients
    }

    pub fn predict(&self, x1: f64, x2: f64) -> f64 {
        let phi = self.features.expand(x1, x2);
        self.intercept
            + self
                .coefficients
                .iter()
                .zip(phi.iter())
                .map(|(c, f)| c * f)
                .sum::<f64>()
    }

    /// Prediction of the primary kernel fit, when this model came from one.
    pub fn kernel_prediction(&self, x1: f64, x2: f64) -> Option<f64> {
        self.primary.as_ref().map(|p| p.predict(x1, x2))
    }

    /// `surrogate - primary` at `(x1, x2)`.
    pub fn surrogate_gap(&self, x1: f64, x2: f64) -> Option<f64> {
        self.kernel_prediction(x1, x2)
            .map(|k| self.predict(x1, x2) - k)
    }

    pub fn summary(&self) -> SurrogateSummary {
        SurrogateSummary {
            intercept: self.intercept,
            terms: self
                .features
                .names()
                .into_iter()
                .zip(self.coefficients.iter())
                .map(|(name, c)| (name.to_string(), *c))
                .collect(),
        }
    }
}

/// Serializable view of a surrogate's coefficients.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SurrogateSummary {
    pub intercept: f64,
    pub terms: Vec<(String, f64)>,
}

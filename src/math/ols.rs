//! Ordinary least squares solver.
//!
//! We solve small regression problems of the form:
//!
//! ```text
//! minimize Σ (y_i - x_i^T β)^2
//! ```
//!
//! Implementation choices:
//! - SVD instead of normal equations, so tall design matrices are handled without
//!   squaring the condition number.
//!   (Nalgebra's `QR::solve` is intended for square systems and will panic for
//!   non-square matrices.)
//! - The numerical rank is checked before solving. A rank-deficient design has
//!   infinitely many minimizers, and silently returning the minimum-norm one would
//!   hide a data problem from the caller.

use nalgebra::{DMatrix, DVector};

/// Why a least squares problem could not be solved.
#[derive(Debug, Clone, PartialEq)]
pub enum LstsqError {
    /// Fewer rows than unknowns.
    TooFewRows { rows: usize, cols: usize },
    /// The design matrix has dependent columns.
    RankDeficient { rank: usize, cols: usize },
    /// The SVD solve failed or produced non-finite coefficients.
    Numerical(String),
}

impl std::fmt::Display for LstsqError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LstsqError::TooFewRows { rows, cols } => {
                write!(f, "{rows} observations for {cols} parameters")
            }
            LstsqError::RankDeficient { rank, cols } => {
                write!(f, "design matrix has rank {rank} < {cols} parameters")
            }
            LstsqError::Numerical(msg) => write!(f, "least squares solve failed: {msg}"),
        }
    }
}

/// Numerical rank of `x`, using the usual `max(m, n) * eps * σ_max` cutoff.
pub fn numerical_rank(x: &DMatrix<f64>) -> usize {
    let svd = x.clone().svd(false, false);
    svd.rank(rank_tolerance(x, &svd.singular_values))
}

fn rank_tolerance(x: &DMatrix<f64>, singular_values: &DVector<f64>) -> f64 {
    let sigma_max = singular_values.iter().copied().fold(0.0_f64, f64::max);
    x.nrows().max(x.ncols()) as f64 * f64::EPSILON * sigma_max
}

/// Solve a full-rank least squares problem using SVD.
pub fn solve_least_squares(x: &DMatrix<f64>, y: &DVector<f64>) -> Result<DVector<f64>, LstsqError> {
    let (rows, cols) = x.shape();
    if rows < cols {
        return Err(LstsqError::TooFewRows { rows, cols });
    }

    let svd = x.clone().svd(true, true);
    let tol = rank_tolerance(x, &svd.singular_values);
    let rank = svd.rank(tol);
    if rank < cols {
        return Err(LstsqError::RankDeficient { rank, cols });
    }

    let beta = svd
        .solve(y, tol)
        .map_err(|e| LstsqError::Numerical(e.to_string()))?;
    if beta.iter().all(|v| v.is_finite()) {
        Ok(beta)
    } else {
        Err(LstsqError::Numerical("non-finite coefficients".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn least_squares_solves_simple_system() {
        // Fit y = 2 + 3x on x = [0,1,2]
        let x = DMatrix::from_row_slice(3, 2, &[1.0, 0.0, 1.0, 1.0, 1.0, 2.0]);
        let y = DVector::from_row_slice(&[2.0, 5.0, 8.0]);

        let beta = solve_least_squares(&x, &y).unwrap();
        assert!((beta[0] - 2.0).abs() < 1e-10);
        assert!((beta[1] - 3.0).abs() < 1e-10);
    }

    #[test]
    fn rejects_wide_and_collinear_designs() {
        let wide = DMatrix::from_row_slice(2, 3, &[1.0, 0.0, 0.0, 1.0, 1.0, 1.0]);
        let y2 = DVector::from_row_slice(&[1.0, 2.0]);
        assert_eq!(
            solve_least_squares(&wide, &y2),
            Err(LstsqError::TooFewRows { rows: 2, cols: 3 })
        );

        // Third column is twice the second.
        let collinear = DMatrix::from_row_slice(
            4,
            3,
            &[1.0, 1.0, 2.0, 1.0, 2.0, 4.0, 1.0, 3.0, 6.0, 1.0, 4.0, 8.0],
        );
        let y4 = DVector::from_row_slice(&[1.0, 2.0, 3.0, 4.0]);
        assert_eq!(numerical_rank(&collinear), 2);
        assert!(matches!(
            solve_least_squares(&collinear, &y4),
            Err(LstsqError::RankDeficient { rank: 2, cols: 3 })
        ));
    }
}

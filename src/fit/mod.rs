//! Model fitting.
//!
//! Responsibilities:
//!
//! - ordinary least squares on `[1, x1, x2]`
//! - linear-kernel SVR on degree-2 polynomial features (primary + coefficient fit)
//! - the shared well-posedness gate both fitters apply before fitting

pub mod kernel;
pub mod linear;

pub use kernel::*;
pub use linear::*;

//! Optimization stages.
//!
//! - `lp`: exact optimum of the linear model over the constraint polytope
//! - `search`: COBYLA local search over the nonlinear surrogate, seeded from the LP

pub mod lp;
pub mod search;

pub use lp::*;
pub use search::*;

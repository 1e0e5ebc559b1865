//! Mathematical utilities: least squares, polynomial features, standardization.

pub mod features;
pub mod ols;
pub mod scaling;

pub use features::*;
pub use ols::*;
pub use scaling::*;

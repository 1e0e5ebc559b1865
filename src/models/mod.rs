//! Fitted model representations.
//!
//! Models are plain values; fitting lives in `crate::fit` and optimization in
//! `crate::optimize`.

pub mod surrogate;

pub use surrogate::*;

//! `surfopt` library crate.
//!
//! The binary (`surfopt`) is a thin wrapper around this library so that:
//!
//! - core logic is testable without spawning processes
//! - each pipeline stage can be called on its own
//!
//! Pipeline: observations -> linear fit -> LP optimum, and
//! observations -> kernel fits -> surrogate -> COBYLA search seeded from the LP.

pub mod app;
pub mod cli;
pub mod data;
pub mod domain;
pub mod error;
pub mod fit;
pub mod io;
pub mod math;
pub mod models;
pub mod optimize;
pub mod report;

//! Input/output helpers.
//!
//! - `ingest`: CSV → validated observations
//! - `export`: run → JSON report

pub mod export;
pub mod ingest;

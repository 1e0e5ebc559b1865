//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - observations and dataset stats (`Observation`, `DatasetStats`)
//! - fit outputs (`LinearModel`, `LinearFit`, `FitQuality`)
//! - optimization inputs/outputs (`ResourceConstraint`, `CandidatePoint`)
//! - run configuration (`PipelineConfig`, `KernelParams`, `SearchParams`)

pub mod types;

pub use types::*;

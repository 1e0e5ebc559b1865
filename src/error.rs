//! Error types.
//!
//! Two layers:
//! - `PipelineError` is what the fitting/optimization stages return. It carries the
//!   data-vs-optimization taxonomy so callers can decide which results survive.
//! - `AppError` is the process-level error: a message plus the exit code `main`
//!   should terminate with.

use thiserror::Error;

/// Failure of a single pipeline stage.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PipelineError {
    /// Input data is malformed or insufficient for a fit.
    #[error("data error: {0}")]
    Data(String),
    /// A solver did not reach a feasible / converged solution.
    #[error("optimization error: {message}")]
    Optimization {
        message: String,
        /// Objective evaluations consumed before the solver gave up, when known.
        evaluations: Option<usize>,
    },
}

impl PipelineError {
    pub fn data(message: impl Into<String>) -> Self {
        Self::Data(message.into())
    }

    pub fn optimization(message: impl Into<String>, evaluations: Option<usize>) -> Self {
        Self::Optimization {
            message: message.into(),
            evaluations,
        }
    }

    pub fn evaluations(&self) -> Option<usize> {
        match self {
            Self::Data(_) => None,
            Self::Optimization { evaluations, .. } => *evaluations,
        }
    }

    pub fn exit_code(&self) -> u8 {
        match self {
            Self::Data(_) => 3,
            Self::Optimization { .. } => 4,
        }
    }
}

#[derive(Clone)]
pub struct AppError {
    exit_code: u8,
    message: String,
}

impl AppError {
    pub fn new(exit_code: u8, message: impl Into<String>) -> Self {
        Self {
            exit_code,
            message: message.into(),
        }
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }
}

impl From<PipelineError> for AppError {
    fn from(err: PipelineError) -> Self {
        AppError::new(err.exit_code(), err.to_string())
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}

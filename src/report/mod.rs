//! Reporting utilities: formatted terminal output.

mod format;

pub use format::{format_input_summary, format_run_report};

//! Formatted terminal output for a pipeline run.
//!
//! We keep formatting code in one place so:
//! - the fitting/optimization code stays clean and testable
//! - output changes are localized (important for future snapshot tests)

use crate::app::pipeline::RunOutput;
use crate::domain::{CandidatePoint, PipelineConfig};
use crate::io::ingest::IngestedData;

/// Header and input summary: what was read, what was skipped, which budget applies.
pub fn format_input_summary(ingest: &IngestedData, config: &PipelineConfig) -> String {
    let mut out = String::new();
    let s = &ingest.stats;

    out.push_str("=== surfopt - Surface Fit + Constrained Optimum ===\n");
    out.push_str(&format!(
        "Rows: read={} used={} skipped={}\n",
        ingest.rows_read,
        ingest.rows_used,
        ingest.row_errors.len()
    ));
    out.push_str(&format!(
        "Points: n={} | x1=[{:.3}, {:.3}] | x2=[{:.3}, {:.3}] | z=[{:.3}, {:.3}]\n",
        s.n_points, s.x1_min, s.x1_max, s.x2_min, s.x2_max, s.z_min, s.z_max
    ));
    out.push_str(&format!("Constraint: {}\n", config.constraint.describe()));

    out
}

/// Stage results: linear fit, LP optimum, surrogate and its search outcome.
pub fn format_run_report(run: &RunOutput) -> String {
    let mut out = String::new();
    let q = &run.linear.quality;

    out.push_str("\nLinear model:\n");
    out.push_str(&format!("- {}\n", run.linear.model.equation()));
    out.push_str(&format!(
        "- SSE={:.4} RMSE={:.4} R^2={:.4} (n={})\n",
        q.sse, q.rmse, q.r_squared, q.n
    ));

    out.push_str("\nLinear optimum (LP):\n");
    out.push_str(&format!("- {}\n", fmt_point(&run.linear_optimum)));
    out.push_str(&format!(
        "- predicted z (with intercept) = {:.4}\n",
        run.linear_predicted_z()
    ));

    out.push_str("\nNonlinear surrogate:\n");
    let summary = run.nonlinear.summary();
    out.push_str(&format!("- {:<8} {:>14.6}\n", "1", summary.intercept));
    for (name, c) in &summary.terms {
        out.push_str(&format!("- {name:<8} {c:>14.6}\n"));
    }

    out.push_str(&format!(
        "\nNonlinear optimum (COBYLA from [{:.4}, {:.4}]):\n",
        run.initial_guess[0], run.initial_guess[1]
    ));
    match &run.nonlinear_optimum {
        Ok(outcome) => {
            let p = &outcome.point;
            out.push_str(&format!("- {}\n", fmt_point(p)));
            out.push_str(&format!("- evaluations = {}\n", outcome.evaluations));
            if let (Some(k), Some(gap)) = (
                run.nonlinear.kernel_prediction(p.x1, p.x2),
                run.nonlinear.surrogate_gap(p.x1, p.x2),
            ) {
                out.push_str(&format!("- kernel fit z = {k:.4} (surrogate gap {gap:+.4})\n"));
            }
        }
        Err(e) => {
            out.push_str(&format!("- FAILED: {e}\n"));
            if let Some(n) = e.evaluations() {
                out.push_str(&format!("- evaluations = {n}\n"));
            }
        }
    }

    out
}

fn fmt_point(p: &CandidatePoint) -> String {
    format!("x1 = {:.4}, x2 = {:.4}, z = {:.4}", p.x1, p.x2, p.z)
}

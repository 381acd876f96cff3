// crates/smokecheck-core/src/report.rs
// ============================================================================
// Module: Report Rendering
// Description: Text rendering of a RunReport.
// Purpose: Produce the per-check lines and summary consumed by the CLI.
// Dependencies: crate::check, crate::runner
// ============================================================================

//! ## Overview
//! Text rendering produces one line per check result plus a summary line.
//! The exit-code mapping lives in the CLI; JSON rendering is plain serde
//! serialization of [`crate::RunReport`].

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt::Write;

use crate::check::CheckOutcome;
use crate::runner::RunReport;

// ============================================================================
// SECTION: Rendering
// ============================================================================

/// Renders the report as human-readable text.
///
/// One line per result (`PASS`/`INFO`/`FAIL`/`SKIP`, name, message), then a
/// summary line with counts and the overall verdict. An aborted run renders
/// its abort reason instead of result lines.
#[must_use]
pub fn render_text(report: &RunReport) -> String {
    let mut out = String::new();
    if let Some(reason) = &report.aborted {
        let _ = writeln!(&mut out, "ABORT {reason}");
        let _ = writeln!(&mut out, "smoke test failed: run aborted before any check executed");
        return out;
    }
    let mut passed = 0_usize;
    let mut info = 0_usize;
    let mut failed = 0_usize;
    let mut skipped = 0_usize;
    for result in &report.results {
        match result.outcome {
            CheckOutcome::Passed => passed += 1,
            CheckOutcome::Info => info += 1,
            CheckOutcome::Failed => failed += 1,
            CheckOutcome::Skipped => skipped += 1,
        }
        let _ = writeln!(&mut out, "{} {}: {}", result.outcome.label(), result.name, result.message);
    }
    let verdict = if report.overall_passed { "passed" } else { "failed" };
    let _ = writeln!(
        &mut out,
        "smoke test {verdict}: {passed} passed, {info} info, {failed} failed, {skipped} skipped"
    );
    out
}

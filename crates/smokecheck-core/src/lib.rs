// crates/smokecheck-core/src/lib.rs
// ============================================================================
// Module: Smokecheck Core
// Description: Data model, readiness prober, runner, and report rendering.
// Purpose: Provide the harness engine independent of any concrete check.
// Dependencies: serde, serde_json, thiserror
// ============================================================================

//! ## Overview
//! `smokecheck-core` defines the check data model (outcomes, results,
//! definitions, the artifact context), the readiness prober with injectable
//! transport and sleep seams, the strictly sequential runner, and report
//! rendering. Concrete checks live in `smokecheck-checks`; this crate never
//! performs network or database I/O itself.
//!
//! Invariants:
//! - Checks execute in declared order, one at a time.
//! - A check error never propagates past the runner; it becomes a failed
//!   result with a non-empty message.
//! - A check whose required artifact is absent is skipped, never failed.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod check;
pub mod probe;
pub mod report;
pub mod runner;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use check::CheckContext;
pub use check::CheckDefinition;
pub use check::CheckError;
pub use check::CheckGroup;
pub use check::CheckOutcome;
pub use check::CheckOutput;
pub use check::CheckResult;
pub use check::SmokeCheck;
pub use probe::BackoffMode;
pub use probe::ProbeError;
pub use probe::ProbePolicy;
pub use probe::ProbeTransport;
pub use probe::ReadinessProbe;
pub use probe::Sleeper;
pub use probe::ThreadSleeper;
pub use report::render_text;
pub use runner::RunReport;
pub use runner::Runner;

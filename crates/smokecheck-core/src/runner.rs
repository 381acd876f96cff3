// crates/smokecheck-core/src/runner.rs
// ============================================================================
// Module: Check Runner
// Description: Sequential execution of check definitions with aggregation.
// Purpose: Convert definitions plus collaborator outcomes into a RunReport.
// Dependencies: crate::check, serde
// ============================================================================

//! ## Overview
//! The runner visits definitions in declared order, one at a time. A check
//! whose required artifact is absent is skipped; a fallback check whose
//! `only_if_missing` artifact is present is skipped; everything else is
//! executed, and any [`CheckError`] becomes a failed result at this boundary.
//! The run continues through failures; only total absence of the target
//! (handled by the caller via the readiness prober) aborts a run.
//!
//! Aggregation: every ungrouped, non-skipped result must succeed, and every
//! alternative-path group must have at least one variant whose checks all
//! executed and succeeded.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;

use serde::Serialize;

use crate::check::CheckContext;
use crate::check::CheckDefinition;
use crate::check::CheckOutcome;
use crate::check::CheckResult;

// ============================================================================
// SECTION: Report
// ============================================================================

/// Aggregate result of one harness run.
///
/// # Invariants
/// - `results` preserves definition order.
/// - An aborted run carries zero results and `overall_passed = false`.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    /// Per-check results in execution order.
    pub results: Vec<CheckResult>,
    /// True when every non-skipped check and every group succeeded.
    pub overall_passed: bool,
    /// Reason the run aborted before any check executed, when it did.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aborted: Option<String>,
}

impl RunReport {
    /// Creates a report for a run that aborted before any check executed.
    #[must_use]
    pub fn aborted(reason: impl Into<String>) -> Self {
        Self {
            results: Vec::new(),
            overall_passed: false,
            aborted: Some(reason.into()),
        }
    }
}

// ============================================================================
// SECTION: Runner
// ============================================================================

/// Sequential check executor.
#[derive(Debug, Default)]
pub struct Runner;

impl Runner {
    /// Creates a runner.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Executes the definitions in order and aggregates the report.
    ///
    /// Check errors are converted into failed results here; this method
    /// never fails and never panics on a misbehaving check.
    #[must_use]
    pub fn run(&self, definitions: &[CheckDefinition]) -> RunReport {
        let mut ctx = CheckContext::new();
        let mut results = Vec::with_capacity(definitions.len());
        for definition in definitions {
            results.push(Self::run_one(definition, &mut ctx));
        }
        let overall_passed = aggregate(definitions, &results);
        RunReport {
            results,
            overall_passed,
            aborted: None,
        }
    }

    /// Executes or skips a single definition against the shared context.
    fn run_one(definition: &CheckDefinition, ctx: &mut CheckContext) -> CheckResult {
        if let Some(key) = &definition.requires
            && !ctx.has_artifact(key)
        {
            return CheckResult {
                name: definition.name.clone(),
                outcome: CheckOutcome::Skipped,
                message: format!("requires artifact `{key}` which was not produced"),
                detail: None,
            };
        }
        if let Some(key) = &definition.only_if_missing
            && ctx.has_artifact(key)
        {
            return CheckResult {
                name: definition.name.clone(),
                outcome: CheckOutcome::Skipped,
                message: format!("not needed: artifact `{key}` was already produced"),
                detail: None,
            };
        }
        match definition.check.execute(ctx) {
            Ok(output) => {
                for (key, value) in output.artifacts {
                    ctx.publish(key, value);
                }
                CheckResult {
                    name: definition.name.clone(),
                    outcome: output.outcome,
                    message: output.message,
                    detail: output.detail,
                }
            }
            Err(err) => CheckResult {
                name: definition.name.clone(),
                outcome: CheckOutcome::Failed,
                message: err.to_string(),
                detail: None,
            },
        }
    }
}

// ============================================================================
// SECTION: Aggregation
// ============================================================================

/// Per-variant aggregation state.
#[derive(Debug, Default)]
struct VariantState {
    /// Number of checks in the variant.
    total: usize,
    /// Number of checks that executed and succeeded.
    succeeded: usize,
}

/// Computes the overall verdict from definitions and their results.
fn aggregate(definitions: &[CheckDefinition], results: &[CheckResult]) -> bool {
    let mut ungrouped_ok = true;
    let mut groups: BTreeMap<&str, BTreeMap<&str, VariantState>> = BTreeMap::new();
    for (definition, result) in definitions.iter().zip(results) {
        match &definition.group {
            None => {
                if result.outcome == CheckOutcome::Failed {
                    ungrouped_ok = false;
                }
            }
            Some(group) => {
                let state = groups
                    .entry(group.group.as_str())
                    .or_default()
                    .entry(group.variant.as_str())
                    .or_default();
                state.total += 1;
                if result.outcome.is_success() {
                    state.succeeded += 1;
                }
            }
        }
    }
    let groups_ok = groups.values().all(|variants| {
        variants.values().any(|state| state.total > 0 && state.succeeded == state.total)
    });
    ungrouped_ok && groups_ok
}

// crates/smokecheck-core/src/check.rs
// ============================================================================
// Module: Check Data Model
// Description: Outcomes, results, definitions, and the artifact context.
// Purpose: Capture immutable per-check results and inter-check dependencies.
// Dependencies: serde, serde_json, thiserror
// ============================================================================

//! ## Overview
//! A check is one independent pass/fail diagnostic action. Checks communicate
//! only through the artifact map: a successful check may publish named JSON
//! values (for example an auth token) and later checks declare the artifact
//! they require. The runner skips a check whose required artifact is absent
//! and records that as a distinct outcome from a hard failure.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

// ============================================================================
// SECTION: Outcomes
// ============================================================================

/// Outcome of a single check.
///
/// # Invariants
/// - `Skipped` is recorded by the runner only; checks never produce it.
/// - Variant names are stable for report serialization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckOutcome {
    /// The check executed and succeeded.
    Passed,
    /// The check executed and observed an expected, non-failing condition
    /// (for example a duplicate registration).
    Info,
    /// The check executed and failed, or raised an internal error.
    Failed,
    /// The check was not invoked because a dependency was not satisfied.
    Skipped,
}

impl CheckOutcome {
    /// Returns true when the outcome counts as success for aggregation.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Passed | Self::Info)
    }

    /// Returns the fixed-width report label for the outcome.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Passed => "PASS",
            Self::Info => "INFO",
            Self::Failed => "FAIL",
            Self::Skipped => "SKIP",
        }
    }
}

// ============================================================================
// SECTION: Results
// ============================================================================

/// Immutable record of one executed (or skipped) check.
///
/// # Invariants
/// - `message` is never empty.
/// - Results are append-only; the runner never rewrites an earlier result.
#[derive(Debug, Clone, Serialize)]
pub struct CheckResult {
    /// Check name as declared in its definition.
    pub name: String,
    /// Outcome of the check.
    pub outcome: CheckOutcome,
    /// Human-readable outcome message.
    pub message: String,
    /// Optional structured diagnostic payload.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<Value>,
}

/// Payload returned by a check that ran to completion.
///
/// Checks signal hard failures through [`CheckError`]; an output therefore
/// carries only the success-side outcomes.
#[derive(Debug, Clone)]
pub struct CheckOutput {
    /// Outcome of the check (`Passed` or `Info`).
    pub outcome: CheckOutcome,
    /// Human-readable outcome message.
    pub message: String,
    /// Optional structured diagnostic payload.
    pub detail: Option<Value>,
    /// Artifacts published for later checks, keyed by artifact name.
    pub artifacts: Vec<(String, Value)>,
}

impl CheckOutput {
    /// Creates a passing output with the given message.
    #[must_use]
    pub fn passed(message: impl Into<String>) -> Self {
        Self {
            outcome: CheckOutcome::Passed,
            message: message.into(),
            detail: None,
            artifacts: Vec::new(),
        }
    }

    /// Creates an informational (expected, non-failing) output.
    #[must_use]
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            outcome: CheckOutcome::Info,
            message: message.into(),
            detail: None,
            artifacts: Vec::new(),
        }
    }

    /// Attaches a structured diagnostic payload.
    #[must_use]
    pub fn with_detail(mut self, detail: Value) -> Self {
        self.detail = Some(detail);
        self
    }

    /// Publishes an artifact for later checks.
    #[must_use]
    pub fn with_artifact(mut self, key: impl Into<String>, value: Value) -> Self {
        self.artifacts.push((key.into(), value));
        self
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Errors raised inside a check action.
///
/// The runner converts every variant into a failed [`CheckResult`]; none of
/// these propagate past the check boundary.
#[derive(Debug, Error)]
pub enum CheckError {
    /// Network-level request failure (connect, timeout, transport).
    #[error("http request failed: {0}")]
    Http(String),
    /// The collaborator returned a status the check did not expect.
    #[error("unexpected status {status}: {message}")]
    UnexpectedStatus {
        /// HTTP status code observed.
        status: u16,
        /// Collaborator-supplied reason, when present.
        message: String,
    },
    /// The response body could not be read or decoded.
    #[error("response payload invalid: {0}")]
    Payload(String),
    /// Database open or query failure.
    #[error("database error: {0}")]
    Database(String),
    /// Cloud SDK client construction failure.
    #[error("sdk client error: {0}")]
    Sdk(String),
    /// A check-internal assertion did not hold.
    #[error("check assertion failed: {0}")]
    Assertion(String),
}

// ============================================================================
// SECTION: Context
// ============================================================================

/// Shared artifact map populated as checks execute.
///
/// # Invariants
/// - Only the runner inserts artifacts; checks have read-only access.
/// - Keys are unique; a later insert with an existing key replaces the value.
#[derive(Debug, Default)]
pub struct CheckContext {
    /// Artifacts published by completed checks.
    artifacts: BTreeMap<String, Value>,
}

impl CheckContext {
    /// Creates an empty context.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the artifact stored under `key`, if any.
    #[must_use]
    pub fn artifact(&self, key: &str) -> Option<&Value> {
        self.artifacts.get(key)
    }

    /// Returns the artifact stored under `key` as a string slice, if the
    /// artifact exists and is a JSON string.
    #[must_use]
    pub fn string_artifact(&self, key: &str) -> Option<&str> {
        self.artifacts.get(key).and_then(Value::as_str)
    }

    /// Returns true when an artifact exists under `key`.
    #[must_use]
    pub fn has_artifact(&self, key: &str) -> bool {
        self.artifacts.contains_key(key)
    }

    /// Stores an artifact under `key`, replacing any existing value.
    pub fn publish(&mut self, key: String, value: Value) {
        self.artifacts.insert(key, value);
    }
}

// ============================================================================
// SECTION: Check Interface
// ============================================================================

/// A single smoke-test action.
///
/// Implementations perform one side-effecting operation (HTTP call, SQL
/// query, client construction) against a collaborator and report the result.
/// Any internal error is returned as [`CheckError`] and converted by the
/// runner; implementations must not panic.
pub trait SmokeCheck {
    /// Executes the check against the shared context.
    ///
    /// # Errors
    ///
    /// Returns [`CheckError`] when the underlying operation fails; the runner
    /// records this as a failed result.
    fn execute(&self, ctx: &CheckContext) -> Result<CheckOutput, CheckError>;
}

// ============================================================================
// SECTION: Definitions
// ============================================================================

/// Alternative-path group membership for a check.
///
/// Checks sharing a `group` form competing variants; the run succeeds when
/// at least one variant of every group fully succeeds. This models the
/// primary/fallback credential paths without hard-coding either.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckGroup {
    /// Group label shared by all variants.
    pub group: String,
    /// Variant label within the group.
    pub variant: String,
}

/// Declaration of one check in the registry order.
///
/// # Invariants
/// - Definitions are created at startup and never mutated.
/// - `requires` and `only_if_missing` name artifact keys, not check names.
pub struct CheckDefinition {
    /// Unique check name used in reports.
    pub name: String,
    /// Artifact key that must exist before the check runs; absent key means
    /// the check is skipped.
    pub requires: Option<String>,
    /// Artifact key whose presence skips the check; used by fallback paths
    /// that only run when the primary path produced nothing.
    pub only_if_missing: Option<String>,
    /// Optional alternative-path group membership.
    pub group: Option<CheckGroup>,
    /// The check action.
    pub check: Box<dyn SmokeCheck>,
}

impl CheckDefinition {
    /// Creates an unconditional, ungrouped definition.
    #[must_use]
    pub fn new(name: impl Into<String>, check: Box<dyn SmokeCheck>) -> Self {
        Self {
            name: name.into(),
            requires: None,
            only_if_missing: None,
            group: None,
            check,
        }
    }

    /// Requires the named artifact to exist before the check runs.
    #[must_use]
    pub fn requires(mut self, key: impl Into<String>) -> Self {
        self.requires = Some(key.into());
        self
    }

    /// Skips the check when the named artifact already exists.
    #[must_use]
    pub fn only_if_missing(mut self, key: impl Into<String>) -> Self {
        self.only_if_missing = Some(key.into());
        self
    }

    /// Assigns the check to an alternative-path group variant.
    #[must_use]
    pub fn in_group(mut self, group: impl Into<String>, variant: impl Into<String>) -> Self {
        self.group = Some(CheckGroup {
            group: group.into(),
            variant: variant.into(),
        });
        self
    }
}

impl std::fmt::Debug for CheckDefinition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CheckDefinition")
            .field("name", &self.name)
            .field("requires", &self.requires)
            .field("only_if_missing", &self.only_if_missing)
            .field("group", &self.group)
            .finish_non_exhaustive()
    }
}

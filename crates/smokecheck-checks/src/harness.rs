// crates/smokecheck-checks/src/harness.rs
// ============================================================================
// Module: Harness Orchestration
// Description: Readiness gate plus registry plus runner for one run.
// Purpose: Produce a RunReport from a validated configuration.
// Dependencies: smokecheck-core, smokecheck-config
// ============================================================================

//! ## Overview
//! One run: probe the target until ready (HTTP suite only), assemble the
//! registry, execute the runner. Total absence of the target aborts the run
//! with zero executed checks; everything else is reported per check.

// ============================================================================
// SECTION: Imports
// ============================================================================

use smokecheck_config::SmokecheckConfig;
use smokecheck_core::ReadinessProbe;
use smokecheck_core::RunReport;
use smokecheck_core::Runner;
use smokecheck_core::ThreadSleeper;
use thiserror::Error;

use crate::http::HttpProbeTransport;
use crate::registry;
use crate::registry::RegistryError;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Harness setup errors; anything after setup lands in the report.
#[derive(Debug, Error)]
pub enum HarnessError {
    /// The registry could not assemble shared resources.
    #[error(transparent)]
    Registry(#[from] RegistryError),
    /// The readiness probe transport could not be constructed.
    #[error("probe setup failed: {0}")]
    ProbeSetup(String),
}

// ============================================================================
// SECTION: Execution
// ============================================================================

/// Executes one harness run against a validated configuration.
///
/// # Errors
///
/// Returns [`HarnessError`] only for setup failures; collaborator failures
/// are reported inside the returned [`RunReport`].
pub fn execute(config: &SmokecheckConfig) -> Result<RunReport, HarnessError> {
    let definitions = registry::build(config)?;
    if config.http.is_some() {
        let transport =
            HttpProbeTransport::new().map_err(|err| HarnessError::ProbeSetup(err.to_string()))?;
        let policy = config.target.probe.policy();
        let probe = ReadinessProbe::new(transport, ThreadSleeper, policy);
        if !probe.wait_ready(&config.target.base_url) {
            return Ok(RunReport::aborted(format!(
                "target {} never became ready after {} attempts",
                config.target.base_url, policy.max_attempts
            )));
        }
    }
    Ok(Runner::new().run(&definitions))
}

// crates/smokecheck-core/src/probe.rs
// ============================================================================
// Module: Readiness Prober
// Description: Bounded polling of a target until it answers with a 2xx.
// Purpose: Gate check execution on the dependent service being reachable.
// Dependencies: thiserror
// ============================================================================

//! ## Overview
//! The readiness prober polls a target through an injected [`ProbeTransport`]
//! and sleeps between attempts through an injected [`Sleeper`], so tests can
//! script outcomes and observe attempt counts without sockets or real
//! delays. Absence of readiness is a normal outcome: [`ReadinessProbe::wait_ready`]
//! returns `false` after the attempt budget, it never errors.
//!
//! Invariants:
//! - Exactly `max_attempts` transport calls when the target never succeeds.
//! - Exactly `k` transport calls when attempt `k` succeeds.
//! - No sleep after the final attempt.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::thread;
use std::time::Duration;

use thiserror::Error;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default number of probe attempts.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 10;
/// Default fixed interval between probe attempts.
pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(2);
/// Hard upper bound on a single backoff delay.
const MAX_BACKOFF_DELAY: Duration = Duration::from_secs(60);

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Transport-level probe failure.
///
/// Every variant is retryable inside the prober; none escape
/// [`ReadinessProbe::wait_ready`].
#[derive(Debug, Clone, Error)]
pub enum ProbeError {
    /// Connection, DNS, or timeout failure reaching the target.
    #[error("probe transport error: {0}")]
    Transport(String),
}

// ============================================================================
// SECTION: Seams
// ============================================================================

/// Transport used to issue one lightweight probe request.
pub trait ProbeTransport {
    /// Probes the target once and returns the observed HTTP status code.
    ///
    /// # Errors
    ///
    /// Returns [`ProbeError`] when the target could not be reached at all.
    fn probe(&self, target: &str) -> Result<u16, ProbeError>;
}

/// Sleep seam so tests can run the prober without real delays.
pub trait Sleeper {
    /// Blocks the calling thread for the given duration.
    fn sleep(&self, duration: Duration);
}

/// Production sleeper backed by [`thread::sleep`].
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadSleeper;

impl Sleeper for ThreadSleeper {
    fn sleep(&self, duration: Duration) {
        thread::sleep(duration);
    }
}

// ============================================================================
// SECTION: Policy
// ============================================================================

/// Delay progression between probe attempts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BackoffMode {
    /// The same interval between every attempt (observed legacy behavior).
    #[default]
    Fixed,
    /// Interval doubles after each attempt, capped at one minute.
    Exponential,
}

/// Probe attempt budget and pacing.
///
/// # Invariants
/// - `max_attempts` is at least 1.
/// - Computed delays never exceed the backoff cap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProbePolicy {
    /// Maximum number of probe attempts before giving up.
    pub max_attempts: u32,
    /// Base interval between attempts.
    pub interval: Duration,
    /// Delay progression mode.
    pub backoff: BackoffMode,
}

impl Default for ProbePolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            interval: DEFAULT_INTERVAL,
            backoff: BackoffMode::Fixed,
        }
    }
}

impl ProbePolicy {
    /// Returns the delay to sleep after the given 1-based attempt.
    #[must_use]
    pub fn delay_after(&self, attempt: u32) -> Duration {
        match self.backoff {
            BackoffMode::Fixed => self.interval,
            BackoffMode::Exponential => {
                let exponent = attempt.saturating_sub(1).min(31);
                let factor = 1_u32 << exponent;
                self.interval.saturating_mul(factor).min(MAX_BACKOFF_DELAY)
            }
        }
    }
}

// ============================================================================
// SECTION: Prober
// ============================================================================

/// Bounded readiness prober over an injected transport and sleeper.
#[derive(Debug)]
pub struct ReadinessProbe<T, S> {
    /// Transport used for probe requests.
    transport: T,
    /// Sleep seam used between attempts.
    sleeper: S,
    /// Attempt budget and pacing.
    policy: ProbePolicy,
}

impl<T: ProbeTransport, S: Sleeper> ReadinessProbe<T, S> {
    /// Creates a prober with the given transport, sleeper, and policy.
    pub const fn new(transport: T, sleeper: S, policy: ProbePolicy) -> Self {
        Self {
            transport,
            sleeper,
            policy,
        }
    }

    /// Polls the target until it answers with a 2xx or the attempt budget is
    /// exhausted. Network errors and non-2xx statuses are both retryable.
    /// Returns `false` on exhaustion; never errors.
    #[must_use]
    pub fn wait_ready(&self, target: &str) -> bool {
        for attempt in 1..=self.policy.max_attempts {
            match self.transport.probe(target) {
                Ok(status) if (200..300).contains(&status) => return true,
                Ok(_) | Err(ProbeError::Transport(_)) => {}
            }
            if attempt < self.policy.max_attempts {
                self.sleeper.sleep(self.policy.delay_after(attempt));
            }
        }
        false
    }
}

// crates/smokecheck-core/tests/common/mod.rs
// ============================================================================
// Module: Core Test Helpers
// Description: Scripted probe transport and recording sleeper.
// Purpose: Exercise the prober without sockets or real delays.
// Dependencies: smokecheck-core
// ============================================================================

//! ## Overview
//! Shared fakes for prober tests: a transport that replays a scripted list
//! of outcomes while counting calls, and a sleeper that records requested
//! delays instead of blocking.

#![allow(
    dead_code,
    clippy::panic,
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Shared test-only helpers; usage differs per test binary."
)]

use std::cell::Cell;
use std::cell::RefCell;
use std::time::Duration;

use smokecheck_core::ProbeError;
use smokecheck_core::ProbeTransport;
use smokecheck_core::Sleeper;

/// Transport replaying scripted outcomes and counting probe calls.
pub struct ScriptedTransport {
    /// Scripted outcomes, consumed in order; the last entry repeats.
    outcomes: Vec<Result<u16, ProbeError>>,
    /// Number of probe calls made so far.
    calls: Cell<usize>,
}

impl ScriptedTransport {
    /// Creates a transport from scripted outcomes.
    pub fn new(outcomes: Vec<Result<u16, ProbeError>>) -> Self {
        assert!(!outcomes.is_empty(), "script must not be empty");
        Self {
            outcomes,
            calls: Cell::new(0),
        }
    }

    /// Creates a transport that always fails with a connection error.
    pub fn always_failing() -> Self {
        Self::new(vec![Err(ProbeError::Transport("connection refused".to_string()))])
    }

    /// Returns the number of probe calls made so far.
    pub fn calls(&self) -> usize {
        self.calls.get()
    }
}

impl ProbeTransport for &ScriptedTransport {
    fn probe(&self, _target: &str) -> Result<u16, ProbeError> {
        let index = self.calls.get();
        self.calls.set(index + 1);
        let clamped = index.min(self.outcomes.len() - 1);
        self.outcomes[clamped].clone()
    }
}

/// Sleeper recording requested delays instead of blocking.
#[derive(Default)]
pub struct RecordingSleeper {
    /// Delays requested so far, in call order.
    delays: RefCell<Vec<Duration>>,
}

impl RecordingSleeper {
    /// Creates a recording sleeper.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the delays requested so far.
    pub fn delays(&self) -> Vec<Duration> {
        self.delays.borrow().clone()
    }
}

impl Sleeper for &RecordingSleeper {
    fn sleep(&self, duration: Duration) {
        self.delays.borrow_mut().push(duration);
    }
}

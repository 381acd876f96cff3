// crates/smokecheck-checks/src/db.rs
// ============================================================================
// Module: Database Checks
// Description: Checks over the SQLite probe layer.
// Purpose: Verify schema presence, user auth roundtrip, and table content.
// Dependencies: smokecheck-core, smokecheck-db, serde_json
// ============================================================================

//! ## Overview
//! Database checks share one lazily opened connection for the whole run.
//! Opening happens inside the first database check, so an unopenable
//! database surfaces as that check's failure instead of crashing the run;
//! the connection is released when the definitions are dropped at run end.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::path::PathBuf;
use std::sync::Arc;
use std::sync::Mutex;

use serde_json::json;
use smokecheck_core::CheckContext;
use smokecheck_core::CheckError;
use smokecheck_core::CheckOutput;
use smokecheck_core::SmokeCheck;
use smokecheck_db::AuthDenied;
use smokecheck_db::AuthOutcome;
use smokecheck_db::DbError;
use smokecheck_db::DbProbe;
use smokecheck_db::NewUser;

// ============================================================================
// SECTION: Shared Connection
// ============================================================================

/// Lazily opened database connection shared by the database checks.
///
/// # Invariants
/// - The probe is opened at most once per run.
/// - Open failures are reported per check, never as panics.
pub struct SharedDb {
    /// Path to the database file.
    path: PathBuf,
    /// Probe slot, filled on first use.
    slot: Mutex<Option<DbProbe>>,
}

impl SharedDb {
    /// Creates the shared handle; the connection opens on first use.
    #[must_use]
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            slot: Mutex::new(None),
        }
    }

    /// Runs `f` against the opened probe, opening it when needed.
    fn with<T>(&self, f: impl FnOnce(&DbProbe) -> Result<T, DbError>) -> Result<T, CheckError> {
        let mut guard = self
            .slot
            .lock()
            .map_err(|_| CheckError::Database("connection mutex poisoned".to_string()))?;
        if guard.is_none() {
            *guard = Some(DbProbe::open(&self.path).map_err(db_err)?);
        }
        let Some(probe) = guard.as_ref() else {
            return Err(CheckError::Database("connection unavailable".to_string()));
        };
        f(probe).map_err(db_err)
    }
}

/// Maps probe errors into check errors.
fn db_err(err: DbError) -> CheckError {
    CheckError::Database(err.to_string())
}

// ============================================================================
// SECTION: Checks
// ============================================================================

/// Verifies the expected tables exist.
pub struct DbTablesCheck {
    /// Shared database handle.
    pub db: Arc<SharedDb>,
}

impl SmokeCheck for DbTablesCheck {
    fn execute(&self, _ctx: &CheckContext) -> Result<CheckOutput, CheckError> {
        let tables = self.db.with(DbProbe::table_names)?;
        if tables.is_empty() {
            return Err(CheckError::Assertion("no tables found in database".to_string()));
        }
        Ok(CheckOutput::passed(format!("{} tables present", tables.len()))
            .with_detail(json!({ "tables": tables })))
    }
}

/// Creates a smoke-test user and asserts both auth outcomes.
///
/// The wrong-password attempt is expected to be denied; a grant there is a
/// check failure.
pub struct DbUserAuthCheck {
    /// Shared database handle.
    pub db: Arc<SharedDb>,
    /// Smoke-test user to create and authenticate.
    pub user: NewUser,
}

impl SmokeCheck for DbUserAuthCheck {
    fn execute(&self, _ctx: &CheckContext) -> Result<CheckOutput, CheckError> {
        let username = self.user.username.clone();
        let created = self.db.with(|probe| {
            // A prior run may have left the smoke-test user behind.
            probe.delete_user(&username)?;
            probe.create_user(&self.user)
        })?;
        let granted = self.db.with(|probe| probe.authenticate(&username, &self.user.password))?;
        let AuthOutcome::Granted(user) = granted else {
            return Err(CheckError::Assertion(format!(
                "authentication rejected freshly created user `{username}`"
            )));
        };
        let denied = self.db.with(|probe| probe.authenticate(&username, "wrongpassword"))?;
        match denied {
            AuthOutcome::Granted(_) => Err(CheckError::Assertion(format!(
                "authentication accepted a wrong password for `{username}`"
            ))),
            AuthOutcome::Denied(reason) => {
                if reason != AuthDenied::WrongPassword {
                    return Err(CheckError::Assertion(format!(
                        "unexpected denial reason: {}",
                        reason.reason()
                    )));
                }
                Ok(CheckOutput::passed(format!(
                    "user `{}` created (id {}), password auth verified",
                    user.username, created.id
                )))
            }
        }
    }
}

/// Dumps users and documents content as structured detail.
pub struct DbContentCheck {
    /// Shared database handle.
    pub db: Arc<SharedDb>,
}

impl SmokeCheck for DbContentCheck {
    fn execute(&self, _ctx: &CheckContext) -> Result<CheckOutput, CheckError> {
        let users = self.db.with(DbProbe::users)?;
        let documents = self.db.with(DbProbe::documents)?;
        let message = format!("{} users, {} documents", users.len(), documents.len());
        Ok(CheckOutput::passed(message)
            .with_detail(json!({ "users": users, "documents": documents })))
    }
}

// crates/smokecheck-db/src/lib.rs
// ============================================================================
// Module: Smokecheck DB
// Description: SQLite probe layer for the database check suite.
// Purpose: Expose table listing, row dumps, user creation, and password auth.
// Dependencies: rusqlite, sha2, subtle, rand, serde, thiserror
// ============================================================================

//! ## Overview
//! `smokecheck-db` wraps a single `SQLite` connection with the operations the
//! database checks need: schema bootstrap, table listing, `users` and
//! `documents` row dumps, smoke-test user creation, and password
//! authentication. Passwords are stored as salted SHA-256 digests and
//! verified in constant time; authentication denials are structured reasons,
//! not stringly errors.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod probe;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use probe::AuthDenied;
pub use probe::AuthOutcome;
pub use probe::DbError;
pub use probe::DbProbe;
pub use probe::DocumentRow;
pub use probe::NewUser;
pub use probe::UserRow;

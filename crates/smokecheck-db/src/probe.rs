// crates/smokecheck-db/src/probe.rs
// ============================================================================
// Module: SQLite Probe
// Description: Single-connection probe over the users/documents schema.
// Purpose: Back the database check suite with deterministic queries.
// Dependencies: rusqlite, sha2, subtle, rand, serde, thiserror
// ============================================================================

//! ## Overview
//! One connection is opened per run and released when the probe is dropped,
//! regardless of individual check outcomes. Authentication recomputes the
//! stored salted digest and compares it in constant time; the caller gets a
//! structured grant/denial outcome, never a panic and never a stringly
//! reason to sniff.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::path::Path;
use std::time::Duration;

use rand::RngCore;
use rusqlite::Connection;
use rusqlite::OptionalExtension;
use rusqlite::params;
use serde::Serialize;
use sha2::Digest;
use sha2::Sha256;
use subtle::ConstantTimeEq;
use thiserror::Error;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Busy timeout applied to the probe connection.
const BUSY_TIMEOUT: Duration = Duration::from_millis(5_000);
/// Password salt length in bytes.
const SALT_LENGTH: usize = 16;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Database probe errors.
///
/// # Invariants
/// - Error messages never embed password material.
#[derive(Debug, Error)]
pub enum DbError {
    /// The database file could not be opened.
    #[error("database open error: {0}")]
    Open(String),
    /// A query or statement failed.
    #[error("database query error: {0}")]
    Query(String),
    /// A user with the requested username already exists.
    #[error("duplicate user: {0}")]
    DuplicateUser(String),
}

/// Structured authentication denial reason.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthDenied {
    /// No user exists with the given username.
    UnknownUser,
    /// The user exists but the password digest did not match.
    WrongPassword,
}

impl AuthDenied {
    /// Returns the canonical denial reason label.
    #[must_use]
    pub const fn reason(self) -> &'static str {
        match self {
            Self::UnknownUser => "unknown user",
            Self::WrongPassword => "wrong password",
        }
    }
}

/// Outcome of a password authentication attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthOutcome {
    /// Credentials matched; the authenticated user row.
    Granted(UserRow),
    /// Credentials rejected with a structured reason.
    Denied(AuthDenied),
}

// ============================================================================
// SECTION: Rows
// ============================================================================

/// One row of the `users` table, without password material.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserRow {
    /// User identifier.
    pub id: i64,
    /// Unique username.
    pub username: String,
    /// Email address.
    pub email: String,
    /// Role label.
    pub role: String,
}

/// One row of the `documents` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DocumentRow {
    /// Document identifier.
    pub id: i64,
    /// Stored filename.
    pub filename: String,
    /// Identifier of the uploading user.
    pub uploader_id: i64,
}

/// Inputs for creating a smoke-test user.
#[derive(Debug, Clone)]
pub struct NewUser {
    /// Unique username.
    pub username: String,
    /// Email address.
    pub email: String,
    /// Plaintext password to salt and digest.
    pub password: String,
    /// Role label.
    pub role: String,
}

// ============================================================================
// SECTION: Probe
// ============================================================================

/// Single-connection `SQLite` probe.
///
/// # Invariants
/// - The connection is opened once and released on drop.
/// - All statements are bounded; no query interpolates caller input.
#[derive(Debug)]
pub struct DbProbe {
    /// The probe connection.
    conn: Connection,
}

impl DbProbe {
    /// Opens the database file, creating it when absent, and bootstraps the
    /// expected schema.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] when the file cannot be opened or the schema
    /// cannot be created.
    pub fn open(path: &Path) -> Result<Self, DbError> {
        let conn = Connection::open(path).map_err(|err| DbError::Open(err.to_string()))?;
        conn.busy_timeout(BUSY_TIMEOUT).map_err(|err| DbError::Open(err.to_string()))?;
        conn.pragma_update(None, "foreign_keys", "on")
            .map_err(|err| DbError::Open(err.to_string()))?;
        let probe = Self {
            conn,
        };
        probe.ensure_schema()?;
        Ok(probe)
    }

    /// Creates the `users` and `documents` tables when they do not exist.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] when DDL execution fails.
    pub fn ensure_schema(&self) -> Result<(), DbError> {
        self.conn
            .execute_batch(
                "CREATE TABLE IF NOT EXISTS users (
                    id INTEGER PRIMARY KEY AUTOINCREMENT,
                    username TEXT NOT NULL UNIQUE,
                    email TEXT NOT NULL,
                    role TEXT NOT NULL,
                    password_salt BLOB NOT NULL,
                    password_digest BLOB NOT NULL
                );
                CREATE TABLE IF NOT EXISTS documents (
                    id INTEGER PRIMARY KEY AUTOINCREMENT,
                    filename TEXT NOT NULL,
                    uploader_id INTEGER NOT NULL REFERENCES users(id)
                );",
            )
            .map_err(|err| DbError::Query(err.to_string()))
    }

    /// Lists table names in deterministic order.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] when the catalog query fails.
    pub fn table_names(&self) -> Result<Vec<String>, DbError> {
        let mut stmt = self
            .conn
            .prepare(
                "SELECT name FROM sqlite_master
                 WHERE type = 'table' AND name NOT LIKE 'sqlite_%'
                 ORDER BY name",
            )
            .map_err(|err| DbError::Query(err.to_string()))?;
        let rows = stmt
            .query_map([], |row| row.get::<_, String>(0))
            .map_err(|err| DbError::Query(err.to_string()))?;
        rows.collect::<Result<Vec<String>, _>>().map_err(|err| DbError::Query(err.to_string()))
    }

    /// Returns all users ordered by id, without password material.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] when the query fails.
    pub fn users(&self) -> Result<Vec<UserRow>, DbError> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, username, email, role FROM users ORDER BY id")
            .map_err(|err| DbError::Query(err.to_string()))?;
        let rows = stmt
            .query_map([], |row| {
                Ok(UserRow {
                    id: row.get(0)?,
                    username: row.get(1)?,
                    email: row.get(2)?,
                    role: row.get(3)?,
                })
            })
            .map_err(|err| DbError::Query(err.to_string()))?;
        rows.collect::<Result<Vec<UserRow>, _>>().map_err(|err| DbError::Query(err.to_string()))
    }

    /// Returns all documents ordered by id.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] when the query fails.
    pub fn documents(&self) -> Result<Vec<DocumentRow>, DbError> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, filename, uploader_id FROM documents ORDER BY id")
            .map_err(|err| DbError::Query(err.to_string()))?;
        let rows = stmt
            .query_map([], |row| {
                Ok(DocumentRow {
                    id: row.get(0)?,
                    filename: row.get(1)?,
                    uploader_id: row.get(2)?,
                })
            })
            .map_err(|err| DbError::Query(err.to_string()))?;
        rows.collect::<Result<Vec<DocumentRow>, _>>()
            .map_err(|err| DbError::Query(err.to_string()))
    }

    /// Finds a user by username.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] when the query fails.
    pub fn find_user(&self, username: &str) -> Result<Option<UserRow>, DbError> {
        self.conn
            .query_row(
                "SELECT id, username, email, role FROM users WHERE username = ?1",
                params![username],
                |row| {
                    Ok(UserRow {
                        id: row.get(0)?,
                        username: row.get(1)?,
                        email: row.get(2)?,
                        role: row.get(3)?,
                    })
                },
            )
            .optional()
            .map_err(|err| DbError::Query(err.to_string()))
    }

    /// Deletes a user by username, returning true when a row was removed.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] when the statement fails.
    pub fn delete_user(&self, username: &str) -> Result<bool, DbError> {
        let affected = self
            .conn
            .execute("DELETE FROM users WHERE username = ?1", params![username])
            .map_err(|err| DbError::Query(err.to_string()))?;
        Ok(affected > 0)
    }

    /// Inserts a document row, returning its identifier.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] when the statement fails.
    pub fn insert_document(&self, filename: &str, uploader_id: i64) -> Result<i64, DbError> {
        self.conn
            .execute(
                "INSERT INTO documents (filename, uploader_id) VALUES (?1, ?2)",
                params![filename, uploader_id],
            )
            .map_err(|err| DbError::Query(err.to_string()))?;
        Ok(self.conn.last_insert_rowid())
    }

    /// Creates a user with a freshly salted password digest.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::DuplicateUser`] when the username is taken, or
    /// [`DbError`] when the insert fails.
    pub fn create_user(&self, user: &NewUser) -> Result<UserRow, DbError> {
        if self.find_user(&user.username)?.is_some() {
            return Err(DbError::DuplicateUser(user.username.clone()));
        }
        let mut salt = [0_u8; SALT_LENGTH];
        rand::thread_rng().fill_bytes(&mut salt);
        let digest = password_digest(&salt, &user.password);
        self.conn
            .execute(
                "INSERT INTO users (username, email, role, password_salt, password_digest)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![user.username, user.email, user.role, salt.as_slice(), digest.as_slice()],
            )
            .map_err(|err| DbError::Query(err.to_string()))?;
        Ok(UserRow {
            id: self.conn.last_insert_rowid(),
            username: user.username.clone(),
            email: user.email.clone(),
            role: user.role.clone(),
        })
    }

    /// Authenticates a username/password pair.
    ///
    /// The stored digest is recomputed from the stored salt and compared in
    /// constant time. Denials are structured outcomes, not errors.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] when the lookup query fails.
    pub fn authenticate(&self, username: &str, password: &str) -> Result<AuthOutcome, DbError> {
        let record = self
            .conn
            .query_row(
                "SELECT id, username, email, role, password_salt, password_digest
                 FROM users WHERE username = ?1",
                params![username],
                |row| {
                    Ok((
                        UserRow {
                            id: row.get(0)?,
                            username: row.get(1)?,
                            email: row.get(2)?,
                            role: row.get(3)?,
                        },
                        row.get::<_, Vec<u8>>(4)?,
                        row.get::<_, Vec<u8>>(5)?,
                    ))
                },
            )
            .optional()
            .map_err(|err| DbError::Query(err.to_string()))?;
        let Some((user, salt, stored)) = record else {
            return Ok(AuthOutcome::Denied(AuthDenied::UnknownUser));
        };
        let computed = password_digest(&salt, password);
        if bool::from(computed.as_slice().ct_eq(stored.as_slice())) {
            Ok(AuthOutcome::Granted(user))
        } else {
            Ok(AuthOutcome::Denied(AuthDenied::WrongPassword))
        }
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Computes the salted SHA-256 password digest.
fn password_digest(salt: &[u8], password: &str) -> Vec<u8> {
    let mut hasher = Sha256::new();
    hasher.update(salt);
    hasher.update(password.as_bytes());
    hasher.finalize().to_vec()
}

// crates/smokecheck-checks/src/lib.rs
// ============================================================================
// Module: Smokecheck Checks
// Description: Concrete checks and the registry assembling a run.
// Purpose: Provide HTTP, database, and SDK checks over the core engine.
// Dependencies: smokecheck-core, smokecheck-config, smokecheck-db, reqwest
// ============================================================================

//! ## Overview
//! This crate ships the concrete smoke-test checks: HTTP checks against the
//! authentication API (root, register, login, profile, optional fallback
//! pair), database checks over the `SQLite` probe, and the cloud SDK
//! client-construction check. The registry assembles the ordered definition
//! list from configuration, and the harness wires readiness probing, the
//! runner, and shared resources together.
//!
//! Invariants:
//! - One HTTP client and at most one database connection per run.
//! - Check-internal errors surface as failed results, never as panics.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod db;
pub mod harness;
pub mod http;
pub mod registry;
pub mod sdk;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use db::DbContentCheck;
pub use db::DbTablesCheck;
pub use db::DbUserAuthCheck;
pub use db::SharedDb;
pub use harness::HarnessError;
pub use harness::execute;
pub use http::ARTIFACT_AUTH_TOKEN;
pub use http::ARTIFACT_FALLBACK_AUTH_TOKEN;
pub use http::HttpApi;
pub use http::HttpProbeTransport;
pub use http::LoginCheck;
pub use http::ProfileCheck;
pub use http::RegisterCheck;
pub use http::RegisterRequest;
pub use http::RootCheck;
pub use registry::RegistryError;
pub use sdk::SdkClient;
pub use sdk::SdkClientConfig;
pub use sdk::SdkError;
pub use sdk::SdkInitCheck;

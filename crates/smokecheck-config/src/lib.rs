// crates/smokecheck-config/src/lib.rs
// ============================================================================
// Module: Smokecheck Config Library
// Description: Canonical config model and validation.
// Purpose: Single source of truth for smokecheck.toml semantics.
// Dependencies: smokecheck-core, serde, toml, url
// ============================================================================

//! ## Overview
//! `smokecheck-config` defines the canonical configuration model for the
//! harness. It provides strict, fail-closed validation: unknown keys are
//! rejected, sizes and value ranges are bounded, and a config that validates
//! is safe to hand directly to the registry. Target, credentials, and suite
//! selection all live here; nothing is hard-coded in the checks.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod config;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use config::ConfigError;
pub use config::DatabaseSuiteConfig;
pub use config::FallbackCredentials;
pub use config::HttpSuiteConfig;
pub use config::ProbeBackoff;
pub use config::ProbeConfig;
pub use config::SdkSuiteConfig;
pub use config::SmokecheckConfig;
pub use config::TargetConfig;

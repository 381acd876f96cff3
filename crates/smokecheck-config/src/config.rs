// crates/smokecheck-config/src/config.rs
// ============================================================================
// Module: Smokecheck Configuration
// Description: Configuration loading and validation for the harness.
// Purpose: Provide strict, fail-closed config parsing with hard limits.
// Dependencies: smokecheck-core, serde, toml, url
// ============================================================================

//! ## Overview
//! Configuration is loaded from a TOML file with strict size limits and
//! deny-unknown-fields deserialization. Each optional suite section enables
//! the corresponding checks; at least one suite must be present. Missing or
//! invalid configuration fails closed.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::env;
use std::fs;
use std::path::Path;
use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;
use smokecheck_core::BackoffMode;
use smokecheck_core::ProbePolicy;
use thiserror::Error;
use url::Url;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default configuration filename when no path is specified.
const DEFAULT_CONFIG_NAME: &str = "smokecheck.toml";
/// Environment variable used to override the config path.
pub(crate) const CONFIG_ENV_VAR: &str = "SMOKECHECK_CONFIG";
/// Maximum configuration file size in bytes.
pub(crate) const MAX_CONFIG_FILE_SIZE: usize = 1024 * 1024;
/// Maximum length of the target base URL.
pub(crate) const MAX_URL_LENGTH: usize = 2048;
/// Maximum length of a credential or identity field.
pub(crate) const MAX_FIELD_LENGTH: usize = 256;
/// Minimum allowed probe attempts.
pub(crate) const MIN_PROBE_ATTEMPTS: u32 = 1;
/// Maximum allowed probe attempts.
pub(crate) const MAX_PROBE_ATTEMPTS: u32 = 100;
/// Minimum probe interval in milliseconds.
pub(crate) const MIN_PROBE_INTERVAL_MS: u64 = 100;
/// Maximum probe interval in milliseconds.
pub(crate) const MAX_PROBE_INTERVAL_MS: u64 = 60_000;
/// Default probe attempts (observed legacy behavior).
const DEFAULT_PROBE_ATTEMPTS: u32 = 10;
/// Default probe interval in milliseconds (observed legacy behavior).
const DEFAULT_PROBE_INTERVAL_MS: u64 = 2_000;
/// Default registration role.
const DEFAULT_ROLE: &str = "user";

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Configuration loading and validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Config file could not be read.
    #[error("config io error: {0}")]
    Io(String),
    /// Config file could not be parsed as TOML.
    #[error("config parse error: {0}")]
    Parse(String),
    /// Config content failed validation.
    #[error("invalid config: {0}")]
    Invalid(String),
}

// ============================================================================
// SECTION: Configuration Types
// ============================================================================

/// Top-level harness configuration.
///
/// # Invariants
/// - At least one suite section (`http`, `database`, `sdk`) is present.
/// - A loaded config has passed [`SmokecheckConfig::validate`].
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SmokecheckConfig {
    /// Target service endpoint and probe policy.
    pub target: TargetConfig,
    /// HTTP authentication check suite; present means enabled.
    #[serde(default)]
    pub http: Option<HttpSuiteConfig>,
    /// Database check suite; present means enabled.
    #[serde(default)]
    pub database: Option<DatabaseSuiteConfig>,
    /// Cloud SDK check suite; present means enabled.
    #[serde(default)]
    pub sdk: Option<SdkSuiteConfig>,
}

/// Target service configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TargetConfig {
    /// Base URL of the service under test.
    pub base_url: String,
    /// Readiness probe policy.
    #[serde(default)]
    pub probe: ProbeConfig,
}

/// Readiness probe policy configuration.
///
/// # Invariants
/// - `max_attempts` is within `1..=100`.
/// - `interval_ms` is within `100..=60_000`.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProbeConfig {
    /// Maximum probe attempts before the run aborts.
    #[serde(default = "default_probe_attempts")]
    pub max_attempts: u32,
    /// Interval between probe attempts in milliseconds.
    #[serde(default = "default_probe_interval_ms")]
    pub interval_ms: u64,
    /// Delay progression between attempts.
    #[serde(default)]
    pub backoff: ProbeBackoff,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_PROBE_ATTEMPTS,
            interval_ms: DEFAULT_PROBE_INTERVAL_MS,
            backoff: ProbeBackoff::Fixed,
        }
    }
}

impl ProbeConfig {
    /// Converts the config into the core probe policy.
    #[must_use]
    pub const fn policy(&self) -> ProbePolicy {
        ProbePolicy {
            max_attempts: self.max_attempts,
            interval: Duration::from_millis(self.interval_ms),
            backoff: match self.backoff {
                ProbeBackoff::Fixed => BackoffMode::Fixed,
                ProbeBackoff::Exponential => BackoffMode::Exponential,
            },
        }
    }
}

/// Probe backoff selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ProbeBackoff {
    /// Fixed interval between attempts.
    #[default]
    Fixed,
    /// Doubling interval between attempts.
    Exponential,
}

/// HTTP authentication suite configuration.
///
/// # Invariants
/// - All identity fields are non-empty and within length limits.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HttpSuiteConfig {
    /// Registration email for the smoke-test user.
    pub email: String,
    /// Registration and login username.
    pub username: String,
    /// Registration and login password.
    pub password: String,
    /// Registration role.
    #[serde(default = "default_role")]
    pub role: String,
    /// Optional fallback credential pair; explicit opt-in for the
    /// alternative auth path.
    #[serde(default)]
    pub fallback: Option<FallbackCredentials>,
}

/// Fallback credential pair for the alternative auth path.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FallbackCredentials {
    /// Fallback login username.
    pub username: String,
    /// Fallback login password.
    pub password: String,
}

/// Database suite configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DatabaseSuiteConfig {
    /// Path to the SQLite database file.
    pub path: PathBuf,
}

/// Cloud SDK suite configuration.
///
/// # Invariants
/// - `endpoint` parses as an http(s) URL.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SdkSuiteConfig {
    /// API key passed to the SDK client constructor.
    pub api_key: String,
    /// API version string passed to the SDK client constructor.
    pub api_version: String,
    /// Endpoint URL passed to the SDK client constructor.
    pub endpoint: String,
}

// ============================================================================
// SECTION: Loading
// ============================================================================

impl SmokecheckConfig {
    /// Loads and validates configuration from the given path, the
    /// `SMOKECHECK_CONFIG` environment variable, or `smokecheck.toml`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the file cannot be read, parsed, or
    /// validated.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let resolved = resolve_path(path);
        let bytes = fs::read(&resolved)
            .map_err(|err| ConfigError::Io(format!("{}: {err}", resolved.display())))?;
        if bytes.len() > MAX_CONFIG_FILE_SIZE {
            return Err(ConfigError::Invalid("config file exceeds size limit".to_string()));
        }
        let content = std::str::from_utf8(&bytes)
            .map_err(|_| ConfigError::Invalid("config file must be utf-8".to_string()))?;
        Self::from_toml(content)
    }

    /// Parses and validates configuration from TOML content.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the content cannot be parsed or
    /// validated.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self =
            toml::from_str(content).map_err(|err| ConfigError::Parse(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration for internal consistency.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when configuration is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.target.validate()?;
        if self.http.is_none() && self.database.is_none() && self.sdk.is_none() {
            return Err(ConfigError::Invalid(
                "no check suite enabled: add an [http], [database], or [sdk] section".to_string(),
            ));
        }
        if let Some(http) = &self.http {
            http.validate()?;
        }
        if let Some(database) = &self.database {
            database.validate()?;
        }
        if let Some(sdk) = &self.sdk {
            sdk.validate()?;
        }
        Ok(())
    }
}

impl TargetConfig {
    /// Validates the target base URL and probe policy.
    fn validate(&self) -> Result<(), ConfigError> {
        if self.base_url.is_empty() || self.base_url.len() > MAX_URL_LENGTH {
            return Err(ConfigError::Invalid("target.base_url length out of range".to_string()));
        }
        let url = Url::parse(&self.base_url)
            .map_err(|err| ConfigError::Invalid(format!("target.base_url: {err}")))?;
        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(ConfigError::Invalid(
                "target.base_url scheme must be http or https".to_string(),
            ));
        }
        self.probe.validate()
    }
}

impl ProbeConfig {
    /// Validates the probe attempt budget and pacing.
    fn validate(&self) -> Result<(), ConfigError> {
        if !(MIN_PROBE_ATTEMPTS..=MAX_PROBE_ATTEMPTS).contains(&self.max_attempts) {
            return Err(ConfigError::Invalid(format!(
                "target.probe.max_attempts must be within {MIN_PROBE_ATTEMPTS}..={MAX_PROBE_ATTEMPTS}"
            )));
        }
        if !(MIN_PROBE_INTERVAL_MS..=MAX_PROBE_INTERVAL_MS).contains(&self.interval_ms) {
            return Err(ConfigError::Invalid(format!(
                "target.probe.interval_ms must be within {MIN_PROBE_INTERVAL_MS}..={MAX_PROBE_INTERVAL_MS}"
            )));
        }
        Ok(())
    }
}

impl HttpSuiteConfig {
    /// Validates identity fields and the optional fallback pair.
    fn validate(&self) -> Result<(), ConfigError> {
        validate_field("http.email", &self.email)?;
        validate_field("http.username", &self.username)?;
        validate_field("http.password", &self.password)?;
        validate_field("http.role", &self.role)?;
        if !self.email.contains('@') {
            return Err(ConfigError::Invalid("http.email must contain '@'".to_string()));
        }
        if let Some(fallback) = &self.fallback {
            validate_field("http.fallback.username", &fallback.username)?;
            validate_field("http.fallback.password", &fallback.password)?;
        }
        Ok(())
    }
}

impl DatabaseSuiteConfig {
    /// Validates the database path.
    fn validate(&self) -> Result<(), ConfigError> {
        if self.path.as_os_str().is_empty() {
            return Err(ConfigError::Invalid("database.path must not be empty".to_string()));
        }
        Ok(())
    }
}

impl SdkSuiteConfig {
    /// Validates SDK client constructor inputs.
    fn validate(&self) -> Result<(), ConfigError> {
        validate_field("sdk.api_key", &self.api_key)?;
        validate_field("sdk.api_version", &self.api_version)?;
        if self.endpoint.is_empty() || self.endpoint.len() > MAX_URL_LENGTH {
            return Err(ConfigError::Invalid("sdk.endpoint length out of range".to_string()));
        }
        let url = Url::parse(&self.endpoint)
            .map_err(|err| ConfigError::Invalid(format!("sdk.endpoint: {err}")))?;
        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(ConfigError::Invalid(
                "sdk.endpoint scheme must be http or https".to_string(),
            ));
        }
        Ok(())
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Resolves the effective config path from argument, env override, or the
/// default filename.
fn resolve_path(path: Option<&Path>) -> PathBuf {
    path.map_or_else(
        || {
            env::var(CONFIG_ENV_VAR)
                .map_or_else(|_| PathBuf::from(DEFAULT_CONFIG_NAME), PathBuf::from)
        },
        Path::to_path_buf,
    )
}

/// Validates a non-empty bounded string field.
fn validate_field(name: &str, value: &str) -> Result<(), ConfigError> {
    if value.is_empty() {
        return Err(ConfigError::Invalid(format!("{name} must not be empty")));
    }
    if value.len() > MAX_FIELD_LENGTH {
        return Err(ConfigError::Invalid(format!("{name} exceeds length limit")));
    }
    Ok(())
}

/// Default probe attempts.
const fn default_probe_attempts() -> u32 {
    DEFAULT_PROBE_ATTEMPTS
}

/// Default probe interval in milliseconds.
const fn default_probe_interval_ms() -> u64 {
    DEFAULT_PROBE_INTERVAL_MS
}

/// Default registration role.
fn default_role() -> String {
    DEFAULT_ROLE.to_string()
}

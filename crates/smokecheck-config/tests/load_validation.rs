// crates/smokecheck-config/tests/load_validation.rs
// ============================================================================
// Module: Config Load and Validation Tests
// Description: Parse, bounds, and fail-closed behavior of smokecheck.toml.
// Purpose: Verify unknown keys, ranges, and suite requirements are enforced.
// Dependencies: smokecheck-config, tempfile
// ============================================================================

//! ## Overview
//! Covers the fail-closed config surface: a full valid file, defaulting,
//! unknown-key rejection, probe bounds, URL scheme restrictions, empty
//! credential rejection, and the at-least-one-suite rule.

#![allow(
    clippy::panic,
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only output and panic-based assertions are permitted."
)]

use std::io::Write;
use std::time::Duration;

use smokecheck_config::ConfigError;
use smokecheck_config::ProbeBackoff;
use smokecheck_config::SmokecheckConfig;

/// A complete valid configuration covering every suite.
const FULL_CONFIG: &str = r#"
[target]
base_url = "http://127.0.0.1:8000"

[target.probe]
max_attempts = 5
interval_ms = 500
backoff = "exponential"

[http]
email = "apitest@example.com"
username = "apitest"
password = "testpassword123"
role = "user"

[http.fallback]
username = "anu"
password = "password123"

[database]
path = "docbot.db"

[sdk]
api_key = "dummy_key"
api_version = "2024-12-01-preview"
endpoint = "https://example.openai.azure.com/"
"#;

#[test]
fn full_config_parses_and_validates() {
    let config = SmokecheckConfig::from_toml(FULL_CONFIG).unwrap();
    assert_eq!(config.target.base_url, "http://127.0.0.1:8000");
    assert_eq!(config.target.probe.max_attempts, 5);
    assert_eq!(config.target.probe.backoff, ProbeBackoff::Exponential);
    let http = config.http.unwrap();
    assert_eq!(http.username, "apitest");
    assert_eq!(http.role, "user");
    assert_eq!(http.fallback.unwrap().username, "anu");
    assert_eq!(config.database.unwrap().path.to_string_lossy(), "docbot.db");
    assert_eq!(config.sdk.unwrap().api_version, "2024-12-01-preview");
}

#[test]
fn probe_defaults_match_observed_legacy_behavior() {
    let config = SmokecheckConfig::from_toml(
        r#"
[target]
base_url = "http://127.0.0.1:8000"

[database]
path = "docbot.db"
"#,
    )
    .unwrap();
    let policy = config.target.probe.policy();
    assert_eq!(policy.max_attempts, 10);
    assert_eq!(policy.interval, Duration::from_secs(2));
}

#[test]
fn unknown_keys_are_rejected() {
    let err = SmokecheckConfig::from_toml(
        r#"
[target]
base_url = "http://127.0.0.1:8000"
surprise = true

[database]
path = "docbot.db"
"#,
    )
    .unwrap_err();
    assert!(matches!(err, ConfigError::Parse(_)));
}

#[test]
fn no_enabled_suite_is_invalid() {
    let err = SmokecheckConfig::from_toml(
        r#"
[target]
base_url = "http://127.0.0.1:8000"
"#,
    )
    .unwrap_err();
    assert!(err.to_string().contains("no check suite enabled"));
}

#[test]
fn probe_attempts_out_of_range_fail_closed() {
    let err = SmokecheckConfig::from_toml(
        r#"
[target]
base_url = "http://127.0.0.1:8000"

[target.probe]
max_attempts = 0

[database]
path = "docbot.db"
"#,
    )
    .unwrap_err();
    assert!(err.to_string().contains("max_attempts"));
}

#[test]
fn probe_interval_out_of_range_fails_closed() {
    let err = SmokecheckConfig::from_toml(
        r#"
[target]
base_url = "http://127.0.0.1:8000"

[target.probe]
interval_ms = 10

[database]
path = "docbot.db"
"#,
    )
    .unwrap_err();
    assert!(err.to_string().contains("interval_ms"));
}

#[test]
fn non_http_scheme_is_rejected() {
    let err = SmokecheckConfig::from_toml(
        r#"
[target]
base_url = "ftp://127.0.0.1:8000"

[database]
path = "docbot.db"
"#,
    )
    .unwrap_err();
    assert!(err.to_string().contains("scheme"));
}

#[test]
fn empty_credentials_are_rejected() {
    let err = SmokecheckConfig::from_toml(
        r#"
[target]
base_url = "http://127.0.0.1:8000"

[http]
email = "apitest@example.com"
username = "apitest"
password = ""
"#,
    )
    .unwrap_err();
    assert!(err.to_string().contains("http.password"));
}

#[test]
fn email_without_at_sign_is_rejected() {
    let err = SmokecheckConfig::from_toml(
        r#"
[target]
base_url = "http://127.0.0.1:8000"

[http]
email = "not-an-email"
username = "apitest"
password = "testpassword123"
"#,
    )
    .unwrap_err();
    assert!(err.to_string().contains("http.email"));
}

#[test]
fn load_reads_from_explicit_path() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(FULL_CONFIG.as_bytes()).unwrap();
    let config = SmokecheckConfig::load(Some(file.path())).unwrap();
    assert!(config.http.is_some());
}

#[test]
fn load_reports_missing_file_as_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("absent.toml");
    let err = SmokecheckConfig::load(Some(&missing)).unwrap_err();
    assert!(matches!(err, ConfigError::Io(_)));
}

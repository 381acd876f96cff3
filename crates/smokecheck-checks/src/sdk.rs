// crates/smokecheck-checks/src/sdk.rs
// ============================================================================
// Module: Cloud SDK Construction Check
// Description: Diagnoses cloud SDK client initialization.
// Purpose: Report whether the SDK client constructor succeeds, and why not.
// Dependencies: smokecheck-core, reqwest, serde_json, url
// ============================================================================

//! ## Overview
//! The harness only observes whether constructing the vendor client works.
//! Construction validates the endpoint and api-key header, then checks each
//! proxy environment variable before building the underlying HTTP client,
//! so a malformed proxy value is classified as [`SdkError::ProxyEnvironment`]
//! instead of being sniffed out of an error string.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::env;
use std::time::Duration;

use reqwest::Proxy;
use reqwest::blocking::Client;
use reqwest::header::HeaderMap;
use reqwest::header::HeaderValue;
use serde_json::Value;
use serde_json::json;
use smokecheck_core::CheckContext;
use smokecheck_core::CheckError;
use smokecheck_core::CheckOutput;
use smokecheck_core::SmokeCheck;
use thiserror::Error;
use url::Url;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Proxy environment variables inspected before client construction.
pub const PROXY_ENV_VARS: [&str; 4] = ["HTTP_PROXY", "HTTPS_PROXY", "http_proxy", "https_proxy"];
/// Header carrying the API key.
const API_KEY_HEADER: &str = "api-key";
/// Timeout applied to the constructed client.
const CLIENT_TIMEOUT: Duration = Duration::from_secs(30);

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Cloud SDK client construction errors.
#[derive(Debug, Error)]
pub enum SdkError {
    /// The endpoint URL is missing, unparseable, or has a bad scheme.
    #[error("invalid endpoint url: {0}")]
    InvalidEndpoint(String),
    /// The API key cannot be carried as a header value.
    #[error("invalid api key: {0}")]
    InvalidApiKey(String),
    /// The API version string is empty.
    #[error("invalid api version: {0}")]
    InvalidApiVersion(String),
    /// A proxy environment variable holds an unusable value.
    #[error("proxy environment rejected: {variable}: {message}")]
    ProxyEnvironment {
        /// Offending environment variable name.
        variable: String,
        /// Parse failure description.
        message: String,
    },
    /// The underlying HTTP client could not be built.
    #[error("sdk http client build failed: {0}")]
    ClientBuild(String),
}

impl SdkError {
    /// Returns true when the failure stems from proxy configuration.
    #[must_use]
    pub const fn is_proxy_related(&self) -> bool {
        matches!(self, Self::ProxyEnvironment { .. })
    }
}

// ============================================================================
// SECTION: Client
// ============================================================================

/// Constructor inputs for the cloud SDK client.
#[derive(Debug, Clone)]
pub struct SdkClientConfig {
    /// API key for the vendor service.
    pub api_key: String,
    /// API version string.
    pub api_version: String,
    /// Endpoint URL for the vendor service.
    pub endpoint: String,
}

/// Minimal cloud SDK client; the harness only exercises construction.
#[derive(Debug)]
pub struct SdkClient {
    /// Validated endpoint URL.
    endpoint: Url,
    /// Validated API version string.
    api_version: String,
    /// Underlying HTTP client with the api-key header installed.
    client: Client,
}

impl SdkClient {
    /// Constructs the client, validating inputs and the proxy environment.
    ///
    /// # Errors
    ///
    /// Returns [`SdkError`] when any input or the proxy environment is
    /// unusable, or when the HTTP client cannot be built.
    pub fn new(config: &SdkClientConfig) -> Result<Self, SdkError> {
        let endpoint = Url::parse(&config.endpoint)
            .map_err(|err| SdkError::InvalidEndpoint(err.to_string()))?;
        if endpoint.scheme() != "http" && endpoint.scheme() != "https" {
            return Err(SdkError::InvalidEndpoint(format!(
                "unsupported scheme `{}`",
                endpoint.scheme()
            )));
        }
        if config.api_version.trim().is_empty() {
            return Err(SdkError::InvalidApiVersion("must not be empty".to_string()));
        }
        let mut headers = HeaderMap::new();
        let key_value = HeaderValue::from_str(&config.api_key)
            .map_err(|err| SdkError::InvalidApiKey(err.to_string()))?;
        headers.insert(API_KEY_HEADER, key_value);

        let mut builder = Client::builder().timeout(CLIENT_TIMEOUT).default_headers(headers);
        for (variable, value) in proxy_values() {
            let proxy = Proxy::all(value.as_str()).map_err(|err| SdkError::ProxyEnvironment {
                variable: variable.clone(),
                message: err.to_string(),
            })?;
            builder = builder.proxy(proxy);
        }
        let client = builder.build().map_err(|err| SdkError::ClientBuild(err.to_string()))?;
        Ok(Self {
            endpoint,
            api_version: config.api_version.clone(),
            client,
        })
    }

    /// Returns the validated endpoint.
    #[must_use]
    pub const fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Returns the validated API version.
    #[must_use]
    pub fn api_version(&self) -> &str {
        &self.api_version
    }

    /// Returns the underlying HTTP client.
    #[must_use]
    pub const fn http_client(&self) -> &Client {
        &self.client
    }
}

/// Snapshot of which proxy variables are set, for diagnostic detail.
#[must_use]
pub fn proxy_environment() -> Value {
    let entries: Vec<Value> = PROXY_ENV_VARS
        .iter()
        .map(|variable| json!({ "variable": variable, "set": env::var(variable).is_ok() }))
        .collect();
    Value::Array(entries)
}

/// Collects the set proxy variables and their values.
fn proxy_values() -> Vec<(String, String)> {
    PROXY_ENV_VARS
        .iter()
        .filter_map(|variable| {
            env::var(variable).ok().map(|value| ((*variable).to_string(), value))
        })
        .collect()
}

// ============================================================================
// SECTION: Check
// ============================================================================

/// Reports whether SDK client construction succeeds.
pub struct SdkInitCheck {
    /// Constructor inputs.
    pub config: SdkClientConfig,
}

impl SmokeCheck for SdkInitCheck {
    fn execute(&self, _ctx: &CheckContext) -> Result<CheckOutput, CheckError> {
        match SdkClient::new(&self.config) {
            Ok(client) => Ok(CheckOutput::passed("sdk client initialized").with_detail(json!({
                "endpoint": client.endpoint().as_str(),
                "api_version": client.api_version(),
                "proxy_environment": proxy_environment(),
            }))),
            Err(err) if err.is_proxy_related() => {
                Err(CheckError::Sdk(format!("proxy-related failure: {err}")))
            }
            Err(err) => Err(CheckError::Sdk(err.to_string())),
        }
    }
}

// crates/smokecheck-checks/src/http.rs
// ============================================================================
// Module: HTTP Auth Checks
// Description: Checks against the authentication API endpoints.
// Purpose: Exercise root, register, login, and profile with bounded requests.
// Dependencies: smokecheck-core, reqwest, serde, serde_json, url
// ============================================================================

//! ## Overview
//! All HTTP checks share one blocking client with redirects disabled and a
//! full-lifecycle timeout. Response bodies are read under a hard size limit.
//! Status-code branches are structured: a 400 on registration whose `detail`
//! text mentions an existing user is an expected informational outcome, not
//! a failure; that substring test is the one place the collaborator offers
//! no structured signal.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::io::Read;
use std::sync::Arc;
use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::blocking::RequestBuilder;
use reqwest::redirect::Policy;
use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;
use serde_json::json;
use smokecheck_core::CheckContext;
use smokecheck_core::CheckError;
use smokecheck_core::CheckOutput;
use smokecheck_core::ProbeError;
use smokecheck_core::ProbeTransport;
use smokecheck_core::SmokeCheck;
use url::Url;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Artifact key for the primary auth token.
pub const ARTIFACT_AUTH_TOKEN: &str = "auth_token";
/// Artifact key for the fallback auth token.
pub const ARTIFACT_FALLBACK_AUTH_TOKEN: &str = "fallback_auth_token";
/// Registration endpoint path.
const REGISTER_PATH: &str = "api/auth/register";
/// Login endpoint path.
const LOGIN_PATH: &str = "api/auth/login";
/// Profile endpoint path.
const PROFILE_PATH: &str = "api/auth/me";
/// Request timeout applied to every call.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(5);
/// Maximum response body size read from the collaborator.
const MAX_RESPONSE_BYTES: usize = 1024 * 1024;
/// User agent for outbound requests.
const USER_AGENT: &str = "smokecheck/0.1";

// ============================================================================
// SECTION: API Client
// ============================================================================

/// Shared blocking client over the authentication API.
///
/// # Invariants
/// - One client per run; redirects are not followed.
/// - Every request carries the configured timeout.
pub struct HttpApi {
    /// Base URL of the service under test.
    base_url: Url,
    /// Shared blocking client.
    client: Client,
}

impl HttpApi {
    /// Creates the shared API client for a run.
    ///
    /// # Errors
    ///
    /// Returns [`CheckError`] when the base URL is invalid or the client
    /// cannot be built.
    pub fn new(base_url: &str) -> Result<Self, CheckError> {
        let base_url = Url::parse(base_url)
            .map_err(|err| CheckError::Http(format!("invalid base url: {err}")))?;
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(USER_AGENT)
            .redirect(Policy::none())
            .build()
            .map_err(|err| CheckError::Http(format!("http client build failed: {err}")))?;
        Ok(Self {
            base_url,
            client,
        })
    }

    /// Resolves a path against the base URL.
    fn url(&self, path: &str) -> Result<Url, CheckError> {
        self.base_url.join(path).map_err(|err| CheckError::Http(format!("invalid path: {err}")))
    }

    /// Sends a request and reads the body under the size limit.
    fn send(&self, request: RequestBuilder) -> Result<ApiResponse, CheckError> {
        let response = request.send().map_err(|err| CheckError::Http(err.to_string()))?;
        let status = response.status().as_u16();
        let mut body = Vec::new();
        let limit = u64::try_from(MAX_RESPONSE_BYTES).unwrap_or(u64::MAX).saturating_add(1);
        let mut limited = response.take(limit);
        limited
            .read_to_end(&mut body)
            .map_err(|err| CheckError::Payload(format!("failed to read response: {err}")))?;
        if body.len() > MAX_RESPONSE_BYTES {
            return Err(CheckError::Payload("response exceeds size limit".to_string()));
        }
        Ok(ApiResponse {
            status,
            body,
        })
    }

    /// Issues `GET /` and returns the response.
    fn get_root(&self) -> Result<ApiResponse, CheckError> {
        let url = self.url("")?;
        self.send(self.client.get(url))
    }

    /// Issues the JSON registration request.
    fn post_register(&self, request: &RegisterRequest) -> Result<ApiResponse, CheckError> {
        let url = self.url(REGISTER_PATH)?;
        self.send(self.client.post(url).json(request))
    }

    /// Issues the form-encoded login request.
    fn post_login(&self, username: &str, password: &str) -> Result<ApiResponse, CheckError> {
        let url = self.url(LOGIN_PATH)?;
        let form = [("username", username), ("password", password)];
        self.send(self.client.post(url).form(&form))
    }

    /// Issues the bearer-authorized profile request.
    fn get_profile(&self, token: &str) -> Result<ApiResponse, CheckError> {
        let url = self.url(PROFILE_PATH)?;
        self.send(self.client.get(url).bearer_auth(token))
    }
}

// ============================================================================
// SECTION: Wire Types
// ============================================================================

/// JSON body for the registration endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct RegisterRequest {
    /// Registration email.
    pub email: String,
    /// Registration username.
    pub username: String,
    /// Registration password.
    pub password: String,
    /// Registration role.
    pub role: String,
}

/// Token payload returned by the login endpoint.
#[derive(Debug, Deserialize)]
struct TokenResponse {
    /// Bearer token for subsequent requests.
    access_token: String,
}

/// A response with its status and bounded body.
struct ApiResponse {
    /// HTTP status code.
    status: u16,
    /// Response body bytes, at most the configured limit.
    body: Vec<u8>,
}

impl ApiResponse {
    /// Decodes the body as JSON.
    fn json(&self) -> Result<Value, CheckError> {
        serde_json::from_slice(&self.body)
            .map_err(|err| CheckError::Payload(format!("invalid json body: {err}")))
    }

    /// Extracts the `detail` field collaborators attach to 4xx bodies.
    fn detail(&self) -> String {
        self.json()
            .ok()
            .as_ref()
            .and_then(|value| value.get("detail"))
            .and_then(Value::as_str)
            .map_or_else(|| String::from_utf8_lossy(&self.body).into_owned(), str::to_string)
    }

    /// Builds the unexpected-status error for this response.
    fn unexpected(&self) -> CheckError {
        CheckError::UnexpectedStatus {
            status: self.status,
            message: self.detail(),
        }
    }
}

// ============================================================================
// SECTION: Probe Transport
// ============================================================================

/// Readiness probe transport backed by a dedicated blocking client.
pub struct HttpProbeTransport {
    /// Client used for probe requests.
    client: Client,
}

impl HttpProbeTransport {
    /// Creates the probe transport.
    ///
    /// # Errors
    ///
    /// Returns [`CheckError`] when the client cannot be built.
    pub fn new() -> Result<Self, CheckError> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(USER_AGENT)
            .redirect(Policy::none())
            .build()
            .map_err(|err| CheckError::Http(format!("probe client build failed: {err}")))?;
        Ok(Self {
            client,
        })
    }
}

impl ProbeTransport for HttpProbeTransport {
    fn probe(&self, target: &str) -> Result<u16, ProbeError> {
        let response = self
            .client
            .get(target)
            .send()
            .map_err(|err| ProbeError::Transport(err.to_string()))?;
        Ok(response.status().as_u16())
    }
}

// ============================================================================
// SECTION: Checks
// ============================================================================

/// Verifies the root endpoint answers with a 200.
pub struct RootCheck {
    /// Shared API client.
    pub api: Arc<HttpApi>,
}

impl SmokeCheck for RootCheck {
    fn execute(&self, _ctx: &CheckContext) -> Result<CheckOutput, CheckError> {
        let response = self.api.get_root()?;
        if response.status != 200 {
            return Err(response.unexpected());
        }
        let mut output = CheckOutput::passed("service responded with status 200");
        if let Ok(body) = response.json() {
            output = output.with_detail(body);
        }
        Ok(output)
    }
}

/// Registers the smoke-test user, treating an existing user as expected.
pub struct RegisterCheck {
    /// Shared API client.
    pub api: Arc<HttpApi>,
    /// Registration payload.
    pub request: RegisterRequest,
}

impl SmokeCheck for RegisterCheck {
    fn execute(&self, _ctx: &CheckContext) -> Result<CheckOutput, CheckError> {
        let response = self.api.post_register(&self.request)?;
        match response.status {
            200 => {
                let body = response.json()?;
                Ok(CheckOutput::passed(format!("user `{}` registered", self.request.username))
                    .with_detail(body))
            }
            400 => {
                let detail = response.detail();
                if detail.to_lowercase().contains("already") {
                    Ok(CheckOutput::info(format!(
                        "user `{}` already exists, acceptable for smoke testing",
                        self.request.username
                    ))
                    .with_detail(json!({ "detail": detail })))
                } else {
                    Err(response.unexpected())
                }
            }
            _ => Err(response.unexpected()),
        }
    }
}

/// Logs in and publishes the bearer token as an artifact.
pub struct LoginCheck {
    /// Shared API client.
    pub api: Arc<HttpApi>,
    /// Login username.
    pub username: String,
    /// Login password.
    pub password: String,
    /// Artifact key the token is published under.
    pub token_artifact: &'static str,
}

impl SmokeCheck for LoginCheck {
    fn execute(&self, _ctx: &CheckContext) -> Result<CheckOutput, CheckError> {
        let response = self.api.post_login(&self.username, &self.password)?;
        if response.status != 200 {
            return Err(response.unexpected());
        }
        let token: TokenResponse = serde_json::from_slice(&response.body)
            .map_err(|err| CheckError::Payload(format!("invalid token body: {err}")))?;
        if token.access_token.is_empty() {
            return Err(CheckError::Payload("empty access token".to_string()));
        }
        Ok(CheckOutput::passed(format!("login succeeded for `{}`", self.username))
            .with_artifact(self.token_artifact, Value::String(token.access_token)))
    }
}

/// Fetches the authenticated profile using a previously published token.
pub struct ProfileCheck {
    /// Shared API client.
    pub api: Arc<HttpApi>,
    /// Artifact key the token is read from.
    pub token_artifact: &'static str,
}

impl SmokeCheck for ProfileCheck {
    fn execute(&self, ctx: &CheckContext) -> Result<CheckOutput, CheckError> {
        let token = ctx.string_artifact(self.token_artifact).ok_or_else(|| {
            CheckError::Assertion(format!("artifact `{}` is not a token", self.token_artifact))
        })?;
        let response = self.api.get_profile(token)?;
        if response.status != 200 {
            return Err(response.unexpected());
        }
        let body = response.json()?;
        let username = body.get("username").and_then(Value::as_str).unwrap_or("<unknown>");
        Ok(CheckOutput::passed(format!("profile retrieved for `{username}`")).with_detail(body))
    }
}

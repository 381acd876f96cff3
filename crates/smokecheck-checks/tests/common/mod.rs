// crates/smokecheck-checks/tests/common/mod.rs
// ============================================================================
// Module: Common Test Utilities
// Description: Scripted authentication API server for check tests.
// Purpose: Serve the root/register/login/profile endpoints locally.
// Dependencies: tiny_http, serde_json
// ============================================================================

//! ## Overview
//! Spawns a local `tiny_http` server implementing the authentication API
//! surface the checks exercise: `GET /`, `POST /api/auth/register`,
//! `POST /api/auth/login` (form-encoded), and `GET /api/auth/me` with a
//! bearer token. Behavior is scripted through [`AuthServerOptions`].

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

use std::thread;

use tiny_http::Header;
use tiny_http::Method;
use tiny_http::Request;
use tiny_http::Response;
use tiny_http::Server;

/// Scripted behavior for the fake authentication server.
#[derive(Debug, Clone)]
pub struct AuthServerOptions {
    /// Username accepted by login.
    pub valid_username: String,
    /// Password accepted by login.
    pub valid_password: String,
    /// Bearer token issued on successful login.
    pub token: String,
    /// When true, registration answers 400 with an "already registered"
    /// detail.
    pub duplicate_user: bool,
}

impl Default for AuthServerOptions {
    fn default() -> Self {
        Self {
            valid_username: "apitest".to_string(),
            valid_password: "testpassword123".to_string(),
            token: "tok-abc".to_string(),
            duplicate_user: false,
        }
    }
}

/// Handle to a running fake server.
pub struct AuthServer {
    /// Base URL of the server, without trailing slash.
    pub base_url: String,
}

/// Spawns the fake authentication server on an ephemeral port.
///
/// The serving thread runs until the test process exits.
pub fn spawn_auth_server(options: AuthServerOptions) -> AuthServer {
    let server = Server::http("127.0.0.1:0").unwrap();
    let addr = server.server_addr().to_ip().unwrap();
    let base_url = format!("http://{addr}");
    thread::spawn(move || {
        for request in server.incoming_requests() {
            handle(request, &options);
        }
    });
    AuthServer {
        base_url,
    }
}

/// Routes one request against the scripted behavior.
fn handle(mut request: Request, options: &AuthServerOptions) {
    let method = request.method().clone();
    let url = request.url().to_string();
    let mut body = String::new();
    let _ = request.as_reader().read_to_string(&mut body);
    match (method, url.as_str()) {
        (Method::Get, "/") => {
            respond_json(request, 200, r#"{"message":"docbot api"}"#);
        }
        (Method::Post, "/api/auth/register") => {
            if options.duplicate_user {
                respond_json(request, 400, r#"{"detail":"Username already registered"}"#);
            } else {
                respond_json(
                    request,
                    200,
                    r#"{"id":1,"username":"apitest","email":"apitest@example.com","role":"user"}"#,
                );
            }
        }
        (Method::Post, "/api/auth/login") => {
            let expected_user = format!("username={}", options.valid_username);
            let expected_pass = format!("password={}", options.valid_password);
            let fields: Vec<&str> = body.split('&').collect();
            if fields.contains(&expected_user.as_str()) && fields.contains(&expected_pass.as_str())
            {
                let payload =
                    format!(r#"{{"access_token":"{}","token_type":"bearer"}}"#, options.token);
                respond_json(request, 200, &payload);
            } else {
                respond_json(request, 401, r#"{"detail":"Incorrect username or password"}"#);
            }
        }
        (Method::Get, "/api/auth/me") => {
            let expected = format!("Bearer {}", options.token);
            let authorized = request
                .headers()
                .iter()
                .any(|h| h.field.equiv("Authorization") && h.value.as_str() == expected);
            if authorized {
                let payload = format!(
                    r#"{{"username":"{}","email":"apitest@example.com","role":"user"}}"#,
                    options.valid_username
                );
                respond_json(request, 200, &payload);
            } else {
                respond_json(request, 401, r#"{"detail":"Could not validate credentials"}"#);
            }
        }
        _ => {
            respond_json(request, 404, r#"{"detail":"Not Found"}"#);
        }
    }
}

/// Responds with a JSON body and status code.
fn respond_json(request: Request, status: u16, body: &str) {
    let header = Header::from_bytes(&b"Content-Type"[..], &b"application/json"[..]).unwrap();
    let response = Response::from_string(body).with_status_code(status).with_header(header);
    let _ = request.respond(response);
}

// crates/smokecheck-checks/src/registry.rs
// ============================================================================
// Module: Check Registry
// Description: Assembles the ordered check list from configuration.
// Purpose: Translate enabled suites into CheckDefinitions at startup.
// Dependencies: smokecheck-core, smokecheck-config, smokecheck-db
// ============================================================================

//! ## Overview
//! The registry produces the ordered [`CheckDefinition`] list for a run.
//! HTTP checks come first (register, login, profile, then the opt-in
//! fallback pair), followed by the database suite and the SDK construction
//! check. When fallback credentials are configured, the login/profile pairs
//! form the `auth` alternative group so either path's full success
//! satisfies the run.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;

use smokecheck_config::SmokecheckConfig;
use smokecheck_core::CheckDefinition;
use smokecheck_db::NewUser;
use thiserror::Error;

use crate::db::DbContentCheck;
use crate::db::DbTablesCheck;
use crate::db::DbUserAuthCheck;
use crate::db::SharedDb;
use crate::http::ARTIFACT_AUTH_TOKEN;
use crate::http::ARTIFACT_FALLBACK_AUTH_TOKEN;
use crate::http::HttpApi;
use crate::http::LoginCheck;
use crate::http::ProfileCheck;
use crate::http::RegisterCheck;
use crate::http::RegisterRequest;
use crate::http::RootCheck;
use crate::sdk::SdkClientConfig;
use crate::sdk::SdkInitCheck;

// ============================================================================
// SECTION: Names
// ============================================================================

/// Alternative-path group label for authentication.
const AUTH_GROUP: &str = "auth";
/// Primary variant label.
const PRIMARY_VARIANT: &str = "primary";
/// Fallback variant label.
const FALLBACK_VARIANT: &str = "fallback";

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Registry assembly errors.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// The shared HTTP client could not be constructed.
    #[error("http api setup failed: {0}")]
    HttpSetup(String),
}

// ============================================================================
// SECTION: Assembly
// ============================================================================

/// Builds the ordered check list for the enabled suites.
///
/// # Errors
///
/// Returns [`RegistryError`] when shared resources cannot be constructed.
pub fn build(config: &SmokecheckConfig) -> Result<Vec<CheckDefinition>, RegistryError> {
    let mut definitions = Vec::new();
    if let Some(http) = &config.http {
        let api = Arc::new(
            HttpApi::new(&config.target.base_url)
                .map_err(|err| RegistryError::HttpSetup(err.to_string()))?,
        );
        let grouped = http.fallback.is_some();
        definitions.push(CheckDefinition::new(
            "root-endpoint",
            Box::new(RootCheck {
                api: Arc::clone(&api),
            }),
        ));
        definitions.push(CheckDefinition::new(
            "register",
            Box::new(RegisterCheck {
                api: Arc::clone(&api),
                request: RegisterRequest {
                    email: http.email.clone(),
                    username: http.username.clone(),
                    password: http.password.clone(),
                    role: http.role.clone(),
                },
            }),
        ));
        let mut login = CheckDefinition::new(
            "login",
            Box::new(LoginCheck {
                api: Arc::clone(&api),
                username: http.username.clone(),
                password: http.password.clone(),
                token_artifact: ARTIFACT_AUTH_TOKEN,
            }),
        );
        let mut profile = CheckDefinition::new(
            "profile",
            Box::new(ProfileCheck {
                api: Arc::clone(&api),
                token_artifact: ARTIFACT_AUTH_TOKEN,
            }),
        )
        .requires(ARTIFACT_AUTH_TOKEN);
        if grouped {
            login = login.in_group(AUTH_GROUP, PRIMARY_VARIANT);
            profile = profile.in_group(AUTH_GROUP, PRIMARY_VARIANT);
        }
        definitions.push(login);
        definitions.push(profile);
        if let Some(fallback) = &http.fallback {
            definitions.push(
                CheckDefinition::new(
                    "fallback-login",
                    Box::new(LoginCheck {
                        api: Arc::clone(&api),
                        username: fallback.username.clone(),
                        password: fallback.password.clone(),
                        token_artifact: ARTIFACT_FALLBACK_AUTH_TOKEN,
                    }),
                )
                .only_if_missing(ARTIFACT_AUTH_TOKEN)
                .in_group(AUTH_GROUP, FALLBACK_VARIANT),
            );
            definitions.push(
                CheckDefinition::new(
                    "fallback-profile",
                    Box::new(ProfileCheck {
                        api: Arc::clone(&api),
                        token_artifact: ARTIFACT_FALLBACK_AUTH_TOKEN,
                    }),
                )
                .requires(ARTIFACT_FALLBACK_AUTH_TOKEN)
                .in_group(AUTH_GROUP, FALLBACK_VARIANT),
            );
        }
    }
    if let Some(database) = &config.database {
        let db = Arc::new(SharedDb::new(database.path.clone()));
        definitions.push(CheckDefinition::new(
            "db-tables",
            Box::new(DbTablesCheck {
                db: Arc::clone(&db),
            }),
        ));
        if let Some(http) = &config.http {
            definitions.push(CheckDefinition::new(
                "db-user-auth",
                Box::new(DbUserAuthCheck {
                    db: Arc::clone(&db),
                    user: NewUser {
                        username: format!("{}-db", http.username),
                        email: http.email.clone(),
                        password: http.password.clone(),
                        role: http.role.clone(),
                    },
                }),
            ));
        } else {
            definitions.push(CheckDefinition::new(
                "db-user-auth",
                Box::new(DbUserAuthCheck {
                    db: Arc::clone(&db),
                    user: NewUser {
                        username: "smokecheck".to_string(),
                        email: "smokecheck@example.com".to_string(),
                        password: "smokecheck-password".to_string(),
                        role: "user".to_string(),
                    },
                }),
            ));
        }
        definitions.push(CheckDefinition::new(
            "db-content",
            Box::new(DbContentCheck {
                db,
            }),
        ));
    }
    if let Some(sdk) = &config.sdk {
        definitions.push(CheckDefinition::new(
            "sdk-init",
            Box::new(SdkInitCheck {
                config: SdkClientConfig {
                    api_key: sdk.api_key.clone(),
                    api_version: sdk.api_version.clone(),
                    endpoint: sdk.endpoint.clone(),
                },
            }),
        ));
    }
    Ok(definitions)
}

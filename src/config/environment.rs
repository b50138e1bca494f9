// ABOUTME: Environment configuration management for deployment-specific settings
// ABOUTME: Required secrets fail fast at startup; optional settings default explicitly and loudly
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Campaign Connect

//! Environment-based configuration management
//!
//! All configuration is environment-provided. Required fields (platform
//! credentials, webhook secrets, credential-store coordinates) fail fast
//! with `ConnectError::ConfigurationMissing` before any network call is
//! attempted. There are no silent fallbacks for secrets.

use std::env;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::errors::{ConnectError, ConnectResult};

/// Default HTTP port when `HTTP_PORT` is unset
const DEFAULT_HTTP_PORT: u16 = 8080;

/// Default UI path the flow redirects back to
const DEFAULT_UI_REDIRECT_PATH: &str = "/connected-accounts";

/// Default per-call outbound HTTP timeout; conservative single-digit bound
/// so an inbound request never hangs on an upstream call
const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 8;

/// Environment type, selects log format among other things
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    /// Local development
    #[default]
    Development,
    /// Deployed production instance
    Production,
    /// Test runs
    Testing,
}

impl Environment {
    /// Parse from string with fallback
    #[must_use]
    pub fn from_str_or_default(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "production" | "prod" => Self::Production,
            "testing" | "test" => Self::Testing,
            _ => Self::Development,
        }
    }

    /// Check if this is a production environment
    #[must_use]
    pub const fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Development => write!(f, "development"),
            Self::Production => write!(f, "production"),
            Self::Testing => write!(f, "testing"),
        }
    }
}

/// Platform OAuth application credentials
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OAuthConfig {
    /// Platform app client identifier (`META_APP_ID`)
    pub client_id: String,
    /// Platform app client secret (`META_APP_SECRET`)
    pub client_secret: String,
    /// Redirect URI registered with the platform (`OAUTH_REDIRECT_URI`)
    pub redirect_uri: String,
}

/// Webhook receiver secrets
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebhookConfig {
    /// Pre-shared token echoed during the subscription handshake
    /// (`IG_WEBHOOK_VERIFY_TOKEN`)
    pub verify_token: String,
    /// Shared application secret used for `X-Hub-Signature` HMAC
    /// verification (`APP_SECRET`)
    pub app_secret: String,
}

/// Coordinates of the external credential store
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CredentialStoreConfig {
    /// Base URL of the store's REST API (`CREDENTIAL_STORE_URL`)
    pub base_url: String,
    /// Bearer token for the store (`CREDENTIAL_STORE_TOKEN`)
    pub api_token: String,
    /// Collection/table receiving credential documents
    /// (`CREDENTIAL_STORE_COLLECTION`)
    pub collection: String,
}

/// Complete service configuration, built once at startup
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Inbound HTTP port
    pub http_port: u16,
    /// Deployment environment
    pub environment: Environment,
    /// Platform OAuth credentials
    pub oauth: OAuthConfig,
    /// Webhook receiver secrets
    pub webhook: WebhookConfig,
    /// Credential store coordinates
    pub credential_store: CredentialStoreConfig,
    /// Bounded timeout per outbound HTTP call, in seconds
    pub http_timeout_secs: u64,
    /// UI path the connection flow redirects back to
    pub ui_redirect_path: String,
}

impl ServerConfig {
    /// Load and validate configuration from environment variables.
    ///
    /// # Errors
    /// Returns `ConnectError::ConfigurationMissing` naming the first
    /// required variable that is absent, empty, or unparseable.
    pub fn from_env() -> ConnectResult<Self> {
        let config = Self {
            http_port: parse_env_or("HTTP_PORT", DEFAULT_HTTP_PORT)?,
            environment: Environment::from_str_or_default(
                &env::var("ENVIRONMENT").unwrap_or_default(),
            ),
            oauth: OAuthConfig {
                client_id: required_env("META_APP_ID")?,
                client_secret: required_env("META_APP_SECRET")?,
                redirect_uri: required_env("OAUTH_REDIRECT_URI")?,
            },
            webhook: WebhookConfig {
                verify_token: required_env("IG_WEBHOOK_VERIFY_TOKEN")?,
                app_secret: required_env("APP_SECRET")?,
            },
            credential_store: CredentialStoreConfig {
                base_url: required_env("CREDENTIAL_STORE_URL")?,
                api_token: required_env("CREDENTIAL_STORE_TOKEN")?,
                collection: required_env("CREDENTIAL_STORE_COLLECTION")?,
            },
            http_timeout_secs: parse_env_or("HTTP_TIMEOUT_SECS", DEFAULT_HTTP_TIMEOUT_SECS)?,
            ui_redirect_path: env::var("UI_REDIRECT_PATH")
                .ok()
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| DEFAULT_UI_REDIRECT_PATH.to_owned()),
        };

        info!(
            environment = %config.environment,
            http_port = config.http_port,
            ui_redirect_path = %config.ui_redirect_path,
            "configuration loaded"
        );

        Ok(config)
    }
}

/// Read a required environment variable, rejecting empty values.
fn required_env(name: &str) -> ConnectResult<String> {
    env::var(name)
        .ok()
        .filter(|v| !v.is_empty())
        .ok_or_else(|| ConnectError::ConfigurationMissing(name.to_owned()))
}

/// Parse an optional environment variable, falling back to a default when
/// unset but rejecting values that are present and invalid.
fn parse_env_or<T>(name: &str, default: T) -> ConnectResult<T>
where
    T: std::str::FromStr,
{
    match env::var(name) {
        Ok(raw) if !raw.is_empty() => raw
            .parse()
            .map_err(|_| ConnectError::ConfigurationMissing(format!("{name} (invalid value)"))),
        _ => Ok(default),
    }
}

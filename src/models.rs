// ABOUTME: Core data model shared by the connection flow and webhook receiver
// ABOUTME: Token exchange results, account identities, stored credentials, flow outcomes, webhook envelopes
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Campaign Connect

//! # Data Model
//!
//! Transient values (`TokenExchangeResult`, `AccountIdentity`) are scoped to
//! a single flow invocation and never shared across requests.
//! `StoredCredential` is handed off by value to the credential store;
//! `WebhookEnvelope` is appended to the in-process event sink.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::ConnectError;

/// Provider name carried on credentials and success redirects
pub const PROVIDER_INSTAGRAM: &str = "instagram";

/// Fixed confirmation string for successful connections
pub const SUCCESS_MESSAGE: &str = "Connected successfully";

/// Result of one token exchange step.
///
/// The long-lived exchange's result supersedes the short-lived one when
/// present; expiry falls back to the short-lived value if the long-lived
/// response omits it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenExchangeResult {
    /// Platform access token
    pub access_token: String,
    /// Token type, normally "bearer"
    #[serde(default = "default_token_type")]
    pub token_type: String,
    /// Lifetime in seconds, when the platform reports one
    #[serde(default)]
    pub expires_in: Option<i64>,
}

fn default_token_type() -> String {
    "bearer".to_owned()
}

/// Identity of the connected platform account.
///
/// Both fields must be non-empty for the flow to count as successful.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountIdentity {
    /// Stable platform user identifier
    pub platform_user_id: String,
    /// Display username shown in the dashboard
    pub username: String,
}

/// Credential document submitted to the external credential store.
///
/// This service only constructs and submits it; the store owns its
/// lifecycle after the hand-off.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredCredential {
    /// Provider constant, e.g. "instagram"
    pub provider: String,
    /// Stable platform user identifier
    pub platform_user_id: String,
    /// Display username at connection time
    pub username: String,
    /// Best available access token (long-lived when the upgrade succeeded)
    pub access_token: String,
    /// Token type, normally "bearer"
    pub token_type: String,
    /// Absolute expiry, when the platform reported a lifetime
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
    /// When this credential was obtained
    pub received_at: DateTime<Utc>,
}

impl StoredCredential {
    /// Build a credential from a resolved identity and the best token.
    #[must_use]
    pub fn new(
        provider: &str,
        identity: &AccountIdentity,
        token: &TokenExchangeResult,
        received_at: DateTime<Utc>,
    ) -> Self {
        let expires_at = token
            .expires_in
            .map(|secs| received_at + chrono::Duration::seconds(secs));
        Self {
            provider: provider.to_owned(),
            platform_user_id: identity.platform_user_id.clone(),
            username: identity.username.clone(),
            access_token: token.access_token.clone(),
            token_type: token.token_type.clone(),
            expires_at,
            received_at,
        }
    }
}

/// Terminal value of one connection flow invocation.
///
/// Exactly one outcome exists per invocation; it is encoded into the
/// redirect that sends the user's browser back to the dashboard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlowOutcome {
    /// Connection succeeded; carries the provider and resolved username
    Success {
        /// Provider the account was connected through
        provider: &'static str,
        /// Username of the connected account
        username: String,
    },
    /// Connection failed at a specific step
    Failure {
        /// Stable failure label from [`ConnectError::kind`]
        kind: &'static str,
        /// User-facing message, never an upstream payload
        message: String,
    },
}

impl FlowOutcome {
    /// Build a failure outcome from a flow error.
    #[must_use]
    pub fn failure(err: &ConnectError) -> Self {
        Self::Failure {
            kind: err.kind(),
            message: err.redirect_message().to_owned(),
        }
    }

    /// Encode this outcome as the redirect target consumed by the UI.
    ///
    /// Success: `<ui_path>?status=success&message=...&connectedto=<username>&platform=<provider>`.
    /// Failure: `<ui_path>?status=error&message=...`.
    #[must_use]
    pub fn redirect_target(&self, ui_path: &str) -> String {
        match self {
            Self::Success { provider, username } => format!(
                "{ui_path}?status=success&message={}&connectedto={}&platform={provider}",
                urlencoding::encode(SUCCESS_MESSAGE),
                urlencoding::encode(username),
            ),
            Self::Failure { message, .. } => format!(
                "{ui_path}?status=error&message={}",
                urlencoding::encode(message)
            ),
        }
    }
}

/// One received webhook event, buffered in the in-process sink.
///
/// Ephemeral by design: no persistence guarantee across restarts. The sink
/// trait exists so a durable queue can take this envelope instead.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebhookEnvelope {
    /// Platform that pushed the event
    pub platform: String,
    /// When the delivery was accepted
    pub received_at: DateTime<Utc>,
    /// Exact raw request body, as verified
    pub raw_body: String,
    /// Parsed body; an empty object when the payload was empty or invalid
    pub parsed_body: serde_json::Value,
}

/// Normalize an upstream JSON response to a single object.
///
/// Decision table per upstream shape:
/// - object            -> the object itself
/// - non-empty array   -> its first element (some Graph endpoints wrap
///   single results in a list)
/// - empty array       -> empty object
/// - anything else     -> the value unchanged, left for the caller's parser
///   to reject
#[must_use]
pub fn normalize_upstream(value: serde_json::Value) -> serde_json::Value {
    match value {
        serde_json::Value::Array(mut items) => {
            if items.is_empty() {
                serde_json::Value::Object(serde_json::Map::new())
            } else {
                items.remove(0)
            }
        }
        other => other,
    }
}

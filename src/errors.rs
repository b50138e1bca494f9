// ABOUTME: Unified failure taxonomy for the connection flow and webhook receiver
// ABOUTME: Every step-local failure maps to one terminal outcome or HTTP status, never an unhandled fault
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Campaign Connect

//! # Error Handling
//!
//! One error enum covers every way the service can fail. Each variant carries
//! internal detail for logs; the user-facing redirect message is a fixed
//! string per variant so upstream error payloads are never echoed to the
//! browser.

use thiserror::Error;

/// Failure taxonomy for the connection flow and webhook receiver.
///
/// `ConfigurationMissing` covers required configuration that is absent or
/// unparseable; it fails at startup, before any network call.
#[derive(Debug, Error)]
pub enum ConnectError {
    /// Required configuration absent or invalid; fatal at startup
    #[error("required configuration missing: {0}")]
    ConfigurationMissing(String),

    /// Callback request carried no authorization code
    #[error("authorization code missing from callback request")]
    MissingCode,

    /// Short-lived token exchange failed
    #[error("short-lived token exchange failed: {0}")]
    ShortExchangeFailed(String),

    /// Long-lived token exchange failed (recoverable via fallback)
    #[error("long-lived token exchange failed: {0}")]
    LongExchangeFailed(String),

    /// Profile endpoint failed or returned an incomplete identity
    #[error("account identity fetch failed: {0}")]
    IdentityFetchFailed(String),

    /// Credential store rejected the hand-off
    #[error("credential persistence failed: {0}")]
    PersistenceFailed(String),

    /// Webhook subscription registration failed (advisory)
    #[error("webhook subscription registration failed: {0}")]
    SubscriptionFailed(String),

    /// Webhook delivery signature missing or mismatched
    #[error("webhook signature invalid")]
    SignatureInvalid,
}

impl ConnectError {
    /// Stable machine-readable label for this failure, used in logs and
    /// carried on `FlowOutcome::Failure`.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::ConfigurationMissing(_) => "configuration_missing",
            Self::MissingCode => "missing_code",
            Self::ShortExchangeFailed(_) => "short_exchange_failed",
            Self::LongExchangeFailed(_) => "long_exchange_failed",
            Self::IdentityFetchFailed(_) => "identity_fetch_failed",
            Self::PersistenceFailed(_) => "persistence_failed",
            Self::SubscriptionFailed(_) => "subscription_failed",
            Self::SignatureInvalid => "signature_invalid",
        }
    }

    /// User-facing message for the redirect back to the UI.
    ///
    /// Fixed per variant: the internal detail (upstream status codes, error
    /// payloads) stays in the logs and never reaches the browser.
    #[must_use]
    pub const fn redirect_message(&self) -> &'static str {
        match self {
            Self::ConfigurationMissing(_) => "Service is not configured for this platform",
            Self::MissingCode => "Authorization code missing",
            Self::ShortExchangeFailed(_) => "Token exchange with the platform failed",
            Self::LongExchangeFailed(_) => "Long-lived token exchange failed",
            Self::IdentityFetchFailed(_) => "Could not resolve the connected account",
            Self::PersistenceFailed(_) => "Could not save the connected account",
            Self::SubscriptionFailed(_) => "Could not register webhook subscriptions",
            Self::SignatureInvalid => "Invalid webhook signature",
        }
    }
}

/// Result type alias for flow and webhook operations
pub type ConnectResult<T> = Result<T, ConnectError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_labels_are_stable() {
        assert_eq!(ConnectError::MissingCode.kind(), "missing_code");
        assert_eq!(
            ConnectError::ShortExchangeFailed("http 400".into()).kind(),
            "short_exchange_failed"
        );
        assert_eq!(ConnectError::SignatureInvalid.kind(), "signature_invalid");
    }

    #[test]
    fn test_redirect_message_hides_upstream_detail() {
        let err = ConnectError::IdentityFetchFailed("upstream said: secret_token=abc".into());
        assert!(!err.redirect_message().contains("secret_token"));
    }
}

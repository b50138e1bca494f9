// ABOUTME: Connection flow orchestration from authorization code to terminal outcome
// ABOUTME: Strictly sequential steps, explicit fallback and subscription policies, no retries
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Campaign Connect

//! Connection flow state machine
//!
//! States run in order with no back edges: `AwaitCode` →
//! `ExchangeShortLived` → `ExchangeLongLived` → `FetchIdentity` →
//! `PersistCredential` → `RegisterSubscriptions` → `Success`. Any step
//! failure is terminal except where noted:
//!
//! - A failed long-lived exchange falls back to the short-lived token.
//!   The fallback is deliberate and logged, never an accidental default.
//! - A failed subscription registration is advisory: it is logged at warn
//!   and the connection still counts as succeeded.
//!
//! The flow performs no retries; a fresh authorization code is required to
//! re-attempt, since codes are single-use by platform contract.

use std::sync::Arc;

use chrono::Utc;
use tracing::{info, warn};

use super::PlatformOAuthClient;
use crate::errors::{ConnectError, ConnectResult};
use crate::models::{FlowOutcome, StoredCredential, TokenExchangeResult};
use crate::persistence::CredentialStore;

/// Orchestrates one connection flow invocation per callback request.
///
/// Holds no per-request state; every invocation is independent and all its
/// network calls are strictly sequential.
pub struct ConnectionFlow {
    platform: Arc<dyn PlatformOAuthClient>,
    store: Arc<dyn CredentialStore>,
}

impl ConnectionFlow {
    /// Create a flow over a platform client and a credential store.
    #[must_use]
    pub fn new(platform: Arc<dyn PlatformOAuthClient>, store: Arc<dyn CredentialStore>) -> Self {
        Self { platform, store }
    }

    /// Run the flow for one callback request.
    ///
    /// Always returns a terminal [`FlowOutcome`]; no failure escapes as a
    /// fault. A missing or empty `code` short-circuits before any outbound
    /// call.
    pub async fn connect(&self, code: Option<&str>) -> FlowOutcome {
        match self.run(code).await {
            Ok(username) => {
                info!(
                    provider = self.platform.provider(),
                    username, "connection flow succeeded"
                );
                FlowOutcome::Success {
                    provider: self.platform.provider(),
                    username,
                }
            }
            Err(err) => {
                warn!(
                    provider = self.platform.provider(),
                    kind = err.kind(),
                    error = %err,
                    "connection flow failed"
                );
                FlowOutcome::failure(&err)
            }
        }
    }

    async fn run(&self, code: Option<&str>) -> ConnectResult<String> {
        let code = code
            .filter(|c| !c.is_empty())
            .ok_or(ConnectError::MissingCode)?;

        let short = self.platform.exchange_code(code).await?;
        let token = self.upgrade_token(short).await;

        let identity = self.platform.fetch_identity(&token.access_token).await?;
        if identity.platform_user_id.is_empty() || identity.username.is_empty() {
            return Err(ConnectError::IdentityFetchFailed(
                "profile response missing id or username".to_owned(),
            ));
        }

        let credential =
            StoredCredential::new(self.platform.provider(), &identity, &token, Utc::now());
        self.store.store_credential(credential).await?;

        // Advisory step: the credential is already persisted, so a
        // subscription failure downgrades to a warning.
        if let Err(err) = self
            .platform
            .register_subscriptions(&identity.platform_user_id, &token.access_token)
            .await
        {
            warn!(
                provider = self.platform.provider(),
                platform_user_id = %identity.platform_user_id,
                error = %err,
                "subscription registration failed; connection kept"
            );
        }

        Ok(identity.username)
    }

    /// Upgrade to a long-lived token, falling back to the short-lived one.
    ///
    /// When the long-lived response omits an expiry, the short-lived expiry
    /// is kept.
    async fn upgrade_token(&self, short: TokenExchangeResult) -> TokenExchangeResult {
        match self.platform.exchange_long_lived(&short.access_token).await {
            Ok(long) => TokenExchangeResult {
                expires_in: long.expires_in.or(short.expires_in),
                ..long
            },
            Err(err) => {
                warn!(
                    provider = self.platform.provider(),
                    error = %err,
                    "long-lived exchange failed; falling back to short-lived token"
                );
                short
            }
        }
    }
}

// ABOUTME: OAuth module organizing the connection flow and platform clients
// ABOUTME: Puts the platform API behind a trait so the flow is testable without network
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Campaign Connect

//! # OAuth Connection Flow
//!
//! The connection flow is a strictly sequential state machine: exchange the
//! authorization code for a short-lived token, upgrade it to a long-lived
//! token, resolve the account identity, persist the credential, and register
//! webhook subscriptions. Every terminal state maps to exactly one
//! [`FlowOutcome`](crate::models::FlowOutcome).
//!
//! The platform's endpoints sit behind [`PlatformOAuthClient`] so the flow
//! orchestration can be exercised against mocks.

/// Connection flow orchestration
pub mod flow;
/// Instagram/Meta Graph API client
pub mod instagram;

pub use flow::ConnectionFlow;
pub use instagram::{GraphApiClient, GraphApiConfig};

use async_trait::async_trait;

use crate::errors::ConnectResult;
use crate::models::{AccountIdentity, TokenExchangeResult};

/// Trait seam over a platform's OAuth, profile, and subscription endpoints.
#[async_trait]
pub trait PlatformOAuthClient: Send + Sync {
    /// Provider name carried on credentials and redirects
    fn provider(&self) -> &'static str;

    /// Build the authorization dialog URL the UI sends the browser to
    fn authorize_url(&self) -> String;

    /// Exchange an authorization code for a short-lived access token
    async fn exchange_code(&self, code: &str) -> ConnectResult<TokenExchangeResult>;

    /// Upgrade a short-lived token to a long-lived one
    async fn exchange_long_lived(&self, short_token: &str)
        -> ConnectResult<TokenExchangeResult>;

    /// Resolve the connected account's identity with the current best token
    async fn fetch_identity(&self, access_token: &str) -> ConnectResult<AccountIdentity>;

    /// Register webhook topics for the connected account
    async fn register_subscriptions(
        &self,
        platform_user_id: &str,
        access_token: &str,
    ) -> ConnectResult<()>;
}

// ABOUTME: Instagram/Meta Graph API client implementing the platform OAuth trait
// ABOUTME: Short-lived exchange, long-lived upgrade, profile fetch, and webhook subscription registration
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Campaign Connect

//! Instagram Graph API client
//!
//! Wire formats per endpoint:
//! - short-lived exchange: form-encoded POST (code + client credentials +
//!   redirect URI + grant type)
//! - long-lived exchange: GET with query parameters (`ig_exchange_token`)
//! - profile: GET with query parameters (`fields=id,username`)
//! - subscription registration: POST with query parameters
//!
//! Responses go through [`normalize_upstream`] before typed parsing; some
//! Graph endpoints wrap single results in a one-element list.

use async_trait::async_trait;
use serde::Deserialize;

use super::PlatformOAuthClient;
use crate::config::environment::OAuthConfig;
use crate::errors::{ConnectError, ConnectResult};
use crate::http_client::shared_client;
use crate::models::{
    normalize_upstream, AccountIdentity, TokenExchangeResult, PROVIDER_INSTAGRAM,
};

/// Authorization dialog URL
const AUTHORIZE_URL: &str = "https://www.instagram.com/oauth/authorize";

/// Short-lived token endpoint (form-encoded POST)
const SHORT_LIVED_TOKEN_URL: &str = "https://graph.facebook.com/v20.0/oauth/access_token";

/// Long-lived token endpoint (GET with query parameters)
const LONG_LIVED_TOKEN_URL: &str = "https://graph.instagram.com/access_token";

/// Profile endpoint (GET with query parameters)
const PROFILE_URL: &str = "https://graph.instagram.com/me";

/// Base for per-user subscription registration (POST with query parameters)
const SUBSCRIPTIONS_BASE_URL: &str = "https://graph.instagram.com/v20.0";

/// Scopes requested on the authorization dialog
const DEFAULT_SCOPES: &str = "instagram_business_basic,instagram_business_manage_comments";

/// Webhook topics registered for a connected account
const DEFAULT_SUBSCRIBED_FIELDS: &str = "comments,messages";

/// Graph API endpoint configuration.
///
/// Defaults point at the production Graph endpoints; tests and staging
/// deployments can override individual URLs.
#[derive(Debug, Clone)]
pub struct GraphApiConfig {
    /// Authorization dialog URL
    pub authorize_url: String,
    /// Short-lived token exchange endpoint
    pub short_lived_token_url: String,
    /// Long-lived token exchange endpoint
    pub long_lived_token_url: String,
    /// Profile endpoint
    pub profile_url: String,
    /// Base URL for subscription registration
    pub subscriptions_base_url: String,
    /// Scopes requested on the authorization dialog
    pub scopes: String,
    /// Webhook topics to register
    pub subscribed_fields: String,
}

impl Default for GraphApiConfig {
    fn default() -> Self {
        Self {
            authorize_url: AUTHORIZE_URL.to_owned(),
            short_lived_token_url: SHORT_LIVED_TOKEN_URL.to_owned(),
            long_lived_token_url: LONG_LIVED_TOKEN_URL.to_owned(),
            profile_url: PROFILE_URL.to_owned(),
            subscriptions_base_url: SUBSCRIPTIONS_BASE_URL.to_owned(),
            scopes: DEFAULT_SCOPES.to_owned(),
            subscribed_fields: DEFAULT_SUBSCRIBED_FIELDS.to_owned(),
        }
    }
}

/// Instagram Graph API client
pub struct GraphApiClient {
    client_id: String,
    client_secret: String,
    redirect_uri: String,
    endpoints: GraphApiConfig,
}

/// Profile response shape from the Graph `me` endpoint
#[derive(Debug, Deserialize)]
struct GraphProfile {
    #[serde(default)]
    id: String,
    #[serde(default)]
    username: String,
}

impl GraphApiClient {
    /// Create a client from the validated OAuth configuration.
    #[must_use]
    pub fn new(oauth: &OAuthConfig) -> Self {
        Self::with_endpoints(oauth, GraphApiConfig::default())
    }

    /// Create a client with overridden endpoints.
    #[must_use]
    pub fn with_endpoints(oauth: &OAuthConfig, endpoints: GraphApiConfig) -> Self {
        Self {
            client_id: oauth.client_id.clone(),
            client_secret: oauth.client_secret.clone(),
            redirect_uri: oauth.redirect_uri.clone(),
            endpoints,
        }
    }

    /// Parse a token response body, tolerating list-wrapped objects.
    fn parse_token_response(
        body: &str,
        err: fn(String) -> ConnectError,
    ) -> ConnectResult<TokenExchangeResult> {
        let value: serde_json::Value =
            serde_json::from_str(body).map_err(|e| err(format!("invalid JSON: {e}")))?;
        serde_json::from_value(normalize_upstream(value))
            .map_err(|_| err("response missing access token".to_owned()))
    }
}

#[async_trait]
impl PlatformOAuthClient for GraphApiClient {
    fn provider(&self) -> &'static str {
        PROVIDER_INSTAGRAM
    }

    fn authorize_url(&self) -> String {
        format!(
            "{}?client_id={}&redirect_uri={}&response_type=code&scope={}",
            self.endpoints.authorize_url,
            urlencoding::encode(&self.client_id),
            urlencoding::encode(&self.redirect_uri),
            urlencoding::encode(&self.endpoints.scopes)
        )
    }

    async fn exchange_code(&self, code: &str) -> ConnectResult<TokenExchangeResult> {
        let params = [
            ("client_id", self.client_id.as_str()),
            ("client_secret", self.client_secret.as_str()),
            ("redirect_uri", self.redirect_uri.as_str()),
            ("grant_type", "authorization_code"),
            ("code", code),
        ];

        let response = shared_client()
            .post(&self.endpoints.short_lived_token_url)
            .form(&params)
            .send()
            .await
            .map_err(|e| ConnectError::ShortExchangeFailed(e.to_string()))?;

        if !response.status().is_success() {
            return Err(ConnectError::ShortExchangeFailed(format!(
                "token endpoint returned {}",
                response.status()
            )));
        }

        let body = response
            .text()
            .await
            .map_err(|e| ConnectError::ShortExchangeFailed(e.to_string()))?;
        Self::parse_token_response(&body, ConnectError::ShortExchangeFailed)
    }

    async fn exchange_long_lived(
        &self,
        short_token: &str,
    ) -> ConnectResult<TokenExchangeResult> {
        let response = shared_client()
            .get(&self.endpoints.long_lived_token_url)
            .query(&[
                ("grant_type", "ig_exchange_token"),
                ("client_secret", self.client_secret.as_str()),
                ("access_token", short_token),
            ])
            .send()
            .await
            .map_err(|e| ConnectError::LongExchangeFailed(e.to_string()))?;

        if !response.status().is_success() {
            return Err(ConnectError::LongExchangeFailed(format!(
                "exchange endpoint returned {}",
                response.status()
            )));
        }

        let body = response
            .text()
            .await
            .map_err(|e| ConnectError::LongExchangeFailed(e.to_string()))?;
        Self::parse_token_response(&body, ConnectError::LongExchangeFailed)
    }

    async fn fetch_identity(&self, access_token: &str) -> ConnectResult<AccountIdentity> {
        let response = shared_client()
            .get(&self.endpoints.profile_url)
            .query(&[("fields", "id,username"), ("access_token", access_token)])
            .send()
            .await
            .map_err(|e| ConnectError::IdentityFetchFailed(e.to_string()))?;

        if !response.status().is_success() {
            return Err(ConnectError::IdentityFetchFailed(format!(
                "profile endpoint returned {}",
                response.status()
            )));
        }

        let body = response
            .text()
            .await
            .map_err(|e| ConnectError::IdentityFetchFailed(e.to_string()))?;
        let value: serde_json::Value = serde_json::from_str(&body)
            .map_err(|e| ConnectError::IdentityFetchFailed(format!("invalid JSON: {e}")))?;
        let profile: GraphProfile = serde_json::from_value(normalize_upstream(value))
            .map_err(|e| ConnectError::IdentityFetchFailed(format!("unexpected shape: {e}")))?;

        if profile.id.is_empty() || profile.username.is_empty() {
            return Err(ConnectError::IdentityFetchFailed(
                "profile response missing id or username".to_owned(),
            ));
        }

        Ok(AccountIdentity {
            platform_user_id: profile.id,
            username: profile.username,
        })
    }

    async fn register_subscriptions(
        &self,
        platform_user_id: &str,
        access_token: &str,
    ) -> ConnectResult<()> {
        let url = format!(
            "{}/{platform_user_id}/subscribed_apps",
            self.endpoints.subscriptions_base_url
        );

        let response = shared_client()
            .post(&url)
            .query(&[
                ("subscribed_fields", self.endpoints.subscribed_fields.as_str()),
                ("access_token", access_token),
            ])
            .send()
            .await
            .map_err(|e| ConnectError::SubscriptionFailed(e.to_string()))?;

        if !response.status().is_success() {
            return Err(ConnectError::SubscriptionFailed(format!(
                "subscription endpoint returned {}",
                response.status()
            )));
        }

        Ok(())
    }
}

// ABOUTME: Credential store collaborator client for persisting connected-account credentials
// ABOUTME: JSON POST with bearer auth; the store owns the credential lifecycle after hand-off
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Campaign Connect

//! Credential persistence
//!
//! The connection flow hands a [`StoredCredential`] off by value to an
//! external system of record. The store sits behind a trait so flow tests
//! can record the hand-off without network.

use async_trait::async_trait;
use tracing::debug;

use crate::config::environment::CredentialStoreConfig;
use crate::errors::{ConnectError, ConnectResult};
use crate::http_client::shared_client;
use crate::models::StoredCredential;

/// Trait seam over the external credential store.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Submit a credential document. The store owns it afterwards.
    async fn store_credential(&self, credential: StoredCredential) -> ConnectResult<()>;
}

/// REST credential store: JSON POST to `<base>/<collection>` with bearer auth.
pub struct RestCredentialStore {
    base_url: String,
    api_token: String,
    collection: String,
}

impl RestCredentialStore {
    /// Create a store client from validated configuration.
    #[must_use]
    pub fn new(config: &CredentialStoreConfig) -> Self {
        Self {
            base_url: config.base_url.trim_end_matches('/').to_owned(),
            api_token: config.api_token.clone(),
            collection: config.collection.clone(),
        }
    }
}

#[async_trait]
impl CredentialStore for RestCredentialStore {
    async fn store_credential(&self, credential: StoredCredential) -> ConnectResult<()> {
        let url = format!("{}/{}", self.base_url, self.collection);
        debug!(
            provider = %credential.provider,
            platform_user_id = %credential.platform_user_id,
            "submitting credential to store"
        );

        let response = shared_client()
            .post(&url)
            .bearer_auth(&self.api_token)
            .json(&credential)
            .send()
            .await
            .map_err(|e| ConnectError::PersistenceFailed(e.to_string()))?;

        if !response.status().is_success() {
            return Err(ConnectError::PersistenceFailed(format!(
                "credential store returned {}",
                response.status()
            )));
        }

        Ok(())
    }
}

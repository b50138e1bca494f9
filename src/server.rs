// ABOUTME: Server resources container and router assembly for the connection service
// ABOUTME: Wires config, platform client, flow, receiver, and sink into one axum application
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Campaign Connect

//! Server assembly
//!
//! [`ServerResources`] is the dependency container shared across handlers
//! via axum `State`. Each inbound request runs independently; the only
//! shared mutable state is the webhook event sink.

use std::sync::Arc;

use axum::Router;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::config::environment::ServerConfig;
use crate::http_client::initialize_shared_client;
use crate::oauth::{ConnectionFlow, GraphApiClient, PlatformOAuthClient};
use crate::persistence::RestCredentialStore;
use crate::routes::{ConnectRoutes, HealthRoutes, WebhookRoutes};
use crate::webhooks::{EventSink, MemoryEventBuffer, WebhookReceiver};

/// Shared dependencies for all route handlers.
pub struct ServerResources {
    /// Platform OAuth client, also used for authorization URLs
    pub platform: Arc<dyn PlatformOAuthClient>,
    /// Connection flow orchestrator
    pub flow: ConnectionFlow,
    /// Webhook receiver
    pub receiver: WebhookReceiver,
    /// Webhook event sink, shared with the receiver
    pub events: Arc<dyn EventSink>,
    /// UI path the flow redirects back to
    pub ui_redirect_path: String,
}

impl ServerResources {
    /// Wire up resources from validated configuration.
    #[must_use]
    pub fn new(config: &ServerConfig) -> Self {
        initialize_shared_client(config.http_timeout_secs, config.http_timeout_secs.min(4));

        let platform: Arc<dyn PlatformOAuthClient> =
            Arc::new(GraphApiClient::new(&config.oauth));
        let store = Arc::new(RestCredentialStore::new(&config.credential_store));
        let events: Arc<dyn EventSink> = Arc::new(MemoryEventBuffer::new());

        Self {
            flow: ConnectionFlow::new(Arc::clone(&platform), store),
            receiver: WebhookReceiver::new(
                config.webhook.verify_token.clone(),
                config.webhook.app_secret.clone(),
                Arc::clone(&events),
            ),
            platform,
            events,
            ui_redirect_path: config.ui_redirect_path.clone(),
        }
    }
}

/// Assemble the full application router.
#[must_use]
pub fn router(resources: Arc<ServerResources>) -> Router {
    Router::new()
        .merge(ConnectRoutes::routes(Arc::clone(&resources)))
        .merge(WebhookRoutes::routes(resources))
        .merge(HealthRoutes::routes())
        .layer(TraceLayer::new_for_http())
}

/// Bind and serve until shutdown.
///
/// # Errors
/// Returns an error if the port cannot be bound or the server fails.
pub async fn serve(resources: Arc<ServerResources>, http_port: u16) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(("0.0.0.0", http_port)).await?;
    info!(http_port, "campaign-connect listening");
    axum::serve(listener, router(resources)).await?;
    Ok(())
}

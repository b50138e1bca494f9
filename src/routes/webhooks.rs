// ABOUTME: Webhook HTTP routes - subscription handshake and signed event deliveries
// ABOUTME: GET answers hub.challenge (or dumps recent events), POST verifies and ingests deliveries
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Campaign Connect

//! Webhook routes
//!
//! - `GET /api/webhooks/{platform}` - subscription handshake; with no
//!   `hub.*` parameters at all it returns a JSON dump of recent buffered
//!   events instead (useful while configuring the platform app)
//! - `POST /api/webhooks/{platform}` - event delivery; 200 on acceptance,
//!   401 when the signature is missing or invalid

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;

use crate::server::ServerResources;
use crate::webhooks::{DeliveryOutcome, SIGNATURE_HEADER};

/// Number of buffered events returned by the dump endpoint
const RECENT_DUMP_LIMIT: usize = 10;

/// Routes for the webhook receiver
pub struct WebhookRoutes;

/// Handshake query parameters pushed by the platform
#[derive(Debug, Deserialize)]
pub struct HubParams {
    /// `hub.mode`, expected to be `"subscribe"`
    #[serde(rename = "hub.mode")]
    pub mode: Option<String>,
    /// `hub.verify_token`, must match the pre-shared secret
    #[serde(rename = "hub.verify_token")]
    pub verify_token: Option<String>,
    /// `hub.challenge`, echoed back verbatim on success
    #[serde(rename = "hub.challenge")]
    pub challenge: Option<String>,
}

impl HubParams {
    fn is_empty(&self) -> bool {
        self.mode.is_none() && self.verify_token.is_none() && self.challenge.is_none()
    }
}

impl WebhookRoutes {
    /// Create all webhook routes
    #[must_use]
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/api/webhooks/{platform}", get(Self::handle_verification))
            .route("/api/webhooks/{platform}", post(Self::handle_delivery))
            .with_state(resources)
    }

    /// Answer the subscription handshake, or dump recent events when no
    /// hub parameters are present.
    async fn handle_verification(
        State(resources): State<Arc<ServerResources>>,
        Path(platform): Path<String>,
        Query(params): Query<HubParams>,
    ) -> Response {
        if params.is_empty() {
            let recent = resources.events.recent(RECENT_DUMP_LIMIT).await;
            let count = resources.events.count().await;
            return Json(serde_json::json!({
                "platform": platform,
                "count": count,
                "recent": recent,
            }))
            .into_response();
        }

        match resources.receiver.verify_challenge(
            params.mode.as_deref(),
            params.verify_token.as_deref(),
            params.challenge.as_deref(),
        ) {
            Some(challenge) => (StatusCode::OK, challenge).into_response(),
            None => (StatusCode::FORBIDDEN, "Forbidden").into_response(),
        }
    }

    /// Verify and ingest one event delivery. The body is taken as raw
    /// bytes; the signature covers them exactly as received.
    async fn handle_delivery(
        State(resources): State<Arc<ServerResources>>,
        Path(platform): Path<String>,
        headers: HeaderMap,
        body: Bytes,
    ) -> StatusCode {
        let signature = headers
            .get(SIGNATURE_HEADER)
            .and_then(|value| value.to_str().ok());

        match resources
            .receiver
            .process_delivery(&platform, signature, &body)
            .await
        {
            DeliveryOutcome::Accepted => StatusCode::OK,
            DeliveryOutcome::Rejected => StatusCode::UNAUTHORIZED,
        }
    }
}

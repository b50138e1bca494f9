// ABOUTME: Connection flow HTTP routes - authorization trigger and OAuth callback
// ABOUTME: The callback runs the full flow and answers with a redirect carrying status parameters
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Campaign Connect

//! Connection flow routes
//!
//! - `GET /api/connect/instagram` - 302 to the platform authorization dialog
//! - `GET /api/connect/instagram/callback?code=...` - runs the connection
//!   flow and 302s back to the UI with `status`/`message` (and on success
//!   `connectedto`/`platform`) query parameters

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use serde::Deserialize;
use tracing::info;

use crate::server::ServerResources;

/// Routes for the connection flow
pub struct ConnectRoutes;

/// Query parameters on the platform's callback redirect
#[derive(Debug, Deserialize)]
pub struct CallbackParams {
    /// Single-use authorization code issued by the platform
    pub code: Option<String>,
}

impl ConnectRoutes {
    /// Create all connection flow routes
    #[must_use]
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/api/connect/instagram", get(Self::handle_authorize))
            .route(
                "/api/connect/instagram/callback",
                get(Self::handle_callback),
            )
            .with_state(resources)
    }

    /// Send the browser to the platform's authorization dialog.
    async fn handle_authorize(State(resources): State<Arc<ServerResources>>) -> Response {
        found(&resources.platform.authorize_url())
    }

    /// Run the connection flow for a platform callback and redirect the
    /// browser back to the UI with the encoded outcome.
    async fn handle_callback(
        State(resources): State<Arc<ServerResources>>,
        Query(params): Query<CallbackParams>,
    ) -> Response {
        let outcome = resources.flow.connect(params.code.as_deref()).await;
        let location = outcome.redirect_target(&resources.ui_redirect_path);
        info!(location, "connection flow terminal redirect");
        found(&location)
    }
}

/// Build a 302 Found redirect. axum's `Redirect` helpers only emit
/// 303/307/308; the browser contract here is a plain 302.
fn found(location: &str) -> Response {
    (StatusCode::FOUND, [(header::LOCATION, location.to_owned())]).into_response()
}

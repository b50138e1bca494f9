// ABOUTME: Integration tests for the webhook receiver HTTP surface
// ABOUTME: Covers the challenge handshake, signature enforcement, tolerant parsing, and the event dump
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Campaign Connect

//! Webhook Route Integration Tests
//!
//! Drives the assembled axum router with in-process requests: handshake
//! verification, signed and unsigned deliveries, and the recent-events
//! dump.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod helpers;

use std::sync::Arc;

use axum::http::StatusCode;
use campaign_connect::config::environment::{
    CredentialStoreConfig, Environment, OAuthConfig, ServerConfig, WebhookConfig,
};
use campaign_connect::server::{router, ServerResources};
use campaign_connect::webhooks::WebhookSignatureValidator;
use helpers::axum_test::AxumTestRequest;

const APP_SECRET: &str = "test-app-secret";
const VERIFY_TOKEN: &str = "test-verify-token";

fn test_config() -> ServerConfig {
    ServerConfig {
        http_port: 0,
        environment: Environment::Testing,
        oauth: OAuthConfig {
            client_id: "app123".to_owned(),
            client_secret: "oauth-secret".to_owned(),
            redirect_uri: "https://dash.example.com/api/connect/instagram/callback".to_owned(),
        },
        webhook: WebhookConfig {
            verify_token: VERIFY_TOKEN.to_owned(),
            app_secret: APP_SECRET.to_owned(),
        },
        credential_store: CredentialStoreConfig {
            base_url: "https://store.example.com/api".to_owned(),
            api_token: "store-token".to_owned(),
            collection: "connected_accounts".to_owned(),
        },
        http_timeout_secs: 8,
        ui_redirect_path: "/connected-accounts".to_owned(),
    }
}

fn test_app() -> (axum::Router, Arc<ServerResources>) {
    let resources = Arc::new(ServerResources::new(&test_config()));
    (router(Arc::clone(&resources)), resources)
}

fn sign(body: &str) -> String {
    WebhookSignatureValidator::new(APP_SECRET.to_owned()).sign(body.as_bytes())
}

// ============================================================================
// Challenge handshake
// ============================================================================

#[tokio::test]
async fn test_challenge_round_trip() {
    let (app, _) = test_app();
    let response = AxumTestRequest::get(&format!(
        "/api/webhooks/instagram?hub.mode=subscribe&hub.verify_token={VERIFY_TOKEN}&hub.challenge=abc123"
    ))
    .send(app)
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.text(), "abc123");
}

#[tokio::test]
async fn test_challenge_wrong_token_forbidden() {
    let (app, _) = test_app();
    let response = AxumTestRequest::get(
        "/api/webhooks/instagram?hub.mode=subscribe&hub.verify_token=wrong&hub.challenge=abc123",
    )
    .send(app)
    .await;

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_challenge_wrong_mode_forbidden() {
    let (app, _) = test_app();
    let response = AxumTestRequest::get(&format!(
        "/api/webhooks/instagram?hub.mode=unsubscribe&hub.verify_token={VERIFY_TOKEN}&hub.challenge=abc123"
    ))
    .send(app)
    .await;

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_dump_without_hub_params() {
    let (app, resources) = test_app();

    let delivery = AxumTestRequest::post("/api/webhooks/instagram")
        .body(r#"{"object":"instagram","entry":[1]}"#)
        .send(app.clone())
        .await;
    assert_eq!(delivery.status(), StatusCode::OK);

    let response = AxumTestRequest::get("/api/webhooks/instagram").send(app).await;
    assert_eq!(response.status(), StatusCode::OK);

    let dump = response.json();
    assert_eq!(dump["platform"], "instagram");
    assert_eq!(dump["count"], 1);
    assert_eq!(dump["recent"][0]["parsed_body"]["object"], "instagram");
    assert_eq!(resources.events.count().await, 1);
}

// ============================================================================
// Event delivery
// ============================================================================

#[tokio::test]
async fn test_signed_delivery_accepted() {
    let (app, resources) = test_app();
    let body = r#"{"object":"page","entry":[]}"#;

    let response = AxumTestRequest::post("/api/webhooks/facebook")
        .header("x-hub-signature", &sign(body))
        .body(body)
        .send(app)
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(resources.events.count().await, 1);
    let recent = resources.events.recent(1).await;
    assert_eq!(recent[0].raw_body, body);
}

#[tokio::test]
async fn test_invalid_signature_rejected_and_not_stored() {
    let (app, resources) = test_app();
    let body = r#"{"object":"page"}"#;

    let response = AxumTestRequest::post("/api/webhooks/facebook")
        .header(
            "x-hub-signature",
            "sha1=0000000000000000000000000000000000000000",
        )
        .body(body)
        .send(app)
        .await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(resources.events.count().await, 0);
}

#[tokio::test]
async fn test_signed_platform_requires_header() {
    let (app, resources) = test_app();

    let response = AxumTestRequest::post("/api/webhooks/facebook")
        .body(r#"{"object":"page"}"#)
        .send(app)
        .await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(resources.events.count().await, 0);
}

#[tokio::test]
async fn test_unsigned_platform_accepts_without_header() {
    let (app, resources) = test_app();

    let response = AxumTestRequest::post("/api/webhooks/instagram")
        .body(r#"{"object":"instagram"}"#)
        .send(app)
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(resources.events.count().await, 1);
}

#[tokio::test]
async fn test_unsigned_platform_still_verifies_present_header() {
    let (app, resources) = test_app();

    let response = AxumTestRequest::post("/api/webhooks/instagram")
        .header("x-hub-signature", "sha1=deadbeef")
        .body(r#"{"object":"instagram"}"#)
        .send(app)
        .await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(resources.events.count().await, 0);
}

#[tokio::test]
async fn test_non_utf8_delivery_accepted() {
    let (app, resources) = test_app();
    let body: &[u8] = &[0xff, 0xfe, 0x01];

    let response = AxumTestRequest::post("/api/webhooks/instagram")
        .body_bytes(body)
        .send(app)
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    let recent = resources.events.recent(1).await;
    assert_eq!(recent[0].parsed_body, serde_json::json!({}));
}

#[tokio::test]
async fn test_non_utf8_signed_delivery_verifies_raw_bytes() {
    let (app, resources) = test_app();
    let body: &[u8] = &[0xff, 0xfe, 0x01];
    let signature =
        WebhookSignatureValidator::new(APP_SECRET.to_owned()).sign(body);

    let response = AxumTestRequest::post("/api/webhooks/facebook")
        .header("x-hub-signature", &signature)
        .body_bytes(body)
        .send(app)
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(resources.events.count().await, 1);
}

#[tokio::test]
async fn test_malformed_payload_substitutes_empty_object() {
    let (app, resources) = test_app();

    let response = AxumTestRequest::post("/api/webhooks/instagram")
        .body("this is not json")
        .send(app)
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    let recent = resources.events.recent(1).await;
    assert_eq!(recent[0].parsed_body, serde_json::json!({}));
    assert_eq!(recent[0].raw_body, "this is not json");
}

// ============================================================================
// Connection flow surface (no outbound calls involved)
// ============================================================================

#[tokio::test]
async fn test_callback_without_code_redirects_with_error() {
    let (app, _) = test_app();

    let response = AxumTestRequest::get("/api/connect/instagram/callback")
        .send(app)
        .await;

    assert_eq!(response.status(), StatusCode::FOUND);
    let location = response.location().unwrap();
    assert!(location.starts_with("/connected-accounts?status=error&message="));
    assert!(location.contains("Authorization%20code%20missing"));
}

#[tokio::test]
async fn test_authorize_redirects_to_platform_dialog() {
    let (app, _) = test_app();

    let response = AxumTestRequest::get("/api/connect/instagram").send(app).await;

    assert_eq!(response.status(), StatusCode::FOUND);
    let location = response.location().unwrap();
    assert!(location.starts_with("https://www.instagram.com/oauth/authorize?client_id=app123"));
}

#[tokio::test]
async fn test_health_endpoint() {
    let (app, _) = test_app();
    let response = AxumTestRequest::get("/health").send(app).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.json()["status"], "healthy");
}

// ABOUTME: Route module organization for the connection service HTTP endpoints
// ABOUTME: Thin handlers per domain that delegate to the flow and receiver layers
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Campaign Connect

//! HTTP routes
//!
//! Each domain module contains only route definitions and thin handler
//! functions; the flow and receiver layers own the behavior.

/// Connection flow trigger and callback routes
pub mod connect;
/// Health check and readiness routes
pub mod health;
/// Webhook handshake and delivery routes
pub mod webhooks;

pub use connect::ConnectRoutes;
pub use health::HealthRoutes;
pub use webhooks::WebhookRoutes;

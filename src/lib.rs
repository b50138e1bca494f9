// ABOUTME: Main library entry point for the campaign-connect service
// ABOUTME: Provides platform OAuth connection flows and webhook ingestion for the campaign dashboard
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Campaign Connect

#![deny(unsafe_code)]

//! # Campaign Connect
//!
//! Backend connection service for the social-media campaign dashboard.
//! The dashboard UI triggers a platform authorization dialog; the platform
//! redirects back here with an authorization code, and this service runs the
//! full connection flow: token exchange (short-lived, then long-lived),
//! account identity resolution, credential persistence, and webhook
//! subscription registration. Independently, it receives platform-pushed
//! webhook events after verifying their authenticity.
//!
//! ## Architecture
//!
//! - **oauth**: Connection flow state machine and the Graph API client
//! - **webhooks**: Challenge handshake, signature verification, event sink
//! - **persistence**: Credential hand-off to the external system of record
//! - **routes**: Axum HTTP surface consumed by the platform and the UI
//! - **config**: Environment-driven configuration, validated at startup
//!
//! ## Example
//!
//! ```rust,no_run
//! use campaign_connect::config::environment::ServerConfig;
//!
//! fn main() -> anyhow::Result<()> {
//!     let config = ServerConfig::from_env()?;
//!     println!("campaign-connect configured on port {}", config.http_port);
//!     Ok(())
//! }
//! ```

/// Environment-driven configuration, validated at process start
pub mod config;

/// Unified failure taxonomy for the connection flow and webhook receiver
pub mod errors;

/// Shared pooled HTTP client for outbound platform calls
pub mod http_client;

/// Logging configuration and structured logging setup
pub mod logging;

/// Core data model: tokens, identities, credentials, outcomes, envelopes
pub mod models;

/// OAuth connection flow and platform client implementations
pub mod oauth;

/// Credential store collaborator client
pub mod persistence;

/// HTTP routes for the connection flow and webhook receiver
pub mod routes;

/// Server resources and router assembly
pub mod server;

/// Webhook challenge verification, signature validation, and event sink
pub mod webhooks;

// ABOUTME: Configuration module for environment-driven service settings
// ABOUTME: Exposes the validated ServerConfig built once at process start
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Campaign Connect

//! Configuration management for the connection service

/// Environment-based configuration, validated at startup
pub mod environment;

pub use environment::{
    CredentialStoreConfig, Environment, OAuthConfig, ServerConfig, WebhookConfig,
};

// ABOUTME: Logging configuration and structured logging setup for observability
// ABOUTME: Pretty output in development, JSON in production, env-filter controlled levels
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Campaign Connect

//! Structured logging setup
//!
//! Initialized once by the server binary before configuration loads, so
//! configuration failures are themselves logged.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::environment::Environment;

/// Initialize the global tracing subscriber.
///
/// Level filtering follows `RUST_LOG` with an `info` default. Production
/// instances emit JSON lines for log aggregation; everything else gets the
/// pretty human format.
pub fn init(environment: &Environment) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    if environment.is_production() {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }

    tracing::info!(%environment, "logging initialized");
}

// ABOUTME: Server binary for the campaign-connect service
// ABOUTME: Loads environment configuration, initializes logging, and serves the HTTP surface
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Campaign Connect

//! # Campaign Connect Server Binary
//!
//! Starts the connection service: OAuth callback flow and webhook receiver.
//! Configuration is environment-only; missing required variables fail fast
//! before the listener binds.

use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use tracing::error;

use campaign_connect::config::environment::{Environment, ServerConfig};
use campaign_connect::logging;
use campaign_connect::server::{serve, ServerResources};

#[derive(Parser)]
#[command(name = "campaign-connect-server")]
#[command(about = "Campaign dashboard connection service - platform OAuth and webhook ingestion")]
struct Args {
    /// Override HTTP port
    #[arg(long)]
    http_port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Logging first so configuration failures are themselves logged.
    let environment = Environment::from_str_or_default(
        &std::env::var("ENVIRONMENT").unwrap_or_default(),
    );
    logging::init(&environment);

    let mut config = match ServerConfig::from_env() {
        Ok(config) => config,
        Err(err) => {
            error!(error = %err, "startup aborted: configuration invalid");
            return Err(err.into());
        }
    };
    if let Some(port) = args.http_port {
        config.http_port = port;
    }

    let resources = Arc::new(ServerResources::new(&config));
    serve(resources, config.http_port).await
}

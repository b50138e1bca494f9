// ABOUTME: Event sink seam decoupling webhook ingestion from storage
// ABOUTME: In-memory buffer implementation, newest-first, placeholder for a durable queue
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Campaign Connect

//! Webhook event sink
//!
//! Ingestion must not block on storage: the receiver appends envelopes
//! through [`EventSink`] and acks the platform regardless of sink outcome.
//! [`MemoryEventBuffer`] is the process-local placeholder; a durable queue
//! or append-only log belongs behind the same trait in production.

use std::collections::VecDeque;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::models::WebhookEnvelope;

/// Destination for accepted webhook envelopes.
#[async_trait]
pub trait EventSink: Send + Sync {
    /// Append one envelope. Must tolerate concurrent appends.
    async fn append(&self, envelope: WebhookEnvelope);

    /// Most recent envelopes, newest first, up to `limit`.
    async fn recent(&self, limit: usize) -> Vec<WebhookEnvelope>;

    /// Number of buffered envelopes.
    async fn count(&self) -> usize;
}

/// Process-local event buffer.
///
/// Ordering is reverse-insertion (newest first). No eviction: the buffer
/// grows unbounded and does not survive restarts, a documented limitation
/// of this placeholder implementation.
#[derive(Default)]
pub struct MemoryEventBuffer {
    events: RwLock<VecDeque<WebhookEnvelope>>,
}

impl MemoryEventBuffer {
    /// Create an empty buffer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl EventSink for MemoryEventBuffer {
    async fn append(&self, envelope: WebhookEnvelope) {
        self.events.write().await.push_front(envelope);
    }

    async fn recent(&self, limit: usize) -> Vec<WebhookEnvelope> {
        self.events
            .read()
            .await
            .iter()
            .take(limit)
            .cloned()
            .collect()
    }

    async fn count(&self) -> usize {
        self.events.read().await.len()
    }
}

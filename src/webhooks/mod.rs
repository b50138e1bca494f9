// ABOUTME: Webhook receiver handling the subscription handshake and signed event deliveries
// ABOUTME: Verify authenticity, tolerate malformed payloads, store-then-ack to avoid redelivery storms
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Campaign Connect

//! # Webhook Receiver
//!
//! Two operations, both invoked directly by the platform:
//!
//! - **Challenge verification**: the subscription handshake echoes
//!   `hub.challenge` back when `hub.mode` is `"subscribe"` and the verify
//!   token matches the pre-shared secret.
//! - **Event delivery**: signed deliveries are verified against
//!   `X-Hub-Signature` before the body is touched. Accepted bodies parse
//!   tolerantly (empty or invalid payloads become an empty object, some
//!   providers send non-JSON during configuration checks), the envelope
//!   goes to the sink, and the request is acked 200 regardless of sink
//!   outcome. The platform retries on non-2xx, so store-then-ack is the
//!   required contract.

/// Signature validation
pub mod signature;
/// Event sink and the in-memory buffer
pub mod sink;

pub use signature::{SignatureValidation, WebhookSignatureValidator, SIGNATURE_HEADER};
pub use sink::{EventSink, MemoryEventBuffer};

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, warn};

use crate::models::WebhookEnvelope;

/// Platforms whose deliveries must always carry a valid signature
const SIGNED_PLATFORMS: &[&str] = &["facebook"];

/// Result of processing one event delivery
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryOutcome {
    /// Envelope accepted and handed to the sink
    Accepted,
    /// Signature missing or invalid; body not processed
    Rejected,
}

/// Processes webhook handshakes and deliveries.
pub struct WebhookReceiver {
    verify_token: String,
    validator: WebhookSignatureValidator,
    sink: Arc<dyn EventSink>,
}

impl WebhookReceiver {
    /// Create a receiver over the pre-shared verify token, the signing
    /// secret, and an event sink.
    #[must_use]
    pub fn new(verify_token: String, app_secret: String, sink: Arc<dyn EventSink>) -> Self {
        Self {
            verify_token,
            validator: WebhookSignatureValidator::new(app_secret),
            sink,
        }
    }

    /// Whether deliveries from this platform must be signed.
    #[must_use]
    pub fn requires_signature(platform: &str) -> bool {
        SIGNED_PLATFORMS.contains(&platform)
    }

    /// Verify a subscription handshake.
    ///
    /// Returns the challenge to echo when `mode` is `"subscribe"`, the
    /// verify token matches, and a non-empty challenge is present.
    #[must_use]
    pub fn verify_challenge(
        &self,
        mode: Option<&str>,
        verify_token: Option<&str>,
        challenge: Option<&str>,
    ) -> Option<String> {
        let challenge = challenge.filter(|c| !c.is_empty())?;
        if mode == Some("subscribe") && verify_token == Some(self.verify_token.as_str()) {
            Some(challenge.to_owned())
        } else {
            None
        }
    }

    /// Process one event delivery.
    ///
    /// Signature policy: platforms in the signed set must present a valid
    /// signature; for other platforms a signature is verified when present
    /// and absence is accepted.
    ///
    /// `raw_body` is the exact request body bytes; the HMAC runs over them
    /// unmodified. Bodies need not be UTF-8: the stored text is a lossy
    /// conversion, and non-JSON content parses to an empty object.
    pub async fn process_delivery(
        &self,
        platform: &str,
        signature_header: Option<&str>,
        raw_body: &[u8],
    ) -> DeliveryOutcome {
        if Self::requires_signature(platform) || signature_header.is_some() {
            match self.validator.validate(signature_header, raw_body) {
                SignatureValidation::Valid => {}
                result => {
                    warn!(platform, ?result, "webhook delivery rejected");
                    return DeliveryOutcome::Rejected;
                }
            }
        }

        let body_text = String::from_utf8_lossy(raw_body).into_owned();
        let envelope = WebhookEnvelope {
            platform: platform.to_owned(),
            received_at: Utc::now(),
            parsed_body: tolerant_parse(&body_text),
            raw_body: body_text,
        };

        debug!(platform, bytes = raw_body.len(), "webhook delivery accepted");
        self.sink.append(envelope).await;
        DeliveryOutcome::Accepted
    }
}

/// Parse a delivery body, substituting an empty object for empty or
/// invalid payloads.
fn tolerant_parse(raw: &str) -> serde_json::Value {
    if raw.is_empty() {
        return serde_json::Value::Object(serde_json::Map::new());
    }
    serde_json::from_str(raw)
        .unwrap_or_else(|_| serde_json::Value::Object(serde_json::Map::new()))
}

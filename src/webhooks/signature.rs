// ABOUTME: X-Hub-Signature validation for platform webhook deliveries
// ABOUTME: HMAC-SHA1 over the exact raw body, constant-time comparison, never string equality
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Campaign Connect

//! Webhook signature validation
//!
//! Platforms sign deliveries with `X-Hub-Signature: sha1=<hex>` where the
//! hex digest is HMAC-SHA1 over the exact raw (unparsed) request body under
//! the shared application secret. Validation recomputes the digest and
//! compares constant-time: equal-length check first, then timing-safe
//! equality via `subtle`.

use ring::hmac;

/// Header carrying the delivery signature
pub const SIGNATURE_HEADER: &str = "x-hub-signature";

/// Scheme prefix on the signature header value
const SIGNATURE_PREFIX: &str = "sha1=";

/// Webhook signature validation result
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignatureValidation {
    /// Signature is valid
    Valid,
    /// Signature is present but does not match the body
    Invalid,
    /// Signature header is missing
    Missing,
    /// No signing secret configured; validation cannot be performed
    NotConfigured,
}

/// Validates `X-Hub-Signature` headers against raw delivery bodies.
pub struct WebhookSignatureValidator {
    app_secret: String,
}

impl WebhookSignatureValidator {
    /// Create a validator over the shared application secret.
    #[must_use]
    pub const fn new(app_secret: String) -> Self {
        Self { app_secret }
    }

    /// Validate a delivery signature.
    ///
    /// # Arguments
    /// * `signature_header` - value of the `X-Hub-Signature` header
    /// * `body` - exact raw request body bytes
    #[must_use]
    pub fn validate(&self, signature_header: Option<&str>, body: &[u8]) -> SignatureValidation {
        if self.app_secret.is_empty() {
            return SignatureValidation::NotConfigured;
        }

        let Some(header) = signature_header else {
            return SignatureValidation::Missing;
        };

        let Some(sig_hex) = header.strip_prefix(SIGNATURE_PREFIX) else {
            return SignatureValidation::Invalid;
        };

        let key = hmac::Key::new(
            hmac::HMAC_SHA1_FOR_LEGACY_USE_ONLY,
            self.app_secret.as_bytes(),
        );
        let tag = hmac::sign(&key, body);
        let expected = hex::encode(tag.as_ref());

        // Length check leaks only the digest length, which is public.
        if sig_hex.len() != expected.len() {
            return SignatureValidation::Invalid;
        }

        if subtle::ConstantTimeEq::ct_eq(sig_hex.as_bytes(), expected.as_bytes()).into() {
            SignatureValidation::Valid
        } else {
            SignatureValidation::Invalid
        }
    }

    /// Compute the header value this validator expects for a body.
    ///
    /// Used by tests and by operators reproducing platform signatures.
    #[must_use]
    pub fn sign(&self, body: &[u8]) -> String {
        let key = hmac::Key::new(
            hmac::HMAC_SHA1_FOR_LEGACY_USE_ONLY,
            self.app_secret.as_bytes(),
        );
        let tag = hmac::sign(&key, body);
        format!("{SIGNATURE_PREFIX}{}", hex::encode(tag.as_ref()))
    }
}

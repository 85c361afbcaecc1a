//! Webhook signature verification
//!
//! A delivery carries two headers:
//! - `X-Skydropx-Signature`: hex HMAC-SHA512, optionally prefixed `sha512=`
//! - `X-Skydropx-Timestamp`: Unix seconds at signing time
//!
//! The MAC covers `timestamp + "." + raw_body` byte-for-byte, so the body
//! must be verified before any JSON parsing.

use hmac::{Hmac, Mac};
use sha2::Sha512;
use skydropx_domain::constants::{SIGNATURE_PREFIX, WEBHOOK_TOLERANCE_SECS};
use subtle::ConstantTimeEq;
use thiserror::Error;

use crate::time::{Clock, SystemClock};

type HmacSha512 = Hmac<Sha512>;

/// Reason a webhook delivery was rejected
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SignatureError {
    #[error("Missing signature or timestamp")]
    MissingSignature,

    #[error("Missing signature or timestamp")]
    MissingTimestamp,

    #[error("Invalid timestamp")]
    InvalidTimestamp,

    /// `skew_secs` is `now - timestamp`; negative for future timestamps
    #[error("Timestamp too old")]
    TimestampOutOfWindow { skew_secs: i64 },

    #[error("Invalid signature")]
    InvalidSignature,
}

/// Verifies webhook deliveries against one shared secret
#[derive(Debug, Clone)]
pub struct WebhookVerifier<C: Clock = SystemClock> {
    secret: String,
    tolerance_secs: i64,
    clock: C,
}

impl WebhookVerifier<SystemClock> {
    #[must_use]
    pub fn new(secret: impl Into<String>) -> Self {
        Self::with_clock(secret, SystemClock)
    }
}

impl<C: Clock> WebhookVerifier<C> {
    #[must_use]
    pub fn with_clock(secret: impl Into<String>, clock: C) -> Self {
        Self {
            secret: secret.into(),
            tolerance_secs: WEBHOOK_TOLERANCE_SECS,
            clock,
        }
    }

    /// Override the replay window (seconds, applied in both directions)
    #[must_use]
    pub fn with_tolerance(mut self, tolerance_secs: i64) -> Self {
        self.tolerance_secs = tolerance_secs;
        self
    }

    #[must_use]
    pub fn tolerance_secs(&self) -> i64 {
        self.tolerance_secs
    }

    /// Verify one delivery
    ///
    /// # Errors
    /// Returns the first failed check, in order: headers present, timestamp
    /// parses, timestamp inside the window, signature matches.
    pub fn verify(
        &self,
        signature: Option<&str>,
        timestamp: Option<&str>,
        raw_body: &[u8],
    ) -> Result<(), SignatureError> {
        let (signature, timestamp) =
            check_envelope(signature, timestamp, self.clock.unix_timestamp(), self.tolerance_secs)?;

        let expected = compute_signature(&self.secret, timestamp, raw_body);
        let provided = signature.strip_prefix(SIGNATURE_PREFIX).unwrap_or(signature);

        // Length is not secret (always 128 hex chars), only the content is
        if expected.len() != provided.len() {
            return Err(SignatureError::InvalidSignature);
        }
        if bool::from(expected.as_bytes().ct_eq(provided.as_bytes())) {
            Ok(())
        } else {
            Err(SignatureError::InvalidSignature)
        }
    }
}

/// Check headers and replay window without touching the MAC
///
/// Returns the two header values on success. Receivers running without a
/// secret still apply these checks.
///
/// # Errors
/// See [`SignatureError`]; an empty header counts as missing.
pub fn check_envelope<'a>(
    signature: Option<&'a str>,
    timestamp: Option<&'a str>,
    now: i64,
    tolerance_secs: i64,
) -> Result<(&'a str, &'a str), SignatureError> {
    let signature = signature
        .filter(|s| !s.is_empty())
        .ok_or(SignatureError::MissingSignature)?;
    let timestamp = timestamp
        .filter(|t| !t.is_empty())
        .ok_or(SignatureError::MissingTimestamp)?;

    let issued: i64 = timestamp.parse().map_err(|_| SignatureError::InvalidTimestamp)?;

    let skew_secs = now.saturating_sub(issued);
    if skew_secs.saturating_abs() > tolerance_secs {
        return Err(SignatureError::TimestampOutOfWindow { skew_secs });
    }

    Ok((signature, timestamp))
}

/// Hex HMAC-SHA512 of `timestamp + "." + raw_body`
#[must_use]
pub fn compute_signature(secret: &str, timestamp: &str, raw_body: &[u8]) -> String {
    // HMAC takes keys of any length; an empty result never matches a header
    let Ok(mut mac) = HmacSha512::new_from_slice(secret.as_bytes()) else {
        return String::new();
    };
    mac.update(timestamp.as_bytes());
    mac.update(b".");
    mac.update(raw_body);
    hex::encode(mac.finalize().into_bytes())
}

/// Boolean form of [`WebhookVerifier::verify`] against the system clock
#[must_use]
pub fn verify_webhook_signature(
    signature: Option<&str>,
    timestamp: Option<&str>,
    raw_body: &[u8],
    secret: &str,
) -> bool {
    WebhookVerifier::new(secret).verify(signature, timestamp, raw_body).is_ok()
}

//! Security primitives
//!
//! Currently a single concern: authenticating inbound webhook deliveries
//! through their HMAC-SHA512 signature and timestamp headers.

pub mod webhook;

pub use webhook::{
    check_envelope, compute_signature, verify_webhook_signature, SignatureError, WebhookVerifier,
};

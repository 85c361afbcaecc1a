//! Common primitives shared across Skydropx crates.
//!
//! # Feature Tiers
//!
//! Enable cargo features to opt into the tiers you need:
//! - `foundation`: clock abstraction, token types
//! - `runtime`: async token manager with single-flight refresh
//! - `security`: webhook signature verification (HMAC-SHA512)
//! - `observability`: tracing subscriber bootstrap (not included by default)

#![forbid(unsafe_code)]
#![warn(rust_2018_idioms)]
#![warn(clippy::all, clippy::perf, clippy::complexity, clippy::suspicious)]

// Foundation tier
// -----------------------------------------------------------------
#[cfg(feature = "foundation")]
pub mod time;

// Runtime tier
// --------------------------------------------------------------------
#[cfg(feature = "runtime")]
pub mod auth;
#[cfg(feature = "observability")]
pub mod observability;

// Security tier
// -------------------------------------------------------------------
#[cfg(feature = "security")]
pub mod security;

// Re-export commonly used types and traits for convenience
// ------------------------
#[cfg(feature = "runtime")]
pub use auth::{TokenManager, TokenPhase, TokenResponse, TokenSet};
#[cfg(feature = "observability")]
pub use observability::{init_tracing, LogFormat};
#[cfg(feature = "security")]
pub use security::{verify_webhook_signature, SignatureError, WebhookVerifier};
#[cfg(feature = "foundation")]
pub use time::{Clock, MockClock, SystemClock};

//! # Skydropx Infrastructure
//!
//! Everything that performs I/O for the Skydropx API client.
//!
//! This crate contains:
//! - HTTP transport with per-client default headers (`http`)
//! - Authenticated request pipeline and endpoint surface (`api`)
//! - Configuration loading from environment and files (`config`)
//! - Inbound webhook receiver built on axum (`webhooks`)
//!
//! ## Architecture
//! - Token bookkeeping and signature checks come from `skydropx-common`
//! - Data shapes and configuration structs come from `skydropx-domain`

pub mod api;
pub mod config;
pub mod http;
pub mod webhooks;

// Re-export commonly used items
pub use api::{ApiError, ApiErrorKind, ApiRequest, ClientInfo, PollOptions, SkydropxClient};
pub use http::HttpClient;
pub use webhooks::{router, LoggingEventHandler, WebhookEvent, WebhookEventHandler, WebhookState};

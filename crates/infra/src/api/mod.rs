//! Skydropx API client
//!
//! This module provides the authenticated HTTP client for the Skydropx API.
//!
//! # Architecture
//!
//! - Uses the `http` transport (no direct reqwest client per call)
//! - OAuth client credentials with automatic, single-flight token renewal
//! - One attempt per call; no retry or circuit breaking in this layer
//! - Endpoint methods are thin wrappers over [`SkydropxClient::request`]
//! - Polling helper for asynchronous quotations

pub mod client;
pub mod endpoints;
pub mod errors;
pub mod polling;
pub mod request;

pub use client::{ClientInfo, SkydropxClient};
pub use errors::{ApiError, ApiErrorKind};
pub use polling::PollOptions;
pub use request::ApiRequest;

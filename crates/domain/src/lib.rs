//! # Skydropx Domain
//!
//! Domain types and models for the Skydropx shipping API client.
//!
//! This crate contains:
//! - Client identity (`ClientCredentials`, `Environment`)
//! - Configuration structures
//! - Request payloads for quotations, tracking and pickups
//! - Domain error types and Result definitions
//!
//! ## Architecture
//! - No dependencies on other Skydropx crates
//! - No I/O; only external data-modelling dependencies
//! - Pure domain models and data structures

pub mod config;
pub mod constants;
pub mod errors;
pub mod types;

// Re-export commonly used items
pub use config::*;
pub use errors::*;
pub use types::*;

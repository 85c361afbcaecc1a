//! OAuth client-credentials token lifecycle
//!
//! This module holds the access token of one API client and decides when it
//! must be renewed. It performs no HTTP itself: the caller supplies the
//! exchange as a future, which keeps the HTTP pipeline in the infra crate and
//! lets the token logic be tested without a server.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────┐
//! │  TokenManager    │  Mutex-guarded state machine (single-flight refresh)
//! └────────┬─────────┘
//!          │
//!          ├──► TokenState     Absent | Valid(TokenSet)
//!          ├──► Clock          Freshness reads (mockable)
//!          └──► refresh future Supplied by the HTTP pipeline
//! ```
//!
//! # Freshness
//!
//! A token is fresh only while `now < expires_at - margin`, with a default
//! margin of five minutes. Every freshness check in the workspace goes
//! through [`TokenSet::is_fresh_at`].

pub mod token_manager;
pub mod types;

pub use token_manager::{TokenManager, TokenPhase, TokenState};
pub use types::{TokenResponse, TokenSet};

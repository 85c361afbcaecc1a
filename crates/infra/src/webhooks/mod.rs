//! Inbound webhooks
//!
//! Deliveries are authenticated with [`skydropx_common::security`] against
//! the raw body bytes, then parsed into [`WebhookEvent`] and handed to a
//! [`WebhookEventHandler`]. Handler failures never change the 200
//! acknowledgment.

pub mod events;
pub mod receiver;

pub use events::{EventCategory, HandlerError, LoggingEventHandler, WebhookEvent, WebhookEventHandler};
pub use receiver::{router, WebhookState};
pub use skydropx_common::SignatureError;

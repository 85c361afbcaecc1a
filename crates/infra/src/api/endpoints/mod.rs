//! Endpoint surface
//!
//! Thin mappings of (verb, path, body) onto [`SkydropxClient::request`].
//! Bodies are any `Serialize` value: the typed payloads from
//! `skydropx-domain` or a raw `serde_json::Value`.
//!
//! [`SkydropxClient::request`]: crate::api::SkydropxClient::request

mod pickups;
mod quotations;
mod shipments;
mod tracking;
mod webhooks;

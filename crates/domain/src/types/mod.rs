//! Domain types and models
//!
//! Client identity lives in [`credentials`]; request payloads accepted by
//! the endpoint surface live in [`shipping`].

pub mod credentials;
pub mod shipping;

pub use credentials::{ClientCredentials, Environment};
pub use shipping::{Address, Package, PickupCoverageRequest, QuotationRequest, TrackingQuery};

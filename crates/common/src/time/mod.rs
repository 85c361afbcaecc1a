//! Time utilities
//!
//! Wall-clock abstraction so token freshness and webhook replay windows can
//! be tested without sleeping.

pub mod clock;

pub use clock::{Clock, MockClock, SystemClock};

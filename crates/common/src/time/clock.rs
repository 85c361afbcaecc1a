//! Clock abstraction for testability
//!
//! Token freshness and webhook timestamp checks both compare against "now".
//! Production code uses [`SystemClock`]; tests drive a [`MockClock`] to
//! move time forward deterministically.

use std::sync::{Arc, Mutex};

use chrono::{DateTime, Duration, TimeZone, Utc};

/// Trait for wall-clock reads to enable deterministic testing
pub trait Clock: Send + Sync + 'static {
    /// Current UTC time
    fn now(&self) -> DateTime<Utc>;

    /// Seconds since the UNIX epoch
    fn unix_timestamp(&self) -> i64 {
        self.now().timestamp()
    }
}

/// Real system clock implementation for production use
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Implement Clock for Arc<T> where T: Clock for convenient sharing
impl<T: Clock> Clock for Arc<T> {
    fn now(&self) -> DateTime<Utc> {
        (**self).now()
    }
}

/// Mock clock for deterministic testing
///
/// Clones share the same underlying time, so a test can keep one handle and
/// hand another to the component under test.
#[derive(Debug, Clone)]
pub struct MockClock {
    current: Arc<Mutex<DateTime<Utc>>>,
}

impl MockClock {
    /// Create a mock clock frozen at the current system time
    #[must_use]
    pub fn new() -> Self {
        Self::at(Utc::now())
    }

    /// Create a mock clock frozen at a specific instant
    #[must_use]
    pub fn at(start: DateTime<Utc>) -> Self {
        Self { current: Arc::new(Mutex::new(start)) }
    }

    /// Create a mock clock at a UNIX timestamp (seconds)
    #[must_use]
    pub fn at_unix(seconds: i64) -> Self {
        Self::at(Utc.timestamp_opt(seconds, 0).single().unwrap_or_default())
    }

    /// Advance the clock; negative durations move it backwards
    pub fn advance(&self, duration: Duration) {
        if let Ok(mut current) = self.current.lock() {
            *current += duration;
        }
    }

    /// Advance the clock by whole seconds (convenience method)
    pub fn advance_secs(&self, seconds: i64) {
        self.advance(Duration::seconds(seconds));
    }

    /// Jump to a specific instant
    pub fn set(&self, instant: DateTime<Utc>) {
        if let Ok(mut current) = self.current.lock() {
            *current = instant;
        }
    }
}

impl Default for MockClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for MockClock {
    fn now(&self) -> DateTime<Utc> {
        self.current.lock().map(|c| *c).unwrap_or_else(|poisoned| *poisoned.into_inner())
    }
}

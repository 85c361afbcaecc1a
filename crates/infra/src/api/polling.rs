//! Quotation polling
//!
//! Quotations are priced asynchronously: the create call returns at once and
//! `is_completed` flips to `true` once every carrier has answered.

use std::time::Duration;

use serde_json::Value;
use skydropx_common::time::Clock;
use skydropx_domain::constants::{DEFAULT_POLL_INTERVAL_SECS, DEFAULT_POLL_MAX_ATTEMPTS};
use tracing::{debug, info, instrument, warn};

use super::{ApiError, SkydropxClient};

/// Bounds of a polling loop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollOptions {
    pub max_attempts: u32,
    /// Sleep after each attempt that did not complete
    pub interval: Duration,
}

impl Default for PollOptions {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_POLL_MAX_ATTEMPTS,
            interval: Duration::from_secs(DEFAULT_POLL_INTERVAL_SECS),
        }
    }
}

impl<C: Clock> SkydropxClient<C> {
    /// Poll a quotation until it reports `is_completed`
    ///
    /// Makes at most `options.max_attempts` calls, sleeping
    /// `options.interval` after each incomplete result.
    ///
    /// # Errors
    /// Any error of the underlying call is returned immediately; running out
    /// of attempts yields the polling timeout error (no status code).
    #[instrument(skip(self, options), fields(max_attempts = options.max_attempts))]
    pub async fn wait_for_quotation(
        &self,
        quotation_id: &str,
        options: PollOptions,
    ) -> Result<Value, ApiError> {
        for attempt in 1..=options.max_attempts {
            let quotation = self.get_quotation(quotation_id).await?;

            if is_completed(&quotation) {
                info!(attempt, "Quotation completed");
                return Ok(quotation);
            }

            debug!(attempt, "Quotation still in progress");
            tokio::time::sleep(options.interval).await;
        }

        warn!("Gave up waiting for quotation");
        Err(ApiError::polling())
    }

    /// [`Self::wait_for_quotation`] with 15 attempts two seconds apart
    pub async fn wait_for_quotation_default(&self, quotation_id: &str) -> Result<Value, ApiError> {
        self.wait_for_quotation(quotation_id, PollOptions::default()).await
    }
}

fn is_completed(quotation: &Value) -> bool {
    quotation.get("is_completed").and_then(Value::as_bool).unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_default_options() {
        let options = PollOptions::default();
        assert_eq!(options.max_attempts, 15);
        assert_eq!(options.interval, Duration::from_secs(2));
    }

    #[test]
    fn test_is_completed() {
        assert!(is_completed(&json!({"id": "q", "is_completed": true})));
        assert!(!is_completed(&json!({"id": "q", "is_completed": false})));
        assert!(!is_completed(&json!({"id": "q"})));
        assert!(!is_completed(&json!({"is_completed": "true"})));
    }
}

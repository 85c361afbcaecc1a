//! OAuth token types
//!
//! `TokenResponse` is the wire shape of `/oauth/token`; `TokenSet` is what the
//! token manager keeps after stamping an absolute expiry on it.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use skydropx_domain::constants::DEFAULT_TOKEN_LIFETIME_SECS;

/// Access token with an absolute expiry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenSet {
    /// Bearer token for API authentication
    pub access_token: String,

    /// Token type (always "Bearer" for this API)
    pub token_type: String,

    /// Lifetime granted by the server, in seconds
    pub expires_in: i64,

    /// Absolute expiration timestamp (UTC)
    pub expires_at: DateTime<Utc>,

    /// Granted scopes (space-separated)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,
}

impl TokenSet {
    /// Create a token issued at `issued_at` that lives `expires_in` seconds
    ///
    /// Returns `None` when the expiry does not fit in a `DateTime<Utc>`.
    #[must_use]
    pub fn issued_at(
        access_token: impl Into<String>,
        expires_in: i64,
        scope: Option<String>,
        issued_at: DateTime<Utc>,
    ) -> Option<Self> {
        let expires_at = Duration::try_seconds(expires_in)
            .and_then(|lifetime| issued_at.checked_add_signed(lifetime))?;

        Some(Self {
            access_token: access_token.into(),
            token_type: "Bearer".to_string(),
            expires_in,
            expires_at,
            scope,
        })
    }

    /// Build a token set from a token endpoint response received at `now`
    ///
    /// A missing `expires_in` falls back to the API's default lifetime of two
    /// hours. Returns `None` for a lifetime outside the representable range.
    #[must_use]
    pub fn from_response(response: TokenResponse, now: DateTime<Utc>) -> Option<Self> {
        let expires_in = response.expires_in.unwrap_or(DEFAULT_TOKEN_LIFETIME_SECS);
        let mut tokens = Self::issued_at(response.access_token, expires_in, response.scope, now)?;
        if let Some(token_type) = response.token_type {
            tokens.token_type = token_type;
        }
        Some(tokens)
    }

    /// Check whether the token can still be used at `now`
    ///
    /// Fresh means `now < expires_at - margin`; a token inside the margin is
    /// already due for renewal.
    #[must_use]
    pub fn is_fresh_at(&self, now: DateTime<Utc>, margin: Duration) -> bool {
        self.expires_at.checked_sub_signed(margin).is_some_and(|renew_at| now < renew_at)
    }

    /// Seconds until expiry at `now` (negative once expired)
    #[must_use]
    pub fn seconds_until_expiry(&self, now: DateTime<Utc>) -> i64 {
        (self.expires_at - now).num_seconds()
    }
}

/// OAuth token response from `/api/v1/oauth/token`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub token_type: Option<String>,
    #[serde(default)]
    pub expires_in: Option<i64>,
    #[serde(default)]
    pub scope: Option<String>,
    #[serde(default)]
    pub created_at: Option<i64>,
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn t0() -> DateTime<Utc> {
        Utc.timestamp_opt(1_700_000_000, 0).unwrap()
    }

    #[test]
    fn test_freshness_respects_margin() {
        let tokens = TokenSet::issued_at("tok", 3600, None, t0()).unwrap();
        let margin = Duration::minutes(5);

        assert!(tokens.is_fresh_at(t0(), margin));
        // One second before the margin starts
        assert!(tokens.is_fresh_at(t0() + Duration::seconds(3600 - 301), margin));
        // Exactly at expires_at - margin the token is stale
        assert!(!tokens.is_fresh_at(t0() + Duration::seconds(3600 - 300), margin));
        assert!(!tokens.is_fresh_at(t0() + Duration::seconds(3600), margin));
    }

    #[test]
    fn test_from_response_defaults_lifetime() {
        let response: TokenResponse =
            serde_json::from_str(r#"{"access_token":"abc"}"#).unwrap();
        let tokens = TokenSet::from_response(response, t0()).unwrap();

        assert_eq!(tokens.expires_in, 7200);
        assert_eq!(tokens.expires_at, t0() + Duration::seconds(7200));
        assert_eq!(tokens.token_type, "Bearer");
    }

    #[test]
    fn test_from_response_keeps_server_values() {
        let response: TokenResponse = serde_json::from_str(
            r#"{"access_token":"abc","token_type":"bearer","expires_in":60,"scope":"default"}"#,
        )
        .unwrap();
        let tokens = TokenSet::from_response(response, t0()).unwrap();

        assert_eq!(tokens.expires_in, 60);
        assert_eq!(tokens.token_type, "bearer");
        assert_eq!(tokens.scope.as_deref(), Some("default"));
        assert_eq!(tokens.seconds_until_expiry(t0()), 60);
    }

    #[test]
    fn test_out_of_range_lifetime_is_rejected() {
        let response: TokenResponse = serde_json::from_str(
            r#"{"access_token":"abc","expires_in":9000000000000000000}"#,
        )
        .unwrap();
        assert_eq!(TokenSet::from_response(response, t0()), None);

        assert_eq!(TokenSet::issued_at("abc", i64::MIN, None, t0()), None);
        assert_eq!(TokenSet::issued_at("abc", i64::MAX / 1000, None, t0()), None);
    }

    #[test]
    fn test_far_future_expiry_stays_fresh() {
        // 1000 years fits in chrono's range
        let tokens = TokenSet::issued_at("abc", 31_536_000_000, None, t0()).unwrap();
        assert!(tokens.is_fresh_at(t0(), Duration::minutes(5)));
    }
}

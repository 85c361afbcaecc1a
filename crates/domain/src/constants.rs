//! Domain constants
//!
//! Centralized location for API paths, header names and the defaults that
//! govern token renewal, request timeouts and webhook verification.

/// Base URL for every environment (sandbox and production share a host).
pub const DEFAULT_BASE_URL: &str = "https://app.skydropx.com";

// Token lifecycle
pub const TOKEN_REFRESH_MARGIN_SECS: i64 = 300;
pub const DEFAULT_TOKEN_LIFETIME_SECS: i64 = 7200;

// Request pipeline
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_USER_AGENT: &str = concat!("Skydropx-Rust-SDK/", env!("CARGO_PKG_VERSION"));

// Quotation polling
pub const DEFAULT_POLL_MAX_ATTEMPTS: u32 = 15;
pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 2;

// Webhooks
pub const SIGNATURE_HEADER: &str = "X-Skydropx-Signature";
pub const TIMESTAMP_HEADER: &str = "X-Skydropx-Timestamp";
pub const SIGNATURE_PREFIX: &str = "sha512=";
pub const WEBHOOK_TOLERANCE_SECS: i64 = 300;
pub const DEFAULT_WEBHOOK_PORT: u16 = 3000;
pub const WEBHOOK_PATH: &str = "/webhooks/skydropx";

/// API paths
pub mod paths {
    pub const OAUTH_TOKEN: &str = "/api/v1/oauth/token";
    pub const OAUTH_REVOKE: &str = "/api/v1/oauth/revoke";
    pub const OAUTH_INTROSPECT: &str = "/api/v1/oauth/introspect";
    pub const QUOTATIONS: &str = "/api/v1/quotations";
    pub const SHIPMENTS: &str = "/api/v1/shipments";
    pub const TRACKING: &str = "/api/v1/tracking";
    pub const TRACKING_BULK: &str = "/api/v1/tracking/bulk";
    pub const PICKUP_COVERAGE: &str = "/api/v1/pickup_coverage";
    pub const PICKUPS: &str = "/api/v1/pickups";
    pub const WEBHOOKS: &str = "/api/v1/webhooks";
}

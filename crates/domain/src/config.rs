//! Configuration structures
//!
//! Deserializable from JSON or TOML; every field except the client identity
//! has a default so minimal files stay minimal.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_TIMEOUT_SECS, DEFAULT_USER_AGENT, DEFAULT_WEBHOOK_PORT, WEBHOOK_TOLERANCE_SECS,
};
use crate::errors::{Result, SkydropxError};
use crate::types::{ClientCredentials, Environment};

/// Top-level configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    pub client: ClientConfig,
    #[serde(default)]
    pub webhook: WebhookConfig,
}

/// API client configuration
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    pub client_id: String,
    pub client_secret: String,
    #[serde(default)]
    pub environment: Environment,
    /// Overrides the environment's base URL (proxies, test servers)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
    #[serde(default = "default_true")]
    pub auto_renew_token: bool,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl ClientConfig {
    /// Minimal configuration with defaults for everything but identity
    #[must_use]
    pub fn new(
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        environment: Environment,
    ) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            environment,
            base_url: None,
            timeout_seconds: default_timeout_seconds(),
            auto_renew_token: true,
            user_agent: default_user_agent(),
        }
    }

    /// Point the client at a different host
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Effective base URL, without a trailing slash
    #[must_use]
    pub fn resolved_base_url(&self) -> String {
        self.base_url
            .as_deref()
            .unwrap_or_else(|| self.environment.base_url())
            .trim_end_matches('/')
            .to_string()
    }

    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }

    /// Validated client identity
    ///
    /// # Errors
    /// Returns `SkydropxError::InvalidInput` if id or secret is blank.
    pub fn credentials(&self) -> Result<ClientCredentials> {
        ClientCredentials::new(&self.client_id, &self.client_secret, self.environment)
    }

    /// Check the values a client cannot start without
    ///
    /// # Errors
    /// Returns `SkydropxError::Config` describing the first invalid field.
    pub fn validate(&self) -> Result<()> {
        self.credentials().map_err(|e| SkydropxError::Config(e.to_string()))?;
        if self.timeout_seconds == 0 {
            return Err(SkydropxError::Config("timeout_seconds must be positive".into()));
        }
        if let Some(base_url) = &self.base_url {
            if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
                return Err(SkydropxError::Config(format!(
                    "base_url must be an http(s) URL: {base_url}"
                )));
            }
        }
        Ok(())
    }
}

/// Inbound webhook receiver configuration
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebhookConfig {
    /// Shared HMAC secret; when absent signatures are not checked
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secret: Option<String>,
    #[serde(default = "default_webhook_port")]
    pub port: u16,
    #[serde(default = "default_tolerance_seconds")]
    pub tolerance_seconds: i64,
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("client_id", &self.client_id)
            .field("client_secret", &"***")
            .field("environment", &self.environment)
            .field("base_url", &self.base_url)
            .field("timeout_seconds", &self.timeout_seconds)
            .field("auto_renew_token", &self.auto_renew_token)
            .field("user_agent", &self.user_agent)
            .finish()
    }
}

impl fmt::Debug for WebhookConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WebhookConfig")
            .field("secret", &self.secret.as_ref().map(|_| "***"))
            .field("port", &self.port)
            .field("tolerance_seconds", &self.tolerance_seconds)
            .finish()
    }
}

impl Default for WebhookConfig {
    fn default() -> Self {
        Self {
            secret: None,
            port: default_webhook_port(),
            tolerance_seconds: default_tolerance_seconds(),
        }
    }
}

fn default_timeout_seconds() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

fn default_true() -> bool {
    true
}

fn default_user_agent() -> String {
    DEFAULT_USER_AGENT.to_string()
}

fn default_webhook_port() -> u16 {
    DEFAULT_WEBHOOK_PORT
}

fn default_tolerance_seconds() -> i64 {
    WEBHOOK_TOLERANCE_SECS
}

//! Client identity types
//!
//! `ClientCredentials` is created once at startup and never mutated.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::constants::DEFAULT_BASE_URL;
use crate::errors::SkydropxError;

/// Target API environment
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Sandbox,
    Production,
}

impl Environment {
    /// Base URL serving this environment
    ///
    /// Sandbox and production are served from the same host; the split is
    /// driven by the credentials, not by the URL.
    #[must_use]
    pub fn base_url(self) -> &'static str {
        match self {
            Self::Sandbox | Self::Production => DEFAULT_BASE_URL,
        }
    }

    /// Parse an environment name, falling back to sandbox on unknown input
    #[must_use]
    pub fn from_str_lossy(value: &str) -> Self {
        value.parse().unwrap_or_default()
    }

    /// Lowercase environment name
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Sandbox => "sandbox",
            Self::Production => "production",
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Environment {
    type Err = SkydropxError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sandbox" => Ok(Self::Sandbox),
            "production" => Ok(Self::Production),
            other => Err(SkydropxError::InvalidInput(format!("unknown environment: {other}"))),
        }
    }
}

/// OAuth client identity
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientCredentials {
    client_id: String,
    client_secret: String,
    #[serde(default)]
    environment: Environment,
}

impl ClientCredentials {
    /// Create credentials for the given environment
    ///
    /// # Errors
    /// Returns `SkydropxError::InvalidInput` if the client id or secret is
    /// blank.
    pub fn new(
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        environment: Environment,
    ) -> Result<Self, SkydropxError> {
        let client_id = client_id.into();
        let client_secret = client_secret.into();

        if client_id.trim().is_empty() {
            return Err(SkydropxError::InvalidInput("client_id must not be empty".into()));
        }
        if client_secret.trim().is_empty() {
            return Err(SkydropxError::InvalidInput("client_secret must not be empty".into()));
        }

        Ok(Self { client_id, client_secret, environment })
    }

    #[must_use]
    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    #[must_use]
    pub fn client_secret(&self) -> &str {
        &self.client_secret
    }

    #[must_use]
    pub fn environment(&self) -> Environment {
        self.environment
    }
}

impl fmt::Debug for ClientCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientCredentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &"***")
            .field("environment", &self.environment)
            .finish()
    }
}

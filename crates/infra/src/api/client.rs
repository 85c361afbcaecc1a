//! Skydropx API client
//!
//! Holds the client identity and the access token, and runs every call
//! through one pipeline:
//!
//! 1. For authenticated calls, renew the token if it is absent or expiring
//!    (single-flight, see [`TokenManager`])
//! 2. Attach `Authorization: Bearer <token>`
//! 3. Send once, with the configured timeout
//! 4. Map non-2xx responses to [`ApiError`] with the parsed body
//! 5. Return the JSON body, or `{}` for an empty one

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{json, Map, Value};
use skydropx_common::auth::TokenPhase;
use skydropx_common::time::{Clock, SystemClock};
use skydropx_common::{TokenManager, TokenResponse, TokenSet};
use skydropx_domain::constants::paths;
use skydropx_domain::{ClientConfig, ClientCredentials, Environment, SkydropxError};
use tracing::{debug, info, instrument, warn};
use url::Url;

use super::errors::{parse_error_body, ApiError};
use super::request::ApiRequest;
use crate::http::HttpClient;

/// Snapshot of the client's configuration and token status
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClientInfo {
    pub environment: Environment,
    pub base_url: String,
    pub has_valid_token: bool,
    pub token_expires_at: Option<DateTime<Utc>>,
}

/// Authenticated client for the Skydropx API
pub struct SkydropxClient<C: Clock = SystemClock> {
    http: HttpClient,
    credentials: ClientCredentials,
    base_url: String,
    auto_renew_token: bool,
    tokens: TokenManager<C>,
}

impl SkydropxClient<SystemClock> {
    /// Create a client with default settings for `credentials`
    ///
    /// # Errors
    /// Returns `SkydropxError::Config` if the HTTP transport cannot be built.
    pub fn new(credentials: ClientCredentials) -> Result<Self, SkydropxError> {
        let config = ClientConfig::new(
            credentials.client_id(),
            credentials.client_secret(),
            credentials.environment(),
        );
        Self::from_config(&config)
    }

    /// Create a client from configuration
    ///
    /// # Errors
    /// Returns `SkydropxError::Config` for invalid configuration.
    pub fn from_config(config: &ClientConfig) -> Result<Self, SkydropxError> {
        Self::with_clock(config, SystemClock)
    }
}

impl<C: Clock> SkydropxClient<C> {
    /// Create a client whose token freshness is judged by `clock`
    ///
    /// # Errors
    /// Returns `SkydropxError::Config` for invalid configuration.
    pub fn with_clock(config: &ClientConfig, clock: C) -> Result<Self, SkydropxError> {
        config.validate()?;

        let base_url = config.resolved_base_url();
        Url::parse(&base_url)
            .map_err(|e| SkydropxError::Config(format!("invalid base_url {base_url}: {e}")))?;

        let http = HttpClient::builder()
            .timeout(config.timeout())
            .user_agent(config.user_agent.clone())
            .build()?;

        info!(
            environment = %config.environment,
            base_url = %base_url,
            auto_renew_token = config.auto_renew_token,
            "Skydropx client created"
        );

        Ok(Self {
            http,
            credentials: config.credentials()?,
            base_url,
            auto_renew_token: config.auto_renew_token,
            tokens: TokenManager::with_clock(clock),
        })
    }

    pub fn credentials(&self) -> &ClientCredentials {
        &self.credentials
    }

    pub fn environment(&self) -> Environment {
        self.credentials.environment()
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Token state owned by this client
    pub fn tokens(&self) -> &TokenManager<C> {
        &self.tokens
    }

    /// Run one request through the pipeline
    ///
    /// # Errors
    /// Returns the error of the token exchange if renewal was needed and
    /// failed, or the error of the call itself.
    #[instrument(skip(self, request), fields(method = %request.method(), path = %request.path()))]
    pub async fn request(&self, request: ApiRequest) -> Result<Value, ApiError> {
        let bearer = if !request.requires_auth() {
            None
        } else if self.auto_renew_token {
            let token = self
                .tokens
                .fresh_access_token(|| async {
                    self.exchange_credentials().await.map(|(tokens, _)| tokens)
                })
                .await?;
            Some(token)
        } else {
            self.tokens.access_token().await
        };

        self.execute(&request, bearer.as_deref()).await
    }

    /// Obtain a new access token with the client credentials grant
    ///
    /// Replaces any held token, fresh or not, and returns the raw token
    /// response.
    ///
    /// # Errors
    /// Returns the error of the token call; the held token is then kept.
    #[instrument(skip(self))]
    pub async fn authenticate(&self) -> Result<Value, ApiError> {
        self.tokens.replace_with(|| self.exchange_credentials()).await
    }

    /// Revoke the held token and forget it
    ///
    /// With no token held this is a no-op returning `{}`.
    ///
    /// # Errors
    /// Returns the error of the revoke call; the held token is then kept.
    #[instrument(skip(self))]
    pub async fn revoke_token(&self) -> Result<Value, ApiError> {
        self.tokens
            .clear_after(|token| async move {
                let Some(token) = token else {
                    debug!("No access token held, nothing to revoke");
                    return Ok(Value::Object(Map::new()));
                };
                let request =
                    ApiRequest::post(paths::OAUTH_REVOKE).json(self.token_body(&token)).without_auth();
                self.execute(&request, None).await
            })
            .await
    }

    /// Ask the server about the held token
    ///
    /// With no token held, answers `{"active": false}` without a call.
    ///
    /// # Errors
    /// Returns the error of the introspection call.
    #[instrument(skip(self))]
    pub async fn introspect_token(&self) -> Result<Value, ApiError> {
        let Some(token) = self.tokens.access_token().await else {
            return Ok(json!({ "active": false }));
        };

        let request =
            ApiRequest::post(paths::OAUTH_INTROSPECT).json(self.token_body(&token)).without_auth();
        self.execute(&request, None).await
    }

    /// True if no token is held or it expires within five minutes
    pub async fn should_renew_token(&self) -> bool {
        self.tokens.should_renew().await
    }

    pub async fn token_phase(&self) -> TokenPhase {
        self.tokens.phase().await
    }

    pub async fn client_info(&self) -> ClientInfo {
        let state = self.tokens.snapshot().await;
        let has_valid_token = state
            .tokens()
            .is_some_and(|t| t.is_fresh_at(self.tokens.now(), self.tokens.refresh_margin()));

        ClientInfo {
            environment: self.environment(),
            base_url: self.base_url.clone(),
            has_valid_token,
            token_expires_at: state.expires_at(),
        }
    }

    /// Token endpoint call; does not touch the token state
    async fn exchange_credentials(&self) -> Result<(TokenSet, Value), ApiError> {
        let request = ApiRequest::post(paths::OAUTH_TOKEN)
            .json(json!({
                "client_id": self.credentials.client_id(),
                "client_secret": self.credentials.client_secret(),
                "grant_type": "client_credentials",
            }))
            .without_auth();

        let raw = self.execute(&request, None).await?;
        let response: TokenResponse =
            serde_json::from_value(raw.clone()).map_err(ApiError::decode)?;
        let expires_in = response.expires_in;
        let tokens = TokenSet::from_response(response, self.tokens.now()).ok_or_else(|| {
            ApiError::decode(format!("expires_in fuera de rango: {expires_in:?}"))
        })?;

        debug!(expires_in = tokens.expires_in, "Access token obtained");
        Ok((tokens, raw))
    }

    fn token_body(&self, token: &str) -> Value {
        json!({
            "client_id": self.credentials.client_id(),
            "client_secret": self.credentials.client_secret(),
            "token": token,
            "token_type_hint": "access_token",
        })
    }

    async fn execute(&self, request: &ApiRequest, bearer: Option<&str>) -> Result<Value, ApiError> {
        let url = format!("{}{}", self.base_url, request.path());

        let mut builder = self.http.request(request.method().clone(), &url);
        if !request.query_params().is_empty() {
            builder = builder.query(request.query_params());
        }
        if let Some(token) = bearer {
            builder = builder.bearer_auth(token);
        }
        if let Some(body) = request.body() {
            builder = builder.json(body);
        }

        let response = self.http.send(builder).await?;
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            let error = ApiError::from_status(status.as_u16(), Some(parse_error_body(&text)));
            warn!(status = status.as_u16(), message = %error.message, "API request failed");
            return Err(error);
        }

        if text.trim().is_empty() {
            return Ok(Value::Object(Map::new()));
        }
        serde_json::from_str(&text).map_err(ApiError::decode)
    }
}

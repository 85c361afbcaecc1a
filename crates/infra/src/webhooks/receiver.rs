//! axum receiver for Skydropx webhooks
//!
//! Routes:
//! - `POST /webhooks/skydropx`: verify, parse, dispatch, acknowledge
//! - `GET /health`: liveness probe

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::Utc;
use serde_json::{json, Value};
use skydropx_common::security::check_envelope;
use skydropx_common::{SignatureError, WebhookVerifier};
use skydropx_domain::constants::{SIGNATURE_HEADER, TIMESTAMP_HEADER, WEBHOOK_PATH};
use skydropx_domain::WebhookConfig;
use tracing::{error, info, warn};

use super::events::{WebhookEvent, WebhookEventHandler};

/// Shared state of the receiver
#[derive(Clone)]
pub struct WebhookState {
    verifier: Option<Arc<WebhookVerifier>>,
    tolerance_secs: i64,
    handler: Arc<dyn WebhookEventHandler>,
}

impl WebhookState {
    /// Without a secret in `config`, signatures are not checked
    pub fn new(config: &WebhookConfig, handler: Arc<dyn WebhookEventHandler>) -> Self {
        let verifier = config.secret.as_ref().map(|secret| {
            Arc::new(WebhookVerifier::new(secret.clone()).with_tolerance(config.tolerance_seconds))
        });

        Self { verifier, tolerance_secs: config.tolerance_seconds, handler }
    }

    pub fn verifies_signatures(&self) -> bool {
        self.verifier.is_some()
    }

    fn check(
        &self,
        signature: Option<&str>,
        timestamp: Option<&str>,
        raw_body: &[u8],
    ) -> Result<(), SignatureError> {
        match &self.verifier {
            Some(verifier) => verifier.verify(signature, timestamp, raw_body),
            None => {
                check_envelope(signature, timestamp, Utc::now().timestamp(), self.tolerance_secs)?;
                warn!("Webhook secret not configured, skipping signature check");
                Ok(())
            }
        }
    }
}

/// Build the receiver router
pub fn router(state: WebhookState) -> Router {
    Router::new()
        .route(WEBHOOK_PATH, post(receive_webhook))
        .route("/health", get(health))
        .with_state(state)
}

async fn receive_webhook(
    State(state): State<WebhookState>,
    headers: HeaderMap,
    body: Bytes,
) -> (StatusCode, Json<Value>) {
    let signature = header_str(&headers, SIGNATURE_HEADER);
    let timestamp = header_str(&headers, TIMESTAMP_HEADER);

    if let Err(reason) = state.check(signature, timestamp, &body) {
        warn!(%reason, "Rejected webhook delivery");
        return (StatusCode::UNAUTHORIZED, Json(json!({ "error": reason.to_string() })));
    }

    let event: WebhookEvent = match serde_json::from_slice(&body) {
        Ok(event) => event,
        Err(e) => {
            warn!(error = %e, "Webhook body is not a valid event");
            return (StatusCode::BAD_REQUEST, Json(json!({ "error": "Invalid JSON" })));
        }
    };

    info!(
        event = %event.event,
        id = event.id.as_deref().unwrap_or("unknown"),
        "Webhook received"
    );

    if let Err(e) = state.handler.handle(&event).await {
        error!(event = %event.event, error = %e, "Webhook handler failed");
    }

    (StatusCode::OK, Json(json!({ "received": true })))
}

async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": "skydropx-webhooks",
        "timestamp": Utc::now().timestamp(),
    }))
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|value| value.to_str().ok())
}

//! Skydropx webhook receiver
//!
//! Reads configuration from the environment (a `.env` file is honoured) or
//! from `skydropx.{json,toml}`, then serves `POST /webhooks/skydropx` and
//! `GET /health` until Ctrl-C.

use std::env;
use std::net::SocketAddr;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context;
use skydropx_common::{init_tracing, LogFormat};
use skydropx_domain::WebhookConfig;
use skydropx_infra::config;
use skydropx_infra::{router, LoggingEventHandler, WebhookState};
use tokio::net::TcpListener;
use tracing::{error, info, warn};

#[tokio::main]
async fn main() -> ExitCode {
    let _ = dotenvy::dotenv();

    let format = env::var("LOG_FORMAT")
        .ok()
        .and_then(|value| value.parse().ok())
        .unwrap_or(LogFormat::Pretty);
    if let Err(e) = init_tracing(format) {
        warn!(error = %e, "Tracing already initialized");
    }

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %format!("{e:#}"), "Webhook server failed");
            ExitCode::FAILURE
        }
    }
}

async fn run() -> anyhow::Result<()> {
    let webhook = webhook_config()?;

    if webhook.secret.is_none() {
        warn!("SKYDROPX_WEBHOOK_SECRET not set; signatures will NOT be verified");
    }

    let state = WebhookState::new(&webhook, Arc::new(LoggingEventHandler));
    let app = router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], webhook.port));
    let listener = TcpListener::bind(addr).await.with_context(|| format!("binding {addr}"))?;
    info!(%addr, path = skydropx_domain::constants::WEBHOOK_PATH, "Webhook server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("serving webhooks")?;

    info!("Webhook server stopped");
    Ok(())
}

/// Full client config when available, otherwise only the webhook variables
fn webhook_config() -> anyhow::Result<WebhookConfig> {
    match config::load() {
        Ok(config) => Ok(config.webhook),
        Err(e) => {
            info!(reason = %e, "Client configuration unavailable, using webhook variables only");
            config::webhook_from_env().context("reading webhook configuration")
        }
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "Failed to listen for Ctrl-C");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}

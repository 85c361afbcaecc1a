//! Configuration loader
//!
//! Loads client and webhook configuration from environment variables or files.
//!
//! ## Loading Strategy
//! 1. First, attempts to load from environment variables
//! 2. If the client identity is missing, falls back to loading from file
//! 3. Probes multiple paths for config files
//! 4. Supports JSON and TOML formats
//!
//! ## Environment Variables
//! - `SKYDROPX_CLIENT_ID`: OAuth client id (required)
//! - `SKYDROPX_CLIENT_SECRET`: OAuth client secret (required)
//! - `SKYDROPX_ENVIRONMENT`: `sandbox` or `production` (default sandbox)
//! - `SKYDROPX_BASE_URL`: Override of the API host
//! - `SKYDROPX_TIMEOUT_SECONDS`: Request timeout (default 30)
//! - `SKYDROPX_AUTO_RENEW_TOKEN`: Renew expiring tokens before calls (default true)
//! - `SKYDROPX_WEBHOOK_SECRET`: HMAC secret for inbound webhooks
//! - `WEBHOOK_PORT`: Webhook receiver port (default 3000)
//! - `SKYDROPX_WEBHOOK_TOLERANCE_SECONDS`: Replay window (default 300)
//!
//! ## File Locations
//! The loader probes `skydropx.{json,toml}` then `config.{json,toml}` in the
//! current working directory and up to two parent directories.

use std::path::{Path, PathBuf};

use skydropx_domain::{ClientConfig, Config, Environment, Result, SkydropxError, WebhookConfig};

const FILE_STEMS: [&str; 2] = ["skydropx", "config"];
const FILE_EXTENSIONS: [&str; 2] = ["json", "toml"];

/// Load configuration with automatic fallback strategy
///
/// # Errors
/// Returns `SkydropxError::Config` if configuration cannot be loaded from
/// either source, or if the loaded configuration does not validate.
pub fn load() -> Result<Config> {
    let config = match load_from_env() {
        Ok(config) => {
            tracing::info!("Configuration loaded from environment variables");
            config
        }
        Err(e) => {
            tracing::debug!(error = %e, "Failed to load from environment, trying file");
            load_from_file(None)?
        }
    };

    config.client.validate()?;
    Ok(config)
}

/// Load configuration from environment variables
///
/// # Errors
/// Returns `SkydropxError::Config` if the client identity is missing or a
/// numeric variable does not parse.
pub fn load_from_env() -> Result<Config> {
    let client_id = env_var("SKYDROPX_CLIENT_ID")?;
    let client_secret = env_var("SKYDROPX_CLIENT_SECRET")?;

    let environment = std::env::var("SKYDROPX_ENVIRONMENT")
        .map(|value| Environment::from_str_lossy(&value))
        .unwrap_or_default();

    let mut client = ClientConfig::new(client_id, client_secret, environment);
    client.base_url = env_opt("SKYDROPX_BASE_URL");
    client.timeout_seconds = env_parse("SKYDROPX_TIMEOUT_SECONDS", client.timeout_seconds)?;
    client.auto_renew_token = env_bool("SKYDROPX_AUTO_RENEW_TOKEN", true);

    Ok(Config { client, webhook: webhook_from_env()? })
}

/// Load only the webhook receiver settings from environment variables
///
/// Every variable is optional, so a receiver can start without client
/// credentials.
///
/// # Errors
/// Returns `SkydropxError::Config` if a numeric variable does not parse.
pub fn webhook_from_env() -> Result<WebhookConfig> {
    let defaults = WebhookConfig::default();
    Ok(WebhookConfig {
        secret: env_opt("SKYDROPX_WEBHOOK_SECRET"),
        port: env_parse("WEBHOOK_PORT", defaults.port)?,
        tolerance_seconds: env_parse(
            "SKYDROPX_WEBHOOK_TOLERANCE_SECONDS",
            defaults.tolerance_seconds,
        )?,
    })
}

/// Load configuration from a file
///
/// If `path` is `None`, probes the standard locations.
///
/// # Errors
/// Returns `SkydropxError::Config` if the file is missing, unreadable, or
/// not valid JSON/TOML for [`Config`].
pub fn load_from_file(path: Option<PathBuf>) -> Result<Config> {
    let config_path = match path {
        Some(p) => {
            if !p.exists() {
                return Err(SkydropxError::Config(format!(
                    "Config file not found: {}",
                    p.display()
                )));
            }
            p
        }
        None => probe_config_paths().ok_or_else(|| {
            SkydropxError::Config(
                "No config file found in any of the standard locations".to_string(),
            )
        })?,
    };

    tracing::info!(path = %config_path.display(), "Loading configuration from file");

    let contents = std::fs::read_to_string(&config_path)
        .map_err(|e| SkydropxError::Config(format!("Failed to read config file: {e}")))?;

    parse_config(&contents, &config_path)
}

/// Parse configuration, detecting the format by file extension
fn parse_config(contents: &str, path: &Path) -> Result<Config> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("json");

    match extension {
        "toml" => toml::from_str(contents)
            .map_err(|e| SkydropxError::Config(format!("Invalid TOML format: {e}"))),
        "json" => serde_json::from_str(contents)
            .map_err(|e| SkydropxError::Config(format!("Invalid JSON format: {e}"))),
        _ => Err(SkydropxError::Config(format!("Unsupported config format: {extension}"))),
    }
}

/// First existing config file in the standard locations
pub fn probe_config_paths() -> Option<PathBuf> {
    let cwd = std::env::current_dir().ok()?;
    probe_from(&cwd)
}

fn probe_from(start: &Path) -> Option<PathBuf> {
    start
        .ancestors()
        .take(3)
        .flat_map(|dir| {
            FILE_STEMS.iter().flat_map(move |stem| {
                FILE_EXTENSIONS.iter().map(move |ext| dir.join(format!("{stem}.{ext}")))
            })
        })
        .find(|path| path.is_file())
}

fn env_var(key: &str) -> Result<String> {
    env_opt(key).ok_or_else(|| {
        SkydropxError::Config(format!("Missing required environment variable: {key}"))
    })
}

/// Non-empty value of an environment variable
fn env_opt(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|value| !value.trim().is_empty())
}

fn env_parse<T>(key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match env_opt(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e| SkydropxError::Config(format!("Invalid value for {key}: {e}"))),
        None => Ok(default),
    }
}

/// Parse boolean from environment variable
///
/// Accepts: `1`/`0`, `true`/`false`, `yes`/`no`, `on`/`off` (case-insensitive)
fn env_bool(key: &str, default: bool) -> bool {
    env_opt(key)
        .map(|s| matches!(s.to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on"))
        .unwrap_or(default)
}

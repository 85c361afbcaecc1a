//! Webhook receiver served over a real socket

use std::sync::Arc;

use chrono::Utc;
use serde_json::{json, Value};
use skydropx_common::security::compute_signature;
use skydropx_domain::constants::{SIGNATURE_HEADER, TIMESTAMP_HEADER, WEBHOOK_PATH};
use skydropx_domain::WebhookConfig;
use skydropx_infra::{router, LoggingEventHandler, WebhookState};
use tokio::net::TcpListener;

async fn serve(secret: &str) -> String {
    let config = WebhookConfig { secret: Some(secret.to_string()), ..WebhookConfig::default() };
    let app = router(WebhookState::new(&config, Arc::new(LoggingEventHandler)));

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

fn http() -> reqwest::Client {
    reqwest::Client::builder().no_proxy().build().unwrap()
}

#[tokio::test]
async fn test_signed_delivery_over_http() {
    let base = serve("whsec_live").await;
    let body = r#"{"id":"evt_7","event":"package.delivered","data":{"attributes":{"tracking_number":"123"}}}"#;
    let ts = Utc::now().timestamp().to_string();
    let sig = compute_signature("whsec_live", &ts, body.as_bytes());

    let client = http();
    let response = client
        .post(format!("{base}{WEBHOOK_PATH}"))
        .header(SIGNATURE_HEADER, format!("sha512={sig}"))
        .header(TIMESTAMP_HEADER, &ts)
        .header("content-type", "application/json")
        .body(body)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
    assert_eq!(response.json::<Value>().await.unwrap(), json!({"received": true}));

    // Same signature over a different body
    let response = client
        .post(format!("{base}{WEBHOOK_PATH}"))
        .header(SIGNATURE_HEADER, sig)
        .header(TIMESTAMP_HEADER, ts)
        .body(r#"{"id":"evt_7","event":"package.returned"}"#)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 401);
    assert_eq!(response.json::<Value>().await.unwrap(), json!({"error": "Invalid signature"}));
}

#[tokio::test]
async fn test_health_over_http() {
    let base = serve("whsec_live").await;

    let body: Value =
        http().get(format!("{base}/health")).send().await.unwrap().json().await.unwrap();

    assert_eq!(body["status"], "ok");
    assert!(body["timestamp"].as_i64().is_some());
}

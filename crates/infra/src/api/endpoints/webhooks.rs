use serde::Serialize;
use serde_json::{json, Value};
use skydropx_common::time::Clock;
use skydropx_domain::constants::paths;

use crate::api::request::{to_json, ApiRequest};
use crate::api::{ApiError, SkydropxClient};

impl<C: Clock> SkydropxClient<C> {
    /// Register a webhook subscription
    pub async fn create_webhook<T: Serialize + ?Sized>(
        &self,
        webhook: &T,
    ) -> Result<Value, ApiError> {
        let body = json!({ "webhook": to_json(webhook)? });
        self.request(ApiRequest::post(paths::WEBHOOKS).json(body)).await
    }

    pub async fn list_webhooks(&self) -> Result<Value, ApiError> {
        self.request(ApiRequest::get(paths::WEBHOOKS)).await
    }

    pub async fn update_webhook<T: Serialize + ?Sized>(
        &self,
        webhook_id: &str,
        webhook: &T,
    ) -> Result<Value, ApiError> {
        let body = json!({ "webhook": to_json(webhook)? });
        self.request(ApiRequest::put(format!("{}/{webhook_id}", paths::WEBHOOKS)).json(body))
            .await
    }

    pub async fn delete_webhook(&self, webhook_id: &str) -> Result<Value, ApiError> {
        self.request(ApiRequest::delete(format!("{}/{webhook_id}", paths::WEBHOOKS))).await
    }
}

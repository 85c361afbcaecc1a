use serde::Serialize;
use serde_json::{json, Value};
use skydropx_common::time::Clock;
use skydropx_domain::constants::paths;

use crate::api::request::{to_json, ApiRequest};
use crate::api::{ApiError, SkydropxClient};

impl<C: Clock> SkydropxClient<C> {
    pub async fn create_shipment<T: Serialize + ?Sized>(
        &self,
        shipment: &T,
    ) -> Result<Value, ApiError> {
        let body = json!({ "shipment": to_json(shipment)? });
        self.request(ApiRequest::post(paths::SHIPMENTS).json(body)).await
    }

    /// List shipments; `filters` become query parameters (page, status, ...)
    pub async fn list_shipments<K, V>(
        &self,
        filters: impl IntoIterator<Item = (K, V)>,
    ) -> Result<Value, ApiError>
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.request(ApiRequest::get(paths::SHIPMENTS).query(filters)).await
    }

    pub async fn get_shipment(&self, shipment_id: &str) -> Result<Value, ApiError> {
        self.request(ApiRequest::get(format!("{}/{shipment_id}", paths::SHIPMENTS))).await
    }

    pub async fn cancel_shipment(&self, shipment_id: &str, reason: &str) -> Result<Value, ApiError> {
        let request = ApiRequest::post(format!("{}/{shipment_id}/cancel", paths::SHIPMENTS))
            .json(json!({ "cancellation_reason": reason }));
        self.request(request).await
    }

    /// Insure a shipment for `declared_value`
    pub async fn protect_shipment(
        &self,
        shipment_id: &str,
        declared_value: f64,
    ) -> Result<Value, ApiError> {
        let request = ApiRequest::post(format!("{}/{shipment_id}/protect", paths::SHIPMENTS))
            .json(json!({ "declared_value": declared_value }));
        self.request(request).await
    }
}

use serde::Serialize;
use serde_json::{json, Value};
use skydropx_common::time::Clock;
use skydropx_domain::constants::paths;

use crate::api::request::{to_json, ApiRequest};
use crate::api::{ApiError, SkydropxClient};

impl<C: Clock> SkydropxClient<C> {
    /// Request rates for a shipment; the result may still be in progress
    pub async fn create_quotation<T: Serialize + ?Sized>(
        &self,
        quotation: &T,
    ) -> Result<Value, ApiError> {
        let body = json!({ "quotation": to_json(quotation)? });
        self.request(ApiRequest::post(paths::QUOTATIONS).json(body)).await
    }

    pub async fn get_quotation(&self, quotation_id: &str) -> Result<Value, ApiError> {
        self.request(ApiRequest::get(format!("{}/{quotation_id}", paths::QUOTATIONS))).await
    }
}

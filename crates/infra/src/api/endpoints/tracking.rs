use serde::Serialize;
use serde_json::{json, Value};
use skydropx_common::time::Clock;
use skydropx_domain::constants::paths;
use skydropx_domain::TrackingQuery;

use crate::api::request::{to_json, ApiRequest};
use crate::api::{ApiError, SkydropxClient};

impl<C: Clock> SkydropxClient<C> {
    pub async fn track_shipment(
        &self,
        tracking_number: &str,
        carrier_code: &str,
    ) -> Result<Value, ApiError> {
        let request = ApiRequest::get(paths::TRACKING).query([
            ("tracking_number", tracking_number),
            ("carrier_code", carrier_code),
        ]);
        self.request(request).await
    }

    /// Track several shipments in one call
    pub async fn track_multiple_shipments<T: Serialize>(
        &self,
        trackings: &[T],
    ) -> Result<Value, ApiError> {
        let body = json!({ "trackings": to_json(trackings)? });
        self.request(ApiRequest::post(paths::TRACKING_BULK).json(body)).await
    }

    pub async fn track(&self, query: &TrackingQuery) -> Result<Value, ApiError> {
        self.track_shipment(&query.tracking_number, &query.carrier_code).await
    }
}

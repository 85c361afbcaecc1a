use serde::Serialize;
use serde_json::{json, Value};
use skydropx_common::time::Clock;
use skydropx_domain::constants::paths;
use skydropx_domain::PickupCoverageRequest;

use crate::api::request::{to_json, ApiRequest};
use crate::api::{ApiError, SkydropxClient};

impl<C: Clock> SkydropxClient<C> {
    /// Check whether carriers pick up at `postal_code` in Mexico
    pub async fn get_pickup_coverage(&self, postal_code: &str) -> Result<Value, ApiError> {
        self.pickup_coverage(&PickupCoverageRequest::mx(postal_code)).await
    }

    pub async fn pickup_coverage(&self, coverage: &PickupCoverageRequest) -> Result<Value, ApiError> {
        let request = ApiRequest::post(paths::PICKUP_COVERAGE).json(to_json(coverage)?);
        self.request(request).await
    }

    pub async fn create_pickup<T: Serialize + ?Sized>(&self, pickup: &T) -> Result<Value, ApiError> {
        let body = json!({ "pickup": to_json(pickup)? });
        self.request(ApiRequest::post(paths::PICKUPS).json(body)).await
    }

    pub async fn list_pickups<K, V>(
        &self,
        filters: impl IntoIterator<Item = (K, V)>,
    ) -> Result<Value, ApiError>
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.request(ApiRequest::get(paths::PICKUPS).query(filters)).await
    }

    /// Move a pickup; unlike creation the body is sent unwrapped
    pub async fn reschedule_pickup<T: Serialize + ?Sized>(
        &self,
        pickup_id: &str,
        pickup: &T,
    ) -> Result<Value, ApiError> {
        let request = ApiRequest::put(format!("{}/{pickup_id}/reschedule", paths::PICKUPS))
            .json(to_json(pickup)?);
        self.request(request).await
    }
}

//! Request payloads for the shipping endpoints
//!
//! The endpoint surface accepts any `Serialize` body; these types cover the
//! common shapes so callers do not have to hand-build JSON.

use serde::{Deserialize, Serialize};

/// Postal address used as quotation origin or destination
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Address {
    pub country_code: String,
    pub postal_code: String,
    /// State
    pub area_level1: String,
    /// City or municipality
    pub area_level2: String,
    /// Neighbourhood
    pub area_level3: String,
}

/// Parcel dimensions (kilograms and centimetres)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Package {
    pub weight: f64,
    pub length: f64,
    pub width: f64,
    pub height: f64,
}

/// Body of `create_quotation`, wrapped in `{"quotation": ...}` on the wire
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuotationRequest {
    pub address_from: Address,
    pub address_to: Address,
    pub packages: Vec<Package>,
}

/// One entry of a bulk tracking request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackingQuery {
    pub tracking_number: String,
    pub carrier_code: String,
}

impl TrackingQuery {
    #[must_use]
    pub fn new(tracking_number: impl Into<String>, carrier_code: impl Into<String>) -> Self {
        Self { tracking_number: tracking_number.into(), carrier_code: carrier_code.into() }
    }
}

/// Pickup coverage lookup; the API names the postal code `zip`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PickupCoverageRequest {
    pub zip: String,
    pub country_code: String,
}

impl PickupCoverageRequest {
    /// Coverage request for a Mexican postal code
    #[must_use]
    pub fn mx(postal_code: impl Into<String>) -> Self {
        Self::new(postal_code, "MX")
    }

    #[must_use]
    pub fn new(postal_code: impl Into<String>, country_code: impl Into<String>) -> Self {
        Self { zip: postal_code.into(), country_code: country_code.into() }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_quotation_request_wire_shape() {
        let request = QuotationRequest {
            address_from: Address {
                country_code: "MX".into(),
                postal_code: "64000".into(),
                area_level1: "Nuevo León".into(),
                area_level2: "Monterrey".into(),
                area_level3: "Centro".into(),
            },
            address_to: Address {
                country_code: "MX".into(),
                postal_code: "01000".into(),
                area_level1: "Ciudad de México".into(),
                area_level2: "Álvaro Obregón".into(),
                area_level3: "Santa Fe".into(),
            },
            packages: vec![Package { weight: 2.5, length: 30.0, width: 20.0, height: 15.0 }],
        };

        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["address_from"]["postal_code"], "64000");
        assert_eq!(value["packages"][0]["weight"], json!(2.5));
    }

    #[test]
    fn test_pickup_coverage_defaults_to_mexico() {
        let request = PickupCoverageRequest::mx("64000");
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({ "zip": "64000", "country_code": "MX" })
        );
    }
}

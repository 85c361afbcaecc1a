//! Inbound webhook events and handlers

use std::error::Error;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{info, warn};

/// Event delivered by Skydropx
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WebhookEvent {
    #[serde(default)]
    pub id: Option<String>,
    /// Dotted event name, e.g. `shipment.delivered`
    #[serde(default = "unknown_event")]
    pub event: String,
    #[serde(default)]
    pub created_at: Option<Value>,
    #[serde(default = "empty_object")]
    pub data: Value,
}

/// Event family, taken from the prefix of the event name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventCategory {
    Shipment,
    Package,
    Pickup,
    Order,
    Quotation,
    Other,
}

impl WebhookEvent {
    pub fn category(&self) -> EventCategory {
        let prefix = self.event.split('.').next().unwrap_or_default();
        match prefix {
            "shipment" if self.event.contains('.') => EventCategory::Shipment,
            "package" if self.event.contains('.') => EventCategory::Package,
            "pickup" if self.event.contains('.') => EventCategory::Pickup,
            "order" if self.event.contains('.') => EventCategory::Order,
            "quotation" if self.event.contains('.') => EventCategory::Quotation,
            _ => EventCategory::Other,
        }
    }

    /// `data.attributes`, if present
    pub fn attributes(&self) -> Option<&Map<String, Value>> {
        self.data.get("attributes").and_then(Value::as_object)
    }

    /// String-ish attribute for logging; numbers are rendered as text
    pub fn attribute(&self, key: &str) -> Option<String> {
        match self.attributes()?.get(key)? {
            Value::String(s) => Some(s.clone()),
            Value::Null => None,
            other => Some(other.to_string()),
        }
    }

    /// Id of the resource the event is about (`data.id`)
    pub fn resource_id(&self) -> Option<&str> {
        self.data.get("id").and_then(Value::as_str)
    }
}

fn unknown_event() -> String {
    "unknown".to_string()
}

fn empty_object() -> Value {
    Value::Object(Map::new())
}

/// Error returned by an event handler; logged, never sent back to Skydropx
pub type HandlerError = Box<dyn Error + Send + Sync>;

/// Application hook for verified events
///
/// Failures are logged by the receiver, which still acknowledges the
/// delivery with 200 so the sender does not retry.
#[async_trait]
pub trait WebhookEventHandler: Send + Sync {
    async fn handle(&self, event: &WebhookEvent) -> Result<(), HandlerError>;
}

/// Handler that only logs each event
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingEventHandler;

#[async_trait]
impl WebhookEventHandler for LoggingEventHandler {
    async fn handle(&self, event: &WebhookEvent) -> Result<(), HandlerError> {
        let resource = event.resource_id().unwrap_or("N/A");

        match event.category() {
            EventCategory::Shipment => info!(
                event = %event.event,
                shipment_id = resource,
                workflow_status = event.attribute("workflow_status").as_deref(),
                status_detail = event.attribute("status_detail").as_deref(),
                tracking_number = event.attribute("tracking_number").as_deref(),
                "Shipment event"
            ),
            EventCategory::Package => info!(
                event = %event.event,
                tracking_number = event.attribute("tracking_number").as_deref(),
                tracking_status = event.attribute("tracking_status").as_deref(),
                location = event.attribute("location").as_deref(),
                "Tracking event"
            ),
            EventCategory::Pickup => info!(
                event = %event.event,
                pickup_id = resource,
                status = event.attribute("status").as_deref(),
                "Pickup event"
            ),
            EventCategory::Order => info!(event = %event.event, order_id = resource, "Order event"),
            EventCategory::Quotation => {
                info!(event = %event.event, quotation_id = resource, "Quotation event");
            }
            EventCategory::Other => warn!(event = %event.event, "Unhandled webhook event"),
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn event(name: &str) -> WebhookEvent {
        serde_json::from_value(json!({ "id": "evt_1", "event": name })).unwrap()
    }

    #[test]
    fn test_category_by_prefix() {
        assert_eq!(event("shipment.created").category(), EventCategory::Shipment);
        assert_eq!(event("shipment.status.updated").category(), EventCategory::Shipment);
        assert_eq!(event("package.tracking.updated").category(), EventCategory::Package);
        assert_eq!(event("pickup.scheduled").category(), EventCategory::Pickup);
        assert_eq!(event("order.created").category(), EventCategory::Order);
        assert_eq!(event("quotation.completed").category(), EventCategory::Quotation);
        assert_eq!(event("invoice.paid").category(), EventCategory::Other);
        assert_eq!(event("shipment").category(), EventCategory::Other);
        assert_eq!(event("shipments.created").category(), EventCategory::Other);
    }

    #[test]
    fn test_missing_fields_get_defaults() {
        let event: WebhookEvent = serde_json::from_str("{}").unwrap();
        assert_eq!(event.event, "unknown");
        assert_eq!(event.id, None);
        assert_eq!(event.data, json!({}));
        assert_eq!(event.category(), EventCategory::Other);
    }

    #[test]
    fn test_attribute_access() {
        let event: WebhookEvent = serde_json::from_value(json!({
            "event": "shipment.created",
            "data": {
                "id": "shp_9",
                "attributes": { "total": 145.5, "currency": "MXN", "signed_by": null }
            }
        }))
        .unwrap();

        assert_eq!(event.resource_id(), Some("shp_9"));
        assert_eq!(event.attribute("currency").as_deref(), Some("MXN"));
        assert_eq!(event.attribute("total").as_deref(), Some("145.5"));
        assert_eq!(event.attribute("signed_by"), None);
        assert_eq!(event.attribute("missing"), None);
    }

    #[tokio::test]
    async fn test_logging_handler_accepts_everything() {
        for name in ["shipment.delivered", "package.returned", "whatever"] {
            assert!(LoggingEventHandler.handle(&event(name)).await.is_ok());
        }
    }
}

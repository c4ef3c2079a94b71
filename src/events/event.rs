//! Warehouse event structure
//!
//! Events are the audit trail of the twin: every status change, inventory
//! movement, and resource assignment is recorded as one `WarehouseEvent`
//! with a structured JSON payload.

use crate::types::{EventKind, EventSource};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A single recorded warehouse event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WarehouseEvent {
    /// Unique event identifier, e.g. `DT-000042`
    pub event_id: String,
    /// Kind of event
    pub event_type: EventKind,
    /// Wall-clock timestamp at record time
    pub timestamp: DateTime<Utc>,
    /// Structured payload; keys depend on the event kind
    pub data: Value,
    /// Which system produced the event
    pub source: EventSource,
    /// Whether a downstream consumer has handled the event
    #[serde(default)]
    pub processed: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_event_serialization() {
        let event = WarehouseEvent {
            event_id: "DT-000001".to_string(),
            event_type: EventKind::OrderCreated,
            timestamp: Utc::now(),
            data: json!({"order_id": "SIM-000001"}),
            source: EventSource::Simulation,
            processed: false,
        };

        let value = serde_json::to_value(&event).unwrap();
        assert_eq!(value["event_id"], "DT-000001");
        assert_eq!(value["event_type"], "order_created");
        assert_eq!(value["source"], "simulation");
        assert_eq!(value["data"]["order_id"], "SIM-000001");
        assert_eq!(value["processed"], false);
    }

    #[test]
    fn test_processed_defaults_to_false_on_deserialize() {
        let raw = json!({
            "event_id": "DT-000002",
            "event_type": "inventory_updated",
            "timestamp": "2026-01-15T09:30:00Z",
            "data": {"sku": "SKU-0001", "change": -2},
            "source": "erp",
        });

        let event: WarehouseEvent = serde_json::from_value(raw).unwrap();
        assert!(!event.processed);
    }
}

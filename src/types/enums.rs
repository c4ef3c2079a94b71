//! Core enumerations for the warehouse digital twin
//!
//! This module contains the order lifecycle states and the event taxonomy
//! shared between the simulation core and the ERP boundary.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Order processing status.
///
/// Statuses form a linear lifecycle; the fulfillment process only ever
/// advances an order forward through this sequence (CANCELLED is terminal
/// and reachable from any non-terminal state).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    /// Order registered, nothing started yet
    Received,
    /// A picker is walking the warehouse for this order
    Picking,
    /// All lines picked
    Picked,
    /// Order is at a packing station
    Packing,
    /// Packing finished
    Packed,
    /// Handed off to shipping
    Shipping,
    /// Fully processed
    Completed,
    /// Abandoned before completion
    Cancelled,
}

impl OrderStatus {
    /// Stable string form used in event payloads and ERP records.
    pub fn as_str(self) -> &'static str {
        match self {
            OrderStatus::Received => "received",
            OrderStatus::Picking => "picking",
            OrderStatus::Picked => "picked",
            OrderStatus::Packing => "packing",
            OrderStatus::Packed => "packed",
            OrderStatus::Shipping => "shipping",
            OrderStatus::Completed => "completed",
            OrderStatus::Cancelled => "cancelled",
        }
    }

    /// Position of this status in the forward lifecycle.
    ///
    /// Used to assert that status transitions never regress. CANCELLED sits
    /// outside the linear sequence and compares greater than everything.
    pub fn sequence_index(self) -> u8 {
        match self {
            OrderStatus::Received => 0,
            OrderStatus::Picking => 1,
            OrderStatus::Picked => 2,
            OrderStatus::Packing => 3,
            OrderStatus::Packed => 4,
            OrderStatus::Shipping => 5,
            OrderStatus::Completed => 6,
            OrderStatus::Cancelled => 7,
        }
    }

    /// Parse the stable string form back into a status.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "received" => Some(OrderStatus::Received),
            "picking" => Some(OrderStatus::Picking),
            "picked" => Some(OrderStatus::Picked),
            "packing" => Some(OrderStatus::Packing),
            "packed" => Some(OrderStatus::Packed),
            "shipping" => Some(OrderStatus::Shipping),
            "completed" => Some(OrderStatus::Completed),
            "cancelled" => Some(OrderStatus::Cancelled),
            _ => None,
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kinds of warehouse events recorded for digital twin synchronization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    /// A new order entered the system
    OrderCreated,
    /// An order moved to a new lifecycle status
    OrderStatusChanged,
    /// An on-hand quantity changed
    InventoryUpdated,
    /// A worker token was granted to an order
    WorkerAssigned,
    /// A worker token was returned
    WorkerReleased,
    /// A non-worker resource token was granted
    ResourceAllocated,
    /// A non-worker resource token was returned
    ResourceReleased,
    /// Periodic heartbeat from the simulation clock
    SimulationTick,
    /// A synchronization pass was requested
    SyncRequest,
    /// Drift exceeded the configured threshold
    CalibrationTrigger,
}

impl EventKind {
    /// Stable string form used in serialized event records.
    pub fn as_str(self) -> &'static str {
        match self {
            EventKind::OrderCreated => "order_created",
            EventKind::OrderStatusChanged => "order_status_changed",
            EventKind::InventoryUpdated => "inventory_updated",
            EventKind::WorkerAssigned => "worker_assigned",
            EventKind::WorkerReleased => "worker_released",
            EventKind::ResourceAllocated => "resource_allocated",
            EventKind::ResourceReleased => "resource_released",
            EventKind::SimulationTick => "simulation_tick",
            EventKind::SyncRequest => "sync_request",
            EventKind::CalibrationTrigger => "calibration_trigger",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Origin of a warehouse event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventSource {
    /// Emitted by the simulation core
    Simulation,
    /// Emitted by the external record-keeping system
    Erp,
}

impl fmt::Display for EventSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventSource::Simulation => f.write_str("simulation"),
            EventSource::Erp => f.write_str("erp"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_string_forms() {
        assert_eq!(OrderStatus::Received.as_str(), "received");
        assert_eq!(OrderStatus::Picking.as_str(), "picking");
        assert_eq!(OrderStatus::Packed.as_str(), "packed");
        assert_eq!(OrderStatus::Completed.as_str(), "completed");
    }

    #[test]
    fn test_status_parse_roundtrip() {
        for status in [
            OrderStatus::Received,
            OrderStatus::Picking,
            OrderStatus::Picked,
            OrderStatus::Packing,
            OrderStatus::Packed,
            OrderStatus::Shipping,
            OrderStatus::Completed,
            OrderStatus::Cancelled,
        ] {
            assert_eq!(OrderStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(OrderStatus::parse("bogus"), None);
    }

    #[test]
    fn test_status_sequence_is_monotonic() {
        let forward = [
            OrderStatus::Received,
            OrderStatus::Picking,
            OrderStatus::Picked,
            OrderStatus::Packing,
            OrderStatus::Packed,
            OrderStatus::Shipping,
            OrderStatus::Completed,
        ];
        for pair in forward.windows(2) {
            assert!(pair[0].sequence_index() < pair[1].sequence_index());
        }
    }

    #[test]
    fn test_event_kind_serialization() {
        let json = serde_json::to_string(&EventKind::OrderStatusChanged).unwrap();
        assert_eq!(json, "\"order_status_changed\"");

        let kind: EventKind = serde_json::from_str("\"calibration_trigger\"").unwrap();
        assert_eq!(kind, EventKind::CalibrationTrigger);
    }

    #[test]
    fn test_event_source_display() {
        assert_eq!(EventSource::Simulation.to_string(), "simulation");
        assert_eq!(EventSource::Erp.to_string(), "erp");
    }
}

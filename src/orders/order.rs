//! Order and order line structures
//!
//! An order is a customer request for one or more SKUs. Each line tracks how
//! many units have been physically picked; timing milestones are recorded in
//! virtual minutes so calibration can recover processing durations later.

use crate::types::OrderStatus;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single line on an order: one SKU and a requested quantity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderLine {
    /// Stock keeping unit identifier
    pub sku: String,
    /// Units requested
    pub quantity: u32,
    /// Units picked so far
    pub picked_quantity: u32,
    /// Storage location the SKU was picked from, when known
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

impl OrderLine {
    /// Create a new unpicked line.
    pub fn new(sku: impl Into<String>, quantity: u32) -> Self {
        Self { sku: sku.into(), quantity, picked_quantity: 0, location: None }
    }

    /// True once the requested quantity has been picked.
    pub fn is_picked(&self) -> bool {
        self.picked_quantity >= self.quantity
    }
}

/// A customer order flowing through the fulfillment pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    /// Unique order identifier
    pub order_id: String,
    /// Customer identifier
    pub customer_id: String,
    /// Order lines
    pub lines: Vec<OrderLine>,
    /// Current lifecycle status
    pub status: OrderStatus,
    /// Priority from 1 (highest) to 5 (lowest)
    pub priority: u8,
    /// Wall-clock creation timestamp
    pub created_at: DateTime<Utc>,
    /// Wall-clock completion timestamp, set when the order ships
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
    /// Virtual time picking started, in minutes
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pick_start_time: Option<f64>,
    /// Virtual time picking finished, in minutes
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pick_end_time: Option<f64>,
    /// Virtual time packing started, in minutes
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pack_start_time: Option<f64>,
    /// Virtual time packing finished, in minutes
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pack_end_time: Option<f64>,
}

impl Order {
    /// Create a new order in the `Received` status.
    pub fn new(
        order_id: impl Into<String>,
        customer_id: impl Into<String>,
        lines: Vec<OrderLine>,
        priority: u8,
    ) -> Self {
        Self {
            order_id: order_id.into(),
            customer_id: customer_id.into(),
            lines,
            status: OrderStatus::Received,
            priority,
            created_at: Utc::now(),
            completed_at: None,
            pick_start_time: None,
            pick_end_time: None,
            pack_start_time: None,
            pack_end_time: None,
        }
    }

    /// Total units requested across all lines.
    pub fn total_items(&self) -> u32 {
        self.lines.iter().map(|line| line.quantity).sum()
    }

    /// Total units picked so far across all lines.
    pub fn picked_items(&self) -> u32 {
        self.lines.iter().map(|line| line.picked_quantity).sum()
    }

    /// True once every line has been fully picked.
    pub fn is_fully_picked(&self) -> bool {
        self.lines.iter().all(OrderLine::is_picked)
    }

    /// Advance the order to a new status.
    ///
    /// Status transitions only move forward through the fulfillment pipeline
    /// (with `Cancelled` reachable from anywhere).
    pub fn set_status(&mut self, status: OrderStatus) {
        debug_assert!(
            status == OrderStatus::Cancelled
                || status.sequence_index() >= self.status.sequence_index(),
            "status regression: {} -> {}",
            self.status,
            status
        );
        self.status = status;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_order() -> Order {
        Order::new(
            "SIM-000001",
            "CUST-0042",
            vec![OrderLine::new("SKU-0001", 2), OrderLine::new("SKU-0002", 3)],
            3,
        )
    }

    #[test]
    fn test_new_order_starts_received() {
        let order = sample_order();
        assert_eq!(order.status, OrderStatus::Received);
        assert!(order.completed_at.is_none());
        assert!(order.pick_start_time.is_none());
    }

    #[test]
    fn test_total_and_picked_items() {
        let mut order = sample_order();
        assert_eq!(order.total_items(), 5);
        assert_eq!(order.picked_items(), 0);
        assert!(!order.is_fully_picked());

        order.lines[0].picked_quantity = 2;
        assert_eq!(order.picked_items(), 2);
        assert!(!order.is_fully_picked());

        order.lines[1].picked_quantity = 3;
        assert!(order.is_fully_picked());
    }

    #[test]
    fn test_status_progression() {
        let mut order = sample_order();
        order.set_status(OrderStatus::Picking);
        order.set_status(OrderStatus::Picked);
        order.set_status(OrderStatus::Packing);
        assert_eq!(order.status, OrderStatus::Packing);
    }

    #[test]
    fn test_cancel_from_any_status() {
        let mut order = sample_order();
        order.set_status(OrderStatus::Picking);
        order.set_status(OrderStatus::Cancelled);
        assert_eq!(order.status, OrderStatus::Cancelled);
    }

    #[test]
    fn test_order_serialization() {
        let order = sample_order();
        let json = serde_json::to_value(&order).unwrap();
        assert_eq!(json["order_id"], "SIM-000001");
        assert_eq!(json["status"], "received");
        // Unset optional milestones are omitted
        assert!(json.get("pick_start_time").is_none());
    }
}

//! ERP adapter port
//!
//! The twin talks to an ERP system only through this trait, so the mock
//! adapter used in tests and demos is interchangeable with a real
//! integration.

use crate::events::WarehouseEvent;
use crate::orders::{InventoryItem, Order};
use crate::types::OrderStatus;
use std::collections::BTreeMap;

/// Inventory snapshot keyed by SKU, sorted for deterministic iteration.
pub type InventoryMap = BTreeMap<String, InventoryItem>;

/// Callback invoked for each ERP-side event a subscriber receives.
pub type EventCallback = Box<dyn FnMut(&WarehouseEvent)>;

/// Connection to an ERP system.
pub trait ErpAdapter {
    /// Establish the connection. Returns `true` on success.
    fn connect(&mut self) -> bool;

    /// Tear down the connection.
    fn disconnect(&mut self);

    /// True while the connection is established.
    fn is_connected(&self) -> bool;

    /// Fetch orders, optionally filtered to a single status. Returns an
    /// empty list when disconnected.
    fn fetch_orders(&self, status: Option<OrderStatus>) -> Vec<Order>;

    /// Fetch the full inventory snapshot. Returns an empty map when
    /// disconnected.
    fn fetch_inventory(&self) -> InventoryMap;

    /// Push an order status change to the ERP. Returns `false` when
    /// disconnected or the order is unknown.
    fn update_order_status(&mut self, order_id: &str, status: OrderStatus) -> bool;

    /// Apply a signed inventory adjustment to the ERP. Returns `false` when
    /// disconnected or the SKU is unknown.
    fn update_inventory(&mut self, sku: &str, change: i64) -> bool;

    /// Register a callback for ERP-side events. Returns `false` when
    /// disconnected.
    fn subscribe_to_events(&mut self, callback: EventCallback) -> bool;
}

//! Mock ERP adapter
//!
//! In-memory stand-in for a real ERP integration. Seeds a deterministic
//! inventory from the configured storage location count, accepts order and
//! inventory updates, and pushes ERP-side events to subscribers.

use crate::erp::port::{ErpAdapter, EventCallback, InventoryMap};
use crate::events::WarehouseEvent;
use crate::orders::{InventoryItem, Order, OrderLine};
use crate::types::{EventKind, EventSource, OrderStatus, SimulationConfig};
use chrono::Utc;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde_json::{json, Value};
use std::collections::BTreeMap;
use tracing::{debug, info};

/// In-memory mock ERP backed by seeded random master data.
pub struct MockErpAdapter {
    connected: bool,
    rng: StdRng,
    inventory: InventoryMap,
    orders: BTreeMap<String, Order>,
    next_order_seq: u64,
    next_event_seq: u64,
    subscribers: Vec<EventCallback>,
}

impl std::fmt::Debug for MockErpAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockErpAdapter")
            .field("connected", &self.connected)
            .field("skus", &self.inventory.len())
            .field("orders", &self.orders.len())
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}

impl MockErpAdapter {
    /// Create a mock ERP with inventory seeded from the configuration. The
    /// mock draws from its own generator, offset from the simulation seed,
    /// so ERP randomness does not perturb the simulation's stream.
    pub fn new(config: &SimulationConfig) -> Self {
        let mut rng = StdRng::seed_from_u64(config.random_seed.wrapping_add(1));
        let mut inventory = BTreeMap::new();

        for i in 1..=config.num_storage_locations {
            let sku = format!("SKU-{i:04}");
            inventory.insert(
                sku.clone(),
                InventoryItem {
                    sku,
                    name: format!("Product {i}"),
                    quantity: rng.gen_range(10..=100),
                    location: format!("A-{:02}-{}", i / 10, i % 10),
                    min_stock: 10,
                    max_stock: 100,
                    unit_cost: rng.gen_range(5.0..50.0),
                    last_updated: Utc::now(),
                },
            );
        }

        Self {
            connected: false,
            rng,
            inventory,
            orders: BTreeMap::new(),
            next_order_seq: 1,
            next_event_seq: 1,
            subscribers: Vec::new(),
        }
    }

    /// Register a new customer order in the ERP. Unknown SKUs are dropped
    /// from the request; an order with no valid line is rejected.
    pub fn create_order(
        &mut self,
        customer_id: &str,
        requested: &[(&str, u32)],
    ) -> Option<Order> {
        let lines: Vec<OrderLine> = requested
            .iter()
            .filter(|(sku, _)| self.inventory.contains_key(*sku))
            .map(|(sku, quantity)| OrderLine::new(*sku, *quantity))
            .collect();
        if lines.is_empty() {
            return None;
        }

        let order_id = format!("ORD-{:06}", self.next_order_seq);
        self.next_order_seq += 1;
        let priority = self.rng.gen_range(1..=5u8);

        let order = Order::new(order_id.clone(), customer_id, lines, priority);
        self.orders.insert(order_id.clone(), order.clone());

        let payload = serde_json::to_value(&order).unwrap_or(Value::Null);
        self.emit(EventKind::OrderCreated, payload);
        debug!(order_id = %order_id, "ERP order created");
        Some(order)
    }

    /// Number of orders in the ERP.
    pub fn order_count(&self) -> usize {
        self.orders.len()
    }

    // Build an ERP-sourced event and push it to every subscriber.
    fn emit(&mut self, event_type: EventKind, data: Value) {
        let event = WarehouseEvent {
            event_id: format!("ERP-{:06}", self.next_event_seq),
            event_type,
            timestamp: Utc::now(),
            data,
            source: EventSource::Erp,
            processed: false,
        };
        self.next_event_seq += 1;

        for subscriber in &mut self.subscribers {
            subscriber(&event);
        }
    }
}

impl ErpAdapter for MockErpAdapter {
    fn connect(&mut self) -> bool {
        self.connected = true;
        info!(skus = self.inventory.len(), "connected to mock ERP");
        true
    }

    fn disconnect(&mut self) {
        self.connected = false;
        info!("disconnected from mock ERP");
    }

    fn is_connected(&self) -> bool {
        self.connected
    }

    fn fetch_orders(&self, status: Option<OrderStatus>) -> Vec<Order> {
        if !self.connected {
            return Vec::new();
        }
        self.orders
            .values()
            .filter(|order| status.map_or(true, |s| order.status == s))
            .cloned()
            .collect()
    }

    fn fetch_inventory(&self) -> InventoryMap {
        if !self.connected {
            return BTreeMap::new();
        }
        self.inventory.clone()
    }

    fn update_order_status(&mut self, order_id: &str, status: OrderStatus) -> bool {
        if !self.connected {
            return false;
        }
        let updated = match self.orders.get_mut(order_id) {
            Some(order) => {
                order.set_status(status);
                true
            }
            None => false,
        };
        if updated {
            self.emit(
                EventKind::OrderStatusChanged,
                json!({"order_id": order_id, "new_status": status.as_str()}),
            );
        }
        updated
    }

    fn update_inventory(&mut self, sku: &str, change: i64) -> bool {
        if !self.connected {
            return false;
        }
        let quantity = match self.inventory.get_mut(sku) {
            Some(item) => {
                item.adjust(change);
                Some(item.quantity)
            }
            None => None,
        };
        match quantity {
            Some(quantity) => {
                self.emit(
                    EventKind::InventoryUpdated,
                    json!({"sku": sku, "change": change, "quantity": quantity}),
                );
                true
            }
            None => false,
        }
    }

    fn subscribe_to_events(&mut self, callback: EventCallback) -> bool {
        if !self.connected {
            return false;
        }
        self.subscribers.push(callback);
        true
    }
}

//! Inventory item structure
//!
//! One record per SKU. Quantities are signed: a pick against an already
//! depleted SKU drives the on-hand count negative, which surfaces as drift
//! against the ERP rather than being silently clamped.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single SKU's stock record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InventoryItem {
    /// Stock keeping unit identifier
    pub sku: String,
    /// Human-readable product name
    pub name: String,
    /// On-hand quantity (may go negative under oversell)
    pub quantity: i64,
    /// Storage location code, e.g. `A-03-7`
    pub location: String,
    /// Reorder point
    pub min_stock: i64,
    /// Maximum stock level
    pub max_stock: i64,
    /// Unit cost in currency units
    pub unit_cost: f64,
    /// Timestamp of the last quantity change
    pub last_updated: DateTime<Utc>,
}

impl InventoryItem {
    /// Apply a signed quantity change and refresh the update timestamp.
    pub fn adjust(&mut self, change: i64) {
        self.quantity += change;
        self.last_updated = Utc::now();
    }

    /// True when on-hand quantity is at or below the reorder point.
    pub fn needs_reorder(&self) -> bool {
        self.quantity <= self.min_stock
    }
}

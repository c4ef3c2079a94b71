//! Inventory drift between the twin and the ERP
//!
//! Drift is the normalized absolute quantity difference over the SKUs both
//! sides know about. A disconnected ERP reads as full drift.

use crate::erp::InventoryMap;
use tracing::debug;

/// Compute the drift fraction between the twin's inventory and an external
/// snapshot.
///
/// Over the shared SKUs, drift is the sum of absolute quantity differences
/// divided by the sum of per-SKU maxima (floored at one unit each so a
/// zero-on-both-sides SKU contributes nothing but cannot divide by zero).
/// Returns `1.0` when disconnected and `0.0` when there is nothing to
/// compare.
pub fn compute_drift(twin: &InventoryMap, external: &InventoryMap, connected: bool) -> f64 {
    if !connected {
        return 1.0;
    }

    let mut total_diff = 0.0;
    let mut total_norm = 0.0;
    for (sku, twin_item) in twin {
        let Some(external_item) = external.get(sku) else {
            continue;
        };
        let twin_qty = twin_item.quantity as f64;
        let external_qty = external_item.quantity as f64;
        total_diff += (external_qty - twin_qty).abs();
        total_norm += external_qty.max(twin_qty).max(1.0);
    }

    if total_norm == 0.0 {
        return 0.0;
    }

    let drift = total_diff / total_norm;
    debug!(drift = format!("{drift:.4}"), "computed inventory drift");
    drift
}

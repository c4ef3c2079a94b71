//! Timing calibration from ERP event history
//!
//! Real fulfillment timestamps from ERP logs are mined for per-order pick
//! and pack durations; their mean and spread replace the configured timing
//! parameters so the twin tracks observed reality.

use crate::events::WarehouseEvent;
use crate::types::EventKind;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::info;

/// Standard deviation used when too few samples exist to estimate spread.
const FALLBACK_STD: f64 = 0.5;

/// One applied calibration, kept in the twin's history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalibrationRecord {
    /// When the calibration was applied
    pub timestamp: DateTime<Utc>,
    /// Number of events analyzed
    pub num_events: usize,
    /// Parameter names to their newly derived values
    pub parameters: BTreeMap<String, f64>,
}

#[derive(Debug, Default)]
struct OrderMilestones {
    created: Option<DateTime<Utc>>,
    picked: Option<DateTime<Utc>>,
    packed: Option<DateTime<Utc>>,
}

/// Derive timing parameters from a slice of ERP events.
///
/// Pick duration is measured from order creation to the first `picked`
/// status; pack duration from `picked` to the first `packed`. Events are
/// consumed in stream order: a status with no preceding earlier milestone
/// for that order is silently dropped, as are repeats of a milestone
/// already seen. The result maps `pick_time_mean`, `pick_time_std`,
/// `pack_time_mean`, and `pack_time_std` to their derived values; a phase
/// with no complete samples is omitted entirely.
pub fn derive_timing_parameters(events: &[WarehouseEvent]) -> BTreeMap<String, f64> {
    let mut milestones: BTreeMap<String, OrderMilestones> = BTreeMap::new();
    let mut pick_samples = Vec::new();
    let mut pack_samples = Vec::new();

    for event in events {
        match event.event_type {
            EventKind::OrderCreated => {
                if let Some(order_id) = event.data.get("order_id").and_then(|v| v.as_str()) {
                    milestones
                        .entry(order_id.to_string())
                        .or_default()
                        .created
                        .get_or_insert(event.timestamp);
                }
            }
            EventKind::OrderStatusChanged => {
                let Some(order_id) = event.data.get("order_id").and_then(|v| v.as_str())
                else {
                    continue;
                };
                let status = event
                    .data
                    .get("new_status")
                    .or_else(|| event.data.get("status"))
                    .and_then(|v| v.as_str());
                let entry = milestones.entry(order_id.to_string()).or_default();
                match status {
                    Some("picked") if entry.picked.is_none() => {
                        if let Some(created) = entry.created {
                            pick_samples.push(minutes_between(created, event.timestamp));
                            entry.picked = Some(event.timestamp);
                        }
                    }
                    Some("packed") if entry.packed.is_none() => {
                        if let Some(picked) = entry.picked {
                            pack_samples.push(minutes_between(picked, event.timestamp));
                            entry.packed = Some(event.timestamp);
                        }
                    }
                    _ => {}
                }
            }
            _ => {}
        }
    }

    let mut parameters = BTreeMap::new();
    if let Some((mean, std)) = mean_and_std(&pick_samples) {
        parameters.insert("pick_time_mean".to_string(), mean);
        parameters.insert("pick_time_std".to_string(), std);
    }
    if let Some((mean, std)) = mean_and_std(&pack_samples) {
        parameters.insert("pack_time_mean".to_string(), mean);
        parameters.insert("pack_time_std".to_string(), std);
    }

    info!(
        events = events.len(),
        pick_samples = pick_samples.len(),
        pack_samples = pack_samples.len(),
        "derived calibration parameters"
    );
    parameters
}

fn minutes_between(start: DateTime<Utc>, end: DateTime<Utc>) -> f64 {
    (end - start).num_milliseconds() as f64 / 60_000.0
}

// Mean and sample standard deviation, with the fallback spread when fewer
// than two samples exist. `None` when there are no samples at all.
fn mean_and_std(samples: &[f64]) -> Option<(f64, f64)> {
    if samples.is_empty() {
        return None;
    }
    let count = samples.len() as f64;
    let mean = samples.iter().sum::<f64>() / count;
    let std = if samples.len() > 1 {
        let variance = samples.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / (count - 1.0);
        variance.sqrt()
    } else {
        FALLBACK_STD
    };
    Some((mean, std))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::EventSource;
    use chrono::Duration;
    use serde_json::json;

    fn status_event(order_id: &str, status: &str, at: DateTime<Utc>) -> WarehouseEvent {
        WarehouseEvent {
            event_id: format!("ERP-{order_id}-{status}"),
            event_type: EventKind::OrderStatusChanged,
            timestamp: at,
            data: json!({"order_id": order_id, "new_status": status}),
            source: EventSource::Erp,
            processed: false,
        }
    }

    fn created_event(order_id: &str, at: DateTime<Utc>) -> WarehouseEvent {
        WarehouseEvent {
            event_id: format!("ERP-{order_id}-created"),
            event_type: EventKind::OrderCreated,
            timestamp: at,
            data: json!({"order_id": order_id}),
            source: EventSource::Erp,
            processed: false,
        }
    }

    #[test]
    fn test_derives_means_from_event_gaps() {
        let base = Utc::now();
        let mut events = Vec::new();
        for i in 0..10 {
            let order_id = format!("ORD-{i:06}");
            let created = base + Duration::minutes(i * 20);
            events.push(created_event(&order_id, created));
            events.push(status_event(&order_id, "picked", created + Duration::minutes(3)));
            events.push(status_event(&order_id, "packed", created + Duration::minutes(5)));
        }

        let parameters = derive_timing_parameters(&events);
        assert!((parameters["pick_time_mean"] - 3.0).abs() < 1e-9);
        assert!((parameters["pack_time_mean"] - 2.0).abs() < 1e-9);
        // Identical gaps leave no spread
        assert!(parameters["pick_time_std"].abs() < 1e-9);
    }

    #[test]
    fn test_single_sample_uses_fallback_std() {
        let base = Utc::now();
        let events = vec![
            created_event("ORD-000001", base),
            status_event("ORD-000001", "picked", base + Duration::minutes(4)),
        ];

        let parameters = derive_timing_parameters(&events);
        assert!((parameters["pick_time_mean"] - 4.0).abs() < 1e-9);
        assert_eq!(parameters["pick_time_std"], FALLBACK_STD);
        assert!(!parameters.contains_key("pack_time_mean"));
    }

    #[test]
    fn test_legacy_status_key_accepted() {
        let base = Utc::now();
        let mut event = status_event("ORD-000001", "picked", base + Duration::minutes(2));
        event.data = json!({"order_id": "ORD-000001", "status": "picked"});
        let events = vec![created_event("ORD-000001", base), event];

        let parameters = derive_timing_parameters(&events);
        assert!((parameters["pick_time_mean"] - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_incomplete_orders_contribute_nothing() {
        let base = Utc::now();
        let events = vec![
            created_event("ORD-000001", base),
            status_event("ORD-000002", "picked", base + Duration::minutes(3)),
        ];
        assert!(derive_timing_parameters(&events).is_empty());
    }

    #[test]
    fn test_packed_before_picked_is_dropped() {
        let base = Utc::now();
        let events = vec![
            created_event("ORD-000001", base),
            status_event("ORD-000001", "packed", base + Duration::minutes(2)),
            status_event("ORD-000001", "picked", base + Duration::minutes(4)),
        ];

        let parameters = derive_timing_parameters(&events);
        assert!((parameters["pick_time_mean"] - 4.0).abs() < 1e-9);
        assert!(!parameters.contains_key("pack_time_mean"));
    }

    #[test]
    fn test_repeated_milestones_keep_the_first() {
        let base = Utc::now();
        let events = vec![
            created_event("ORD-000001", base),
            status_event("ORD-000001", "picked", base + Duration::minutes(3)),
            status_event("ORD-000001", "picked", base + Duration::minutes(9)),
            status_event("ORD-000001", "packed", base + Duration::minutes(5)),
        ];

        let parameters = derive_timing_parameters(&events);
        assert!((parameters["pick_time_mean"] - 3.0).abs() < 1e-9);
        assert!((parameters["pack_time_mean"] - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_empty_history_derives_nothing() {
        assert!(derive_timing_parameters(&[]).is_empty());
    }
}

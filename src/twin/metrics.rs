//! Run metrics and summary statistics
//!
//! Raw per-order samples accumulate during a run; `summary()` reduces them
//! to the aggregate view reported to callers.

use crate::orders::Order;
use serde::{Deserialize, Serialize};

/// Raw metrics accumulated while a simulation runs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TwinMetrics {
    /// Orders completed during the run
    pub orders_completed: u64,
    /// Total units across completed orders
    pub items_picked: u64,
    /// End-to-end processing time of each completed order, in minutes
    pub order_times: Vec<f64>,
    /// Pick phase duration of each completed order, in minutes
    pub pick_times: Vec<f64>,
    /// Pack phase duration of each completed order, in minutes
    pub pack_times: Vec<f64>,
}

impl TwinMetrics {
    /// Record a completed order.
    pub fn record_completion(&mut self, order: &Order, total_time: f64) {
        self.orders_completed += 1;
        self.items_picked += u64::from(order.total_items());
        self.order_times.push(total_time);

        if let (Some(start), Some(end)) = (order.pick_start_time, order.pick_end_time) {
            self.pick_times.push(end - start);
        }
        if let (Some(start), Some(end)) = (order.pack_start_time, order.pack_end_time) {
            self.pack_times.push(end - start);
        }
    }

    /// Reduce the raw samples to an aggregate summary.
    pub fn summary(&self) -> MetricsSummary {
        let order_stats = SampleStats::from_samples(&self.order_times);
        let avg_order_time = order_stats.as_ref().map(|s| s.avg);

        let avg_items_per_order =
            self.items_picked as f64 / (self.orders_completed.max(1)) as f64;

        // Throughput is undefined until at least one order completes
        let throughput_per_hour = avg_order_time.and_then(|avg| {
            if self.orders_completed > 0 && avg > 0.0 {
                Some(60.0 / avg)
            } else {
                None
            }
        });

        let items_per_hour = throughput_per_hour.map(|t| t * avg_items_per_order);

        MetricsSummary {
            orders_completed: self.orders_completed,
            items_picked: self.items_picked,
            avg_items_per_order,
            order_time: order_stats,
            pick_time: SampleStats::from_samples(&self.pick_times),
            pack_time: SampleStats::from_samples(&self.pack_times),
            throughput_per_hour,
            items_per_hour,
        }
    }
}

/// Descriptive statistics over one sample set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SampleStats {
    /// Arithmetic mean
    pub avg: f64,
    /// Sample standard deviation (zero with fewer than two samples)
    pub std: f64,
    /// Smallest sample
    pub min: f64,
    /// Median (average of middle two for even counts)
    pub median: f64,
    /// Largest sample
    pub max: f64,
}

impl SampleStats {
    /// Compute statistics over the samples, or `None` when empty.
    pub fn from_samples(samples: &[f64]) -> Option<Self> {
        if samples.is_empty() {
            return None;
        }

        let count = samples.len() as f64;
        let avg = samples.iter().sum::<f64>() / count;

        let std = if samples.len() > 1 {
            let variance =
                samples.iter().map(|x| (x - avg).powi(2)).sum::<f64>() / (count - 1.0);
            variance.sqrt()
        } else {
            0.0
        };

        let mut sorted = samples.to_vec();
        sorted.sort_by(|a, b| a.total_cmp(b));
        let median = if sorted.len() % 2 == 1 {
            sorted[sorted.len() / 2]
        } else {
            let hi = sorted.len() / 2;
            (sorted[hi - 1] + sorted[hi]) / 2.0
        };

        Some(Self { avg, std, min: sorted[0], median, max: sorted[sorted.len() - 1] })
    }
}

/// Aggregate metrics for one simulation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricsSummary {
    /// Orders completed during the run
    pub orders_completed: u64,
    /// Total units across completed orders
    pub items_picked: u64,
    /// Mean units per completed order
    pub avg_items_per_order: f64,
    /// End-to-end order time statistics
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_time: Option<SampleStats>,
    /// Pick phase statistics
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pick_time: Option<SampleStats>,
    /// Pack phase statistics
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pack_time: Option<SampleStats>,
    /// Completed orders per hour, derived from the average order time
    #[serde(skip_serializing_if = "Option::is_none")]
    pub throughput_per_hour: Option<f64>,
    /// Units picked per hour of simulated time
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items_per_hour: Option<f64>,
}

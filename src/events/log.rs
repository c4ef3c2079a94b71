//! Bounded event log
//!
//! A fixed-capacity FIFO ring of warehouse events. When full, the oldest
//! entries are evicted. Event identifiers come from a persistent counter, so
//! identifiers stay unique and monotonic across evictions.

use crate::events::WarehouseEvent;
use crate::types::{EventKind, EventSource};
use chrono::Utc;
use serde_json::Value;
use std::collections::VecDeque;

/// Bounded FIFO log of warehouse events.
#[derive(Debug, Clone)]
pub struct EventLog {
    capacity: usize,
    next_seq: u64,
    entries: VecDeque<WarehouseEvent>,
}

impl EventLog {
    /// Create an empty log with the given capacity.
    pub fn new(capacity: usize) -> Self {
        Self { capacity, next_seq: 1, entries: VecDeque::with_capacity(capacity.min(1024)) }
    }

    /// Record a new event, evicting the oldest entries if the log is full.
    /// Returns the assigned event identifier.
    pub fn record(&mut self, event_type: EventKind, data: Value, source: EventSource) -> String {
        let event_id = format!("DT-{:06}", self.next_seq);
        self.next_seq += 1;

        self.entries.push_back(WarehouseEvent {
            event_id: event_id.clone(),
            event_type,
            timestamp: Utc::now(),
            data,
            source,
            processed: false,
        });
        while self.entries.len() > self.capacity {
            self.entries.pop_front();
        }

        event_id
    }

    /// Events currently retained, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &WarehouseEvent> {
        self.entries.iter()
    }

    /// Clone the retained events into a vector, oldest first.
    pub fn snapshot(&self) -> Vec<WarehouseEvent> {
        self.entries.iter().cloned().collect()
    }

    /// Number of retained events.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when no events are retained.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Configured capacity.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Total number of events ever recorded, including evicted ones.
    pub fn total_recorded(&self) -> u64 {
        self.next_seq - 1
    }
}

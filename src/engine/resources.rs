//! Capacity-constrained resource pools
//!
//! Workers and forklifts are modeled as counted pools with FIFO wait
//! queues. Releasing a slot while processes are waiting transfers the slot
//! directly to the head waiter instead of freeing it, so a released slot can
//! never be stolen by a later arrival.

use crate::engine::scheduler::ProcessId;
use std::collections::VecDeque;

/// Identifies one of the warehouse resource pools.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PoolId {
    /// Warehouse worker pool
    Workers,
    /// Forklift pool
    Forklifts,
}

impl PoolId {
    /// Display name used in logs and events.
    pub fn name(&self) -> &'static str {
        match self {
            PoolId::Workers => "workers",
            PoolId::Forklifts => "forklifts",
        }
    }
}

/// A counted resource pool with a FIFO wait queue.
#[derive(Debug)]
pub struct ResourcePool {
    name: &'static str,
    capacity: usize,
    in_use: usize,
    waiters: VecDeque<ProcessId>,
}

impl ResourcePool {
    /// Create a pool with the given capacity and no slots in use.
    pub fn new(name: &'static str, capacity: usize) -> Self {
        Self { name, capacity, in_use: 0, waiters: VecDeque::new() }
    }

    /// Try to take a slot immediately. Returns `false` when the pool is
    /// saturated; the caller should then enqueue itself as a waiter.
    pub fn try_acquire(&mut self) -> bool {
        if self.in_use < self.capacity {
            self.in_use += 1;
            true
        } else {
            false
        }
    }

    /// Join the FIFO wait queue.
    pub fn enqueue_waiter(&mut self, pid: ProcessId) {
        self.waiters.push_back(pid);
    }

    /// Release one held slot. If processes are waiting, the slot transfers
    /// to the head waiter (in-use count unchanged) and that waiter's id is
    /// returned so the engine can wake it at the current virtual time.
    pub fn release(&mut self) -> Option<ProcessId> {
        if let Some(next) = self.waiters.pop_front() {
            Some(next)
        } else {
            debug_assert!(self.in_use > 0, "release on idle pool {}", self.name);
            self.in_use = self.in_use.saturating_sub(1);
            None
        }
    }

    /// Pool display name.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Configured capacity.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Slots currently held.
    pub fn in_use(&self) -> usize {
        self.in_use
    }

    /// Processes waiting for a slot.
    pub fn queue_len(&self) -> usize {
        self.waiters.len()
    }
}

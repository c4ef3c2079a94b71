//! Virtual clock and event scheduler
//!
//! The scheduler owns the virtual clock and a priority queue of pending
//! process wake-ups. Wake-ups are ordered by wake time, with an insertion
//! sequence number breaking ties so that simultaneous events always fire in
//! the order they were scheduled. This makes runs fully deterministic for a
//! given seed.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

/// Virtual simulation time, in minutes since the start of the run.
pub type SimTime = f64;

/// Opaque handle for a process registered with the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ProcessId(pub(crate) u64);

/// A pending wake-up for a process.
#[derive(Debug, Clone, Copy)]
struct ScheduledWake {
    at: SimTime,
    seq: u64,
    pid: ProcessId,
}

impl PartialEq for ScheduledWake {
    fn eq(&self, other: &Self) -> bool {
        self.at == other.at && self.seq == other.seq
    }
}

impl Eq for ScheduledWake {}

impl PartialOrd for ScheduledWake {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ScheduledWake {
    // BinaryHeap is a max-heap; reverse so the earliest wake pops first,
    // with the insertion sequence breaking ties.
    fn cmp(&self, other: &Self) -> Ordering {
        self.at
            .total_cmp(&other.at)
            .then_with(|| self.seq.cmp(&other.seq))
            .reverse()
    }
}

/// The virtual clock and wake-up queue.
#[derive(Debug)]
pub struct Scheduler {
    now: SimTime,
    next_seq: u64,
    queue: BinaryHeap<ScheduledWake>,
}

impl Scheduler {
    /// Create a scheduler with the clock at zero.
    pub fn new() -> Self {
        Self { now: 0.0, next_seq: 0, queue: BinaryHeap::new() }
    }

    /// Current virtual time in minutes.
    pub fn now(&self) -> SimTime {
        self.now
    }

    /// Schedule a process to wake at an absolute virtual time. Times in the
    /// past are clamped to the current time.
    pub fn schedule_at(&mut self, pid: ProcessId, at: SimTime) {
        let at = if at < self.now { self.now } else { at };
        let seq = self.next_seq;
        self.next_seq += 1;
        self.queue.push(ScheduledWake { at, seq, pid });
    }

    /// Schedule a process to wake after a relative delay in minutes.
    pub fn schedule_after(&mut self, pid: ProcessId, delay: f64) {
        let delay = if delay.is_finite() && delay > 0.0 { delay } else { 0.0 };
        self.schedule_at(pid, self.now + delay);
    }

    /// Pop the next wake-up due at or before `until`, advancing the clock to
    /// its wake time. Returns `None` when nothing is due within the horizon.
    pub fn pop_due(&mut self, until: SimTime) -> Option<ProcessId> {
        match self.queue.peek() {
            Some(wake) if wake.at <= until => {
                let wake = self.queue.pop()?;
                self.now = wake.at;
                Some(wake.pid)
            }
            _ => None,
        }
    }

    /// Number of pending wake-ups.
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// Advance the clock to `until` without firing anything. Used at the end
    /// of a run so the horizon is fully consumed.
    pub fn advance_clock(&mut self, until: SimTime) {
        if until > self.now {
            self.now = until;
        }
    }
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pops_in_time_order() {
        let mut sched = Scheduler::new();
        sched.schedule_at(ProcessId(1), 5.0);
        sched.schedule_at(ProcessId(2), 2.0);
        sched.schedule_at(ProcessId(3), 8.0);

        assert_eq!(sched.pop_due(10.0), Some(ProcessId(2)));
        assert_eq!(sched.now(), 2.0);
        assert_eq!(sched.pop_due(10.0), Some(ProcessId(1)));
        assert_eq!(sched.pop_due(10.0), Some(ProcessId(3)));
        assert_eq!(sched.pop_due(10.0), None);
    }

    #[test]
    fn test_ties_break_by_insertion_order() {
        let mut sched = Scheduler::new();
        sched.schedule_at(ProcessId(7), 3.0);
        sched.schedule_at(ProcessId(4), 3.0);
        sched.schedule_at(ProcessId(9), 3.0);

        assert_eq!(sched.pop_due(10.0), Some(ProcessId(7)));
        assert_eq!(sched.pop_due(10.0), Some(ProcessId(4)));
        assert_eq!(sched.pop_due(10.0), Some(ProcessId(9)));
    }

    #[test]
    fn test_horizon_respected() {
        let mut sched = Scheduler::new();
        sched.schedule_at(ProcessId(1), 5.0);
        assert_eq!(sched.pop_due(4.0), None);
        assert_eq!(sched.now(), 0.0);
        assert_eq!(sched.pending(), 1);
        assert_eq!(sched.pop_due(5.0), Some(ProcessId(1)));
    }

    #[test]
    fn test_past_times_clamped_to_now() {
        let mut sched = Scheduler::new();
        sched.schedule_at(ProcessId(1), 10.0);
        assert_eq!(sched.pop_due(20.0), Some(ProcessId(1)));
        assert_eq!(sched.now(), 10.0);

        sched.schedule_at(ProcessId(2), 3.0);
        assert_eq!(sched.pop_due(20.0), Some(ProcessId(2)));
        // Clock never moves backwards
        assert_eq!(sched.now(), 10.0);
    }

    #[test]
    fn test_negative_delay_treated_as_zero() {
        let mut sched = Scheduler::new();
        sched.advance_clock(5.0);
        sched.schedule_after(ProcessId(1), -2.0);
        assert_eq!(sched.pop_due(100.0), Some(ProcessId(1)));
        assert_eq!(sched.now(), 5.0);
    }

    #[test]
    fn test_advance_clock_is_monotonic() {
        let mut sched = Scheduler::new();
        sched.advance_clock(10.0);
        sched.advance_clock(4.0);
        assert_eq!(sched.now(), 10.0);
    }
}

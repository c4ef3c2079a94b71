//! Process trait, simulation state, and the driving engine
//!
//! Processes are explicit state machines. Each call to [`Process::resume`]
//! runs the process up to its next suspension point and returns an
//! [`Effect`] telling the engine what the process is waiting for. A process
//! is resumed again only when its delay elapses or its requested resource
//! slot is granted, so all virtual time passes through the scheduler.

use crate::engine::resources::{PoolId, ResourcePool};
use crate::engine::scheduler::{ProcessId, Scheduler, SimTime};
use crate::events::EventLog;
use crate::orders::{InventoryItem, Order};
use crate::twin::metrics::TwinMetrics;
use crate::types::{EventKind, EventSource, SimulationConfig, MIN_TASK_MINUTES};
use rand::rngs::StdRng;
use rand_distr::{Distribution, Normal};
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use tracing::trace;

/// What a process is waiting for after a resume step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Effect {
    /// Sleep for the given number of virtual minutes.
    Delay(f64),
    /// Wait for a slot in the given resource pool. The process is resumed
    /// in the same virtual instant once a slot is granted.
    Acquire(PoolId),
    /// The process has finished and can be dropped.
    Done,
}

/// A cooperative simulation process.
pub trait Process {
    /// Run until the next suspension point and report what to wait for.
    fn resume(&mut self, ctx: &mut SimContext<'_>) -> Effect;
}

/// Shared mutable simulation state threaded through every process.
///
/// All iterated collections are `BTreeMap`s so iteration order (and with it
/// every random draw that depends on it) is deterministic.
#[derive(Debug)]
pub struct SimState {
    /// Active configuration for this run
    pub config: SimulationConfig,
    /// Seeded random source; every stochastic draw goes through this
    pub rng: StdRng,
    /// Inventory keyed by SKU
    pub inventory: BTreeMap<String, InventoryItem>,
    /// Orders currently in the pipeline, keyed by order id
    pub active_orders: BTreeMap<String, Order>,
    /// Orders that reached the completed status, in completion order
    pub completed_orders: Vec<Order>,
    /// Bounded event log
    pub event_log: EventLog,
    /// Accumulated run metrics
    pub metrics: TwinMetrics,
    /// Orders synthesized by the arrival generator during this run
    pub simulated_order_count: u64,
}

impl SimState {
    /// Sample a task duration from a normal distribution, floored at
    /// [`MIN_TASK_MINUTES`] so no task completes instantaneously.
    pub fn sample_duration(&mut self, mean: f64, std: f64) -> f64 {
        self.sample_normal(mean, std).max(MIN_TASK_MINUTES)
    }

    /// Sample a raw normal value, falling back to the mean when the
    /// parameters are degenerate.
    pub fn sample_normal(&mut self, mean: f64, std: f64) -> f64 {
        Normal::new(mean, std.max(0.0))
            .map(|dist| dist.sample(&mut self.rng))
            .unwrap_or(mean)
    }

    /// Record a simulation-sourced event in the bounded log.
    pub fn record_event(&mut self, kind: EventKind, data: Value) {
        self.event_log.record(kind, data, EventSource::Simulation);
    }
}

/// The warehouse resource pools.
#[derive(Debug)]
pub struct Pools {
    workers: ResourcePool,
    forklifts: ResourcePool,
}

impl Pools {
    /// Create pools sized from the configuration.
    pub fn from_config(config: &SimulationConfig) -> Self {
        Self {
            workers: ResourcePool::new(PoolId::Workers.name(), config.num_workers),
            forklifts: ResourcePool::new(PoolId::Forklifts.name(), config.num_forklifts),
        }
    }

    /// Mutable access to a pool by id.
    pub fn get_mut(&mut self, id: PoolId) -> &mut ResourcePool {
        match id {
            PoolId::Workers => &mut self.workers,
            PoolId::Forklifts => &mut self.forklifts,
        }
    }

    /// Shared access to a pool by id.
    pub fn get(&self, id: PoolId) -> &ResourcePool {
        match id {
            PoolId::Workers => &self.workers,
            PoolId::Forklifts => &self.forklifts,
        }
    }
}

/// Per-resume view of the engine handed to a process.
pub struct SimContext<'a> {
    scheduler: &'a mut Scheduler,
    pools: &'a mut Pools,
    /// Shared simulation state
    pub state: &'a mut SimState,
    spawned: Vec<Box<dyn Process>>,
}

impl std::fmt::Debug for SimContext<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SimContext")
            .field("now", &self.scheduler.now())
            .field("spawned", &self.spawned.len())
            .finish()
    }
}

impl SimContext<'_> {
    /// Current virtual time in minutes.
    pub fn now(&self) -> SimTime {
        self.scheduler.now()
    }

    /// Release a held slot back to a pool. If another process is waiting,
    /// the slot transfers to it and that process is scheduled to wake in the
    /// current virtual instant.
    pub fn release(&mut self, pool: PoolId) {
        if let Some(waiter) = self.pools.get_mut(pool).release() {
            self.scheduler.schedule_at(waiter, self.scheduler.now());
        }
    }

    /// Queue a new process for the engine to register after this resume
    /// step. The new process first runs at the current virtual time.
    pub fn spawn(&mut self, process: Box<dyn Process>) {
        self.spawned.push(process);
    }
}

/// The discrete-event engine: clock, pools, registered processes, and state.
pub struct Engine {
    scheduler: Scheduler,
    pools: Pools,
    processes: HashMap<ProcessId, Box<dyn Process>>,
    next_pid: u64,
    /// Shared simulation state
    pub state: SimState,
}

impl std::fmt::Debug for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine")
            .field("now", &self.scheduler.now())
            .field("processes", &self.processes.len())
            .field("pending", &self.scheduler.pending())
            .finish()
    }
}

impl Engine {
    /// Create an engine over the given state, with pools sized from its
    /// configuration.
    pub fn new(state: SimState) -> Self {
        let pools = Pools::from_config(&state.config);
        Self {
            scheduler: Scheduler::new(),
            pools,
            processes: HashMap::new(),
            next_pid: 1,
            state,
        }
    }

    /// Current virtual time in minutes.
    pub fn now(&self) -> SimTime {
        self.scheduler.now()
    }

    /// Register a process and schedule its first resume at the current
    /// virtual time.
    pub fn spawn(&mut self, process: Box<dyn Process>) -> ProcessId {
        let pid = ProcessId(self.next_pid);
        self.next_pid += 1;
        self.processes.insert(pid, process);
        self.scheduler.schedule_at(pid, self.scheduler.now());
        pid
    }

    /// Run the simulation until the virtual clock reaches `until`. Events
    /// due exactly at the horizon still fire; the clock ends at `until`.
    pub fn advance_to(&mut self, until: SimTime) {
        while let Some(pid) = self.scheduler.pop_due(until) {
            self.drive(pid);
        }
        self.scheduler.advance_clock(until);
    }

    /// Consume the engine and return the final state.
    pub fn into_state(self) -> SimState {
        self.state
    }

    // Resume one process repeatedly within the current virtual instant until
    // it parks on a delay, joins a wait queue, or finishes.
    fn drive(&mut self, pid: ProcessId) {
        let Some(mut process) = self.processes.remove(&pid) else {
            return;
        };

        loop {
            let mut ctx = SimContext {
                scheduler: &mut self.scheduler,
                pools: &mut self.pools,
                state: &mut self.state,
                spawned: Vec::new(),
            };
            let effect = process.resume(&mut ctx);
            let spawned = ctx.spawned;
            for child in spawned {
                self.spawn(child);
            }

            trace!(pid = pid.0, now = self.scheduler.now(), ?effect, "process step");

            match effect {
                Effect::Delay(minutes) => {
                    self.scheduler.schedule_after(pid, minutes);
                    self.processes.insert(pid, process);
                    return;
                }
                Effect::Acquire(pool) => {
                    if self.pools.get_mut(pool).try_acquire() {
                        // Slot granted in the same virtual instant
                        continue;
                    }
                    self.pools.get_mut(pool).enqueue_waiter(pid);
                    self.processes.insert(pid, process);
                    return;
                }
                Effect::Done => return,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn test_state() -> SimState {
        let config = SimulationConfig::default();
        SimState {
            rng: StdRng::seed_from_u64(config.random_seed),
            event_log: EventLog::new(config.event_buffer_size),
            config,
            inventory: BTreeMap::new(),
            active_orders: BTreeMap::new(),
            completed_orders: Vec::new(),
            metrics: TwinMetrics::default(),
            simulated_order_count: 0,
        }
    }

    /// Sleeps a fixed delay a given number of times, then finishes.
    struct Sleeper {
        remaining: u32,
        delay: f64,
        wake_times: Vec<f64>,
    }

    impl Process for Sleeper {
        fn resume(&mut self, ctx: &mut SimContext<'_>) -> Effect {
            self.wake_times.push(ctx.now());
            if self.remaining == 0 {
                return Effect::Done;
            }
            self.remaining -= 1;
            Effect::Delay(self.delay)
        }
    }

    /// Acquires the worker pool, holds it for a delay, then releases.
    struct Holder {
        acquired: bool,
        held: bool,
        grant_time: Option<f64>,
    }

    impl Process for Holder {
        fn resume(&mut self, ctx: &mut SimContext<'_>) -> Effect {
            if !self.acquired {
                self.acquired = true;
                return Effect::Acquire(PoolId::Workers);
            }
            if !self.held {
                self.held = true;
                self.grant_time = Some(ctx.now());
                return Effect::Delay(5.0);
            }
            ctx.release(PoolId::Workers);
            Effect::Done
        }
    }

    #[test]
    fn test_delays_advance_virtual_time() {
        let mut engine = Engine::new(test_state());
        engine.spawn(Box::new(Sleeper { remaining: 3, delay: 2.0, wake_times: Vec::new() }));
        engine.advance_to(100.0);
        assert_eq!(engine.now(), 100.0);
    }

    #[test]
    fn test_horizon_cuts_off_pending_wakes() {
        let mut engine = Engine::new(test_state());
        engine.spawn(Box::new(Sleeper { remaining: 10, delay: 3.0, wake_times: Vec::new() }));
        engine.advance_to(7.0);
        // Wakes at 0, 3, 6 fired; the wake at 9 is still pending
        assert_eq!(engine.now(), 7.0);
        assert_eq!(engine.scheduler.pending(), 1);
    }

    #[test]
    fn test_contended_pool_grants_in_fifo_order() {
        let mut state = test_state();
        state.config.num_workers = 1;
        let mut engine = Engine::new(state);

        engine.spawn(Box::new(Holder { acquired: false, held: false, grant_time: None }));
        engine.spawn(Box::new(Holder { acquired: false, held: false, grant_time: None }));
        engine.spawn(Box::new(Holder { acquired: false, held: false, grant_time: None }));
        engine.advance_to(100.0);

        // Three holders through one slot, 5 minutes each, back to back
        assert_eq!(engine.pools.get(PoolId::Workers).in_use(), 0);
        assert_eq!(engine.pools.get(PoolId::Workers).queue_len(), 0);
        assert_eq!(engine.scheduler.pending(), 0);
    }
}

//! The warehouse digital twin
//!
//! Owns the mirrored warehouse state (inventory, orders, events, metrics),
//! drives simulation runs over it, and synchronizes with an ERP through the
//! adapter port: startup state sync, drift measurement, timing calibration
//! from ERP history, and what-if scenario comparison.

use crate::engine::{ArrivalGenerator, Effect, Engine, FulfillmentProcess, Process, SimContext, SimState};
use crate::erp::{ErpAdapter, InventoryMap};
use crate::events::{EventLog, WarehouseEvent};
use crate::orders::{InventoryItem, Order};
use crate::twin::calibration::{derive_timing_parameters, CalibrationRecord};
use crate::twin::drift::compute_drift;
use crate::twin::error::TwinResult;
use crate::twin::metrics::{MetricsSummary, TwinMetrics};
use crate::types::{EventKind, EventSource, OrderStatus, ScenarioOverrides, SimulationConfig};
use chrono::Utc;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::collections::{BTreeMap, VecDeque};
use tracing::{info, warn};

/// Virtual minutes between simulation heartbeat events.
const TICK_INTERVAL_MINUTES: f64 = 60.0;

/// How many inventory records a report carries as a sample.
const REPORT_INVENTORY_SAMPLE: usize = 10;

/// Outcome of one simulation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationReport {
    /// Configuration the run executed under
    pub config: SimulationConfig,
    /// Virtual minutes simulated
    pub duration_minutes: f64,
    /// Orders synthesized by the arrival generator during the run
    pub orders_created: u64,
    /// Orders still in the pipeline when the horizon was reached
    pub orders_active: usize,
    /// Events retained in the bounded log after the run
    pub events_recorded: usize,
    /// Aggregate metrics
    pub summary: MetricsSummary,
    /// A small sample of the post-run inventory, lowest SKUs first
    pub inventory_sample: Vec<InventoryItem>,
}

/// Outcome of a what-if comparison run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WhatIfReport {
    /// The overrides that were applied for the run
    pub applied_overrides: ScenarioOverrides,
    /// The run outcome under those overrides
    pub results: SimulationReport,
}

// Emits a heartbeat event at a fixed virtual cadence so long runs leave a
// coarse progress trace in the event log.
#[derive(Debug)]
struct ProgressTicker {
    primed: bool,
}

impl Process for ProgressTicker {
    fn resume(&mut self, ctx: &mut SimContext<'_>) -> Effect {
        if self.primed {
            let now = ctx.now();
            let active = ctx.state.active_orders.len();
            let completed = ctx.state.completed_orders.len();
            ctx.state.record_event(
                EventKind::SimulationTick,
                json!({
                    "sim_time": now,
                    "active_orders": active,
                    "completed_orders": completed,
                }),
            );
        }
        self.primed = true;
        Effect::Delay(TICK_INTERVAL_MINUTES)
    }
}

/// Digital twin of a warehouse, synchronized to an ERP system.
#[derive(Debug)]
pub struct WarehouseTwin<A: ErpAdapter> {
    config: SimulationConfig,
    adapter: A,
    inventory: InventoryMap,
    pending_orders: VecDeque<Order>,
    active_orders: BTreeMap<String, Order>,
    completed_orders: Vec<Order>,
    metrics: TwinMetrics,
    event_log: EventLog,
    calibration_history: Vec<CalibrationRecord>,
    simulated_order_count: u64,
}

impl<A: ErpAdapter> WarehouseTwin<A> {
    /// Create a twin over the given adapter and pull the initial state from
    /// the ERP: the inventory snapshot plus any orders still in the
    /// `Received` status, which are admitted at the start of the next run.
    pub fn new(config: SimulationConfig, adapter: A) -> TwinResult<Self> {
        config.validate()?;

        let mut twin = Self {
            event_log: EventLog::new(config.event_buffer_size),
            config,
            adapter,
            inventory: BTreeMap::new(),
            pending_orders: VecDeque::new(),
            active_orders: BTreeMap::new(),
            completed_orders: Vec::new(),
            metrics: TwinMetrics::default(),
            calibration_history: Vec::new(),
            simulated_order_count: 0,
        };
        twin.sync_from_erp();
        Ok(twin)
    }

    /// Refresh the twin's inventory and pending orders from the ERP. A
    /// disconnected adapter yields an empty snapshot and a warning.
    pub fn sync_from_erp(&mut self) {
        if !self.adapter.is_connected() {
            warn!("ERP not connected, starting with empty state");
            return;
        }

        self.inventory = self.adapter.fetch_inventory();
        for order in self.adapter.fetch_orders(Some(OrderStatus::Received)) {
            self.pending_orders.push_back(order);
        }
        info!(
            skus = self.inventory.len(),
            pending_orders = self.pending_orders.len(),
            "synchronized state from ERP"
        );
    }

    /// Run the simulation for the given number of virtual minutes, or the
    /// configured duration when `None`.
    ///
    /// Each run seeds a fresh random stream from the configured seed, so two
    /// runs over identical state produce identical outcomes.
    #[tracing::instrument(skip(self))]
    pub fn run_simulation(&mut self, duration: Option<f64>) -> TwinResult<SimulationReport> {
        self.config.validate()?;
        let duration = duration.unwrap_or(self.config.simulation_time);

        let state = SimState {
            config: self.config.clone(),
            rng: StdRng::seed_from_u64(self.config.random_seed),
            inventory: std::mem::take(&mut self.inventory),
            active_orders: std::mem::take(&mut self.active_orders),
            completed_orders: std::mem::take(&mut self.completed_orders),
            event_log: std::mem::replace(&mut self.event_log, EventLog::new(0)),
            metrics: std::mem::take(&mut self.metrics),
            simulated_order_count: self.simulated_order_count,
        };

        let mut engine = Engine::new(state);

        // Orders pulled from the ERP enter the pipeline at time zero,
        // ahead of any synthetic arrivals
        while let Some(order) = self.pending_orders.pop_front() {
            let order_id = order.order_id.clone();
            engine.state.active_orders.insert(order_id.clone(), order);
            engine.spawn(Box::new(FulfillmentProcess::new(order_id)));
        }
        engine.spawn(Box::new(ArrivalGenerator::new()));
        engine.spawn(Box::new(ProgressTicker { primed: false }));

        info!(duration_minutes = duration, seed = self.config.random_seed, "starting run");
        engine.advance_to(duration);
        let state = engine.into_state();

        self.inventory = state.inventory;
        self.active_orders = state.active_orders;
        self.completed_orders = state.completed_orders;
        self.event_log = state.event_log;
        self.metrics = state.metrics;
        self.simulated_order_count = state.simulated_order_count;

        let report = SimulationReport {
            config: self.config.clone(),
            duration_minutes: duration,
            orders_created: self.simulated_order_count,
            orders_active: self.active_orders.len(),
            events_recorded: self.event_log.len(),
            summary: self.metrics.summary(),
            inventory_sample: self
                .inventory
                .values()
                .take(REPORT_INVENTORY_SAMPLE)
                .cloned()
                .collect(),
        };

        info!(
            orders_completed = report.summary.orders_completed,
            orders_active = report.orders_active,
            "run finished"
        );
        Ok(report)
    }

    /// Run a scenario with configuration overrides applied, then restore
    /// the original configuration.
    ///
    /// Metrics and order state are reset so the scenario is measured in
    /// isolation; the inventory carries over from the current twin state.
    pub fn run_what_if_scenario(
        &mut self,
        overrides: &ScenarioOverrides,
    ) -> TwinResult<WhatIfReport> {
        let saved = self.config.clone();
        self.config = overrides.apply(&saved);

        self.metrics = TwinMetrics::default();
        self.active_orders.clear();
        self.completed_orders.clear();
        self.simulated_order_count = 0;

        let result = self.run_simulation(None);
        self.config = saved;

        Ok(WhatIfReport { applied_overrides: overrides.clone(), results: result? })
    }

    /// Measure inventory drift against the ERP's current snapshot.
    ///
    /// Records a sync request event; when the drift exceeds the configured
    /// threshold, a calibration trigger event is recorded as well. A
    /// disconnected adapter reports 1.0 without a trigger.
    pub fn calculate_sync_drift(&mut self) -> f64 {
        self.event_log.record(
            EventKind::SyncRequest,
            json!({"requested_at": Utc::now().to_rfc3339()}),
            EventSource::Simulation,
        );

        // A disconnected adapter is maximal drift; the external inventory
        // is not consulted and no trigger fires.
        if !self.adapter.is_connected() {
            warn!("drift requested while disconnected");
            return compute_drift(&self.inventory, &InventoryMap::new(), false);
        }

        let external = self.adapter.fetch_inventory();
        let drift = compute_drift(&self.inventory, &external, true);

        if drift > self.config.sync_threshold {
            warn!(
                drift = format!("{drift:.4}"),
                threshold = self.config.sync_threshold,
                "inventory drift above threshold"
            );
            self.event_log.record(
                EventKind::CalibrationTrigger,
                json!({"drift": drift, "threshold": self.config.sync_threshold}),
                EventSource::Simulation,
            );
        }
        drift
    }

    /// Derive timing parameters from ERP event history and apply them to
    /// the configuration. Returns the applied parameters; an empty map
    /// means the history held no usable samples and nothing changed.
    pub fn calibrate_from_erp_logs(
        &mut self,
        events: &[WarehouseEvent],
    ) -> BTreeMap<String, f64> {
        let parameters = derive_timing_parameters(events);
        if parameters.is_empty() {
            warn!("calibration found no usable samples");
            return parameters;
        }

        for (name, value) in &parameters {
            match name.as_str() {
                "pick_time_mean" => self.config.pick_time_mean = *value,
                "pick_time_std" => self.config.pick_time_std = *value,
                "pack_time_mean" => self.config.pack_time_mean = *value,
                "pack_time_std" => self.config.pack_time_std = *value,
                other => warn!(parameter = other, "ignoring unknown calibration parameter"),
            }
        }

        self.calibration_history.push(CalibrationRecord {
            timestamp: Utc::now(),
            num_events: events.len(),
            parameters: parameters.clone(),
        });
        info!(parameters = parameters.len(), "calibration applied");
        parameters
    }

    /// Active configuration.
    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Current inventory snapshot.
    pub fn inventory(&self) -> &InventoryMap {
        &self.inventory
    }

    /// Orders still in the pipeline.
    pub fn active_orders(&self) -> &BTreeMap<String, Order> {
        &self.active_orders
    }

    /// Orders completed across runs since the last reset.
    pub fn completed_orders(&self) -> &[Order] {
        &self.completed_orders
    }

    /// Accumulated metrics.
    pub fn metrics(&self) -> &TwinMetrics {
        &self.metrics
    }

    /// The bounded event log.
    pub fn event_log(&self) -> &EventLog {
        &self.event_log
    }

    /// Applied calibrations, oldest first.
    pub fn calibration_history(&self) -> &[CalibrationRecord] {
        &self.calibration_history
    }

    /// Shared access to the ERP adapter.
    pub fn adapter(&self) -> &A {
        &self.adapter
    }

    /// Mutable access to the ERP adapter.
    pub fn adapter_mut(&mut self) -> &mut A {
        &mut self.adapter
    }
}

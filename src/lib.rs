//! # Warehouse Digital Twin
//!
//! A discrete-event simulation of warehouse order fulfillment that runs as
//! a digital twin of an external ERP system.
//!
//! Orders arrive stochastically, are picked line by line under worker and
//! forklift capacity constraints, packed, shipped, and completed, all on a
//! deterministic virtual clock. The twin mirrors ERP inventory and orders,
//! measures drift between the two, and calibrates its timing parameters
//! from real ERP event history. What-if scenarios rerun the same demand
//! under modified parameters for side-by-side comparison.
//!
//! ## Quick start
//!
//! ```no_run
//! use warehouse_twin::{ErpAdapter, MockErpAdapter, SimulationConfig, WarehouseTwin};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = SimulationConfig::default();
//! let mut erp = MockErpAdapter::new(&config);
//! erp.connect();
//!
//! let mut twin = WarehouseTwin::new(config, erp)?;
//! let report = twin.run_simulation(None)?;
//! println!("completed {} orders", report.summary.orders_completed);
//! # Ok(())
//! # }
//! ```
//!
//! ## Determinism
//!
//! All randomness flows through a single generator seeded from the
//! configuration, simultaneous events fire in scheduling order, and every
//! iterated collection is ordered. Two runs with the same configuration and
//! starting state are identical.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![warn(unreachable_pub)]

pub mod engine;
pub mod erp;
pub mod events;
pub mod orders;
pub mod twin;
pub mod types;

pub use engine::{ArrivalGenerator, Effect, Engine, FulfillmentProcess, PoolId, Process,
    SimContext, SimState, SimTime};
pub use erp::{ErpAdapter, EventCallback, InventoryMap, MockErpAdapter};
pub use events::{EventLog, WarehouseEvent};
pub use orders::{InventoryItem, Order, OrderLine};
pub use twin::{
    compute_drift, derive_timing_parameters, CalibrationRecord, LoggingConfig, MetricsSummary,
    SampleStats, SimulationReport, TwinError, TwinMetrics, TwinResult, WarehouseTwin,
    WhatIfReport,
};
pub use types::{
    CliArgs, ConfigError, ConfigValidationError, EventKind, EventSource, OrderStatus,
    ScenarioOverrides, SimulationConfig,
};

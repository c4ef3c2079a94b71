//! Digital twin layer
//!
//! Everything above the raw simulation engine: the twin itself, ERP drift
//! and calibration, metrics, error types, and logging setup.

pub mod calibration;
pub mod digital_twin;
pub mod drift;
pub mod error;
pub mod logging;
pub mod metrics;

pub use calibration::{derive_timing_parameters, CalibrationRecord};
pub use digital_twin::{SimulationReport, WarehouseTwin, WhatIfReport};
pub use drift::compute_drift;
pub use error::{TwinError, TwinResult};
pub use logging::LoggingConfig;
pub use metrics::{MetricsSummary, SampleStats, TwinMetrics};

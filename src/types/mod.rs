//! Core types for the warehouse digital twin
//!
//! This module contains configuration structures, order and event state
//! enumerations, and the CLI argument surface shared across the crate.

pub mod config;
pub mod enums;

pub use config::{
    CliArgs, ConfigError, ConfigValidationError, ScenarioOverrides, SimulationConfig,
    MIN_TASK_MINUTES,
};
pub use enums::{EventKind, EventSource, OrderStatus};

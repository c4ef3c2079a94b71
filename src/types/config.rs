//! Configuration structures for the warehouse digital twin
//!
//! This module contains the simulation configuration, the validated partial
//! overrides used by what-if scenarios, configuration file loading, and the
//! command line argument surface.

use clap::Parser;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Floor applied to every sampled task duration, in simulated minutes.
pub const MIN_TASK_MINUTES: f64 = 0.1;

/// Command line arguments structure
#[derive(Debug, Clone, Parser)]
#[command(
    name = "warehouse-twin",
    version,
    about = "Warehouse digital twin - discrete-event order fulfillment simulator",
    long_about = "Runs a discrete-event simulation of warehouse order fulfillment, \
synchronized against a mock ERP system, and compares a baseline run against a \
what-if scenario with additional workers.

EXAMPLES:
    # Run with default settings
    warehouse-twin

    # Use a configuration file
    warehouse-twin --config twin.json

    # Override specific settings
    warehouse-twin --workers 8 --arrival-rate 12.0 --duration 240

    # Generate configuration template
    warehouse-twin --print-config > twin.json

    # Validate configuration without running
    warehouse-twin --config twin.json --dry-run"
)]
pub struct CliArgs {
    /// Configuration file path (JSON format)
    #[arg(short, long, help = "Configuration file path (JSON format)")]
    pub config: Option<String>,

    /// Simulation duration in virtual minutes
    #[arg(long, help = "Simulation duration in virtual minutes")]
    pub duration: Option<f64>,

    /// Random seed for reproducible results
    #[arg(long, help = "Random seed for reproducible results")]
    pub seed: Option<u64>,

    /// Number of warehouse workers
    #[arg(long, help = "Number of warehouse workers")]
    pub workers: Option<usize>,

    /// Number of forklifts
    #[arg(long, help = "Number of forklifts")]
    pub forklifts: Option<usize>,

    /// Number of storage locations (one SKU per location)
    #[arg(long, help = "Number of storage locations")]
    pub storage_locations: Option<usize>,

    /// Order arrival rate in orders per hour
    #[arg(long, help = "Order arrival rate (orders per hour)")]
    pub arrival_rate: Option<f64>,

    /// Enable verbose logging
    #[arg(short, long, help = "Enable verbose logging")]
    pub verbose: bool,

    /// Enable debug logging
    #[arg(short, long, help = "Enable debug logging")]
    pub debug: bool,

    /// Dry run mode - validate configuration without running the simulation
    #[arg(long, help = "Validate configuration without running the simulation")]
    pub dry_run: bool,

    /// Print default configuration and exit
    #[arg(long, help = "Print configuration in JSON format and exit")]
    pub print_config: bool,
}

/// Configuration for the warehouse digital twin simulation.
///
/// All timing parameters are expressed in simulated minutes; the arrival
/// rate is expressed in orders per hour to match how warehouse managers
/// quote it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Default simulation duration in virtual minutes (an 8-hour shift)
    pub simulation_time: f64,

    /// Random seed driving every stochastic draw in a run
    pub random_seed: u64,

    /// Number of storage locations; the mock ERP seeds one SKU per location
    pub num_storage_locations: usize,

    /// Worker pool capacity
    pub num_workers: usize,

    /// Forklift pool capacity
    pub num_forklifts: usize,

    /// Mean per-unit pick time in minutes
    pub pick_time_mean: f64,

    /// Standard deviation of the per-unit pick time
    pub pick_time_std: f64,

    /// Mean per-unit pack time in minutes
    pub pack_time_mean: f64,

    /// Standard deviation of the per-unit pack time
    pub pack_time_std: f64,

    /// Mean travel time per picking trip in minutes
    pub transport_time_mean: f64,

    /// Standard deviation of the travel time
    pub transport_time_std: f64,

    /// Order arrival rate in orders per hour
    pub order_arrival_rate: f64,

    /// Mean number of distinct lines per synthesized order
    pub items_per_order_mean: f64,

    /// Standard deviation of the line count per synthesized order
    pub items_per_order_std: f64,

    /// Capacity of the bounded event log (oldest entries evicted first)
    pub event_buffer_size: usize,

    /// Drift fraction above which a calibration trigger event is emitted
    pub sync_threshold: f64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            simulation_time: 480.0,
            random_seed: 42,
            num_storage_locations: 100,
            num_workers: 5,
            num_forklifts: 2,
            pick_time_mean: 2.0,
            pick_time_std: 0.5,
            pack_time_mean: 3.0,
            pack_time_std: 0.8,
            transport_time_mean: 1.5,
            transport_time_std: 0.3,
            order_arrival_rate: 5.0,
            items_per_order_mean: 3.0,
            items_per_order_std: 1.5,
            event_buffer_size: 1000,
            sync_threshold: 0.05,
        }
    }
}

/// Configuration loading errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Configuration file not found
    #[error("Configuration file not found: {0}")]
    FileNotFound(String),

    /// Configuration file read error
    #[error("Failed to read configuration file: {0}")]
    ReadError(#[from] std::io::Error),

    /// JSON parsing error
    #[error("Failed to parse JSON configuration: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Unsupported configuration file format
    #[error("Unsupported configuration file format: {0} (supported: .json)")]
    UnsupportedFormat(String),
}

/// Validation errors for simulation configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigValidationError {
    /// Simulation duration is negative
    #[error("Simulation time must be non-negative, got {0}")]
    InvalidSimulationTime(f64),

    /// A timing parameter (mean or std) is negative or non-finite
    #[error("Invalid timing parameter {field}: {value} (must be finite and >= 0)")]
    InvalidTiming {
        /// Name of the offending field
        field: &'static str,
        /// The invalid value
        value: f64,
    },

    /// Arrival rate is negative or non-finite
    #[error("Order arrival rate must be finite and >= 0, got {0}")]
    InvalidArrivalRate(f64),

    /// Sync threshold is outside [0, 1]
    #[error("Sync threshold must be between 0.0 and 1.0, got {0}")]
    InvalidSyncThreshold(f64),
}

impl SimulationConfig {
    /// Create a configuration from parsed CLI arguments, loading a file first
    /// when one is given. CLI values override file values, which override
    /// defaults.
    pub fn from_cli_args(args: &CliArgs) -> Result<Self, ConfigError> {
        let mut config = match &args.config {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };

        if let Some(value) = args.duration {
            config.simulation_time = value;
        }
        if let Some(value) = args.seed {
            config.random_seed = value;
        }
        if let Some(value) = args.workers {
            config.num_workers = value;
        }
        if let Some(value) = args.forklifts {
            config.num_forklifts = value;
        }
        if let Some(value) = args.storage_locations {
            config.num_storage_locations = value;
        }
        if let Some(value) = args.arrival_rate {
            config.order_arrival_rate = value;
        }

        Ok(config)
    }

    /// Load configuration from a JSON file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(ConfigError::FileNotFound(path.display().to_string()));
        }

        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => {
                let content = fs::read_to_string(path)?;
                Ok(serde_json::from_str(&content)?)
            }
            Some(ext) => Err(ConfigError::UnsupportedFormat(ext.to_string())),
            None => Err(ConfigError::UnsupportedFormat("no extension".to_string())),
        }
    }

    /// Save configuration to a JSON file.
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    /// Render configuration as pretty-printed JSON.
    pub fn print_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Validate the configuration parameters.
    ///
    /// Zero workers, zero forklifts, and zero storage locations are all
    /// valid: they yield a simulation that accepts arrivals but never makes
    /// progress, which is useful for capacity studies.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if !self.simulation_time.is_finite() || self.simulation_time < 0.0 {
            return Err(ConfigValidationError::InvalidSimulationTime(self.simulation_time));
        }

        for (field, value) in [
            ("pick_time_mean", self.pick_time_mean),
            ("pick_time_std", self.pick_time_std),
            ("pack_time_mean", self.pack_time_mean),
            ("pack_time_std", self.pack_time_std),
            ("transport_time_mean", self.transport_time_mean),
            ("transport_time_std", self.transport_time_std),
            ("items_per_order_mean", self.items_per_order_mean),
            ("items_per_order_std", self.items_per_order_std),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigValidationError::InvalidTiming { field, value });
            }
        }

        if !self.order_arrival_rate.is_finite() || self.order_arrival_rate < 0.0 {
            return Err(ConfigValidationError::InvalidArrivalRate(self.order_arrival_rate));
        }

        if !(0.0..=1.0).contains(&self.sync_threshold) {
            return Err(ConfigValidationError::InvalidSyncThreshold(self.sync_threshold));
        }

        Ok(())
    }
}

/// Validated partial configuration for what-if scenarios.
///
/// Every field mirrors a `SimulationConfig` field; unknown keys in a JSON
/// override document are rejected at parse time rather than silently
/// ignored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScenarioOverrides {
    /// Override for the simulation duration
    #[serde(skip_serializing_if = "Option::is_none")]
    pub simulation_time: Option<f64>,
    /// Override for the random seed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub random_seed: Option<u64>,
    /// Override for the storage location count
    #[serde(skip_serializing_if = "Option::is_none")]
    pub num_storage_locations: Option<usize>,
    /// Override for the worker pool capacity
    #[serde(skip_serializing_if = "Option::is_none")]
    pub num_workers: Option<usize>,
    /// Override for the forklift pool capacity
    #[serde(skip_serializing_if = "Option::is_none")]
    pub num_forklifts: Option<usize>,
    /// Override for the mean per-unit pick time
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pick_time_mean: Option<f64>,
    /// Override for the pick time standard deviation
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pick_time_std: Option<f64>,
    /// Override for the mean per-unit pack time
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pack_time_mean: Option<f64>,
    /// Override for the pack time standard deviation
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pack_time_std: Option<f64>,
    /// Override for the mean travel time
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transport_time_mean: Option<f64>,
    /// Override for the travel time standard deviation
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transport_time_std: Option<f64>,
    /// Override for the order arrival rate
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_arrival_rate: Option<f64>,
    /// Override for the mean line count per order
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items_per_order_mean: Option<f64>,
    /// Override for the line count standard deviation
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items_per_order_std: Option<f64>,
    /// Override for the event log capacity
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event_buffer_size: Option<usize>,
    /// Override for the drift threshold
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sync_threshold: Option<f64>,
}

impl ScenarioOverrides {
    /// Apply these overrides on top of a base configuration, returning the
    /// merged configuration. The base is not modified.
    pub fn apply(&self, base: &SimulationConfig) -> SimulationConfig {
        let mut config = base.clone();

        if let Some(value) = self.simulation_time {
            config.simulation_time = value;
        }
        if let Some(value) = self.random_seed {
            config.random_seed = value;
        }
        if let Some(value) = self.num_storage_locations {
            config.num_storage_locations = value;
        }
        if let Some(value) = self.num_workers {
            config.num_workers = value;
        }
        if let Some(value) = self.num_forklifts {
            config.num_forklifts = value;
        }
        if let Some(value) = self.pick_time_mean {
            config.pick_time_mean = value;
        }
        if let Some(value) = self.pick_time_std {
            config.pick_time_std = value;
        }
        if let Some(value) = self.pack_time_mean {
            config.pack_time_mean = value;
        }
        if let Some(value) = self.pack_time_std {
            config.pack_time_std = value;
        }
        if let Some(value) = self.transport_time_mean {
            config.transport_time_mean = value;
        }
        if let Some(value) = self.transport_time_std {
            config.transport_time_std = value;
        }
        if let Some(value) = self.order_arrival_rate {
            config.order_arrival_rate = value;
        }
        if let Some(value) = self.items_per_order_mean {
            config.items_per_order_mean = value;
        }
        if let Some(value) = self.items_per_order_std {
            config.items_per_order_std = value;
        }
        if let Some(value) = self.event_buffer_size {
            config.event_buffer_size = value;
        }
        if let Some(value) = self.sync_threshold {
            config.sync_threshold = value;
        }

        config
    }

    /// True when no field is overridden.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

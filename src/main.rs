// Warehouse Digital Twin - Main Entry Point
//
// You can run it via Cargo:
//
// ```console
// $ cargo build --release
// $ ./target/release/warehouse-twin
// ```
//
// Or with custom configuration:
//
// ```console
// $ ./target/release/warehouse-twin --workers 8 --arrival-rate 12.0 --verbose
// ```

use clap::Parser;
use std::process;
use tracing::{error, info};
use warehouse_twin::twin::LoggingConfig;
use warehouse_twin::types::config::CliArgs;
use warehouse_twin::types::{ScenarioOverrides, SimulationConfig};
use warehouse_twin::{
    ErpAdapter, MockErpAdapter, SimulationReport, WarehouseTwin, WhatIfReport,
};

fn main() {
    // Parse CLI arguments first to check for special flags
    let args = CliArgs::parse();

    // Handle special CLI flags that don't require full initialization
    if args.print_config {
        let default_config = SimulationConfig::default();
        match default_config.print_json() {
            Ok(json) => {
                println!("{}", json);
                return;
            }
            Err(e) => {
                eprintln!("Failed to serialize default configuration: {}", e);
                process::exit(1);
            }
        }
    }

    // Initialize logging based on CLI flags
    let logging_result = if args.debug {
        LoggingConfig::init_debug()
    } else if args.verbose {
        LoggingConfig::init_verbose()
    } else {
        // Default: minimal logging for normal users
        LoggingConfig::new().with_level(tracing::Level::WARN).init()
    };

    if let Err(e) = logging_result {
        eprintln!("Failed to initialize logging: {}", e);
        process::exit(1);
    }

    info!("Starting Warehouse Digital Twin");

    // Load configuration from CLI arguments and optional config file
    let config = match SimulationConfig::from_cli_args(&args) {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            process::exit(1);
        }
    };

    // Validate configuration
    if let Err(e) = config.validate() {
        error!("Configuration validation failed: {}", e);
        process::exit(1);
    }

    // Handle dry run mode
    if args.dry_run {
        eprintln!("Configuration validation successful!");
        eprintln!("Dry run mode - simulation will not be executed.");
        print_configuration_summary(&config);
        return;
    }

    print_startup_banner(&config);

    if let Err(e) = run_twin(config) {
        error!("Simulation failed: {}", e);
        process::exit(1);
    }

    info!("Warehouse Digital Twin completed successfully");
}

/// Build the twin over a mock ERP, run the baseline shift, then compare a
/// what-if scenario with two extra workers.
fn run_twin(config: SimulationConfig) -> Result<(), String> {
    eprintln!("Connecting to ERP...");
    let mut erp = MockErpAdapter::new(&config);
    if !erp.connect() {
        return Err("Failed to connect to ERP".to_string());
    }

    let mut twin = WarehouseTwin::new(config.clone(), erp)
        .map_err(|e| format!("Failed to initialize digital twin: {}", e))?;
    eprintln!("Synchronized {} SKUs from ERP", twin.inventory().len());

    eprintln!("\nRunning baseline simulation...");
    let baseline = twin
        .run_simulation(None)
        .map_err(|e| format!("Baseline run failed: {}", e))?;
    print_run_report("Baseline", &baseline);

    let drift = twin.calculate_sync_drift();
    eprintln!("Inventory drift vs ERP: {:.2}%", drift * 100.0);

    eprintln!("\nRunning what-if scenario: +2 workers...");
    let overrides = ScenarioOverrides {
        num_workers: Some(config.num_workers + 2),
        ..ScenarioOverrides::default()
    };
    let what_if = twin
        .run_what_if_scenario(&overrides)
        .map_err(|e| format!("What-if run failed: {}", e))?;
    print_run_report("What-if (+2 workers)", &what_if.results);
    print_comparison(&baseline, &what_if);

    twin.adapter_mut().disconnect();
    Ok(())
}

/// Print startup banner and configuration summary
fn print_startup_banner(config: &SimulationConfig) {
    eprintln!("Warehouse Digital Twin");
    eprintln!("======================");
    eprintln!("Discrete-event order fulfillment simulation with ERP sync");
    eprintln!();

    print_configuration_summary(config);
}

/// Print configuration summary
fn print_configuration_summary(config: &SimulationConfig) {
    eprintln!("Configuration:");
    eprintln!("  Simulation Time: {:.0} minutes", config.simulation_time);
    eprintln!("  Random Seed: {}", config.random_seed);
    eprintln!("  Storage Locations: {}", config.num_storage_locations);
    eprintln!("  Workers: {}", config.num_workers);
    eprintln!("  Forklifts: {}", config.num_forklifts);
    eprintln!(
        "  Pick Time: {:.1} +/- {:.1} min/item",
        config.pick_time_mean, config.pick_time_std
    );
    eprintln!(
        "  Pack Time: {:.1} +/- {:.1} min/item",
        config.pack_time_mean, config.pack_time_std
    );
    eprintln!(
        "  Transport Time: {:.1} +/- {:.1} min",
        config.transport_time_mean, config.transport_time_std
    );
    eprintln!("  Arrival Rate: {:.1} orders/hour", config.order_arrival_rate);
    eprintln!("  Event Buffer: {} events", config.event_buffer_size);
    eprintln!("  Sync Threshold: {:.1}%", config.sync_threshold * 100.0);
    eprintln!();
}

/// Print the outcome of one simulation run
fn print_run_report(label: &str, report: &SimulationReport) {
    eprintln!("{} results:", label);
    eprintln!("  Orders Created: {}", report.orders_created);
    eprintln!("  Orders Completed: {}", report.summary.orders_completed);
    eprintln!("  Orders Still Active: {}", report.orders_active);
    eprintln!("  Items Picked: {}", report.summary.items_picked);
    if let Some(stats) = &report.summary.order_time {
        eprintln!(
            "  Order Time: avg {:.1} min (min {:.1}, median {:.1}, max {:.1})",
            stats.avg, stats.min, stats.median, stats.max
        );
    }
    if let Some(throughput) = report.summary.throughput_per_hour {
        eprintln!("  Throughput: {:.1} orders/hour", throughput);
    }
    if let Some(items_per_hour) = report.summary.items_per_hour {
        eprintln!("  Pick Rate: {:.1} items/hour", items_per_hour);
    }
    eprintln!("  Events Recorded: {}", report.events_recorded);
}

/// Print the baseline vs what-if comparison
fn print_comparison(baseline: &SimulationReport, what_if: &WhatIfReport) {
    eprintln!("\nComparison:");
    let base_completed = baseline.summary.orders_completed;
    let scenario_completed = what_if.results.summary.orders_completed;
    eprintln!("  Completed Orders: {} -> {}", base_completed, scenario_completed);

    if let (Some(base), Some(scenario)) = (
        baseline.summary.throughput_per_hour,
        what_if.results.summary.throughput_per_hour,
    ) {
        if base > 0.0 {
            let improvement = (scenario - base) / base * 100.0;
            eprintln!(
                "  Throughput: {:.1} -> {:.1} orders/hour ({:+.1}%)",
                base, scenario, improvement
            );
        }
    }
    eprintln!();
}

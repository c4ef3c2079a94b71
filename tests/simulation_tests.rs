//! Integration tests for end-to-end simulation runs
//!
//! Exercises the full pipeline: ERP sync, stochastic arrivals, pick/pack
//! fulfillment under resource contention, event recording, and what-if
//! scenario comparison.

use warehouse_twin::*;

fn twin_with_config(config: SimulationConfig) -> WarehouseTwin<MockErpAdapter> {
    let mut erp = MockErpAdapter::new(&config);
    erp.connect();
    WarehouseTwin::new(config, erp).expect("twin construction failed")
}

/// A default 8-hour shift completes a reasonable number of orders.
#[test]
fn test_default_run_completes_orders() {
    let mut twin = twin_with_config(SimulationConfig::default());
    let report = twin.run_simulation(None).unwrap();

    assert_eq!(report.duration_minutes, 480.0);
    assert!(report.orders_created > 10, "expected arrivals, got {}", report.orders_created);
    assert!(
        report.summary.orders_completed > 5,
        "expected completions, got {}",
        report.summary.orders_completed
    );
    assert!(report.summary.items_picked > 0);
    assert!(report.summary.throughput_per_hour.unwrap() > 0.0);
}

/// Two twins built from the same configuration produce identical runs.
#[test]
fn test_identical_seeds_give_identical_runs() {
    let config = SimulationConfig::default();
    let report_a = twin_with_config(config.clone()).run_simulation(None).unwrap();
    let report_b = twin_with_config(config).run_simulation(None).unwrap();

    assert_eq!(report_a.orders_created, report_b.orders_created);
    assert_eq!(report_a.summary, report_b.summary);
    assert_eq!(report_a.events_recorded, report_b.events_recorded);

    // Quantities match item by item; wall-clock update stamps are excluded
    let quantities = |report: &SimulationReport| -> Vec<(String, i64)> {
        report
            .inventory_sample
            .iter()
            .map(|item| (item.sku.clone(), item.quantity))
            .collect()
    };
    assert_eq!(quantities(&report_a), quantities(&report_b));
}

/// Different seeds diverge.
#[test]
fn test_different_seeds_diverge() {
    let report_a = twin_with_config(SimulationConfig::default()).run_simulation(None).unwrap();
    let config_b = SimulationConfig { random_seed: 1234, ..SimulationConfig::default() };
    let report_b = twin_with_config(config_b).run_simulation(None).unwrap();

    assert_ne!(
        (report_a.orders_created, report_a.summary.items_picked),
        (report_b.orders_created, report_b.summary.items_picked)
    );
}

/// With zero workers, orders arrive but nothing ever completes.
#[test]
fn test_zero_workers_completes_nothing() {
    let config = SimulationConfig { num_workers: 0, ..SimulationConfig::default() };
    let mut twin = twin_with_config(config);
    let report = twin.run_simulation(None).unwrap();

    assert!(report.orders_created > 0);
    assert_eq!(report.summary.orders_completed, 0);
    assert_eq!(report.orders_active as u64, report.orders_created);
    assert!(report.summary.throughput_per_hour.is_none());
}

/// With zero storage locations there is nothing to sell; no orders form.
#[test]
fn test_zero_storage_locations_creates_no_orders() {
    let config = SimulationConfig { num_storage_locations: 0, ..SimulationConfig::default() };
    let mut twin = twin_with_config(config);
    let report = twin.run_simulation(None).unwrap();

    assert!(twin.inventory().is_empty());
    assert_eq!(report.orders_created, 0);
    assert_eq!(report.summary.orders_completed, 0);
}

/// A zero arrival rate leaves the run idle apart from heartbeats.
#[test]
fn test_zero_arrival_rate_is_idle() {
    let config = SimulationConfig { order_arrival_rate: 0.0, ..SimulationConfig::default() };
    let mut twin = twin_with_config(config);
    let report = twin.run_simulation(None).unwrap();

    assert_eq!(report.orders_created, 0);
    assert!(twin
        .event_log()
        .iter()
        .all(|e| e.event_type == EventKind::SimulationTick));
}

/// Inventory only ever decreases during a run, and every pick is logged.
#[test]
fn test_picks_deplete_inventory_and_log_events() {
    let config = SimulationConfig::default();
    let mut twin = twin_with_config(config);
    let before: i64 = twin.inventory().values().map(|item| item.quantity).sum();

    let report = twin.run_simulation(None).unwrap();
    let after: i64 = twin.inventory().values().map(|item| item.quantity).sum();

    assert!(report.summary.items_picked > 0);
    assert!(after < before);

    let logged_change: i64 = twin
        .event_log()
        .iter()
        .filter(|e| e.event_type == EventKind::InventoryUpdated)
        .map(|e| e.data["change"].as_i64().unwrap())
        .sum();
    // The bounded log may have evicted early picks; what remains must all
    // be negative adjustments
    assert!(logged_change < 0);
}

/// Completed orders carry consistent milestones.
#[test]
fn test_completed_orders_have_ordered_milestones() {
    let mut twin = twin_with_config(SimulationConfig::default());
    twin.run_simulation(None).unwrap();

    assert!(!twin.completed_orders().is_empty());
    for order in twin.completed_orders() {
        assert_eq!(order.status, OrderStatus::Completed);
        assert!(order.is_fully_picked());
        let pick_start = order.pick_start_time.unwrap();
        let pick_end = order.pick_end_time.unwrap();
        let pack_start = order.pack_start_time.unwrap();
        let pack_end = order.pack_end_time.unwrap();
        assert!(pick_start <= pick_end);
        assert!(pick_end <= pack_start);
        assert!(pack_start <= pack_end);
    }
}

/// The event log never exceeds its configured capacity.
#[test]
fn test_event_log_respects_capacity() {
    let config = SimulationConfig { event_buffer_size: 50, ..SimulationConfig::default() };
    let mut twin = twin_with_config(config);
    let report = twin.run_simulation(None).unwrap();

    assert!(report.events_recorded <= 50);
    assert_eq!(twin.event_log().capacity(), 50);
    assert!(twin.event_log().total_recorded() > 50);
}

/// Orders already sitting in the ERP are fulfilled by the run.
#[test]
fn test_pending_erp_orders_are_admitted() {
    let config = SimulationConfig {
        order_arrival_rate: 0.0,
        ..SimulationConfig::default()
    };
    let mut erp = MockErpAdapter::new(&config);
    erp.connect();
    erp.create_order("CUST-0001", &[("SKU-0001", 2)]).unwrap();
    erp.create_order("CUST-0002", &[("SKU-0002", 1), ("SKU-0003", 3)]).unwrap();

    let mut twin = WarehouseTwin::new(config, erp).unwrap();
    let report = twin.run_simulation(None).unwrap();

    assert_eq!(report.summary.orders_completed, 2);
    let ids: Vec<&str> =
        twin.completed_orders().iter().map(|o| o.order_id.as_str()).collect();
    assert!(ids.contains(&"ORD-000001"));
    assert!(ids.contains(&"ORD-000002"));
}

/// What-if scenarios restore the original configuration afterwards.
#[test]
fn test_what_if_restores_config() {
    let config = SimulationConfig::default();
    let mut twin = twin_with_config(config.clone());
    twin.run_simulation(None).unwrap();

    let overrides =
        ScenarioOverrides { num_workers: Some(12), ..ScenarioOverrides::default() };
    let what_if = twin.run_what_if_scenario(&overrides).unwrap();

    assert_eq!(what_if.applied_overrides, overrides);
    assert_eq!(twin.config().num_workers, config.num_workers);
}

/// More workers never hurt throughput under heavy load.
#[test]
fn test_more_workers_do_not_reduce_completions() {
    let config = SimulationConfig {
        order_arrival_rate: 20.0,
        num_workers: 2,
        ..SimulationConfig::default()
    };
    let mut twin = twin_with_config(config);
    let baseline = twin.run_simulation(None).unwrap();

    let overrides =
        ScenarioOverrides { num_workers: Some(10), ..ScenarioOverrides::default() };
    let what_if = twin.run_what_if_scenario(&overrides).unwrap();

    assert!(
        what_if.results.summary.orders_completed >= baseline.summary.orders_completed,
        "workers 2 -> {} completions; workers 10 -> {}",
        baseline.summary.orders_completed,
        what_if.results.summary.orders_completed
    );
}

/// A shorter explicit duration takes precedence over the configured one.
#[test]
fn test_explicit_duration_overrides_config() {
    let mut twin = twin_with_config(SimulationConfig::default());
    let report = twin.run_simulation(Some(60.0)).unwrap();

    assert_eq!(report.duration_minutes, 60.0);
    // Over one hour at 5 orders/hour, nothing like a full shift arrives
    assert!(report.orders_created < 25);
}

/// Invalid configurations are rejected before anything runs.
#[test]
fn test_invalid_config_rejected() {
    let config = SimulationConfig { pick_time_mean: -1.0, ..SimulationConfig::default() };
    let mut erp = MockErpAdapter::new(&config);
    erp.connect();
    assert!(matches!(
        WarehouseTwin::new(config, erp),
        Err(TwinError::Configuration(_))
    ));
}

//! Stochastic order arrival generator
//!
//! Synthesizes customer orders for the length of the run. Inter-arrival
//! times are exponential (Poisson arrivals) at the configured hourly rate;
//! line counts are normal, floored at one line; each line draws a distinct
//! in-stock SKU.

use crate::engine::fulfillment::FulfillmentProcess;
use crate::engine::process::{Effect, Process, SimContext};
use crate::orders::{Order, OrderLine};
use crate::types::EventKind;
use rand::Rng;
use rand_distr::{Distribution, Exp};
use serde_json::Value;
use tracing::debug;

/// Process generating new orders for the duration of the run.
#[derive(Debug, Default)]
pub struct ArrivalGenerator {
    primed: bool,
}

impl ArrivalGenerator {
    /// Create a generator. It runs until the simulation horizon; a zero
    /// arrival rate makes it finish immediately.
    pub fn new() -> Self {
        Self::default()
    }

    // Sample the next inter-arrival gap in minutes, converting the hourly
    // arrival rate to a per-minute rate. `None` stops the generator.
    fn next_gap(&self, ctx: &mut SimContext<'_>) -> Option<f64> {
        let rate_per_minute = ctx.state.config.order_arrival_rate / 60.0;
        if rate_per_minute <= 0.0 {
            return None;
        }
        let exp = Exp::new(rate_per_minute).ok()?;
        let gap = exp.sample(&mut ctx.state.rng);
        gap.is_finite().then_some(gap)
    }

    // Synthesize one order and start its fulfillment. Returns `false` when
    // no SKU has stock, in which case no order is created.
    fn create_order(&mut self, ctx: &mut SimContext<'_>) -> bool {
        let state = &mut *ctx.state;

        let line_count = state
            .sample_normal(state.config.items_per_order_mean, state.config.items_per_order_std)
            .round()
            .max(1.0) as usize;

        // Deterministic candidate order via the sorted inventory map
        let in_stock: Vec<String> = state
            .inventory
            .values()
            .filter(|item| item.quantity > 0)
            .map(|item| item.sku.clone())
            .collect();
        if in_stock.is_empty() {
            return false;
        }

        let picks = line_count.min(in_stock.len());
        let chosen = rand::seq::index::sample(&mut state.rng, in_stock.len(), picks);
        let lines: Vec<OrderLine> = chosen
            .iter()
            .map(|idx| {
                let quantity = state.rng.gen_range(1..=3u32);
                OrderLine::new(in_stock[idx].clone(), quantity)
            })
            .collect();

        state.simulated_order_count += 1;
        let order_id = format!("SIM-{:06}", state.simulated_order_count);
        let customer_id = format!("CUST-{:04}", state.rng.gen_range(1..=100u32));
        let priority = state.rng.gen_range(1..=5u8);

        let order = Order::new(order_id.clone(), customer_id, lines, priority);
        let payload = serde_json::to_value(&order).unwrap_or(Value::Null);
        state.active_orders.insert(order_id.clone(), order);
        state.record_event(EventKind::OrderCreated, payload);

        debug!(order_id = %order_id, sim_time = ctx.now(), "order arrived");
        ctx.spawn(Box::new(FulfillmentProcess::new(order_id)));
        true
    }
}

impl Process for ArrivalGenerator {
    fn resume(&mut self, ctx: &mut SimContext<'_>) -> Effect {
        if !self.primed {
            self.primed = true;
            return match self.next_gap(ctx) {
                Some(gap) => Effect::Delay(gap),
                None => Effect::Done,
            };
        }

        self.create_order(ctx);
        match self.next_gap(ctx) {
            Some(gap) => Effect::Delay(gap),
            None => Effect::Done,
        }
    }
}

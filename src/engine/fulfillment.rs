//! Order fulfillment process
//!
//! Drives one order through the full pipeline: pick each line (worker held
//! throughout, a forklift per trip), pack, ship, complete. Expressed as an
//! explicit state machine over [`Effect`]s; resource slots requested with
//! `Effect::Acquire` are guaranteed granted by the time the process is
//! resumed, so each state transition is set before suspending.

use crate::engine::process::{Effect, Process, SimContext};
use crate::engine::resources::PoolId;
use crate::types::{EventKind, OrderStatus};
use chrono::Utc;
use serde_json::json;
use tracing::{debug, warn};

/// Where the fulfillment process is suspended.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Step {
    /// Not yet started
    Start,
    /// Waiting for a picking worker
    AwaitWorker,
    /// Waiting for a forklift for the current line
    AwaitForklift,
    /// Traveling to the current line's storage location
    Travel,
    /// Picking the current line
    Pick,
    /// Waiting for a packing worker
    AwaitPackWorker,
    /// Packing the order
    Pack,
    /// In transit to the customer
    Ship,
}

/// State machine fulfilling a single order.
#[derive(Debug)]
pub struct FulfillmentProcess {
    order_id: String,
    started_at: f64,
    line: usize,
    step: Step,
}

impl FulfillmentProcess {
    /// Create a process for an order already present in the active set.
    pub fn new(order_id: impl Into<String>) -> Self {
        Self { order_id: order_id.into(), started_at: 0.0, line: 0, step: Step::Start }
    }

    // Update the order status, stamp the relevant milestone, and record a
    // status change event.
    fn change_status(&self, ctx: &mut SimContext<'_>, status: OrderStatus) {
        let now = ctx.now();
        let old_status = match ctx.state.active_orders.get_mut(&self.order_id) {
            Some(order) => {
                let old = order.status;
                order.set_status(status);
                match status {
                    OrderStatus::Picking => order.pick_start_time = Some(now),
                    OrderStatus::Picked => order.pick_end_time = Some(now),
                    OrderStatus::Packing => order.pack_start_time = Some(now),
                    OrderStatus::Packed => order.pack_end_time = Some(now),
                    _ => {}
                }
                old
            }
            None => {
                warn!(order_id = %self.order_id, "status change for unknown order");
                return;
            }
        };

        ctx.state.record_event(
            EventKind::OrderStatusChanged,
            json!({
                "order_id": self.order_id,
                "old_status": old_status.as_str(),
                "new_status": status.as_str(),
                "sim_time": now,
            }),
        );
    }

    // Record the current line as picked and decrement inventory, emitting an
    // inventory event when the SKU exists.
    fn pick_current_line(&self, ctx: &mut SimContext<'_>) {
        let now = ctx.now();
        let picked = match ctx.state.active_orders.get_mut(&self.order_id) {
            Some(order) => order.lines.get_mut(self.line).map(|line| {
                line.picked_quantity = line.quantity;
                (line.sku.clone(), line.quantity)
            }),
            None => None,
        };

        let Some((sku, quantity)) = picked else {
            return;
        };

        let change = -(quantity as i64);
        let location = match ctx.state.inventory.get_mut(&sku) {
            Some(item) => {
                item.adjust(change);
                Some(item.location.clone())
            }
            None => None,
        };

        if let Some(location) = location {
            if let Some(order) = ctx.state.active_orders.get_mut(&self.order_id) {
                if let Some(line) = order.lines.get_mut(self.line) {
                    line.location = Some(location);
                }
            }
            ctx.state.record_event(
                EventKind::InventoryUpdated,
                json!({
                    "sku": sku,
                    "change": change,
                    "sim_time": now,
                }),
            );
        }
    }

    // Line count for this order, or `None` if the order vanished.
    fn line_count(&self, ctx: &SimContext<'_>) -> Option<usize> {
        ctx.state.active_orders.get(&self.order_id).map(|order| order.lines.len())
    }

    // Pick statistics for the current line: (quantity of the line).
    fn current_line_quantity(&self, ctx: &SimContext<'_>) -> u32 {
        ctx.state
            .active_orders
            .get(&self.order_id)
            .and_then(|order| order.lines.get(self.line))
            .map(|line| line.quantity)
            .unwrap_or(0)
    }

    // Return a held worker slot and record the release.
    fn release_worker(&self, ctx: &mut SimContext<'_>) {
        ctx.release(PoolId::Workers);
        let now = ctx.now();
        ctx.state.record_event(
            EventKind::WorkerReleased,
            json!({"order_id": self.order_id, "sim_time": now}),
        );
    }

    // Finish the pick phase and move into packing. The picking worker is
    // released first; packing competes for a fresh worker slot.
    fn begin_packing(&mut self, ctx: &mut SimContext<'_>) -> Effect {
        self.release_worker(ctx);
        self.change_status(ctx, OrderStatus::Picked);
        self.change_status(ctx, OrderStatus::Packing);
        self.step = Step::AwaitPackWorker;
        Effect::Acquire(PoolId::Workers)
    }
}

impl Process for FulfillmentProcess {
    fn resume(&mut self, ctx: &mut SimContext<'_>) -> Effect {
        match self.step {
            Step::Start => {
                self.started_at = ctx.now();
                self.change_status(ctx, OrderStatus::Picking);
                self.step = Step::AwaitWorker;
                Effect::Acquire(PoolId::Workers)
            }

            Step::AwaitWorker => {
                ctx.state.record_event(
                    EventKind::WorkerAssigned,
                    json!({
                        "order_id": self.order_id,
                        "task": "picking",
                        "sim_time": ctx.now(),
                    }),
                );

                match self.line_count(ctx) {
                    Some(0) | None => self.begin_packing(ctx),
                    Some(_) => {
                        self.line = 0;
                        self.step = Step::AwaitForklift;
                        Effect::Acquire(PoolId::Forklifts)
                    }
                }
            }

            Step::AwaitForklift => {
                let now = ctx.now();
                ctx.state.record_event(
                    EventKind::ResourceAllocated,
                    json!({
                        "resource": "forklift",
                        "order_id": self.order_id,
                        "sim_time": now,
                    }),
                );
                let mean = ctx.state.config.transport_time_mean;
                let std = ctx.state.config.transport_time_std;
                let travel = ctx.state.sample_duration(mean, std);
                self.step = Step::Travel;
                Effect::Delay(travel)
            }

            Step::Travel => {
                let quantity = self.current_line_quantity(ctx) as f64;
                let mean = ctx.state.config.pick_time_mean * quantity;
                let std = ctx.state.config.pick_time_std * quantity.sqrt();
                let pick = ctx.state.sample_duration(mean, std);
                self.step = Step::Pick;
                Effect::Delay(pick)
            }

            Step::Pick => {
                self.pick_current_line(ctx);
                ctx.release(PoolId::Forklifts);
                let now = ctx.now();
                ctx.state.record_event(
                    EventKind::ResourceReleased,
                    json!({
                        "resource": "forklift",
                        "order_id": self.order_id,
                        "sim_time": now,
                    }),
                );

                self.line += 1;
                if self.line < self.line_count(ctx).unwrap_or(0) {
                    self.step = Step::AwaitForklift;
                    Effect::Acquire(PoolId::Forklifts)
                } else {
                    self.begin_packing(ctx)
                }
            }

            Step::AwaitPackWorker => {
                let total = ctx
                    .state
                    .active_orders
                    .get(&self.order_id)
                    .map(|order| order.total_items())
                    .unwrap_or(0) as f64;
                let mean = ctx.state.config.pack_time_mean * total;
                let std = ctx.state.config.pack_time_std * total.sqrt();
                let pack = ctx.state.sample_duration(mean, std);
                self.step = Step::Pack;
                Effect::Delay(pack)
            }

            Step::Pack => {
                self.release_worker(ctx);
                self.change_status(ctx, OrderStatus::Packed);
                self.change_status(ctx, OrderStatus::Shipping);
                let transit = ctx.state.sample_duration(1.0, 0.2);
                self.step = Step::Ship;
                Effect::Delay(transit)
            }

            Step::Ship => {
                let now = ctx.now();
                let total_time = now - self.started_at;

                let Some(mut order) = ctx.state.active_orders.remove(&self.order_id) else {
                    return Effect::Done;
                };
                order.set_status(OrderStatus::Completed);
                order.completed_at = Some(Utc::now());

                ctx.state.metrics.record_completion(&order, total_time);
                ctx.state.record_event(
                    EventKind::OrderStatusChanged,
                    json!({
                        "order_id": self.order_id,
                        "old_status": OrderStatus::Shipping.as_str(),
                        "new_status": OrderStatus::Completed.as_str(),
                        "total_time": total_time,
                        "sim_time": now,
                    }),
                );

                debug!(
                    order_id = %self.order_id,
                    total_time = format!("{total_time:.2}"),
                    "order completed"
                );

                ctx.state.completed_orders.push(order);
                Effect::Done
            }
        }
    }
}

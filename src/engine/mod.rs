//! Discrete-event simulation engine
//!
//! Virtual clock, resource pools, and the cooperative processes that model
//! warehouse order fulfillment. Time is measured in virtual minutes; all
//! randomness flows through the seeded generator in [`process::SimState`],
//! so identical configurations produce identical runs.

pub mod arrivals;
pub mod fulfillment;
pub mod process;
pub mod resources;
pub mod scheduler;

pub use arrivals::ArrivalGenerator;
pub use fulfillment::FulfillmentProcess;
pub use process::{Effect, Engine, Process, SimContext, SimState};
pub use resources::{PoolId, ResourcePool};
pub use scheduler::{ProcessId, Scheduler, SimTime};

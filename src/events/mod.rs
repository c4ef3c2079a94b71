//! Warehouse events and the bounded event log

pub mod event;
pub mod log;

pub use event::WarehouseEvent;
pub use log::EventLog;

//! ERP boundary: the adapter port and the in-memory mock

pub mod mock;
pub mod port;

pub use mock::MockErpAdapter;
pub use port::{ErpAdapter, EventCallback, InventoryMap};

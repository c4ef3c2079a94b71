//! Order and inventory domain types

pub mod inventory;
pub mod order;

pub use inventory::InventoryItem;
pub use order::{Order, OrderLine};

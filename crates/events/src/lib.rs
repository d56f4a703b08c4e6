//! Event bus and external delivery channels for Shelfwatch.

pub mod bus;
pub mod delivery;

pub use bus::{CatalogEvent, EventBus, ITEM_CREATED};

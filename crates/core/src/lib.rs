//! Domain logic for the Shelfwatch alerting service.
//!
//! This crate has no internal dependencies so it can be used by the
//! repository layer, the dispatch engine, and any future CLI tooling.

pub mod criteria;
pub mod error;
pub mod matching;
pub mod paging;
pub mod types;

//! Item-created event dispatch.

pub mod engine;

pub use engine::DispatchEngine;

//! HTTP handlers, one module per resource.

pub mod item;
pub mod notification;
pub mod subscription;

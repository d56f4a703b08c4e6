//! Row models and DTOs, one module per entity.

pub mod item;
pub mod notification;
pub mod seller;
pub mod subscription;

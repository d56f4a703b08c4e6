//! HTTP surface and dispatch engine for Shelfwatch.

pub mod auth;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod query;
pub mod response;
pub mod router;
pub mod routes;
pub mod state;

//! HTTP API: startup configuration, route policies, and the gate middleware.

pub mod app;
pub mod config;
pub mod middleware;
pub mod policies;

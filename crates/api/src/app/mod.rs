//! HTTP API application wiring (Axum router + gate wiring).
//!
//! - `services.rs`: in-memory data behind the demo routes
//! - `routes/`: HTTP routes + handlers, and the per-route gates
//! - `dto.rs`: response DTOs
//! - `errors.rs`: consistent error responses

use std::sync::Arc;

use axum::{Extension, Router, routing::get};
use tower::ServiceBuilder;

use crate::config::{ApiConfig, ConfigError};
use crate::middleware::HeaderSource;
use crate::policies::RoutePolicies;

pub mod dto;
pub mod errors;
pub mod routes;
pub mod services;

/// Build the full HTTP router from startup configuration.
///
/// Fails instead of serving if any route policy is malformed, missing, or
/// names a route that does not exist.
pub fn build_app(config: &ApiConfig) -> Result<Router, ConfigError> {
    let policies = RoutePolicies::from_config(&config.policies)?;
    build_app_with_policies(config, &policies)
}

/// Like [`build_app`], with an already-built policy table (e.g. one holding
/// custom requirements).
pub fn build_app_with_policies(
    config: &ApiConfig,
    policies: &RoutePolicies,
) -> Result<Router, ConfigError> {
    if let Some(unknown) = policies
        .route_names()
        .find(|name| !routes::GATED_ROUTES.contains(name))
    {
        return Err(ConfigError::UnknownRoute(unknown.to_string()));
    }

    let source = HeaderSource::new(config.permissions_header.clone());
    let directory = Arc::new(services::Directory::seeded());

    let gated = routes::router(policies, &source)?;

    tracing::info!(
        routes = policies.len(),
        header = %source.header_name(),
        "route policies registered"
    );

    Ok(Router::new()
        .route("/health", get(routes::system::health))
        .route("/whoami", get(routes::system::whoami))
        .merge(gated)
        .layer(
            ServiceBuilder::new()
                .layer(Extension(directory))
                .layer(Extension(source)),
        ))
}

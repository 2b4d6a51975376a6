//! Axum host adapter for [`gatekeeper_auth::Gate`].

use std::borrow::Cow;
use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{HeaderMap, HeaderName, StatusCode},
    middleware::Next,
    response::Response,
};

use gatekeeper_auth::{Gate, GateOutcome, PermissionSource, Requirement};

use crate::app::errors::json_error;

/// Reads the caller's raw permissions from a single request header.
///
/// Missing or non-UTF-8 values count as "no permissions".
#[derive(Debug, Clone)]
pub struct HeaderSource {
    name: HeaderName,
}

impl HeaderSource {
    pub fn new(name: HeaderName) -> Self {
        Self { name }
    }

    pub fn header_name(&self) -> &HeaderName {
        &self.name
    }
}

impl PermissionSource<HeaderMap> for HeaderSource {
    fn raw_permissions<'r>(&self, headers: &'r HeaderMap) -> Option<Cow<'r, str>> {
        headers
            .get(&self.name)
            .and_then(|v| v.to_str().ok())
            .map(Cow::Borrowed)
    }
}

impl<B> PermissionSource<axum::http::Request<B>> for HeaderSource {
    fn raw_permissions<'r>(&self, request: &'r axum::http::Request<B>) -> Option<Cow<'r, str>> {
        self.raw_permissions(request.headers())
    }
}

/// Gate for one named route.
#[derive(Debug, Clone)]
pub struct RouteGate {
    route: Arc<str>,
    gate: Gate<HeaderSource>,
}

impl RouteGate {
    pub fn new(route: &str, requirement: Arc<dyn Requirement>, source: HeaderSource) -> Self {
        Self {
            route: Arc::from(route),
            gate: Gate::new(requirement, source),
        }
    }

    pub fn route(&self) -> &str {
        &self.route
    }
}

/// Forward admitted requests untouched; answer denials with 403.
///
/// The internal reason is logged but never sent to the caller.
pub async fn gate_middleware(State(gate): State<RouteGate>, req: Request, next: Next) -> Response {
    match gate.gate.guard(req, |req| next.run(req)) {
        GateOutcome::Admitted(response) => response.await,
        GateOutcome::Denied(denial) => {
            tracing::info!(
                route = gate.route(),
                reason = denial.reason().unwrap_or("-"),
                "request denied"
            );
            forbidden()
        }
    }
}

pub fn forbidden() -> Response {
    json_error(StatusCode::FORBIDDEN, "forbidden", "not authorized")
}

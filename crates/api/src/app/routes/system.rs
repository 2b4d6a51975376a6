use axum::{
    Json,
    extract::Extension,
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
};

use gatekeeper_auth::{PermissionSet, PermissionSource};

use crate::app::dto::WhoAmIResponse;
use crate::middleware::HeaderSource;

pub async fn health() -> StatusCode {
    StatusCode::OK
}

/// Echo the permission set the gate would see for this request.
pub async fn whoami(
    Extension(source): Extension<HeaderSource>,
    headers: HeaderMap,
) -> impl IntoResponse {
    let raw = source.raw_permissions(&headers);
    Json(WhoAmIResponse {
        permissions: PermissionSet::from_raw_opt(raw.as_deref()),
    })
}

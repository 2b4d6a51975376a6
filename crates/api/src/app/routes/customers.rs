use std::sync::Arc;

use axum::{
    Json,
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
};

use crate::app::{errors, services::Directory};

pub async fn list_customers(Extension(directory): Extension<Arc<Directory>>) -> impl IntoResponse {
    Json(directory.customers())
}

pub async fn delete_customer(
    Extension(directory): Extension<Arc<Directory>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    if directory.remove_customer(&id) {
        tracing::info!(customer_id = %id, "customer deleted");
        StatusCode::NO_CONTENT.into_response()
    } else {
        errors::not_found("customer")
    }
}

//! Administrative overview, restricted to administrators.

use std::sync::Arc;

use axum::{Json, extract::Extension, response::IntoResponse};

use crate::app::{dto::AdminSummaryResponse, services::Directory};

pub async fn summary(Extension(directory): Extension<Arc<Directory>>) -> impl IntoResponse {
    Json(AdminSummaryResponse {
        customers: directory.customers().len(),
        accounts: directory.accounts().len(),
    })
}

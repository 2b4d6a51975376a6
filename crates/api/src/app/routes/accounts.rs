use std::sync::Arc;

use axum::{Json, extract::Extension, response::IntoResponse};

use crate::app::services::Directory;

pub async fn list_accounts(Extension(directory): Extension<Arc<Directory>>) -> impl IntoResponse {
    Json(directory.accounts().to_vec())
}

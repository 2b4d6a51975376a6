use serde::Serialize;

use gatekeeper_auth::PermissionSet;

// -------------------------
// Response DTOs
// -------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CustomerResponse {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccountResponse {
    pub code: String,
    pub name: String,
}

#[derive(Debug, Serialize)]
pub struct WhoAmIResponse {
    pub permissions: PermissionSet,
}

#[derive(Debug, Serialize)]
pub struct AdminSummaryResponse {
    pub customers: usize,
    pub accounts: usize,
}

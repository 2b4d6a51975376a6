use axum::{
    Router,
    middleware::from_fn_with_state,
    routing::{delete, get},
};

use crate::config::ConfigError;
use crate::middleware::{HeaderSource, RouteGate, gate_middleware};
use crate::policies::RoutePolicies;

pub mod accounts;
pub mod admin;
pub mod customers;
pub mod system;

/// Policy name for each gated route.
pub const ADMIN: &str = "admin";
pub const CUSTOMERS_LIST: &str = "customers_list";
pub const CUSTOMERS_DELETE: &str = "customers_delete";
pub const ACCOUNTS_LIST: &str = "accounts_list";

pub const GATED_ROUTES: [&str; 4] = [ADMIN, CUSTOMERS_LIST, CUSTOMERS_DELETE, ACCOUNTS_LIST];

/// Router for all gated endpoints.
///
/// Every route must have a policy; a missing one fails registration.
pub fn router(policies: &RoutePolicies, source: &HeaderSource) -> Result<Router, ConfigError> {
    let gate = |route: &str| -> Result<_, ConfigError> {
        let gate = RouteGate::new(route, policies.require(route)?, source.clone());
        Ok(from_fn_with_state(gate, gate_middleware))
    };

    Ok(Router::new()
        .route("/admin", get(admin::summary).route_layer(gate(ADMIN)?))
        .route("/customers", get(customers::list_customers).route_layer(gate(CUSTOMERS_LIST)?))
        .route(
            "/customers/:id",
            delete(customers::delete_customer).route_layer(gate(CUSTOMERS_DELETE)?),
        )
        .route("/accounts", get(accounts::list_accounts).route_layer(gate(ACCOUNTS_LIST)?)))
}

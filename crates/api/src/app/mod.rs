//! HTTP application wiring.
//!
//! - `resources.rs`: resource registration and route table mounting
//! - `routes/`: fixed, non-resource endpoints
//! - `errors.rs`: consistent error responses

use std::sync::Arc;

use axum::{Router, routing::get};
use tower::ServiceBuilder;

use factory_catalog::Catalog;
use factory_routers::{RouteTable, RouterError};

use crate::config::ApiConfig;
use crate::middleware;

pub mod errors;
pub mod resources;
pub mod routes;

/// Build the full HTTP router (public entrypoint used by `main.rs`).
///
/// Registration errors surface here, before the server binds.
pub fn build_app(config: &ApiConfig) -> Result<Router, RouterError> {
    let catalog = Arc::new(Catalog::in_memory());
    let table = Arc::new(resources::route_table(config, catalog)?);

    for route in table.iter() {
        tracing::debug!(method = %route.method, pattern = %route.pattern, name = %route.name, "route");
    }
    tracing::info!(routes = table.len(), "route table ready");

    Ok(app_with_table(table))
}

/// Mount an already built table. Useful for serving custom registrations.
pub fn app_with_table(table: Arc<RouteTable>) -> Router {
    Router::new()
        .route("/health", get(routes::system::health))
        .merge(resources::mount(&table))
        .fallback(routes::system::not_found)
        .layer(ServiceBuilder::new().layer(axum::middleware::from_fn(middleware::log_requests)))
}

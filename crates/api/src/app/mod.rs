//! HTTP API application wiring (Axum router + service wiring).
//!
//! - `services.rs`: backend wiring (document store, team directory, settings)
//! - `routes/`: HTTP routes + handlers (one file per function)
//! - `dto.rs`: response envelopes
//! - `errors.rs`: consistent failure responses

use std::sync::Arc;

use axum::{routing::get, Extension, Router};
use tower::ServiceBuilder;

use medstock_infra::{Settings, StoreError};

use crate::middleware;

pub mod dto;
pub mod errors;
pub mod routes;
pub mod services;

/// Build the full HTTP router backed by the hosted backend (used by `main.rs`).
pub fn build_app(settings: Settings) -> Result<Router, StoreError> {
    let services = services::AppServices::from_settings(settings)?;
    Ok(build_app_with(services))
}

/// Build the router around already-wired services.
pub fn build_app_with(services: services::AppServices) -> Router {
    Router::new()
        .route("/health", get(routes::system::health))
        .nest("/functions", routes::router())
        .layer(
            ServiceBuilder::new()
                .layer(axum::middleware::from_fn(middleware::trace_requests))
                .layer(Extension(Arc::new(services))),
        )
}

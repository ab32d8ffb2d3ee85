//! BizTime API Library
//!
//! Companies and their invoices over HTTP, backed by sea-orm.
#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]
#![allow(elided_lifetimes_in_paths)]
#![warn(clippy::all, clippy::perf, clippy::dbg_macro)]

// Core modules
pub mod config;
pub mod db;
pub mod entities;
pub mod errors;
pub mod handlers;
pub mod health;
pub mod middleware_helpers;
pub mod migrator;
pub mod openapi;
pub mod seed;
pub mod services;
pub mod tracing;

use axum::{http::Uri, Router};
use sea_orm::DatabaseConnection;
use std::sync::Arc;

// App state definition
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<DatabaseConnection>,
    pub config: config::AppConfig,
    pub services: handlers::AppServices,
}

impl AppState {
    pub fn new(db: Arc<DatabaseConnection>, config: config::AppConfig) -> Self {
        let services = handlers::AppServices::new(db.clone());
        Self {
            db,
            config,
            services,
        }
    }
}

/// Resource routes: `/companies` and `/invoices`
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/companies", handlers::companies::company_routes())
        .nest("/invoices", handlers::invoices::invoice_routes())
}

/// Full application router: resources, health checks, API docs and request ids
/// and HTTP tracing. CORS is left to the caller.
pub fn build_router(state: AppState) -> Router {
    Router::<AppState>::new()
        .merge(api_routes())
        .nest("/health", health::health_routes())
        .merge(openapi::swagger_ui())
        .fallback(route_not_found)
        // HTTP tracing layer for consistent request/response telemetry
        .layer(crate::tracing::configure_http_tracing())
        // Ensure every request carries a request id for traceability
        .layer(axum::middleware::from_fn(
            middleware_helpers::request_id::request_id_middleware,
        ))
        .with_state(state)
}

async fn route_not_found(uri: Uri) -> errors::ServiceError {
    ::tracing::debug!(path = %uri.path(), "No route matched");
    errors::ServiceError::NotFound(format!("No route for {}", uri.path()))
}

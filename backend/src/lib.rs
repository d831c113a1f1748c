//! Volt Dealer Suite - Backend Server
//!
//! Thin JSON API over the dealer's PostgreSQL database: catalog, sales,
//! stock movements, dashboard counts, reports and invoice documents.

use std::sync::Arc;

use axum::{routing::get, Router};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

pub mod config;
pub mod db;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod services;

pub use crate::config::Config;
pub use crate::db::QueryExecutor;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub db: QueryExecutor,
    pub config: Arc<Config>,
}

/// Create the application router with all routes and middleware
pub fn create_app(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(root))
        .nest("/api", routes::api_routes(&state))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Root endpoint
async fn root() -> &'static str {
    "Volt Dealer Suite API"
}

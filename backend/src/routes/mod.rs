//! Route definitions for Volt Dealer Suite

use axum::{
    middleware,
    routing::{get, post},
    Router,
};

use crate::{handlers, middleware::auth_middleware, AppState};

/// Create API routes
pub fn api_routes(state: &AppState) -> Router<AppState> {
    Router::new()
        // Health check (public)
        .route("/health", get(handlers::health_check))
        // Auth routes
        .nest("/auth", auth_routes(state))
        .route("/users/:user_id/permissions", get(handlers::get_user_permissions))
        // Catalog
        .nest("/products", product_routes())
        .route("/categories", get(handlers::list_categories))
        .route("/subcategories", get(handlers::list_subcategories))
        .route("/suppliers", get(handlers::list_suppliers))
        .route("/customers", get(handlers::list_customers))
        // Sales and stock
        .nest("/sales", sales_routes())
        .route("/stock-transactions", get(handlers::list_stock_transactions))
        .route("/dashboard/stats", get(handlers::get_dashboard_stats))
        // Reports
        .nest("/reports", report_routes())
        // Invoice documents
        .nest("/invoices", invoice_routes())
}

/// Authentication routes
fn auth_routes(state: &AppState) -> Router<AppState> {
    Router::new()
        .route(
            "/permissions",
            get(handlers::get_my_permissions)
                .route_layer(middleware::from_fn_with_state(state.clone(), auth_middleware)),
        )
        .route("/login", post(handlers::login))
}

fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_products))
        .route("/low-stock", get(handlers::list_low_stock_products))
        .route("/:product_id", get(handlers::get_product))
}

fn sales_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_sales))
        .route("/:sale_id", get(handlers::get_sale))
        .route("/:sale_id/items", get(handlers::list_sale_items))
        .route("/:sale_id/invoice", get(handlers::get_sale_invoice))
}

fn report_routes() -> Router<AppState> {
    Router::new()
        .route("/expiry-trend", get(handlers::get_expiry_trend))
        .route("/manufacturers", get(handlers::get_manufacturer_performance))
}

fn invoice_routes() -> Router<AppState> {
    Router::new()
        .route("/pdf", post(handlers::download_invoice))
        .route("/print", post(handlers::print_invoice))
        .route("/email", post(handlers::email_invoice))
}

//! Router tests
//!
//! Requests go through the full application router. The pool points at a
//! closed port so every database-backed route exercises the failure path.

use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
    Router,
};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use config::Map;
use serde_json::{json, Value};
use sqlx::postgres::PgPoolOptions;
use tower::ServiceExt;
use uuid::Uuid;

use volt_server::services::AuthService;
use volt_server::{create_app, AppState, Config, QueryExecutor};

// ============================================================================
// Helpers
// ============================================================================

fn test_config() -> Config {
    let mut config = Config::from_vars(Map::new()).expect("default config");
    config.database.host = "127.0.0.1".to_string();
    config.database.port = 1;
    config.database.acquire_timeout_secs = 1;
    config.jwt.secret = "router-test-secret".to_string();
    config
}

fn test_state() -> AppState {
    let config = test_config();
    let pool = PgPoolOptions::new()
        .max_connections(1)
        .acquire_timeout(config.database.acquire_timeout())
        .connect_lazy_with(config.database.connect_options(false));

    AppState {
        db: QueryExecutor::new(pool),
        config: Arc::new(config),
    }
}

fn test_app() -> Router {
    create_app(test_state())
}

async fn body_json(body: Body) -> Value {
    let bytes = to_bytes(body, usize::MAX).await.expect("read body");
    serde_json::from_slice(&bytes).expect("json body")
}

fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

/// Asserts the flat `{"error": ...}` body and returns the message
async fn assert_json_error(response: axum::response::Response, status: StatusCode) -> String {
    assert_eq!(response.status(), status);
    assert_eq!(response.headers()[header::CONTENT_TYPE], "application/json");

    let body = body_json(response.into_body()).await;
    let message = body["error"].as_str().expect("error message").to_string();
    assert_eq!(body.as_object().map(|o| o.len()), Some(1));
    message
}

fn sample_invoice() -> Value {
    json!({
        "invoice_no": "INV-1001",
        "date": "2024-03-05",
        "customer_name": "Jane Smith",
        "customer_phone": "555-0100",
        "items": [
            {
                "product_name": "Lithium Battery 48V",
                "quantity": "2",
                "unit_price": "150.00",
                "total": "300.00"
            }
        ],
        "subtotal": "300.00",
        "discount": "7.50",
        "tax": "0",
        "total": "292.50",
        "payment_type": "cash",
        "payment_status": "paid"
    })
}

// ============================================================================
// Public endpoints
// ============================================================================

#[tokio::test]
async fn test_root_banner() {
    let response = test_app().oneshot(get("/")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert_eq!(&bytes[..], b"Volt Dealer Suite API");
}

#[tokio::test]
async fn test_health_reports_disconnected_database() {
    let response = test_app().oneshot(get("/api/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let body = body_json(response.into_body()).await;
    assert_eq!(body["status"], "Error");
    assert_eq!(body["database"], "Disconnected");
}

#[tokio::test]
async fn test_database_failure_hides_details() {
    for uri in ["/api/products", "/api/sales", "/api/dashboard/stats"] {
        let response = test_app().oneshot(get(uri)).await.unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR, "{uri}");

        let body = body_json(response.into_body()).await;
        assert_eq!(body, json!({ "error": "Internal server error" }), "{uri}");
    }
}

#[tokio::test]
async fn test_malformed_path_id_is_rejected() {
    for uri in [
        "/api/products/not-a-uuid",
        "/api/sales/42/items",
        "/api/users/abc/permissions",
    ] {
        let response = test_app().oneshot(get(uri)).await.unwrap();
        assert_json_error(response, StatusCode::BAD_REQUEST).await;
    }
}

#[tokio::test]
async fn test_malformed_query_is_rejected() {
    let response = test_app()
        .oneshot(get("/api/subcategories?categoryId=not-a-uuid"))
        .await
        .unwrap();
    assert_json_error(response, StatusCode::BAD_REQUEST).await;

    let response = test_app()
        .oneshot(get("/api/reports/expiry-trend?months=six"))
        .await
        .unwrap();
    assert_json_error(response, StatusCode::BAD_REQUEST).await;
}

#[tokio::test]
async fn test_empty_filters_mean_unfiltered() {
    // Accepted filters go on to the (unreachable) database
    for uri in [
        "/api/subcategories?categoryId=",
        "/api/subcategories",
        "/api/reports/expiry-trend?months=",
    ] {
        let response = test_app().oneshot(get(uri)).await.unwrap();
        let message = assert_json_error(response, StatusCode::INTERNAL_SERVER_ERROR).await;
        assert_eq!(message, "Internal server error", "{uri}");
    }
}

#[tokio::test]
async fn test_unknown_route_is_not_found() {
    let response = test_app().oneshot(get("/api/warranties")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ============================================================================
// Authentication
// ============================================================================

#[tokio::test]
async fn test_login_requires_email_and_password() {
    let response = test_app()
        .oneshot(json_request(
            "POST",
            "/api/auth/login",
            json!({ "email": "admin@voltdealer.com" }),
        ))
        .await
        .unwrap();
    let message = assert_json_error(response, StatusCode::BAD_REQUEST).await;
    assert!(message.contains("password"));
}

#[tokio::test]
async fn test_login_rejects_non_json_body() {
    let request = Request::builder()
        .method("POST")
        .uri("/api/auth/login")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("email=admin"))
        .unwrap();

    let response = test_app().oneshot(request).await.unwrap();
    assert_json_error(response, StatusCode::BAD_REQUEST).await;
}

#[tokio::test]
async fn test_permissions_without_token_is_unauthorized() {
    let response = test_app()
        .oneshot(get("/api/auth/permissions"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let body = body_json(response.into_body()).await;
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_permissions_with_garbage_token_is_unauthorized() {
    let request = Request::builder()
        .uri("/api/auth/permissions")
        .header(header::AUTHORIZATION, "Bearer not.a.token")
        .body(Body::empty())
        .unwrap();

    let response = test_app().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_permissions_with_foreign_secret_is_unauthorized() {
    let state = test_state();
    let mut other = test_config();
    other.jwt.secret = "some-other-secret".to_string();
    let token = AuthService::new(state.db.clone(), &other)
        .issue_token(Uuid::new_v4(), &["admin".to_string()])
        .unwrap();

    let request = Request::builder()
        .uri("/api/auth/permissions")
        .header(header::AUTHORIZATION, format!("Bearer {}", token))
        .body(Body::empty())
        .unwrap();

    let response = create_app(state).oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_valid_token_reaches_handler() {
    let state = test_state();
    let token = AuthService::new(state.db.clone(), &state.config)
        .issue_token(Uuid::new_v4(), &["sales".to_string()])
        .unwrap();

    let request = Request::builder()
        .uri("/api/auth/permissions")
        .header(header::AUTHORIZATION, format!("Bearer {}", token))
        .body(Body::empty())
        .unwrap();

    // Past the middleware the role lookup hits the unreachable database
    let response = create_app(state).oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

// ============================================================================
// Invoice documents
// ============================================================================

#[tokio::test]
async fn test_invoice_pdf_download() {
    let response = test_app()
        .oneshot(json_request(
            "POST",
            "/api/invoices/pdf",
            json!({ "invoice": sample_invoice() }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let headers = response.headers();
    assert_eq!(headers[header::CONTENT_TYPE], "application/pdf");
    assert_eq!(
        headers[header::CONTENT_DISPOSITION],
        "attachment; filename=\"invoice-INV-1001.pdf\""
    );

    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert!(bytes.starts_with(b"%PDF"));
}

#[tokio::test]
async fn test_invoice_print_is_inline() {
    let response = test_app()
        .oneshot(json_request(
            "POST",
            "/api/invoices/print",
            json!({
                "invoice": sample_invoice(),
                "company": {
                    "name": "Northside Scooters",
                    "address": "9 Harbor Road",
                    "phone": "555-0199",
                    "email": "sales@northside.example"
                }
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let disposition = response.headers()[header::CONTENT_DISPOSITION]
        .to_str()
        .unwrap();
    assert!(disposition.starts_with("inline;"));
}

#[tokio::test]
async fn test_invoice_email_returns_attachment() {
    let response = test_app()
        .oneshot(json_request(
            "POST",
            "/api/invoices/email",
            json!({
                "invoice": sample_invoice(),
                "recipient_email": "jane@example.com"
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response.into_body()).await;
    assert_eq!(body["filename"], "invoice-INV-1001.pdf");
    assert_eq!(body["recipient_email"], "jane@example.com");
    assert_eq!(body["content_type"], "application/pdf");

    let pdf = STANDARD
        .decode(body["content_base64"].as_str().unwrap())
        .unwrap();
    assert!(pdf.starts_with(b"%PDF"));
}

#[tokio::test]
async fn test_invoice_email_rejects_bad_recipient() {
    let response = test_app()
        .oneshot(json_request(
            "POST",
            "/api/invoices/email",
            json!({
                "invoice": sample_invoice(),
                "recipient_email": "not-an-email"
            }),
        ))
        .await
        .unwrap();
    let message = assert_json_error(response, StatusCode::BAD_REQUEST).await;
    assert!(message.contains("recipient_email"));
}

#[tokio::test]
async fn test_invoice_missing_items_is_rejected() {
    let response = test_app()
        .oneshot(json_request(
            "POST",
            "/api/invoices/pdf",
            json!({ "invoice": { "invoice_no": "INV-1" } }),
        ))
        .await
        .unwrap();
    assert_json_error(response, StatusCode::BAD_REQUEST).await;
}

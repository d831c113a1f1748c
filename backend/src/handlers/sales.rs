//! Sales, stock movement and dashboard handlers

use axum::{extract::State, response::Response, Json};
use uuid::Uuid;

use crate::error::AppResult;
use crate::extract::ApiPath;
use crate::handlers::invoice::pdf_response;
use crate::services::sales::{Sale, SaleItem, SaleWithCreator};
use crate::services::stock::StockTransactionWithNames;
use crate::services::{DashboardService, SalesService, StockService};
use crate::AppState;
use shared::invoice::download_invoice_pdf;
use shared::models::DashboardStats;

pub async fn list_sales(State(state): State<AppState>) -> AppResult<Json<Vec<SaleWithCreator>>> {
    let service = SalesService::new(state.db.clone());
    Ok(Json(service.list_sales().await?))
}

/// The sale, or JSON `null` when it does not exist
pub async fn get_sale(
    State(state): State<AppState>,
    ApiPath(sale_id): ApiPath<Uuid>,
) -> AppResult<Json<Option<Sale>>> {
    let service = SalesService::new(state.db.clone());
    Ok(Json(service.get_sale(sale_id).await?))
}

pub async fn list_sale_items(
    State(state): State<AppState>,
    ApiPath(sale_id): ApiPath<Uuid>,
) -> AppResult<Json<Vec<SaleItem>>> {
    let service = SalesService::new(state.db.clone());
    Ok(Json(service.list_sale_items(sale_id).await?))
}

/// Invoice PDF for a stored sale, as a download
pub async fn get_sale_invoice(
    State(state): State<AppState>,
    ApiPath(sale_id): ApiPath<Uuid>,
) -> AppResult<Response> {
    let service = SalesService::new(state.db.clone());
    let invoice = service.invoice_for_sale(sale_id).await?;
    let rendered = download_invoice_pdf(&invoice, None)?;
    Ok(pdf_response(rendered))
}

pub async fn list_stock_transactions(
    State(state): State<AppState>,
) -> AppResult<Json<Vec<StockTransactionWithNames>>> {
    let service = StockService::new(state.db.clone());
    Ok(Json(service.list_transactions().await?))
}

pub async fn get_dashboard_stats(State(state): State<AppState>) -> AppResult<Json<DashboardStats>> {
    let service = DashboardService::new(state.db.clone());
    Ok(Json(service.stats().await?))
}

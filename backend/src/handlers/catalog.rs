//! Product and reference data handlers

use axum::{extract::State, Json};
use serde::Deserialize;
use uuid::Uuid;

use crate::error::AppResult;
use crate::extract::{empty_string_as_none, ApiPath, ApiQuery};
use crate::services::catalog::{Category, Customer, Subcategory, Supplier};
use crate::services::product::{Product, ProductWithNames};
use crate::services::{CatalogService, ProductService};
use crate::AppState;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubcategoryQuery {
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub category_id: Option<Uuid>,
}

pub async fn list_products(State(state): State<AppState>) -> AppResult<Json<Vec<ProductWithNames>>> {
    let service = ProductService::new(state.db.clone());
    Ok(Json(service.list_products().await?))
}

pub async fn list_low_stock_products(
    State(state): State<AppState>,
) -> AppResult<Json<Vec<ProductWithNames>>> {
    let service = ProductService::new(state.db.clone());
    Ok(Json(service.list_low_stock().await?))
}

/// The product, or JSON `null` when it does not exist
pub async fn get_product(
    State(state): State<AppState>,
    ApiPath(product_id): ApiPath<Uuid>,
) -> AppResult<Json<Option<Product>>> {
    let service = ProductService::new(state.db.clone());
    Ok(Json(service.get_product(product_id).await?))
}

pub async fn list_categories(State(state): State<AppState>) -> AppResult<Json<Vec<Category>>> {
    let service = CatalogService::new(state.db.clone());
    Ok(Json(service.list_categories().await?))
}

pub async fn list_subcategories(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<SubcategoryQuery>,
) -> AppResult<Json<Vec<Subcategory>>> {
    let service = CatalogService::new(state.db.clone());
    Ok(Json(service.list_subcategories(query.category_id).await?))
}

pub async fn list_suppliers(State(state): State<AppState>) -> AppResult<Json<Vec<Supplier>>> {
    let service = CatalogService::new(state.db.clone());
    Ok(Json(service.list_suppliers().await?))
}

pub async fn list_customers(State(state): State<AppState>) -> AppResult<Json<Vec<Customer>>> {
    let service = CatalogService::new(state.db.clone());
    Ok(Json(service.list_customers().await?))
}

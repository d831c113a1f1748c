//! Stock movement history

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::db::QueryExecutor;
use crate::error::AppResult;

#[derive(Clone)]
pub struct StockService {
    db: QueryExecutor,
}

/// Quantity delta against a product, with product and creator names
#[derive(Debug, Serialize, sqlx::FromRow)]
pub struct StockTransactionWithNames {
    pub id: Uuid,
    pub product_id: Uuid,
    pub transaction_type: String,
    pub quantity: i32,
    pub reference_no: Option<String>,
    pub notes: Option<String>,
    pub created_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub product_name: Option<String>,
    pub created_by_name: Option<String>,
}

impl StockService {
    pub fn new(db: QueryExecutor) -> Self {
        Self { db }
    }

    /// Newest first
    pub async fn list_transactions(&self) -> AppResult<Vec<StockTransactionWithNames>> {
        Ok(self
            .db
            .fetch_all(
                r#"
                SELECT st.id, st.product_id, st.transaction_type, st.quantity,
                    st.reference_no, st.notes, st.created_by, st.created_at,
                    p.name AS product_name,
                    pr.full_name AS created_by_name
                FROM stock_transactions st
                LEFT JOIN products p ON st.product_id = p.id
                LEFT JOIN profiles pr ON st.created_by = pr.id
                ORDER BY st.created_at DESC
                "#,
                &[],
            )
            .await?)
    }
}

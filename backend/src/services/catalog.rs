//! Reference data: categories, subcategories, suppliers and customers

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::db::{QueryExecutor, SqlParam};
use crate::error::AppResult;

#[derive(Clone)]
pub struct CatalogService {
    db: QueryExecutor,
}

#[derive(Debug, Serialize, sqlx::FromRow)]
pub struct Category {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, sqlx::FromRow)]
pub struct Subcategory {
    pub id: Uuid,
    pub category_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, sqlx::FromRow)]
pub struct Supplier {
    pub id: Uuid,
    pub name: String,
    pub contact_person: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, sqlx::FromRow)]
pub struct Customer {
    pub id: Uuid,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl CatalogService {
    pub fn new(db: QueryExecutor) -> Self {
        Self { db }
    }

    pub async fn list_categories(&self) -> AppResult<Vec<Category>> {
        Ok(self
            .db
            .fetch_all(
                "SELECT id, name, description, created_at FROM categories ORDER BY name",
                &[],
            )
            .await?)
    }

    /// Subcategories, optionally restricted to one category
    pub async fn list_subcategories(&self, category_id: Option<Uuid>) -> AppResult<Vec<Subcategory>> {
        let rows = match category_id {
            Some(category_id) => {
                self.db
                    .fetch_all(
                        r#"
                        SELECT id, category_id, name, description, created_at
                        FROM subcategories
                        WHERE category_id = $1
                        ORDER BY name
                        "#,
                        &[SqlParam::from(category_id)],
                    )
                    .await?
            }
            None => {
                self.db
                    .fetch_all(
                        "SELECT id, category_id, name, description, created_at FROM subcategories ORDER BY name",
                        &[],
                    )
                    .await?
            }
        };
        Ok(rows)
    }

    pub async fn list_suppliers(&self) -> AppResult<Vec<Supplier>> {
        Ok(self
            .db
            .fetch_all(
                r#"
                SELECT id, name, contact_person, email, phone, address, created_at
                FROM suppliers
                ORDER BY name
                "#,
                &[],
            )
            .await?)
    }

    pub async fn list_customers(&self) -> AppResult<Vec<Customer>> {
        Ok(self
            .db
            .fetch_all(
                "SELECT id, name, email, phone, address, created_at FROM customers ORDER BY name",
                &[],
            )
            .await?)
    }
}

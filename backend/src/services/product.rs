//! Product queries

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use uuid::Uuid;

use crate::db::{QueryExecutor, SqlParam};
use crate::error::AppResult;

/// Product service
#[derive(Clone)]
pub struct ProductService {
    db: QueryExecutor,
}

/// Product row
#[derive(Debug, Serialize, sqlx::FromRow)]
pub struct Product {
    pub id: Uuid,
    pub name: String,
    pub sku: Option<String>,
    pub description: Option<String>,
    pub category_id: Option<Uuid>,
    pub subcategory_id: Option<Uuid>,
    pub supplier_id: Option<Uuid>,
    pub unit_price: Decimal,
    pub cost_price: Option<Decimal>,
    pub stock_quantity: i32,
    pub min_stock_level: i32,
    pub manufacturer: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Product row with the names of its category, subcategory and supplier
#[derive(Debug, Serialize, sqlx::FromRow)]
pub struct ProductWithNames {
    #[serde(flatten)]
    #[sqlx(flatten)]
    pub product: Product,
    pub category_name: Option<String>,
    pub subcategory_name: Option<String>,
    pub supplier_name: Option<String>,
}

const PRODUCT_COLUMNS: &str = "p.id, p.name, p.sku, p.description, p.category_id, \
     p.subcategory_id, p.supplier_id, p.unit_price, p.cost_price, p.stock_quantity, \
     p.min_stock_level, p.manufacturer, p.created_at, p.updated_at";

impl ProductService {
    pub fn new(db: QueryExecutor) -> Self {
        Self { db }
    }

    /// All products, newest first
    pub async fn list_products(&self) -> AppResult<Vec<ProductWithNames>> {
        let sql = format!(
            r#"
            SELECT {PRODUCT_COLUMNS},
                c.name AS category_name,
                sc.name AS subcategory_name,
                s.name AS supplier_name
            FROM products p
            LEFT JOIN categories c ON p.category_id = c.id
            LEFT JOIN subcategories sc ON p.subcategory_id = sc.id
            LEFT JOIN suppliers s ON p.supplier_id = s.id
            ORDER BY p.created_at DESC
            "#
        );
        Ok(self.db.fetch_all(&sql, &[]).await?)
    }

    /// Products at or below their reorder level, lowest stock first
    pub async fn list_low_stock(&self) -> AppResult<Vec<ProductWithNames>> {
        let sql = format!(
            r#"
            SELECT {PRODUCT_COLUMNS},
                c.name AS category_name,
                sc.name AS subcategory_name,
                s.name AS supplier_name
            FROM products p
            LEFT JOIN categories c ON p.category_id = c.id
            LEFT JOIN subcategories sc ON p.subcategory_id = sc.id
            LEFT JOIN suppliers s ON p.supplier_id = s.id
            WHERE p.stock_quantity <= p.min_stock_level
            ORDER BY p.stock_quantity ASC, p.name ASC
            "#
        );
        Ok(self.db.fetch_all(&sql, &[]).await?)
    }

    pub async fn get_product(&self, id: Uuid) -> AppResult<Option<Product>> {
        let sql = format!("SELECT {PRODUCT_COLUMNS} FROM products p WHERE p.id = $1");
        Ok(self.db.fetch_optional(&sql, &[SqlParam::from(id)]).await?)
    }
}

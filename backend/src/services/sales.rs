//! Sales, sale line items, and invoices built from stored sales

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use uuid::Uuid;

use crate::db::{QueryExecutor, SqlParam};
use crate::error::{AppError, AppResult};
use shared::models::{InvoiceData, InvoiceItem};

#[derive(Clone)]
pub struct SalesService {
    db: QueryExecutor,
}

/// Sale header row
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Sale {
    pub id: Uuid,
    pub invoice_no: String,
    pub customer_id: Option<Uuid>,
    pub total_amount: Decimal,
    pub discount: Decimal,
    pub tax: Decimal,
    pub net_amount: Decimal,
    pub payment_method: Option<String>,
    pub payment_status: Option<String>,
    pub created_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, sqlx::FromRow)]
pub struct SaleWithCreator {
    #[serde(flatten)]
    #[sqlx(flatten)]
    pub sale: Sale,
    pub created_by_name: Option<String>,
}

#[derive(Debug, Serialize, sqlx::FromRow)]
pub struct SaleItem {
    pub id: Uuid,
    pub sale_id: Uuid,
    pub product_id: Option<Uuid>,
    pub quantity: i32,
    pub unit_price: Decimal,
    pub discount: Decimal,
    pub total_price: Decimal,
}

/// Line item joined with its product name, for invoices
#[derive(Debug, sqlx::FromRow)]
pub struct InvoiceLine {
    pub product_name: Option<String>,
    pub quantity: i32,
    pub unit_price: Decimal,
    pub discount: Decimal,
    pub total_price: Decimal,
}

/// Customer contact printed on the invoice
#[derive(Debug, Default, sqlx::FromRow)]
pub struct InvoiceCustomer {
    pub name: String,
    pub phone: Option<String>,
    pub address: Option<String>,
}

const SALE_COLUMNS: &str = "s.id, s.invoice_no, s.customer_id, s.total_amount, s.discount, \
     s.tax, s.net_amount, s.payment_method, s.payment_status, s.created_by, s.created_at";

impl SalesService {
    pub fn new(db: QueryExecutor) -> Self {
        Self { db }
    }

    /// All sales with the creator's name, newest first
    pub async fn list_sales(&self) -> AppResult<Vec<SaleWithCreator>> {
        let sql = format!(
            r#"
            SELECT {SALE_COLUMNS}, p.full_name AS created_by_name
            FROM sales s
            LEFT JOIN profiles p ON s.created_by = p.id
            ORDER BY s.created_at DESC
            "#
        );
        Ok(self.db.fetch_all(&sql, &[]).await?)
    }

    pub async fn get_sale(&self, id: Uuid) -> AppResult<Option<Sale>> {
        let sql = format!("SELECT {SALE_COLUMNS} FROM sales s WHERE s.id = $1");
        Ok(self.db.fetch_optional(&sql, &[SqlParam::from(id)]).await?)
    }

    pub async fn list_sale_items(&self, sale_id: Uuid) -> AppResult<Vec<SaleItem>> {
        Ok(self
            .db
            .fetch_all(
                r#"
                SELECT id, sale_id, product_id, quantity, unit_price, discount, total_price
                FROM sales_items
                WHERE sale_id = $1
                ORDER BY created_at
                "#,
                &[SqlParam::from(sale_id)],
            )
            .await?)
    }

    /// Invoice document data for a stored sale
    pub async fn invoice_for_sale(&self, sale_id: Uuid) -> AppResult<InvoiceData> {
        let sale = self
            .get_sale(sale_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Sale".to_string()))?;

        let customer = match sale.customer_id {
            Some(customer_id) => {
                self.db
                    .fetch_optional::<InvoiceCustomer>(
                        "SELECT name, phone, address FROM customers WHERE id = $1",
                        &[SqlParam::from(customer_id)],
                    )
                    .await?
            }
            None => None,
        };

        let lines = self
            .db
            .fetch_all::<InvoiceLine>(
                r#"
                SELECT p.name AS product_name, si.quantity, si.unit_price, si.discount, si.total_price
                FROM sales_items si
                LEFT JOIN products p ON si.product_id = p.id
                WHERE si.sale_id = $1
                ORDER BY si.created_at
                "#,
                &[SqlParam::from(sale_id)],
            )
            .await?;

        Ok(build_invoice(&sale, customer, lines))
    }
}

/// Map a stored sale onto the invoice document
pub fn build_invoice(
    sale: &Sale,
    customer: Option<InvoiceCustomer>,
    lines: Vec<InvoiceLine>,
) -> InvoiceData {
    let customer = customer.unwrap_or_default();
    let non_empty = |s: String| if s.trim().is_empty() { None } else { Some(s) };

    InvoiceData {
        invoice_no: sale.invoice_no.clone(),
        date: sale.created_at.to_rfc3339(),
        customer_name: non_empty(customer.name),
        customer_phone: customer.phone,
        customer_address: customer.address,
        items: lines
            .into_iter()
            .map(|line| InvoiceItem {
                product_name: line.product_name.unwrap_or_else(|| "Unknown product".to_string()),
                quantity: Decimal::from(line.quantity),
                unit_price: line.unit_price,
                discount: Some(line.discount),
                total: line.total_price,
            })
            .collect(),
        subtotal: sale.total_amount,
        discount: Some(sale.discount),
        tax: Some(sale.tax),
        total: sale.net_amount,
        payment_type: sale.payment_method.clone(),
        payment_status: sale.payment_status.clone(),
    }
}

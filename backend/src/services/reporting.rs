//! Reporting service for inventory analytics and data export
//! Provides the expiry trend and manufacturer performance series behind the report charts

use rust_decimal::Decimal;
use serde::Serialize;

use crate::db::{QueryExecutor, SqlParam};
use crate::error::{AppError, AppResult};
use shared::charts::{expiry_trend_bars, manufacturer_bars, ExpiryTrendBar, ManufacturerBar};
use shared::models::{ExpiryTrendRow, ManufacturerPerformance};

/// Months shown by the expiry trend when the caller does not ask
pub const DEFAULT_TREND_MONTHS: i64 = 6;
pub const MAX_TREND_MONTHS: i64 = 24;

/// Reporting service
#[derive(Clone)]
pub struct ReportingService {
    db: QueryExecutor,
}

#[derive(Debug, sqlx::FromRow)]
struct ExpiryTrendRecord {
    month: String,
    expired: i64,
    expiring_soon: i64,
    total_value: Decimal,
}

#[derive(Debug, sqlx::FromRow)]
struct ManufacturerRecord {
    name: String,
    products_supplied: i64,
    total_value: Decimal,
    active_products: i64,
}

/// Expiry rows with their chart bars
#[derive(Debug, Serialize)]
pub struct ExpiryTrendReport {
    pub months: Vec<ExpiryTrendRow>,
    pub bars: Vec<ExpiryTrendBar>,
}

/// Ranked manufacturers with bars for the top ten
#[derive(Debug, Serialize)]
pub struct ManufacturerReport {
    pub manufacturers: Vec<ManufacturerPerformance>,
    pub bars: Vec<ManufacturerBar>,
}

/// Clamp the requested window to 1..=24 months
pub fn trend_months(requested: Option<i64>) -> i64 {
    requested
        .unwrap_or(DEFAULT_TREND_MONTHS)
        .clamp(1, MAX_TREND_MONTHS)
}

/// Drop manufacturers with no stock value and order by value, largest first.
/// Ties keep their incoming order.
pub fn rank_manufacturers(mut rows: Vec<ManufacturerPerformance>) -> Vec<ManufacturerPerformance> {
    rows.retain(|m| m.total_value > Decimal::ZERO);
    rows.sort_by(|a, b| b.total_value.cmp(&a.total_value));
    rows
}

impl ReportingService {
    pub fn new(db: QueryExecutor) -> Self {
        Self { db }
    }

    /// Monthly batch expiry counts starting with the current month.
    ///
    /// `expired` counts active batches whose expiry date has passed,
    /// `expiring_soon` those still ahead; every month of the window is
    /// present even when it has no batches.
    pub async fn expiry_trend(&self, months: i64) -> AppResult<ExpiryTrendReport> {
        let records = self
            .db
            .fetch_all::<ExpiryTrendRecord>(
                r#"
                WITH months AS (
                    SELECT generate_series(
                        date_trunc('month', CURRENT_DATE),
                        date_trunc('month', CURRENT_DATE) + ($1::int - 1) * INTERVAL '1 month',
                        INTERVAL '1 month'
                    ) AS month_start
                )
                SELECT
                    to_char(m.month_start, 'YYYY-MM') AS month,
                    COUNT(b.id) FILTER (WHERE b.expiry_date < CURRENT_DATE) AS expired,
                    COUNT(b.id) FILTER (WHERE b.expiry_date >= CURRENT_DATE) AS expiring_soon,
                    COALESCE(SUM(b.quantity_remaining * b.purchase_price), 0)::numeric AS total_value
                FROM months m
                LEFT JOIN medicine_batches b
                    ON b.is_active
                    AND b.expiry_date >= m.month_start
                    AND b.expiry_date < m.month_start + INTERVAL '1 month'
                GROUP BY m.month_start
                ORDER BY m.month_start
                "#,
                &[SqlParam::Integer(months)],
            )
            .await?;

        let months: Vec<ExpiryTrendRow> = records
            .into_iter()
            .map(|r| ExpiryTrendRow {
                month: r.month,
                expired: r.expired,
                expiring_soon: r.expiring_soon,
                total_value: r.total_value,
            })
            .collect();

        let bars = expiry_trend_bars(&months);
        Ok(ExpiryTrendReport { months, bars })
    }

    /// Stock value per manufacturer from the batches they supplied
    pub async fn manufacturer_performance(&self) -> AppResult<ManufacturerReport> {
        let records = self
            .db
            .fetch_all::<ManufacturerRecord>(
                r#"
                SELECT
                    m.name,
                    COUNT(DISTINCT b.product_id) AS products_supplied,
                    COALESCE(SUM(b.quantity_remaining * b.purchase_price), 0)::numeric AS total_value,
                    COUNT(b.id) FILTER (WHERE b.is_active AND b.expiry_date >= CURRENT_DATE) AS active_products
                FROM manufacturers m
                LEFT JOIN medicine_batches b ON b.manufacturer_id = m.id
                GROUP BY m.id, m.name
                ORDER BY m.name
                "#,
                &[],
            )
            .await?;

        let manufacturers = rank_manufacturers(
            records
                .into_iter()
                .map(|r| ManufacturerPerformance {
                    name: r.name,
                    products_supplied: r.products_supplied,
                    total_value: r.total_value,
                    active_products: r.active_products,
                })
                .collect(),
        );

        let bars = manufacturer_bars(&manufacturers);
        Ok(ManufacturerReport { manufacturers, bars })
    }

    /// Export report data to CSV format
    pub fn export_to_csv<T: Serialize>(data: &[T]) -> AppResult<String> {
        let mut wtr = csv::Writer::from_writer(vec![]);
        for record in data {
            wtr.serialize(record)
                .map_err(|e| AppError::Internal(format!("CSV serialization error: {}", e)))?;
        }
        let bytes = wtr
            .into_inner()
            .map_err(|e| AppError::Internal(format!("CSV writer error: {}", e)))?;
        String::from_utf8(bytes)
            .map_err(|e| AppError::Internal(format!("UTF-8 conversion error: {}", e)))
    }
}

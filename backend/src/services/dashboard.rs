//! Dashboard headline counts

use crate::db::QueryExecutor;
use crate::error::AppResult;
use shared::models::DashboardStats;

#[derive(Clone)]
pub struct DashboardService {
    db: QueryExecutor,
}

impl DashboardService {
    pub fn new(db: QueryExecutor) -> Self {
        Self { db }
    }

    /// The four counts run concurrently, each on its own pooled connection.
    /// They are independent reads; no transaction spans them.
    pub async fn stats(&self) -> AppResult<DashboardStats> {
        let (products, sales, customers, low_stock) = tokio::try_join!(
            self.db.fetch_scalar::<i64>("SELECT COUNT(*) FROM products", &[]),
            self.db.fetch_scalar::<i64>("SELECT COUNT(*) FROM sales", &[]),
            self.db.fetch_scalar::<i64>("SELECT COUNT(*) FROM customers", &[]),
            self.db.fetch_scalar::<i64>(
                "SELECT COUNT(*) FROM products WHERE stock_quantity <= min_stock_level",
                &[],
            ),
        )?;

        Ok(DashboardStats::from_counts(products, sales, customers, low_stock))
    }
}

//! Dashboard summary model

use serde::{Deserialize, Serialize};

/// Fixed-shape counts shown on the dashboard
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_products: u64,
    pub total_sales: u64,
    pub total_customers: u64,
    pub low_stock_products: u64,
}

impl DashboardStats {
    /// Build from raw `COUNT(*)` results; negative counts clamp to zero.
    pub fn from_counts(products: i64, sales: i64, customers: i64, low_stock: i64) -> Self {
        let clamp = |n: i64| u64::try_from(n).unwrap_or(0);
        Self {
            total_products: clamp(products),
            total_sales: clamp(sales),
            total_customers: clamp(customers),
            low_stock_products: clamp(low_stock),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serializes_camel_case() {
        let stats = DashboardStats::from_counts(12, 3, 7, 2);
        let json = serde_json::to_value(stats).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "totalProducts": 12,
                "totalSales": 3,
                "totalCustomers": 7,
                "lowStockProducts": 2
            })
        );
    }

    #[test]
    fn test_empty_tables_are_zero() {
        assert_eq!(DashboardStats::from_counts(0, 0, 0, 0), DashboardStats::default());
    }
}

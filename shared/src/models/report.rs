//! Pre-aggregated report series consumed by the chart components

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One month of expiry tracking
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ExpiryTrendRow {
    /// Month label, e.g. `2024-05`
    pub month: String,
    pub expired: i64,
    pub expiring_soon: i64,
    pub total_value: Decimal,
}

impl ExpiryTrendRow {
    pub fn total(&self) -> i64 {
        self.expired + self.expiring_soon
    }
}

/// Inventory value supplied by one manufacturer
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ManufacturerPerformance {
    pub name: String,
    pub products_supplied: i64,
    pub total_value: Decimal,
    pub active_products: i64,
}

/// Generic labelled value for the simple bar and pie charts
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LabelledValue {
    pub label: String,
    pub value: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

/// One point of a dated series for the trend chart
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TrendPoint {
    pub date: String,
    pub value: Decimal,
}

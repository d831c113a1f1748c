//! Common types and formatting helpers used across the suite

use chrono::{DateTime, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Dollar amount with two decimals, e.g. `$1250.00`
pub fn format_money(amount: Decimal) -> String {
    format!("${:.2}", amount.round_dp(2))
}

/// Render an invoice date as `MM/DD/YYYY`.
///
/// Accepts a plain ISO date (`2024-03-05`) or an RFC 3339 timestamp; anything
/// else is returned unchanged.
pub fn format_display_date(raw: &str) -> String {
    let trimmed = raw.trim();
    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return date.format("%m/%d/%Y").to_string();
    }
    if let Ok(ts) = DateTime::parse_from_rfc3339(trimmed) {
        return ts.date_naive().format("%m/%d/%Y").to_string();
    }
    raw.to_string()
}

/// Output format for report endpoints
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    #[default]
    Json,
    Csv,
}

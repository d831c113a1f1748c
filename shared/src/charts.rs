//! Proportional-bar chart computations for the report screens
//!
//! Every bar is scaled against the largest value of its own series, so the
//! largest row is always 100 and an all-zero or empty series yields 0 without
//! dividing by zero.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::models::{ExpiryTrendRow, LabelledValue, ManufacturerPerformance, TrendPoint};

/// Maximum number of rows shown by the manufacturer chart
pub const MANUFACTURER_CHART_LIMIT: usize = 10;

/// `value / max * 100`, or 0 when `max` is not positive
pub fn bar_percentage(value: Decimal, max: Decimal) -> f64 {
    if max <= Decimal::ZERO {
        return 0.0;
    }
    if value == max {
        return 100.0;
    }
    value
        .checked_div(max)
        .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
        .and_then(|pct| pct.to_f64())
        .map_or_else(|| float_percentage(to_f64(value), to_f64(max)), |pct| pct.clamp(0.0, 100.0))
}

/// Fallback for ratios whose Decimal form overflows
fn float_percentage(value: f64, max: f64) -> f64 {
    let pct = value / max * 100.0;
    if max > 0.0 && pct.is_finite() {
        pct.clamp(0.0, 100.0)
    } else {
        0.0
    }
}

fn to_f64(value: Decimal) -> f64 {
    value.to_f64().unwrap_or(0.0)
}

/// One rendered row of the expiry trend chart
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ExpiryTrendBar {
    pub month: String,
    pub expired: i64,
    pub expiring_soon: i64,
    pub total: i64,
    pub total_value: Decimal,
    pub percentage: f64,
}

/// One rendered row of the manufacturer chart
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ManufacturerBar {
    pub rank: usize,
    pub name: String,
    pub products_supplied: i64,
    pub total_value: Decimal,
    pub percentage: f64,
}

/// One row of the simple bar chart
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Bar {
    pub label: String,
    pub value: Decimal,
    pub percentage: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

/// Bars for the monthly expiry series; every month is kept.
pub fn expiry_trend_bars(rows: &[ExpiryTrendRow]) -> Vec<ExpiryTrendBar> {
    let max = rows.iter().map(ExpiryTrendRow::total).max().unwrap_or(0);

    rows.iter()
        .map(|row| {
            let total = row.total();
            ExpiryTrendBar {
                month: row.month.clone(),
                expired: row.expired,
                expiring_soon: row.expiring_soon,
                total,
                total_value: row.total_value,
                percentage: bar_percentage(Decimal::from(total), Decimal::from(max)),
            }
        })
        .collect()
}

/// Bars for the first ten manufacturers in caller order.
///
/// The input is expected to be sorted already; no ordering happens here.
/// The scale uses the maximum over the whole input.
pub fn manufacturer_bars(rows: &[ManufacturerPerformance]) -> Vec<ManufacturerBar> {
    let max = rows
        .iter()
        .map(|r| r.total_value)
        .max()
        .unwrap_or(Decimal::ZERO);

    rows.iter()
        .take(MANUFACTURER_CHART_LIMIT)
        .enumerate()
        .map(|(idx, row)| ManufacturerBar {
            rank: idx + 1,
            name: row.name.clone(),
            products_supplied: row.products_supplied,
            total_value: row.total_value,
            percentage: bar_percentage(row.total_value, max),
        })
        .collect()
}

pub fn simple_bars(values: &[LabelledValue]) -> Vec<Bar> {
    let max = values
        .iter()
        .map(|v| v.value)
        .max()
        .unwrap_or(Decimal::ZERO);

    values
        .iter()
        .map(|v| Bar {
            label: v.label.clone(),
            value: v.value,
            percentage: bar_percentage(v.value, max),
            color: v.color.clone(),
        })
        .collect()
}

/// Share of the total per slice, 0 everywhere when the total is not positive
pub fn pie_shares(values: &[LabelledValue]) -> Vec<Bar> {
    let total = values
        .iter()
        .try_fold(Decimal::ZERO, |acc, v| acc.checked_add(v.value));
    let float_total: f64 = values.iter().map(|v| to_f64(v.value)).sum();

    values
        .iter()
        .map(|v| Bar {
            label: v.label.clone(),
            value: v.value,
            percentage: match total {
                Some(total) => bar_percentage(v.value, total),
                None => float_percentage(to_f64(v.value), float_total),
            },
            color: v.color.clone(),
        })
        .collect()
}

/// Min-max normalized trend; a flat series sits at 50
pub fn trend_points(points: &[TrendPoint]) -> Vec<Bar> {
    let max = points.iter().map(|p| p.value).max().unwrap_or(Decimal::ZERO);
    let min = points.iter().map(|p| p.value).min().unwrap_or(Decimal::ZERO);
    let range = max.checked_sub(min);

    points
        .iter()
        .map(|p| Bar {
            label: p.date.clone(),
            value: p.value,
            percentage: match (range, p.value.checked_sub(min)) {
                (Some(range), _) if range <= Decimal::ZERO => 50.0,
                (Some(range), Some(offset)) => bar_percentage(offset, range),
                _ => float_percentage(to_f64(p.value) - to_f64(min), to_f64(max) - to_f64(min)),
            },
            color: None,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn month(label: &str, expired: i64, soon: i64) -> ExpiryTrendRow {
        ExpiryTrendRow {
            month: label.to_string(),
            expired,
            expiring_soon: soon,
            total_value: Decimal::new(1000, 2),
        }
    }

    fn maker(name: &str, value: i64) -> ManufacturerPerformance {
        ManufacturerPerformance {
            name: name.to_string(),
            products_supplied: 1,
            total_value: Decimal::from(value),
            active_products: 1,
        }
    }

    #[test]
    fn test_expiry_bars_scale_to_max() {
        let bars = expiry_trend_bars(&[month("2024-01", 2, 3), month("2024-02", 5, 5)]);
        assert_eq!(bars[0].total, 5);
        assert_eq!(bars[0].percentage, 50.0);
        assert_eq!(bars[1].percentage, 100.0);
    }

    #[test]
    fn test_expiry_bars_all_zero() {
        let bars = expiry_trend_bars(&[month("2024-01", 0, 0), month("2024-02", 0, 0)]);
        assert!(bars.iter().all(|b| b.percentage == 0.0));
    }

    #[test]
    fn test_empty_series() {
        assert!(expiry_trend_bars(&[]).is_empty());
        assert!(manufacturer_bars(&[]).is_empty());
        assert!(simple_bars(&[]).is_empty());
    }

    #[test]
    fn test_manufacturer_bars_truncate_without_sorting() {
        let rows: Vec<_> = (0..15).map(|i| maker(&format!("M{}", i), i + 1)).collect();
        let bars = manufacturer_bars(&rows);
        assert_eq!(bars.len(), MANUFACTURER_CHART_LIMIT);
        assert_eq!(bars[0].name, "M0");
        assert_eq!(bars[9].rank, 10);
        // Scale comes from the whole input (M14 = 15), not just the shown rows
        assert!((bars[9].percentage - 10.0 / 15.0 * 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_pie_shares() {
        let values = vec![
            LabelledValue { label: "Cash".into(), value: Decimal::from(75), color: None },
            LabelledValue { label: "Card".into(), value: Decimal::from(25), color: None },
        ];
        let shares = pie_shares(&values);
        assert_eq!(shares[0].percentage, 75.0);
        assert_eq!(shares[1].percentage, 25.0);
    }

    #[test]
    fn test_flat_trend_sits_in_middle() {
        let points = vec![
            TrendPoint { date: "Mon".into(), value: Decimal::from(3) },
            TrendPoint { date: "Tue".into(), value: Decimal::from(3) },
        ];
        assert!(trend_points(&points).iter().all(|p| p.percentage == 50.0));
    }

    #[test]
    fn test_trend_min_max() {
        let points = vec![
            TrendPoint { date: "Mon".into(), value: Decimal::from(10) },
            TrendPoint { date: "Tue".into(), value: Decimal::from(20) },
            TrendPoint { date: "Wed".into(), value: Decimal::from(15) },
        ];
        let bars = trend_points(&points);
        assert_eq!(bars[0].percentage, 0.0);
        assert_eq!(bars[1].percentage, 100.0);
        assert_eq!(bars[2].percentage, 50.0);
    }
}

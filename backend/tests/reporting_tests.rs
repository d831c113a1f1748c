//! Reporting, invoice mapping and token extraction tests
//!
//! Property-based tests for:
//! - Trend window clamping
//! - Manufacturer ranking
//! - Sale to invoice mapping
//! - Bearer token parsing

use chrono::{TimeZone, Utc};
use proptest::prelude::*;
use rust_decimal::Decimal;
use uuid::Uuid;

use shared::models::ManufacturerPerformance;
use volt_server::middleware::auth::bearer_token;
use volt_server::services::reporting::{
    rank_manufacturers, trend_months, DEFAULT_TREND_MONTHS, MAX_TREND_MONTHS,
};
use volt_server::services::sales::{build_invoice, InvoiceCustomer, InvoiceLine, Sale};

// ============================================================================
// Property Test Strategies
// ============================================================================

/// Money values in cents, including zero and negatives
fn cents_strategy() -> impl Strategy<Value = Decimal> {
    (-50_000i64..500_000).prop_map(|c| Decimal::new(c, 2))
}

fn manufacturer_strategy() -> impl Strategy<Value = ManufacturerPerformance> {
    ("[A-Z][a-z]{3,10}", 0i64..50, cents_strategy(), 0i64..50).prop_map(
        |(name, products_supplied, total_value, active_products)| ManufacturerPerformance {
            name,
            products_supplied,
            total_value,
            active_products,
        },
    )
}

fn line_strategy() -> impl Strategy<Value = InvoiceLine> {
    (
        proptest::option::of("[A-Za-z ]{3,20}"),
        1i32..20,
        cents_strategy(),
    )
        .prop_map(|(product_name, quantity, unit_price)| InvoiceLine {
            product_name,
            quantity,
            unit_price,
            discount: Decimal::ZERO,
            total_price: unit_price * Decimal::from(quantity),
        })
}

fn sale(invoice_no: &str) -> Sale {
    Sale {
        id: Uuid::new_v4(),
        invoice_no: invoice_no.to_string(),
        customer_id: None,
        total_amount: Decimal::new(10000, 2),
        discount: Decimal::ZERO,
        tax: Decimal::ZERO,
        net_amount: Decimal::new(10000, 2),
        payment_method: None,
        payment_status: None,
        created_by: None,
        created_at: Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap(),
    }
}

// ============================================================================
// Trend window
// ============================================================================

#[test]
fn test_trend_months_default() {
    assert_eq!(trend_months(None), DEFAULT_TREND_MONTHS);
}

proptest! {
    #[test]
    fn prop_trend_months_in_range(requested in proptest::option::of(any::<i64>())) {
        let months = trend_months(requested);
        prop_assert!((1..=MAX_TREND_MONTHS).contains(&months));
    }

    #[test]
    fn prop_trend_months_keeps_valid_request(requested in 1i64..=24) {
        prop_assert_eq!(trend_months(Some(requested)), requested);
    }
}

// ============================================================================
// Manufacturer ranking
// ============================================================================

proptest! {
    #[test]
    fn prop_ranking_drops_empty_and_sorts(rows in prop::collection::vec(manufacturer_strategy(), 0..30)) {
        let expected = rows.iter().filter(|m| m.total_value > Decimal::ZERO).count();
        let ranked = rank_manufacturers(rows);

        prop_assert_eq!(ranked.len(), expected);
        prop_assert!(ranked.iter().all(|m| m.total_value > Decimal::ZERO));
        prop_assert!(ranked.windows(2).all(|w| w[0].total_value >= w[1].total_value));
    }
}

#[test]
fn test_ranking_ties_keep_order() {
    let row = |name: &str, value: i64| ManufacturerPerformance {
        name: name.to_string(),
        products_supplied: 1,
        total_value: Decimal::from(value),
        active_products: 1,
    };

    let ranked = rank_manufacturers(vec![row("Ampere", 10), row("Bolt", 40), row("Coil", 10)]);
    let names: Vec<_> = ranked.iter().map(|m| m.name.as_str()).collect();
    assert_eq!(names, ["Bolt", "Ampere", "Coil"]);
}

// ============================================================================
// Sale to invoice
// ============================================================================

proptest! {
    #[test]
    fn prop_invoice_keeps_every_line(lines in prop::collection::vec(line_strategy(), 0..15)) {
        let names: Vec<Option<String>> = lines.iter().map(|l| l.product_name.clone()).collect();
        let invoice = build_invoice(&sale("INV-7"), None, lines);

        prop_assert_eq!(invoice.items.len(), names.len());
        for (item, name) in invoice.items.iter().zip(names) {
            let expected = name.unwrap_or_else(|| "Unknown product".to_string());
            prop_assert_eq!(&item.product_name, &expected);
        }
    }
}

#[test]
fn test_invoice_blank_customer_has_no_bill_to() {
    let customer = InvoiceCustomer {
        name: "  ".to_string(),
        phone: None,
        address: None,
    };
    let invoice = build_invoice(&sale("INV-8"), Some(customer), Vec::new());
    assert!(invoice.bill_to().is_none());
    assert_eq!(invoice.file_name(), "invoice-INV-8.pdf");
}

// ============================================================================
// Bearer tokens
// ============================================================================

proptest! {
    #[test]
    fn prop_bearer_token_extracted(token in "[A-Za-z0-9._-]{1,64}") {
        let header = format!("Bearer {}", token);
        prop_assert_eq!(bearer_token(Some(&header)), Some(token.as_str()));
    }

    #[test]
    fn prop_other_schemes_rejected(token in "[A-Za-z0-9]{1,32}") {
        let header = format!("Basic {}", token);
        prop_assert_eq!(bearer_token(Some(&header)), None);
    }
}

#[test]
fn test_bearer_token_edge_cases() {
    assert_eq!(bearer_token(None), None);
    assert_eq!(bearer_token(Some("Bearer ")), None);
    assert_eq!(bearer_token(Some("Bearer    ")), None);
}

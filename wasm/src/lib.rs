//! WebAssembly module for Volt Dealer Suite
//!
//! Provides client-side computation for:
//! - Permission gating of screens and actions
//! - Report chart bars
//! - Invoice PDF generation (download, print, email attachment)

use wasm_bindgen::prelude::*;

use shared::charts;
use shared::invoice::{self, InvoiceError};
use shared::models::{
    CompanyInfo, ExpiryTrendRow, InvoiceData, LabelledValue, ManufacturerPerformance, TrendPoint,
    UserPermissions,
};
use shared::permissions::PermissionState;

fn js_error(context: &str, err: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&format!("{}: {}", context, err))
}

fn parse<T: serde::de::DeserializeOwned>(json: &str, what: &str) -> Result<T, JsValue> {
    serde_json::from_str(json).map_err(|e| js_error(&format!("Invalid {} JSON", what), e))
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<String, JsValue> {
    serde_json::to_string(value).map_err(|e| js_error("Serialization failed", e))
}

fn parse_company(company_json: Option<String>) -> Result<Option<CompanyInfo>, JsValue> {
    company_json
        .filter(|s| !s.trim().is_empty())
        .map(|s| parse::<CompanyInfo>(&s, "company"))
        .transpose()
}

fn invoice_error(err: InvoiceError) -> JsValue {
    web_sys::console::error_1(&JsValue::from_str(&format!("Error generating PDF: {}", err)));
    js_error("Failed to generate invoice PDF", err)
}

// ============================================================================
// Permissions
// ============================================================================

/// Permission lookup for the signed-in user.
///
/// Starts in the loading state; every predicate answers `false` until the
/// single fetch succeeds, and stays `false` forever if it fails.
#[wasm_bindgen]
#[derive(Default)]
pub struct PermissionLookup {
    state: PermissionState,
}

#[wasm_bindgen]
impl PermissionLookup {
    #[wasm_bindgen(constructor)]
    pub fn new() -> PermissionLookup {
        PermissionLookup::default()
    }

    /// Apply the body of `GET /api/auth/permissions`.
    ///
    /// Returns `false` when the lookup was already settled.
    pub fn resolve(&mut self, permissions_json: &str) -> bool {
        let outcome = serde_json::from_str::<UserPermissions>(permissions_json);
        if let Err(e) = &outcome {
            web_sys::console::error_1(&JsValue::from_str(&format!(
                "Error loading permissions: {}",
                e
            )));
        }
        self.state.resolve(outcome)
    }

    /// Record a failed fetch (network error, non-2xx status)
    pub fn fail(&mut self, message: &str) -> bool {
        if self.state.is_loading() {
            web_sys::console::error_1(&JsValue::from_str(&format!(
                "Error loading permissions: {}",
                message
            )));
        }
        self.state.resolve::<&str>(Err(message))
    }

    #[wasm_bindgen(getter)]
    pub fn loading(&self) -> bool {
        self.state.is_loading()
    }

    #[wasm_bindgen(js_name = hasPermission)]
    pub fn has_permission(&self, permission: &str) -> bool {
        self.state.has_permission(permission)
    }

    #[wasm_bindgen(js_name = hasAnyPermission)]
    pub fn has_any_permission(&self, permissions: Vec<String>) -> bool {
        self.state.has_any_permission(&permissions)
    }

    #[wasm_bindgen(js_name = hasAllPermissions)]
    pub fn has_all_permissions(&self, permissions: Vec<String>) -> bool {
        self.state.has_all_permissions(&permissions)
    }

    #[wasm_bindgen(js_name = hasRole)]
    pub fn has_role(&self, role: &str) -> bool {
        self.state.has_role(role)
    }

    #[wasm_bindgen(js_name = isAdmin)]
    pub fn is_admin(&self) -> bool {
        self.state.is_admin()
    }
}

// ============================================================================
// Charts
// ============================================================================

/// Bars for the monthly expiry trend
#[wasm_bindgen(js_name = expiryTrendBars)]
pub fn expiry_trend_bars(rows_json: &str) -> Result<String, JsValue> {
    let rows: Vec<ExpiryTrendRow> = parse(rows_json, "expiry trend")?;
    to_json(&charts::expiry_trend_bars(&rows))
}

/// Top manufacturers by value; rows must arrive sorted
#[wasm_bindgen(js_name = manufacturerBars)]
pub fn manufacturer_bars(rows_json: &str) -> Result<String, JsValue> {
    let rows: Vec<ManufacturerPerformance> = parse(rows_json, "manufacturer")?;
    to_json(&charts::manufacturer_bars(&rows))
}

#[wasm_bindgen(js_name = simpleBars)]
pub fn simple_bars(values_json: &str) -> Result<String, JsValue> {
    let values: Vec<LabelledValue> = parse(values_json, "chart")?;
    to_json(&charts::simple_bars(&values))
}

#[wasm_bindgen(js_name = pieShares)]
pub fn pie_shares(values_json: &str) -> Result<String, JsValue> {
    let values: Vec<LabelledValue> = parse(values_json, "chart")?;
    to_json(&charts::pie_shares(&values))
}

#[wasm_bindgen(js_name = trendPoints)]
pub fn trend_points(points_json: &str) -> Result<String, JsValue> {
    let points: Vec<TrendPoint> = parse(points_json, "trend")?;
    to_json(&charts::trend_points(&points))
}

// ============================================================================
// Invoices
// ============================================================================

/// PDF bytes for download; the caller saves them as `invoiceFileName`
#[wasm_bindgen(js_name = generateInvoicePdf)]
pub fn generate_invoice_pdf(
    invoice_json: &str,
    company_json: Option<String>,
) -> Result<Vec<u8>, JsValue> {
    let data: InvoiceData = parse(invoice_json, "invoice")?;
    let company = parse_company(company_json)?;
    invoice::download_invoice_pdf(&data, company.as_ref())
        .map(|rendered| rendered.bytes)
        .map_err(invoice_error)
}

/// PDF bytes meant to be opened in a new window and printed
#[wasm_bindgen(js_name = printInvoicePdf)]
pub fn print_invoice_pdf(
    invoice_json: &str,
    company_json: Option<String>,
) -> Result<Vec<u8>, JsValue> {
    let data: InvoiceData = parse(invoice_json, "invoice")?;
    let company = parse_company(company_json)?;
    invoice::print_invoice_pdf(&data, company.as_ref())
        .map(|rendered| rendered.bytes)
        .map_err(invoice_error)
}

/// PDF bytes for an email attachment; sending is left to the mail service
#[wasm_bindgen(js_name = emailInvoicePdf)]
pub fn email_invoice_pdf(
    invoice_json: &str,
    recipient_email: &str,
    company_json: Option<String>,
) -> Result<Vec<u8>, JsValue> {
    let data: InvoiceData = parse(invoice_json, "invoice")?;
    let company = parse_company(company_json)?;
    invoice::email_invoice_pdf(&data, recipient_email, company.as_ref())
        .map(|attachment| attachment.bytes)
        .map_err(invoice_error)
}

#[wasm_bindgen(js_name = invoiceFileName)]
pub fn invoice_file_name(invoice_json: &str) -> Result<String, JsValue> {
    let data: InvoiceData = parse(invoice_json, "invoice")?;
    Ok(data.file_name())
}

#[cfg(test)]
mod tests {
    use super::*;

    const INVOICE: &str = r#"{
        "invoice_no": "INV-7",
        "date": "2024-03-15",
        "customer_name": "Walk-in",
        "items": [
            {"product_name": "Inverter 3kW", "quantity": "1", "unit_price": "450.00", "total": "450.00"}
        ],
        "subtotal": "450.00",
        "total": "450.00"
    }"#;

    #[test]
    fn test_charts_round_through_json() {
        let bars = expiry_trend_bars(
            r#"[{"month":"2024-01","expired":1,"expiringSoon":1,"totalValue":"10"},
                {"month":"2024-02","expired":4,"expiringSoon":0,"totalValue":"5"}]"#,
        )
        .unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&bars).unwrap();
        assert_eq!(parsed[0]["percentage"], 50.0);
        assert_eq!(parsed[1]["percentage"], 100.0);
    }

    #[test]
    fn test_manufacturer_bars_limit() {
        let rows: Vec<_> = (0..12)
            .map(|i| {
                format!(
                    r#"{{"name":"M{}","productsSupplied":1,"totalValue":"{}","activeProducts":1}}"#,
                    i,
                    100 - i
                )
            })
            .collect();
        let json = format!("[{}]", rows.join(","));
        let bars: serde_json::Value =
            serde_json::from_str(&manufacturer_bars(&json).unwrap()).unwrap();
        assert_eq!(bars.as_array().unwrap().len(), 10);
        assert_eq!(bars[0]["percentage"], 100.0);
    }

    #[test]
    fn test_invoice_file_name() {
        assert_eq!(invoice_file_name(INVOICE).unwrap(), "invoice-INV-7.pdf");
    }

    #[test]
    fn test_generate_invoice_pdf() {
        let bytes = generate_invoice_pdf(INVOICE, None).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn test_custom_company() {
        let company = r#"{"name":"Spark","address":"1 Road","phone":"1","email":"a@b.c"}"#;
        let bytes = print_invoice_pdf(INVOICE, Some(company.to_string())).unwrap();
        assert!(!bytes.is_empty());
    }

    #[test]
    fn test_permission_lookup_gating() {
        let mut lookup = PermissionLookup::new();
        assert!(lookup.loading());
        assert!(!lookup.has_permission("view_sales"));

        let body = r#"{
            "user_id": "00000000-0000-0000-0000-000000000000",
            "roles": ["admin"],
            "permissions": ["view_sales", "create_sale"]
        }"#;
        assert!(lookup.resolve(body));
        assert!(!lookup.loading());
        assert!(lookup.is_admin());
        assert!(lookup.has_all_permissions(vec!["view_sales".into(), "create_sale".into()]));
        assert!(!lookup.has_any_permission(vec!["delete_sale".into()]));
    }
}

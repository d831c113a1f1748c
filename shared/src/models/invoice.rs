//! Invoice input records

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// A client-side invoice record, consumed only to produce a document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvoiceData {
    pub invoice_no: String,
    /// ISO date or RFC 3339 timestamp
    pub date: String,
    #[serde(default)]
    pub customer_name: Option<String>,
    #[serde(default)]
    pub customer_phone: Option<String>,
    #[serde(default)]
    pub customer_address: Option<String>,
    pub items: Vec<InvoiceItem>,
    pub subtotal: Decimal,
    #[serde(default)]
    pub tax: Option<Decimal>,
    #[serde(default)]
    pub discount: Option<Decimal>,
    pub total: Decimal,
    #[serde(default)]
    pub payment_type: Option<String>,
    #[serde(default)]
    pub payment_status: Option<String>,
}

impl InvoiceData {
    /// Customer name when present and not blank
    pub fn bill_to(&self) -> Option<&str> {
        non_blank(self.customer_name.as_deref())
    }

    pub fn customer_phone(&self) -> Option<&str> {
        non_blank(self.customer_phone.as_deref())
    }

    pub fn customer_address(&self) -> Option<&str> {
        non_blank(self.customer_address.as_deref())
    }

    pub fn discount_amount(&self) -> Option<Decimal> {
        self.discount.filter(|d| *d > Decimal::ZERO)
    }

    pub fn tax_amount(&self) -> Option<Decimal> {
        self.tax.filter(|t| *t > Decimal::ZERO)
    }

    pub fn payment_type(&self) -> Option<&str> {
        non_blank(self.payment_type.as_deref())
    }

    pub fn payment_status(&self) -> Option<&str> {
        non_blank(self.payment_status.as_deref())
    }

    /// `invoice-<invoice_no>.pdf` with unsafe characters replaced
    pub fn file_name(&self) -> String {
        let safe: String = self
            .invoice_no
            .trim()
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '.' {
                    c
                } else {
                    '_'
                }
            })
            .collect();
        if safe.is_empty() {
            "invoice.pdf".to_string()
        } else {
            format!("invoice-{}.pdf", safe)
        }
    }
}

/// One invoice line
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvoiceItem {
    pub product_name: String,
    pub quantity: Decimal,
    pub unit_price: Decimal,
    #[serde(default)]
    pub discount: Option<Decimal>,
    pub total: Decimal,
}

/// Letterhead printed at the top of the invoice
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CompanyInfo {
    pub name: String,
    pub address: String,
    pub phone: String,
    pub email: String,
    #[serde(default)]
    pub logo: Option<String>,
}

impl Default for CompanyInfo {
    fn default() -> Self {
        Self {
            name: "Volt Dealer Suite".to_string(),
            address: "123 Main Street, City, Country".to_string(),
            phone: "+1234567890".to_string(),
            email: "info@voltdealer.com".to_string(),
            logo: None,
        }
    }
}

/// Body of the download and print requests
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvoiceRequest {
    pub invoice: InvoiceData,
    #[serde(default)]
    pub company: Option<CompanyInfo>,
}

/// Body of the email request; only the attachment is produced
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct EmailInvoiceRequest {
    pub invoice: InvoiceData,
    #[serde(default)]
    pub company: Option<CompanyInfo>,
    #[validate(email(message = "recipient_email must be a valid email address"))]
    pub recipient_email: String,
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn invoice(no: &str) -> InvoiceData {
        InvoiceData {
            invoice_no: no.to_string(),
            date: "2024-01-02".to_string(),
            customer_name: Some("  ".to_string()),
            customer_phone: None,
            customer_address: None,
            items: vec![],
            subtotal: Decimal::ZERO,
            tax: Some(Decimal::ZERO),
            discount: Some(Decimal::new(-5, 0)),
            total: Decimal::ZERO,
            payment_type: None,
            payment_status: None,
        }
    }

    #[test]
    fn test_file_name_sanitized() {
        assert_eq!(invoice("INV-001").file_name(), "invoice-INV-001.pdf");
        assert_eq!(invoice("INV/2024 01").file_name(), "invoice-INV_2024_01.pdf");
        assert_eq!(invoice("").file_name(), "invoice.pdf");
    }

    #[test]
    fn test_blank_and_non_positive_fields_are_absent() {
        let data = invoice("1");
        assert!(data.bill_to().is_none());
        assert!(data.tax_amount().is_none());
        assert!(data.discount_amount().is_none());
    }

    #[test]
    fn test_email_request_validation() {
        let mut request = EmailInvoiceRequest {
            invoice: invoice("INV-3"),
            company: None,
            recipient_email: "buyer@example.com".to_string(),
        };
        assert!(request.validate().is_ok());

        request.recipient_email = "not-an-address".to_string();
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_deserializes_numbers_and_missing_optionals() {
        let data: InvoiceData = serde_json::from_value(serde_json::json!({
            "invoice_no": "INV-9",
            "date": "2024-05-01",
            "items": [{ "product_name": "Battery", "quantity": 2, "unit_price": 10.5, "total": 21 }],
            "subtotal": 21,
            "total": 21
        }))
        .unwrap();
        assert_eq!(data.items.len(), 1);
        assert!(data.discount.is_none());
        assert!(data.payment_type().is_none());
    }
}

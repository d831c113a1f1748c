//! Invoice PDF builder
//!
//! [`layout::layout_invoice`] places the header, optional bill-to block, the
//! paginated item table, the summary and the footer; [`render::render_pdf`]
//! turns that layout into PDF bytes. The entry points below wrap both for the
//! three delivery paths: save to a file, open for printing, and hand over as
//! an email attachment.

pub mod layout;
pub mod render;

use std::path::{Path, PathBuf};

use serde::Serialize;
use thiserror::Error;

use crate::models::{CompanyInfo, InvoiceData};

pub use layout::{layout_invoice, InvoiceLayout};
pub use render::render_pdf;

pub const PDF_CONTENT_TYPE: &str = "application/pdf";

#[derive(Error, Debug)]
pub enum InvoiceError {
    #[error("PDF rendering failed: {0}")]
    Render(String),

    #[error("Failed to write invoice file: {0}")]
    Io(#[from] std::io::Error),
}

/// How a rendered document should be presented to the user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Disposition {
    /// Download / save
    Attachment,
    /// Open in the viewer so the print dialog can be used
    Inline,
}

impl Disposition {
    pub fn header_value(&self, filename: &str) -> String {
        match self {
            Disposition::Attachment => format!("attachment; filename=\"{}\"", filename),
            Disposition::Inline => format!("inline; filename=\"{}\"", filename),
        }
    }
}

/// PDF bytes plus presentation metadata
#[derive(Debug, Clone)]
pub struct RenderedInvoice {
    pub bytes: Vec<u8>,
    pub filename: String,
    pub disposition: Disposition,
}

/// Attachment handed to an external mail service; nothing is sent here
#[derive(Debug, Clone)]
pub struct EmailAttachment {
    pub bytes: Vec<u8>,
    pub filename: String,
    pub recipient_email: String,
}

/// Build the PDF for an invoice; `None` uses the default letterhead.
pub fn generate_invoice_pdf(
    data: &InvoiceData,
    company: Option<&CompanyInfo>,
) -> Result<Vec<u8>, InvoiceError> {
    let default_company;
    let company = match company {
        Some(c) => c,
        None => {
            default_company = CompanyInfo::default();
            &default_company
        }
    };

    let layout = layout_invoice(data, company);
    tracing::debug!(
        invoice_no = %data.invoice_no,
        pages = layout.pages.len(),
        "Rendering invoice PDF"
    );
    render_pdf(&layout)
}

pub fn download_invoice_pdf(
    data: &InvoiceData,
    company: Option<&CompanyInfo>,
) -> Result<RenderedInvoice, InvoiceError> {
    Ok(RenderedInvoice {
        bytes: generate_invoice_pdf(data, company)?,
        filename: data.file_name(),
        disposition: Disposition::Attachment,
    })
}

/// Write `invoice-<invoice_no>.pdf` into `dir` and return its path
pub fn save_invoice_pdf(
    data: &InvoiceData,
    company: Option<&CompanyInfo>,
    dir: &Path,
) -> Result<PathBuf, InvoiceError> {
    let bytes = generate_invoice_pdf(data, company)?;
    let path = dir.join(data.file_name());
    std::fs::write(&path, bytes)?;
    Ok(path)
}

pub fn print_invoice_pdf(
    data: &InvoiceData,
    company: Option<&CompanyInfo>,
) -> Result<RenderedInvoice, InvoiceError> {
    Ok(RenderedInvoice {
        bytes: generate_invoice_pdf(data, company)?,
        filename: data.file_name(),
        disposition: Disposition::Inline,
    })
}

pub fn email_invoice_pdf(
    data: &InvoiceData,
    recipient_email: &str,
    company: Option<&CompanyInfo>,
) -> Result<EmailAttachment, InvoiceError> {
    Ok(EmailAttachment {
        bytes: generate_invoice_pdf(data, company)?,
        filename: data.file_name(),
        recipient_email: recipient_email.to_string(),
    })
}

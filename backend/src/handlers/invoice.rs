//! Invoice document handlers
//!
//! The client posts the invoice record; the server lays it out and answers
//! with the PDF. Nothing is stored and no email is sent.

use axum::{
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::Serialize;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::extract::ApiJson;
use shared::invoice::{
    download_invoice_pdf, email_invoice_pdf, print_invoice_pdf, RenderedInvoice, PDF_CONTENT_TYPE,
};
use shared::models::{EmailInvoiceRequest, InvoiceRequest};

/// Attachment payload for a mail service
#[derive(Debug, Serialize)]
pub struct EmailAttachmentResponse {
    pub filename: String,
    pub recipient_email: String,
    pub content_type: &'static str,
    pub content_base64: String,
}

pub fn pdf_response(rendered: RenderedInvoice) -> Response {
    (
        [
            (header::CONTENT_TYPE, PDF_CONTENT_TYPE.to_string()),
            (
                header::CONTENT_DISPOSITION,
                rendered.disposition.header_value(&rendered.filename),
            ),
        ],
        rendered.bytes,
    )
        .into_response()
}

/// PDF as a download
pub async fn download_invoice(ApiJson(body): ApiJson<InvoiceRequest>) -> AppResult<Response> {
    let rendered = download_invoice_pdf(&body.invoice, body.company.as_ref())?;
    Ok(pdf_response(rendered))
}

/// PDF served inline so the browser can open its print dialog
pub async fn print_invoice(ApiJson(body): ApiJson<InvoiceRequest>) -> AppResult<Response> {
    let rendered = print_invoice_pdf(&body.invoice, body.company.as_ref())?;
    Ok(pdf_response(rendered))
}

pub async fn email_invoice(
    ApiJson(body): ApiJson<EmailInvoiceRequest>,
) -> AppResult<Json<EmailAttachmentResponse>> {
    body.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let attachment = email_invoice_pdf(&body.invoice, &body.recipient_email, body.company.as_ref())?;
    tracing::info!(
        invoice_no = %body.invoice.invoice_no,
        recipient = %attachment.recipient_email,
        bytes = attachment.bytes.len(),
        "Prepared invoice email attachment"
    );

    Ok(Json(EmailAttachmentResponse {
        filename: attachment.filename,
        recipient_email: attachment.recipient_email,
        content_type: PDF_CONTENT_TYPE,
        content_base64: STANDARD.encode(&attachment.bytes),
    }))
}

//! Reporting handlers for analytics and data export

use axum::{
    extract::State,
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;

use crate::error::AppResult;
use crate::extract::{empty_string_as_none, ApiQuery};
use crate::services::reporting::{trend_months, ReportingService};
use crate::AppState;
use shared::types::ReportFormat;

#[derive(Deserialize)]
pub struct ReportQuery {
    #[serde(default)]
    pub format: ReportFormat,
}

#[derive(Deserialize)]
pub struct ExpiryTrendQuery {
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub months: Option<i64>,
    #[serde(default)]
    pub format: ReportFormat,
}

fn csv_response(filename: &str, csv: String) -> Response {
    (
        [
            (header::CONTENT_TYPE, "text/csv".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", filename),
            ),
        ],
        csv,
    )
        .into_response()
}

/// Get expiry trend report
pub async fn get_expiry_trend(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<ExpiryTrendQuery>,
) -> AppResult<Response> {
    let service = ReportingService::new(state.db.clone());
    let report = service.expiry_trend(trend_months(query.months)).await?;

    match query.format {
        ReportFormat::Csv => {
            let csv = ReportingService::export_to_csv(&report.months)?;
            Ok(csv_response("expiry_trend.csv", csv))
        }
        ReportFormat::Json => Ok(Json(report).into_response()),
    }
}

/// Get manufacturer performance report
pub async fn get_manufacturer_performance(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<ReportQuery>,
) -> AppResult<Response> {
    let service = ReportingService::new(state.db.clone());
    let report = service.manufacturer_performance().await?;

    match query.format {
        ReportFormat::Csv => {
            let csv = ReportingService::export_to_csv(&report.manufacturers)?;
            Ok(csv_response("manufacturer_performance.csv", csv))
        }
        ReportFormat::Json => Ok(Json(report).into_response()),
    }
}

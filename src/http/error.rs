use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;

use crate::service::ReportError;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("No client code provided")]
    MissingClientCode,
    #[error("No active projects found")]
    NotFound { client_code: String },
    #[error("Internal server error")]
    Internal(#[from] anyhow::Error),
}

impl From<ReportError> for AppError {
    fn from(err: ReportError) -> Self {
        match err {
            ReportError::NotFound { client_code } => AppError::NotFound { client_code },
            ReportError::Internal(err) => AppError::Internal(err),
        }
    }
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::MissingClientCode => StatusCode::BAD_REQUEST,
            AppError::NotFound { .. } => StatusCode::NOT_FOUND,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match &self {
            AppError::MissingClientCode => json!({ "error": self.to_string() }),
            AppError::NotFound { client_code } => json!({
                "error": self.to_string(),
                "clientCode": client_code,
            }),
            AppError::Internal(err) => {
                let details = format!("{err:#}");
                tracing::error!(error = %details, "request failed");
                json!({
                    "error": self.to_string(),
                    "details": details,
                })
            }
        };

        (status, Json(body)).into_response()
    }
}

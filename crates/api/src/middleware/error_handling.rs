//! # Error Handling Middleware
//!
//! Maps `ClinicError` values to HTTP status codes and a JSON body of the form
//! `{ "error": "<message>" }`, so every handler reports failures the same way.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use clinic_core::errors::ClinicError;
use serde_json::json;

/// Application error wrapper that provides HTTP status code mapping
///
/// # Example
///
/// ```
/// use axum::Json;
/// use clinic_api::middleware::error_handling::AppError;
/// use clinic_core::errors::ClinicError;
///
/// async fn handler(therapist: Option<String>) -> Result<Json<String>, AppError> {
///     let therapist = therapist
///         .ok_or_else(|| ClinicError::Validation("therapist is required".to_string()))?;
///     Ok(Json(therapist))
/// }
/// # fn main() {}
/// ```
#[derive(Debug)]
pub struct AppError(pub ClinicError);

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match &self.0 {
            ClinicError::NotFound(_) => StatusCode::NOT_FOUND,
            ClinicError::Validation(_) => StatusCode::BAD_REQUEST,
            ClinicError::InvalidArgument(_) => StatusCode::BAD_REQUEST,
            ClinicError::Conflict(_) => StatusCode::CONFLICT,
            ClinicError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ClinicError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        if status.is_server_error() {
            tracing::error!("Request failed: {:?}", self.0);
        }

        let body = Json(json!({ "error": self.0.to_string() }));
        (status, body).into_response()
    }
}

/// Allows `?` on `Result<T, ClinicError>` inside handlers returning `Result<T, AppError>`.
impl From<ClinicError> for AppError {
    fn from(err: ClinicError) -> Self {
        AppError(err)
    }
}

/// Wraps bare `eyre` failures as database errors.
impl From<eyre::Report> for AppError {
    fn from(err: eyre::Report) -> Self {
        AppError(ClinicError::Database(err))
    }
}

pub fn map_error(err: ClinicError) -> Response {
    AppError(err).into_response()
}

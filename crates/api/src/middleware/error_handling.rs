//! # Error Handling Middleware
//!
//! Maps domain errors to HTTP status codes and the uniform JSON error
//! envelope:
//!
//! ```json
//! { "error": { "code": "SLOT_TAKEN", "message": "This slot is already booked" } }
//! ```
//!
//! Server-side failures are logged in full and answered with a generic
//! message.

use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
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
/// async fn handler(found: bool) -> Result<Json<&'static str>, AppError> {
///     if !found {
///         return Err(AppError(ClinicError::NotFound("Slot not found".into())));
///     }
///     Ok(Json("ok"))
/// }
/// # fn main() {}
/// ```
#[derive(Debug)]
pub struct AppError(pub ClinicError);

impl AppError {
    pub fn status(&self) -> StatusCode {
        match &self.0 {
            ClinicError::Validation(_) => StatusCode::BAD_REQUEST,
            ClinicError::Unauthorized(_) | ClinicError::InvalidCredentials => {
                StatusCode::UNAUTHORIZED
            }
            ClinicError::Forbidden(_) => StatusCode::FORBIDDEN,
            ClinicError::NotFound(_) => StatusCode::NOT_FOUND,
            ClinicError::SlotTaken | ClinicError::EmailTaken => StatusCode::CONFLICT,
            ClinicError::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            ClinicError::Config(_) | ClinicError::Database(_) | ClinicError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn message(&self) -> String {
        match &self.0 {
            ClinicError::Validation(message)
            | ClinicError::Unauthorized(message)
            | ClinicError::Forbidden(message)
            | ClinicError::NotFound(message)
            | ClinicError::Config(message) => message.clone(),
            ClinicError::Database(_) | ClinicError::Internal(_) => {
                "Something went wrong".to_string()
            }
            other => other.to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if self.0.is_internal() {
            tracing::error!("Request failed: {:?}", self.0);
        }

        let body = Json(json!({
            "error": {
                "code": self.0.code(),
                "message": self.message(),
            }
        }));

        (status, body).into_response()
    }
}

impl From<ClinicError> for AppError {
    fn from(err: ClinicError) -> Self {
        AppError(err)
    }
}

/// Lets repository results use `?` directly in handlers.
impl From<eyre::Report> for AppError {
    fn from(err: eyre::Report) -> Self {
        AppError(ClinicError::Database(err))
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        tracing::debug!("Rejected JSON body: {}", rejection.body_text());
        AppError(ClinicError::Validation("Invalid input".to_string()))
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        tracing::debug!("Rejected query string: {}", rejection.body_text());
        AppError(ClinicError::Validation("Invalid query".to_string()))
    }
}

/// Maps a ClinicError to an HTTP response
pub fn map_error(err: ClinicError) -> Response {
    AppError(err).into_response()
}

//! Error-to-response mapping.
//!
//! Every handler returns [`ApiResult`]; this module owns the single table
//! translating [`Error`] variants into HTTP statuses and the `{"error": …}`
//! JSON body the dashboard expects.

use crate::errors::Error;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use tracing::error;

/// Wrapper giving [`Error`] an HTTP representation.
#[derive(Debug)]
pub struct ApiError(pub Error);

/// Handler result alias.
pub type ApiResult<T> = std::result::Result<T, ApiError>;

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        Self(err)
    }
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match &self.0 {
            Error::Unauthorized | Error::InvalidCredentials => StatusCode::UNAUTHORIZED,
            Error::MissingFile | Error::NoValidRows | Error::InvalidRequest { .. } => {
                StatusCode::BAD_REQUEST
            }
            Error::ProductNotFound { .. } => StatusCode::NOT_FOUND,
            Error::InsightsRateLimited => StatusCode::TOO_MANY_REQUESTS,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(error = %self.0, "request failed");
        }
        (status, Json(json!({ "error": self.0.to_string() }))).into_response()
    }
}

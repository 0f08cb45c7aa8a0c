use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use quotes_core::errors::Error as CoreError;
use thiserror::Error;

use crate::models::Envelope;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    /// Maps a service error to a response.
    ///
    /// Validation failures keep their message. Everything that is neither a
    /// validation failure nor a missing record is logged here and reported
    /// with the generic `failure` message.
    pub fn from_service(err: CoreError, not_found: &str, failure: &str) -> Self {
        if err.is_validation() {
            return ApiError::BadRequest(err.to_string());
        }
        if err.is_not_found() {
            return ApiError::NotFound(not_found.to_string());
        }
        tracing::error!(error = %err, "{}", failure);
        ApiError::Internal(failure.to_string())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = Json(Envelope::<()>::error(self.to_string()));
        (status, body).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

//! API error type and [`axum::response::IntoResponse`] implementation.

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use crate::validation::ValidationErrors;

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  /// The `{id}` path segment is not a 64-bit integer.
  #[error("invalid task ID")]
  InvalidId,

  #[error("{0}")]
  BadRequest(String),

  #[error("validation failed: {0}")]
  Validation(ValidationErrors),

  #[error("task not found")]
  NotFound,

  #[error("{0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl From<todo_core::Error> for ApiError {
  fn from(err: todo_core::Error) -> Self {
    match err {
      todo_core::Error::TaskNotFound(_) => ApiError::NotFound,
      todo_core::Error::Invalid(m) => ApiError::BadRequest(m),
      todo_core::Error::Store(e) => ApiError::Store(e),
    }
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let (status, message) = match self {
      ApiError::Validation(errors) => {
        return (StatusCode::BAD_REQUEST, Json(errors.to_map())).into_response();
      }
      ApiError::InvalidId => (StatusCode::BAD_REQUEST, "invalid task ID".to_string()),
      ApiError::BadRequest(m) => (StatusCode::BAD_REQUEST, m),
      ApiError::NotFound => (StatusCode::NOT_FOUND, "task not found".to_string()),
      ApiError::Store(e) => {
        tracing::error!(error = %e, "request failed");
        (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
      }
    };
    (status, Json(json!({ "error": message }))).into_response()
  }
}

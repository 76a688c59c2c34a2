//! API error type and [`axum::response::IntoResponse`] implementation.

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error("not found: {0}")]
  NotFound(String),

  #[error("bad request: {0}")]
  BadRequest(String),

  #[error("conflict: {0}")]
  Conflict(String),

  #[error("store error: {0}")]
  Store(String),
}

impl ApiError {
  /// Map a store failure onto the HTTP surface: missing records are 404,
  /// uniqueness violations 409, rejected input 400, everything else 500.
  pub fn from_store<E: Into<simledger_core::Error>>(err: E) -> Self {
    use simledger_core::Error as CoreError;
    let err = err.into();
    match err {
      CoreError::SimNotFound(_)
      | CoreError::ProjectNotFound(_)
      | CoreError::InvoiceNotFound(_) => Self::NotFound(err.to_string()),
      CoreError::DuplicateNumber(_) | CoreError::DuplicateCostPeriod { .. } => {
        Self::Conflict(err.to_string())
      }
      CoreError::InvalidMonth(_) | CoreError::NegativeAmount(_) => {
        Self::BadRequest(err.to_string())
      }
      CoreError::Storage(_) => Self::Store(err.to_string()),
    }
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let (status, message) = match &self {
      ApiError::NotFound(m) => (StatusCode::NOT_FOUND, m.clone()),
      ApiError::BadRequest(m) => (StatusCode::BAD_REQUEST, m.clone()),
      ApiError::Conflict(m) => (StatusCode::CONFLICT, m.clone()),
      ApiError::Store(m) => (StatusCode::INTERNAL_SERVER_ERROR, m.clone()),
    };
    (status, Json(json!({ "error": message }))).into_response()
  }
}

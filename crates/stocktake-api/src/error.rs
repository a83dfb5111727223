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

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// Map the core taxonomy onto HTTP status classes. Named conditions keep
/// their identity; opaque store failures become 500s.
impl From<stocktake_core::Error> for ApiError {
  fn from(e: stocktake_core::Error) -> Self {
    match e {
      stocktake_core::Error::AssetNotFound(_)
      | stocktake_core::Error::RelationshipNotFound(_) => {
        ApiError::NotFound(e.to_string())
      }
      stocktake_core::Error::Validation(m) => ApiError::BadRequest(m),
      stocktake_core::Error::Store(e) => ApiError::Store(e),
    }
  }
}

/// Fold a backend error through the core taxonomy. Handlers use this for
/// every store call.
pub fn store_err<E: Into<stocktake_core::Error>>(e: E) -> ApiError {
  ApiError::from(e.into())
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let (status, message) = match &self {
      ApiError::NotFound(m) => (StatusCode::NOT_FOUND, m.clone()),
      ApiError::BadRequest(m) => (StatusCode::BAD_REQUEST, m.clone()),
      ApiError::Store(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
    };
    (status, Json(json!({ "error": message }))).into_response()
  }
}

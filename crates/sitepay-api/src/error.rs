//! API error type and [`axum::response::IntoResponse`] implementation.

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use serde_json::json;
use sitepay_core::store::StoreError;
use thiserror::Error;
use validator::{Validate, ValidationErrors};

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

impl ApiError {
  /// Wrap a backend failure for a call where a foreign-key rejection means
  /// the caller did something wrong (`fk_message` becomes a 400 with that
  /// message); anything else stays a 500.
  pub fn from_store<E>(fk_message: &str) -> impl FnOnce(E) -> Self + '_
  where
    E: StoreError + Send + Sync + 'static,
  {
    move |e| {
      if e.is_foreign_key_violation() {
        ApiError::BadRequest(fk_message.to_owned())
      } else {
        ApiError::Store(Box::new(e))
      }
    }
  }

  /// Wrap a backend failure for a call where no foreign-key rejection is
  /// possible.
  pub fn store<E>(e: E) -> Self
  where
    E: std::error::Error + Send + Sync + 'static,
  {
    ApiError::Store(Box::new(e))
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let (status, message) = match &self {
      ApiError::NotFound(m) => (StatusCode::NOT_FOUND, m.clone()),
      ApiError::BadRequest(m) => (StatusCode::BAD_REQUEST, m.clone()),
      ApiError::Store(e) => {
        // The wire gets a generic message; the detail goes to the log.
        tracing::error!(error = %e, "store failure");
        (
          StatusCode::INTERNAL_SERVER_ERROR,
          "internal error".to_owned(),
        )
      }
    };
    (status, Json(json!({ "message": message }))).into_response()
  }
}

// ─── Body validation ─────────────────────────────────────────────────────────

/// Check a deserialised request body, turning the first violation into a 400
/// with its field-level message.
pub fn check(body: &impl Validate) -> Result<(), ApiError> {
  body
    .validate()
    .map_err(|e| ApiError::BadRequest(first_message(&e)))
}

fn first_message(errors: &ValidationErrors) -> String {
  errors
    .field_errors()
    .into_iter()
    .next()
    .and_then(|(field, errs)| {
      errs.first().map(|e| match &e.message {
        Some(message) => message.to_string(),
        None => format!("invalid value for `{field}`"),
      })
    })
    .unwrap_or_else(|| "validation error".to_owned())
}

//! Error types for `sitepay-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("invalid year-month: {0:?} (expected YYYY-MM)")]
  InvalidMonth(String),

  #[error("unknown urgency discriminant: {0:?}")]
  UnknownUrgency(String),

  #[error("unknown payment method discriminant: {0:?}")]
  UnknownPaymentMethod(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

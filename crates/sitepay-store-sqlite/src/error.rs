//! Error type for `sitepay-store-sqlite`.

use rusqlite::ffi;
use sitepay_core::store::StoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("core error: {0}")]
  Core(#[from] sitepay_core::Error),

  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("date parse error: {0}")]
  DateParse(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

impl StoreError for Error {
  fn is_foreign_key_violation(&self) -> bool {
    // SQLITE_CONSTRAINT_FOREIGNKEY covers both child inserts with a missing
    // parent and parent deletes with surviving children.
    matches!(
      self,
      Error::Database(tokio_rusqlite::Error::Rusqlite(
        rusqlite::Error::SqliteFailure(code, _),
      )) if code.extended_code == ffi::SQLITE_CONSTRAINT_FOREIGNKEY
    )
  }
}

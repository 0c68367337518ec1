//! Supplier ("fournisseur"): a vendor providing goods or services.

use serde::{Deserialize, Serialize};
use validator::Validate;

/// A persisted supplier row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Supplier {
  pub id:       i64,
  pub name:     String,
  /// Free-text category, e.g. "Matériaux" or "Transport".
  pub category: String,
}

/// Payload for creating or updating a supplier.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct NewSupplier {
  #[validate(length(min = 1, message = "supplier name is required"))]
  pub name:     String,
  #[validate(length(min = 1, message = "supplier category is required"))]
  pub category: String,
}

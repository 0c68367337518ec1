//! Request ("besoin"): a needed purchase or service tied to a worksite and
//! a supplier.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::{payment::Payment, supplier::Supplier, worksite::Worksite};

/// Urgency classification of a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Urgency {
  Urgent,
  Normal,
}

impl Urgency {
  pub fn as_str(self) -> &'static str {
    match self {
      Urgency::Urgent => "URGENT",
      Urgency::Normal => "NORMAL",
    }
  }
}

/// A persisted request row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Request {
  pub id:          i64,
  pub worksite_id: i64,
  pub supplier_id: i64,
  pub description: String,
  /// Requested amount; always strictly positive.
  pub amount:      f64,
  pub urgency:     Urgency,
  pub comment:     Option<String>,
  pub date:        NaiveDate,
}

/// Payload for creating or updating a request.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct NewRequest {
  #[validate(range(min = 1, message = "worksite id must be positive"))]
  pub worksite_id: i64,
  #[validate(range(min = 1, message = "supplier id must be positive"))]
  pub supplier_id: i64,
  #[validate(length(min = 1, message = "description is required"))]
  pub description: String,
  #[validate(range(exclusive_min = 0.0, message = "amount must be positive"))]
  pub amount:      f64,
  pub urgency:     Urgency,
  pub comment:     Option<String>,
  pub date:        NaiveDate,
}

/// A request joined with its worksite, supplier and payments, the read model
/// consumed by the dashboard aggregation and the detailed endpoints.
#[derive(Debug, Clone, Serialize)]
pub struct RequestDetails {
  #[serde(flatten)]
  pub request:  Request,
  pub worksite: Worksite,
  pub supplier: Supplier,
  pub payments: Vec<Payment>,
}

impl RequestDetails {
  /// Sum of all payments applied against this request.
  pub fn paid(&self) -> f64 {
    self.payments.iter().map(|p| p.amount).sum()
  }

  /// Requested amount minus payments. Negative on overpayment; overpayment
  /// is representable and never clamped.
  pub fn balance(&self) -> f64 {
    self.request.amount - self.paid()
  }
}

//! Payment ("paiement"): a settlement applied against a request.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::{request::Request, worksite::Worksite};

/// How a payment was made.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PaymentMethod {
  Transfer,
  Cheque,
  Cash,
}

impl PaymentMethod {
  pub fn as_str(self) -> &'static str {
    match self {
      PaymentMethod::Transfer => "TRANSFER",
      PaymentMethod::Cheque => "CHEQUE",
      PaymentMethod::Cash => "CASH",
    }
  }
}

/// A persisted payment row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Payment {
  pub id:          i64,
  pub request_id:  i64,
  /// Paid amount; always strictly positive. Nothing stops the payments on a
  /// request from exceeding its requested amount.
  pub amount:      f64,
  pub date:        NaiveDate,
  /// Free-text "month concerned" label, e.g. "Juillet".
  pub month_label: String,
  pub method:      PaymentMethod,
}

/// Payload for creating or updating a payment.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct NewPayment {
  #[validate(range(min = 1, message = "request id must be positive"))]
  pub request_id:  i64,
  #[validate(range(exclusive_min = 0.0, message = "amount must be positive"))]
  pub amount:      f64,
  pub date:        NaiveDate,
  #[validate(length(min = 1, message = "month label is required"))]
  pub month_label: String,
  pub method:      PaymentMethod,
}

/// A payment joined with its request and that request's worksite.
#[derive(Debug, Clone, Serialize)]
pub struct PaymentDetails {
  #[serde(flatten)]
  pub payment:  Payment,
  pub request:  Request,
  pub worksite: Worksite,
}

//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Dates are stored as ISO 8601 `YYYY-MM-DD` strings. Urgency and payment
//! method are stored as their uppercase wire tags.

use chrono::NaiveDate;
use sitepay_core::{
  payment::{Payment, PaymentDetails, PaymentMethod},
  request::{Request, RequestDetails, Urgency},
  supplier::Supplier,
  worksite::Worksite,
};

use crate::{Error, Result};

// ─── NaiveDate ───────────────────────────────────────────────────────────────

pub fn encode_date(d: NaiveDate) -> String {
  d.format("%Y-%m-%d").to_string()
}

pub fn decode_date(s: &str) -> Result<NaiveDate> {
  NaiveDate::parse_from_str(s, "%Y-%m-%d")
    .map_err(|e| Error::DateParse(format!("{s:?}: {e}")))
}

// ─── Urgency ─────────────────────────────────────────────────────────────────

pub fn decode_urgency(s: &str) -> Result<Urgency> {
  match s {
    "URGENT" => Ok(Urgency::Urgent),
    "NORMAL" => Ok(Urgency::Normal),
    other => Err(sitepay_core::Error::UnknownUrgency(other.to_owned()).into()),
  }
}

// ─── PaymentMethod ───────────────────────────────────────────────────────────

pub fn decode_method(s: &str) -> Result<PaymentMethod> {
  match s {
    "TRANSFER" => Ok(PaymentMethod::Transfer),
    "CHEQUE" => Ok(PaymentMethod::Cheque),
    "CASH" => Ok(PaymentMethod::Cash),
    other => {
      Err(sitepay_core::Error::UnknownPaymentMethod(other.to_owned()).into())
    }
  }
}

// ─── Raw row types ───────────────────────────────────────────────────────────
//
// Rows come out of rusqlite as plain strings/numbers inside the connection
// closure; decoding into domain types happens afterwards, where `crate::Error`
// is available.

pub struct RawRequest {
  pub id:          i64,
  pub worksite_id: i64,
  pub supplier_id: i64,
  pub description: String,
  pub amount:      f64,
  pub urgency:     String,
  pub comment:     Option<String>,
  pub date:        String,
}

impl RawRequest {
  pub fn into_request(self) -> Result<Request> {
    Ok(Request {
      id:          self.id,
      worksite_id: self.worksite_id,
      supplier_id: self.supplier_id,
      description: self.description,
      amount:      self.amount,
      urgency:     decode_urgency(&self.urgency)?,
      comment:     self.comment,
      date:        decode_date(&self.date)?,
    })
  }
}

/// A request row joined with its worksite and supplier columns.
pub struct RawRequestJoined {
  pub request:           RawRequest,
  pub worksite_name:     String,
  pub worksite_manager:  String,
  pub worksite_location: String,
  pub supplier_name:     String,
  pub supplier_category: String,
}

impl RawRequestJoined {
  /// Build a [`RequestDetails`] with an empty payment list; the caller
  /// attaches payments from a separate query.
  pub fn into_details(self) -> Result<RequestDetails> {
    let worksite = Worksite {
      id:       self.request.worksite_id,
      name:     self.worksite_name,
      manager:  self.worksite_manager,
      location: self.worksite_location,
    };
    let supplier = Supplier {
      id:       self.request.supplier_id,
      name:     self.supplier_name,
      category: self.supplier_category,
    };
    Ok(RequestDetails {
      request: self.request.into_request()?,
      worksite,
      supplier,
      payments: Vec::new(),
    })
  }
}

pub struct RawPayment {
  pub id:          i64,
  pub request_id:  i64,
  pub amount:      f64,
  pub date:        String,
  pub month_label: String,
  pub method:      String,
}

impl RawPayment {
  pub fn into_payment(self) -> Result<Payment> {
    Ok(Payment {
      id:          self.id,
      request_id:  self.request_id,
      amount:      self.amount,
      date:        decode_date(&self.date)?,
      month_label: self.month_label,
      method:      decode_method(&self.method)?,
    })
  }
}

/// A payment row joined with its request and that request's worksite.
pub struct RawPaymentJoined {
  pub payment:           RawPayment,
  pub request:           RawRequest,
  pub worksite_name:     String,
  pub worksite_manager:  String,
  pub worksite_location: String,
}

impl RawPaymentJoined {
  pub fn into_details(self) -> Result<PaymentDetails> {
    let worksite = Worksite {
      id:       self.request.worksite_id,
      name:     self.worksite_name,
      manager:  self.worksite_manager,
      location: self.worksite_location,
    };
    Ok(PaymentDetails {
      payment: self.payment.into_payment()?,
      request: self.request.into_request()?,
      worksite,
    })
  }
}

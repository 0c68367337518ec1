//! Worksite ("chantier"): a construction site being managed.

use serde::{Deserialize, Serialize};
use validator::Validate;

/// A persisted worksite row. Identifiers are assigned by the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Worksite {
  pub id:       i64,
  pub name:     String,
  pub manager:  String,
  pub location: String,
}

/// Payload for creating or updating a worksite.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct NewWorksite {
  #[validate(length(min = 1, message = "worksite name is required"))]
  pub name:     String,
  #[validate(length(min = 1, message = "worksite manager is required"))]
  pub manager:  String,
  #[validate(length(min = 1, message = "worksite location is required"))]
  pub location: String,
}

/// A worksite together with its requests, as returned by the detailed read.
#[derive(Debug, Clone, Serialize)]
pub struct WorksiteDetails {
  #[serde(flatten)]
  pub worksite: Worksite,
  pub requests: Vec<crate::request::RequestDetails>,
}

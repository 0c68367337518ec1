//! Handler for `GET /dashboard`.
//!
//! Accepts optional filter query parameters (`worksite_id`, `supplier_id`,
//! `urgency`, `month`), selects matching requests with the core filter
//! evaluator and reduces them with the aggregation engine. Entity counts and
//! the recent lists are always unfiltered, for global context.

use std::{collections::BTreeMap, sync::Arc};

use axum::{
  Json,
  extract::{Query, State},
};
use serde::{Deserialize, Serialize};
use sitepay_core::{
  dashboard::{DashboardStats, UrgentRequest},
  filter::RequestFilter,
  payment::PaymentDetails,
  request::Urgency,
  store::ProcurementStore,
  worksite::Worksite,
};

use crate::error::ApiError;

/// How many recent payments and worksites the dashboard shows.
const RECENT_LIMIT: u32 = 5;

// ─── Query parameters ────────────────────────────────────────────────────────

/// Raw query strings, parsed leniently: a malformed value means "criterion
/// absent", never a 400. This mirrors the behavior the dashboard always had;
/// a typo in a hand-edited URL degrades to the unfiltered view.
#[derive(Debug, Default, Deserialize)]
pub struct FilterParams {
  pub worksite_id: Option<String>,
  pub supplier_id: Option<String>,
  pub urgency:     Option<String>,
  pub month:       Option<String>,
}

impl FilterParams {
  fn into_filter(self) -> RequestFilter {
    RequestFilter {
      worksite_id: self.worksite_id.and_then(|s| s.parse().ok()),
      supplier_id: self.supplier_id.and_then(|s| s.parse().ok()),
      urgency:     self.urgency.as_deref().and_then(|s| match s {
        "URGENT" => Some(Urgency::Urgent),
        "NORMAL" => Some(Urgency::Normal),
        _ => None,
      }),
      month:       self.month.and_then(|s| s.parse().ok()),
    }
  }
}

// ─── Response shape ──────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct ChartData {
  pub requested_by_worksite: BTreeMap<String, f64>,
  pub paid_by_method:        BTreeMap<String, f64>,
  pub paid_by_month:         BTreeMap<String, f64>,
}

#[derive(Debug, Serialize)]
pub struct DashboardResponse {
  pub worksite_count:    u64,
  pub supplier_count:    u64,
  pub request_count:     u64,
  pub payment_count:     u64,
  pub total_requested:   f64,
  pub total_paid:        f64,
  pub total_outstanding: f64,
  pub top_urgent:        Vec<UrgentRequest>,
  pub recent_payments:   Vec<PaymentDetails>,
  pub recent_worksites:  Vec<Worksite>,
  pub charts:            ChartData,
}

// ─── Handler ─────────────────────────────────────────────────────────────────

/// `GET /dashboard[?worksite_id=&supplier_id=&urgency=&month=YYYY-MM]`
pub async fn handler<S>(
  State(store): State<Arc<S>>,
  Query(params): Query<FilterParams>,
) -> Result<Json<DashboardResponse>, ApiError>
where
  S: ProcurementStore,
{
  let filter = params.into_filter();

  let counts = store.counts().await.map_err(ApiError::store)?;

  let mut requests = store
    .list_requests_detailed()
    .await
    .map_err(ApiError::store)?;
  requests.retain(|r| filter.matches(r));

  let stats = DashboardStats::compute(&requests);

  let recent_payments = store
    .recent_payments(RECENT_LIMIT)
    .await
    .map_err(ApiError::store)?;
  let recent_worksites = store
    .recent_worksites(RECENT_LIMIT)
    .await
    .map_err(ApiError::store)?;

  Ok(Json(DashboardResponse {
    worksite_count:    counts.worksites,
    supplier_count:    counts.suppliers,
    request_count:     counts.requests,
    payment_count:     counts.payments,
    total_requested:   stats.total_requested,
    total_paid:        stats.total_paid,
    total_outstanding: stats.total_outstanding,
    top_urgent:        stats.top_urgent,
    recent_payments,
    recent_worksites,
    charts:            ChartData {
      requested_by_worksite: stats.requested_by_worksite,
      paid_by_method:        stats.paid_by_method,
      paid_by_month:         stats.paid_by_month,
    },
  }))
}

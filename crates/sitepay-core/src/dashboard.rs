//! The dashboard aggregation engine.
//!
//! A pure reduction over a filtered collection of [`RequestDetails`]: totals,
//! grouped sums and the top-5 urgent requests by outstanding balance. An
//! empty input reduces to zero totals and empty groupings.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Serialize;

use crate::{
  filter::YearMonth,
  request::{RequestDetails, Urgency},
};

/// Fallback group label for requests whose worksite carries no usable name.
const UNKNOWN_GROUP: &str = "Unknown";

/// One row of the top-urgent ranking.
#[derive(Debug, Clone, Serialize)]
pub struct UrgentRequest {
  pub id:          i64,
  pub worksite:    String,
  pub supplier:    String,
  pub description: String,
  pub requested:   f64,
  pub paid:        f64,
  pub balance:     f64,
  pub urgency:     Urgency,
  pub date:        NaiveDate,
  pub comment:     Option<String>,
}

/// Aggregated dashboard figures over one filtered request collection.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardStats {
  pub total_requested:       f64,
  pub total_paid:            f64,
  pub total_outstanding:     f64,
  pub top_urgent:            Vec<UrgentRequest>,
  /// Worksite display name → sum of requested amounts.
  pub requested_by_worksite: BTreeMap<String, f64>,
  /// Payment method tag → sum of paid amounts, over payments of the
  /// filtered requests only.
  pub paid_by_method:        BTreeMap<String, f64>,
  /// `YYYY-MM` of each payment date → sum of paid amounts.
  pub paid_by_month:         BTreeMap<String, f64>,
}

impl DashboardStats {
  /// Reduce `requests` (already filtered) into dashboard figures.
  pub fn compute(requests: &[RequestDetails]) -> Self {
    let total_requested: f64 = requests.iter().map(|r| r.request.amount).sum();
    let total_paid: f64 = requests.iter().map(RequestDetails::paid).sum();

    // Ranked subset: URGENT only, descending by balance. The sort is stable,
    // so requests with equal balances keep their input order.
    let mut top_urgent: Vec<UrgentRequest> = requests
      .iter()
      .filter(|r| r.request.urgency == Urgency::Urgent)
      .map(|r| UrgentRequest {
        id:          r.request.id,
        worksite:    r.worksite.name.clone(),
        supplier:    r.supplier.name.clone(),
        description: r.request.description.clone(),
        requested:   r.request.amount,
        paid:        r.paid(),
        balance:     r.balance(),
        urgency:     r.request.urgency,
        date:        r.request.date,
        comment:     r.request.comment.clone(),
      })
      .collect();
    top_urgent.sort_by(|a, b| b.balance.total_cmp(&a.balance));
    top_urgent.truncate(5);

    let mut requested_by_worksite = BTreeMap::new();
    for r in requests {
      let name = match r.worksite.name.as_str() {
        "" => UNKNOWN_GROUP,
        name => name,
      };
      *requested_by_worksite.entry(name.to_owned()).or_insert(0.0) +=
        r.request.amount;
    }

    let mut paid_by_method = BTreeMap::new();
    let mut paid_by_month = BTreeMap::new();
    for p in requests.iter().flat_map(|r| &r.payments) {
      *paid_by_method
        .entry(p.method.as_str().to_owned())
        .or_insert(0.0) += p.amount;
      *paid_by_month
        .entry(YearMonth::of(p.date).to_string())
        .or_insert(0.0) += p.amount;
    }

    Self {
      total_requested,
      total_paid,
      total_outstanding: total_requested - total_paid,
      top_urgent,
      requested_by_worksite,
      paid_by_method,
      paid_by_month,
    }
  }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use super::*;
  use crate::{
    payment::{Payment, PaymentMethod},
    request::Request,
    supplier::Supplier,
    worksite::Worksite,
  };

  fn request(
    id: i64,
    worksite: &str,
    amount: f64,
    urgency: Urgency,
    payments: &[f64],
  ) -> RequestDetails {
    RequestDetails {
      request:  Request {
        id,
        worksite_id: 1,
        supplier_id: 1,
        description: format!("request {id}"),
        amount,
        urgency,
        comment: None,
        date: "2024-07-01".parse().unwrap(),
      },
      worksite: Worksite {
        id:       1,
        name:     worksite.into(),
        manager:  "Jean Dupont".into(),
        location: "Casablanca".into(),
      },
      supplier: Supplier {
        id:       1,
        name:     "Fournisseur Alpha".into(),
        category: "Matériaux".into(),
      },
      payments: payments
        .iter()
        .enumerate()
        .map(|(i, &amount)| Payment {
          id:          (id * 100) + i as i64,
          request_id:  id,
          amount,
          date:        "2024-07-05".parse().unwrap(),
          month_label: "Juillet".into(),
          method:      PaymentMethod::Transfer,
        })
        .collect(),
    }
  }

  #[test]
  fn empty_input_reduces_to_zeros() {
    let stats = DashboardStats::compute(&[]);
    assert_eq!(stats.total_requested, 0.0);
    assert_eq!(stats.total_paid, 0.0);
    assert_eq!(stats.total_outstanding, 0.0);
    assert!(stats.top_urgent.is_empty());
    assert!(stats.requested_by_worksite.is_empty());
    assert!(stats.paid_by_method.is_empty());
    assert!(stats.paid_by_month.is_empty());
  }

  #[test]
  fn totals_and_top_urgent() {
    // 5000 URGENT with 2000+1000 paid, 8000 NORMAL with 3000 paid.
    let requests = vec![
      request(1, "Chantier A", 5000.0, Urgency::Urgent, &[2000.0, 1000.0]),
      request(2, "Chantier B", 8000.0, Urgency::Normal, &[3000.0]),
    ];

    let stats = DashboardStats::compute(&requests);
    assert_eq!(stats.total_requested, 13000.0);
    assert_eq!(stats.total_paid, 6000.0);
    assert_eq!(stats.total_outstanding, 7000.0);

    assert_eq!(stats.top_urgent.len(), 1);
    assert_eq!(stats.top_urgent[0].id, 1);
    assert_eq!(stats.top_urgent[0].balance, 2000.0);
    assert_eq!(stats.top_urgent[0].paid, 3000.0);
  }

  #[test]
  fn outstanding_identity_holds() {
    let requests = vec![
      request(1, "A", 5000.0, Urgency::Urgent, &[2500.0]),
      request(2, "B", 1200.0, Urgency::Normal, &[]),
      request(3, "C", 900.0, Urgency::Normal, &[900.0, 450.0]), // overpaid
    ];
    let stats = DashboardStats::compute(&requests);
    assert_eq!(
      stats.total_outstanding,
      stats.total_requested - stats.total_paid
    );
  }

  #[test]
  fn zero_payment_request_contributes_nothing_to_paid() {
    let requests = vec![request(1, "A", 1500.0, Urgency::Urgent, &[])];
    let stats = DashboardStats::compute(&requests);
    assert_eq!(stats.total_paid, 0.0);
    assert_eq!(stats.top_urgent[0].balance, 1500.0);
  }

  #[test]
  fn top_urgent_excludes_normal_and_caps_at_five() {
    let mut requests: Vec<_> = (1..=7)
      .map(|i| request(i, "A", 1000.0 * i as f64, Urgency::Urgent, &[]))
      .collect();
    requests.push(request(8, "A", 99999.0, Urgency::Normal, &[]));

    let stats = DashboardStats::compute(&requests);
    assert_eq!(stats.top_urgent.len(), 5);
    assert!(stats.top_urgent.iter().all(|u| u.urgency == Urgency::Urgent));

    // Descending by balance: 7000, 6000, 5000, 4000, 3000.
    let balances: Vec<f64> = stats.top_urgent.iter().map(|u| u.balance).collect();
    assert_eq!(balances, vec![7000.0, 6000.0, 5000.0, 4000.0, 3000.0]);
  }

  #[test]
  fn equal_balances_keep_input_order() {
    let requests = vec![
      request(10, "A", 2000.0, Urgency::Urgent, &[]),
      request(11, "A", 2000.0, Urgency::Urgent, &[]),
      request(12, "A", 2000.0, Urgency::Urgent, &[]),
    ];
    let stats = DashboardStats::compute(&requests);
    let ids: Vec<i64> = stats.top_urgent.iter().map(|u| u.id).collect();
    assert_eq!(ids, vec![10, 11, 12]);
  }

  #[test]
  fn worksite_groups_sum_to_total_requested() {
    let requests = vec![
      request(1, "Chantier A", 5000.0, Urgency::Urgent, &[]),
      request(2, "Chantier B", 8000.0, Urgency::Normal, &[]),
      request(3, "Chantier A", 7000.0, Urgency::Normal, &[]),
    ];
    let stats = DashboardStats::compute(&requests);

    assert_eq!(stats.requested_by_worksite["Chantier A"], 12000.0);
    assert_eq!(stats.requested_by_worksite["Chantier B"], 8000.0);
    assert_eq!(
      stats.requested_by_worksite.values().sum::<f64>(),
      stats.total_requested
    );
  }

  #[test]
  fn nameless_worksite_groups_under_unknown() {
    let requests = vec![request(1, "", 500.0, Urgency::Normal, &[])];
    let stats = DashboardStats::compute(&requests);
    assert_eq!(stats.requested_by_worksite["Unknown"], 500.0);
  }

  #[test]
  fn payments_group_by_method_and_month() {
    let mut a = request(1, "A", 5000.0, Urgency::Normal, &[2000.0]);
    a.payments[0].method = PaymentMethod::Cheque;
    a.payments[0].date = "2024-06-20".parse().unwrap();

    let b = request(2, "B", 8000.0, Urgency::Normal, &[3000.0, 1000.0]);

    let stats = DashboardStats::compute(&[a, b]);
    assert_eq!(stats.paid_by_method["CHEQUE"], 2000.0);
    assert_eq!(stats.paid_by_method["TRANSFER"], 4000.0);
    assert_eq!(stats.paid_by_month["2024-06"], 2000.0);
    assert_eq!(stats.paid_by_month["2024-07"], 4000.0);
  }
}

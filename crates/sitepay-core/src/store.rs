//! The `ProcurementStore` trait and supporting types.
//!
//! The trait is implemented by storage backends (e.g.
//! `sitepay-store-sqlite`). Higher layers (`sitepay-api`, `sitepay-server`)
//! depend on this abstraction, not on any concrete backend.

use std::future::Future;

use serde::Serialize;

use crate::{
  payment::{NewPayment, Payment, PaymentDetails},
  request::{NewRequest, Request, RequestDetails},
  supplier::{NewSupplier, Supplier},
  worksite::{NewWorksite, Worksite, WorksiteDetails},
};

// ─── Error classification ────────────────────────────────────────────────────

/// Implemented by backend error types so callers generic over the backend can
/// translate failures without naming it.
pub trait StoreError: std::error::Error {
  /// True when the failure was the database rejecting a write because of a
  /// foreign-key constraint: deleting a parent with children, or inserting a
  /// child whose parent does not exist.
  fn is_foreign_key_violation(&self) -> bool;
}

// ─── Counts ──────────────────────────────────────────────────────────────────

/// Unfiltered per-entity row counts, shown on the dashboard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct EntityCounts {
  pub worksites: u64,
  pub suppliers: u64,
  pub requests:  u64,
  pub payments:  u64,
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over a procurement store backend.
///
/// Reads of a missing identifier return `Ok(None)`; updates and deletes of a
/// missing identifier return `Ok(false)`. Writes that the database rejects
/// for referential-integrity reasons fail with an error whose
/// [`StoreError::is_foreign_key_violation`] is true.
///
/// All methods return `Send` futures so the trait can be used in
/// multi-threaded async runtimes (e.g. tokio with `axum`).
pub trait ProcurementStore: Send + Sync {
  type Error: StoreError + Send + Sync + 'static;

  // ── Worksites ─────────────────────────────────────────────────────────

  fn add_worksite(
    &self,
    input: NewWorksite,
  ) -> impl Future<Output = Result<Worksite, Self::Error>> + Send + '_;

  fn get_worksite(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<Option<Worksite>, Self::Error>> + Send + '_;

  /// A worksite with its requests, each carrying supplier and payments.
  fn get_worksite_details(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<Option<WorksiteDetails>, Self::Error>> + Send + '_;

  fn list_worksites(
    &self,
  ) -> impl Future<Output = Result<Vec<Worksite>, Self::Error>> + Send + '_;

  fn update_worksite(
    &self,
    id: i64,
    input: NewWorksite,
  ) -> impl Future<Output = Result<Option<Worksite>, Self::Error>> + Send + '_;

  /// Returns `false` if the worksite does not exist. Fails with a
  /// foreign-key violation while any request references it.
  fn delete_worksite(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  // ── Suppliers ─────────────────────────────────────────────────────────

  fn add_supplier(
    &self,
    input: NewSupplier,
  ) -> impl Future<Output = Result<Supplier, Self::Error>> + Send + '_;

  fn get_supplier(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<Option<Supplier>, Self::Error>> + Send + '_;

  fn list_suppliers(
    &self,
  ) -> impl Future<Output = Result<Vec<Supplier>, Self::Error>> + Send + '_;

  fn update_supplier(
    &self,
    id: i64,
    input: NewSupplier,
  ) -> impl Future<Output = Result<Option<Supplier>, Self::Error>> + Send + '_;

  fn delete_supplier(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  // ── Requests ──────────────────────────────────────────────────────────

  /// Fails with a foreign-key violation if the referenced worksite or
  /// supplier does not exist.
  fn add_request(
    &self,
    input: NewRequest,
  ) -> impl Future<Output = Result<Request, Self::Error>> + Send + '_;

  fn get_request_details(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<Option<RequestDetails>, Self::Error>> + Send + '_;

  /// All requests with worksite, supplier and payments eagerly joined, the
  /// dashboard's input collection. Filtering happens in the caller via
  /// [`RequestFilter`](crate::filter::RequestFilter).
  fn list_requests_detailed(
    &self,
  ) -> impl Future<Output = Result<Vec<RequestDetails>, Self::Error>> + Send + '_;

  fn update_request(
    &self,
    id: i64,
    input: NewRequest,
  ) -> impl Future<Output = Result<Option<Request>, Self::Error>> + Send + '_;

  fn delete_request(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  // ── Payments ──────────────────────────────────────────────────────────

  /// Fails with a foreign-key violation if the referenced request does not
  /// exist.
  fn add_payment(
    &self,
    input: NewPayment,
  ) -> impl Future<Output = Result<Payment, Self::Error>> + Send + '_;

  fn get_payment_details(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<Option<PaymentDetails>, Self::Error>> + Send + '_;

  fn list_payments_detailed(
    &self,
  ) -> impl Future<Output = Result<Vec<PaymentDetails>, Self::Error>> + Send + '_;

  fn update_payment(
    &self,
    id: i64,
    input: NewPayment,
  ) -> impl Future<Output = Result<Option<Payment>, Self::Error>> + Send + '_;

  fn delete_payment(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  // ── Dashboard reads ───────────────────────────────────────────────────

  fn counts(
    &self,
  ) -> impl Future<Output = Result<EntityCounts, Self::Error>> + Send + '_;

  /// The most recent `limit` payments by payment date, newest first.
  fn recent_payments(
    &self,
    limit: u32,
  ) -> impl Future<Output = Result<Vec<PaymentDetails>, Self::Error>> + Send + '_;

  /// The most recently created `limit` worksites, newest first.
  fn recent_worksites(
    &self,
    limit: u32,
  ) -> impl Future<Output = Result<Vec<Worksite>, Self::Error>> + Send + '_;
}

//! JSON REST API for Sitepay.
//!
//! Exposes an axum [`Router`] backed by any
//! [`sitepay_core::store::ProcurementStore`]. Auth, TLS, and transport
//! concerns are the caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", sitepay_api::api_router(store.clone()))
//! ```

pub mod dashboard;
pub mod error;
pub mod payments;
pub mod requests;
pub mod suppliers;
pub mod worksites;

use std::sync::Arc;

use axum::{Router, routing::get};
use sitepay_core::store::ProcurementStore;

pub use error::ApiError;

/// Build a fully-materialised API router for `store`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(store: Arc<S>) -> Router<()>
where
  S: ProcurementStore + Clone + Send + Sync + 'static,
{
  Router::new()
    // Worksites
    .route(
      "/worksites",
      get(worksites::list::<S>).post(worksites::create::<S>),
    )
    .route(
      "/worksites/{id}",
      get(worksites::get_one::<S>)
        .put(worksites::update::<S>)
        .delete(worksites::delete_one::<S>),
    )
    // Suppliers
    .route(
      "/suppliers",
      get(suppliers::list::<S>).post(suppliers::create::<S>),
    )
    .route(
      "/suppliers/{id}",
      get(suppliers::get_one::<S>)
        .put(suppliers::update::<S>)
        .delete(suppliers::delete_one::<S>),
    )
    // Requests
    .route(
      "/requests",
      get(requests::list::<S>).post(requests::create::<S>),
    )
    .route(
      "/requests/{id}",
      get(requests::get_one::<S>)
        .put(requests::update::<S>)
        .delete(requests::delete_one::<S>),
    )
    // Payments
    .route(
      "/payments",
      get(payments::list::<S>).post(payments::create::<S>),
    )
    .route(
      "/payments/{id}",
      get(payments::get_one::<S>)
        .put(payments::update::<S>)
        .delete(payments::delete_one::<S>),
    )
    // Dashboard
    .route("/dashboard", get(dashboard::handler::<S>))
    .with_state(store)
}

#[cfg(test)]
mod tests;

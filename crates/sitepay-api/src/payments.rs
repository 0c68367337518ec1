//! Handlers for `/payments` endpoints.

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use serde_json::json;
use sitepay_core::{
  payment::{NewPayment, Payment, PaymentDetails},
  store::ProcurementStore,
};

use crate::error::{ApiError, check};

const UNKNOWN_REQUEST: &str = "unknown request id";

/// `GET /payments`
pub async fn list<S>(
  State(store): State<Arc<S>>,
) -> Result<Json<Vec<PaymentDetails>>, ApiError>
where
  S: ProcurementStore,
{
  let payments = store
    .list_payments_detailed()
    .await
    .map_err(ApiError::store)?;
  Ok(Json(payments))
}

/// `POST /payments`. Overpayment is allowed; there is no balance check.
pub async fn create<S>(
  State(store): State<Arc<S>>,
  Json(body): Json<NewPayment>,
) -> Result<impl IntoResponse, ApiError>
where
  S: ProcurementStore,
{
  check(&body)?;
  let payment = store
    .add_payment(body)
    .await
    .map_err(ApiError::from_store(UNKNOWN_REQUEST))?;
  Ok((StatusCode::CREATED, Json(payment)))
}

/// `GET /payments/:id`
pub async fn get_one<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<i64>,
) -> Result<Json<PaymentDetails>, ApiError>
where
  S: ProcurementStore,
{
  let details = store
    .get_payment_details(id)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::NotFound(format!("payment {id} not found")))?;
  Ok(Json(details))
}

/// `PUT /payments/:id`
pub async fn update<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<i64>,
  Json(body): Json<NewPayment>,
) -> Result<Json<Payment>, ApiError>
where
  S: ProcurementStore,
{
  check(&body)?;
  let payment = store
    .update_payment(id, body)
    .await
    .map_err(ApiError::from_store(UNKNOWN_REQUEST))?
    .ok_or_else(|| ApiError::NotFound(format!("payment {id} not found")))?;
  Ok(Json(payment))
}

/// `DELETE /payments/:id`
pub async fn delete_one<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError>
where
  S: ProcurementStore,
{
  let deleted = store.delete_payment(id).await.map_err(ApiError::store)?;
  if !deleted {
    return Err(ApiError::NotFound(format!("payment {id} not found")));
  }
  Ok(Json(json!({ "message": "payment deleted" })))
}

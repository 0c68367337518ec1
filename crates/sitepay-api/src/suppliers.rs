//! Handlers for `/suppliers` endpoints.

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use serde_json::json;
use sitepay_core::{
  store::ProcurementStore,
  supplier::{NewSupplier, Supplier},
};

use crate::error::{ApiError, check};

/// `GET /suppliers`
pub async fn list<S>(
  State(store): State<Arc<S>>,
) -> Result<Json<Vec<Supplier>>, ApiError>
where
  S: ProcurementStore,
{
  let suppliers = store.list_suppliers().await.map_err(ApiError::store)?;
  Ok(Json(suppliers))
}

/// `POST /suppliers`
pub async fn create<S>(
  State(store): State<Arc<S>>,
  Json(body): Json<NewSupplier>,
) -> Result<impl IntoResponse, ApiError>
where
  S: ProcurementStore,
{
  check(&body)?;
  let supplier = store.add_supplier(body).await.map_err(ApiError::store)?;
  Ok((StatusCode::CREATED, Json(supplier)))
}

/// `GET /suppliers/:id`
pub async fn get_one<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<i64>,
) -> Result<Json<Supplier>, ApiError>
where
  S: ProcurementStore,
{
  let supplier = store
    .get_supplier(id)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::NotFound(format!("supplier {id} not found")))?;
  Ok(Json(supplier))
}

/// `PUT /suppliers/:id`
pub async fn update<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<i64>,
  Json(body): Json<NewSupplier>,
) -> Result<Json<Supplier>, ApiError>
where
  S: ProcurementStore,
{
  check(&body)?;
  let supplier = store
    .update_supplier(id, body)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::NotFound(format!("supplier {id} not found")))?;
  Ok(Json(supplier))
}

/// `DELETE /suppliers/:id`
pub async fn delete_one<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError>
where
  S: ProcurementStore,
{
  let deleted = store.delete_supplier(id).await.map_err(ApiError::from_store(
    "cannot delete this supplier: requests still reference it",
  ))?;
  if !deleted {
    return Err(ApiError::NotFound(format!("supplier {id} not found")));
  }
  Ok(Json(json!({ "message": "supplier deleted" })))
}

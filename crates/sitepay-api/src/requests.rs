//! Handlers for `/requests` endpoints.
//!
//! Reads return the detailed shape (worksite, supplier and payments joined),
//! matching what the list and detail screens render.

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use serde_json::json;
use sitepay_core::{
  request::{NewRequest, Request, RequestDetails},
  store::ProcurementStore,
};

use crate::error::{ApiError, check};

const UNKNOWN_PARENT: &str = "unknown worksite or supplier id";

/// `GET /requests`
pub async fn list<S>(
  State(store): State<Arc<S>>,
) -> Result<Json<Vec<RequestDetails>>, ApiError>
where
  S: ProcurementStore,
{
  let requests = store
    .list_requests_detailed()
    .await
    .map_err(ApiError::store)?;
  Ok(Json(requests))
}

/// `POST /requests`
pub async fn create<S>(
  State(store): State<Arc<S>>,
  Json(body): Json<NewRequest>,
) -> Result<impl IntoResponse, ApiError>
where
  S: ProcurementStore,
{
  check(&body)?;
  let request = store
    .add_request(body)
    .await
    .map_err(ApiError::from_store(UNKNOWN_PARENT))?;
  Ok((StatusCode::CREATED, Json(request)))
}

/// `GET /requests/:id`
pub async fn get_one<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<i64>,
) -> Result<Json<RequestDetails>, ApiError>
where
  S: ProcurementStore,
{
  let details = store
    .get_request_details(id)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::NotFound(format!("request {id} not found")))?;
  Ok(Json(details))
}

/// `PUT /requests/:id`
pub async fn update<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<i64>,
  Json(body): Json<NewRequest>,
) -> Result<Json<Request>, ApiError>
where
  S: ProcurementStore,
{
  check(&body)?;
  let request = store
    .update_request(id, body)
    .await
    .map_err(ApiError::from_store(UNKNOWN_PARENT))?
    .ok_or_else(|| ApiError::NotFound(format!("request {id} not found")))?;
  Ok(Json(request))
}

/// `DELETE /requests/:id`
pub async fn delete_one<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError>
where
  S: ProcurementStore,
{
  let deleted = store.delete_request(id).await.map_err(ApiError::from_store(
    "cannot delete this request: payments still reference it",
  ))?;
  if !deleted {
    return Err(ApiError::NotFound(format!("request {id} not found")));
  }
  Ok(Json(json!({ "message": "request deleted" })))
}

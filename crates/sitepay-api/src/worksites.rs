//! Handlers for `/worksites` endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/worksites` | Plain list |
//! | `POST`   | `/worksites` | 201 with the created record |
//! | `GET`    | `/worksites/:id` | Detailed: requests with payments |
//! | `PUT`    | `/worksites/:id` | Full replacement |
//! | `DELETE` | `/worksites/:id` | 400 while requests reference it |

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
  worksite::{NewWorksite, Worksite, WorksiteDetails},
};

use crate::error::{ApiError, check};

/// `GET /worksites`
pub async fn list<S>(
  State(store): State<Arc<S>>,
) -> Result<Json<Vec<Worksite>>, ApiError>
where
  S: ProcurementStore,
{
  let worksites = store.list_worksites().await.map_err(ApiError::store)?;
  Ok(Json(worksites))
}

/// `POST /worksites`
pub async fn create<S>(
  State(store): State<Arc<S>>,
  Json(body): Json<NewWorksite>,
) -> Result<impl IntoResponse, ApiError>
where
  S: ProcurementStore,
{
  check(&body)?;
  let worksite = store.add_worksite(body).await.map_err(ApiError::store)?;
  Ok((StatusCode::CREATED, Json(worksite)))
}

/// `GET /worksites/:id`
pub async fn get_one<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<i64>,
) -> Result<Json<WorksiteDetails>, ApiError>
where
  S: ProcurementStore,
{
  let details = store
    .get_worksite_details(id)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::NotFound(format!("worksite {id} not found")))?;
  Ok(Json(details))
}

/// `PUT /worksites/:id`
pub async fn update<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<i64>,
  Json(body): Json<NewWorksite>,
) -> Result<Json<Worksite>, ApiError>
where
  S: ProcurementStore,
{
  check(&body)?;
  let worksite = store
    .update_worksite(id, body)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::NotFound(format!("worksite {id} not found")))?;
  Ok(Json(worksite))
}

/// `DELETE /worksites/:id`
pub async fn delete_one<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError>
where
  S: ProcurementStore,
{
  let deleted = store.delete_worksite(id).await.map_err(ApiError::from_store(
    "cannot delete this worksite: requests still reference it",
  ))?;
  if !deleted {
    return Err(ApiError::NotFound(format!("worksite {id} not found")));
  }
  Ok(Json(json!({ "message": "worksite deleted" })))
}

//! Router-level tests: the full API against an in-memory SQLite store.

use std::sync::Arc;

use axum::{
  Router,
  body::Body,
  http::{Request, StatusCode, header},
};
use serde_json::{Value, json};
use sitepay_store_sqlite::SqliteStore;
use tower::ServiceExt as _;

use crate::api_router;

async fn app() -> Router {
  let store = SqliteStore::open_in_memory().await.expect("in-memory store");
  api_router(Arc::new(store))
}

/// Send one request and parse the JSON response body.
async fn send(
  app: &Router,
  method: &str,
  uri: &str,
  body: Option<Value>,
) -> (StatusCode, Value) {
  let mut builder = Request::builder().method(method).uri(uri);
  let request = match body {
    Some(v) => {
      builder = builder.header(header::CONTENT_TYPE, "application/json");
      builder.body(Body::from(v.to_string())).unwrap()
    }
    None => builder.body(Body::empty()).unwrap(),
  };

  let response = app.clone().oneshot(request).await.unwrap();
  let status = response.status();
  let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
    .await
    .unwrap();
  let value = if bytes.is_empty() {
    Value::Null
  } else {
    serde_json::from_slice(&bytes).unwrap()
  };
  (status, value)
}

fn worksite_body(name: &str) -> Value {
  json!({ "name": name, "manager": "Jean Dupont", "location": "Casablanca" })
}

fn supplier_body(name: &str) -> Value {
  json!({ "name": name, "category": "Matériaux" })
}

fn request_body(worksite_id: i64, supplier_id: i64, amount: f64, urgency: &str) -> Value {
  json!({
    "worksite_id": worksite_id,
    "supplier_id": supplier_id,
    "description": "Ciment",
    "amount": amount,
    "urgency": urgency,
    "comment": null,
    "date": "2024-07-01",
  })
}

fn payment_body(request_id: i64, amount: f64) -> Value {
  json!({
    "request_id": request_id,
    "amount": amount,
    "date": "2024-07-05",
    "month_label": "Juillet",
    "method": "TRANSFER",
  })
}

/// Create worksite + supplier + one request through the API; returns their ids.
async fn seeded(app: &Router) -> (i64, i64, i64) {
  let (status, w) = send(app, "POST", "/worksites", Some(worksite_body("Chantier A"))).await;
  assert_eq!(status, StatusCode::CREATED);
  let (status, s) = send(app, "POST", "/suppliers", Some(supplier_body("Fournisseur Alpha"))).await;
  assert_eq!(status, StatusCode::CREATED);
  let (worksite_id, supplier_id) = (w["id"].as_i64().unwrap(), s["id"].as_i64().unwrap());
  let (status, r) = send(
    app,
    "POST",
    "/requests",
    Some(request_body(worksite_id, supplier_id, 5000.0, "URGENT")),
  )
  .await;
  assert_eq!(status, StatusCode::CREATED);
  (worksite_id, supplier_id, r["id"].as_i64().unwrap())
}

// ─── Worksites ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn create_and_list_worksites() {
  let app = app().await;

  let (status, created) =
    send(&app, "POST", "/worksites", Some(worksite_body("Chantier A"))).await;
  assert_eq!(status, StatusCode::CREATED);
  assert_eq!(created["name"], "Chantier A");

  let (status, listed) = send(&app, "GET", "/worksites", None).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(listed.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn create_worksite_with_empty_name_is_rejected() {
  let app = app().await;
  let (status, body) = send(
    &app,
    "POST",
    "/worksites",
    Some(json!({ "name": "", "manager": "X", "location": "Y" })),
  )
  .await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
  assert_eq!(body["message"], "worksite name is required");
}

#[tokio::test]
async fn get_missing_worksite_is_404() {
  let app = app().await;
  let (status, _) = send(&app, "GET", "/worksites/42", None).await;
  assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn update_worksite_roundtrip() {
  let app = app().await;
  let (_, created) =
    send(&app, "POST", "/worksites", Some(worksite_body("Chantier A"))).await;
  let id = created["id"].as_i64().unwrap();

  let (status, updated) = send(
    &app,
    "PUT",
    &format!("/worksites/{id}"),
    Some(worksite_body("Chantier A bis")),
  )
  .await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(updated["name"], "Chantier A bis");
}

#[tokio::test]
async fn delete_referenced_worksite_is_a_400_and_changes_nothing() {
  let app = app().await;
  let (worksite_id, _, request_id) = seeded(&app).await;

  let (status, body) =
    send(&app, "DELETE", &format!("/worksites/{worksite_id}"), None).await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
  assert_eq!(
    body["message"],
    "cannot delete this worksite: requests still reference it"
  );

  let (status, _) = send(&app, "GET", &format!("/worksites/{worksite_id}"), None).await;
  assert_eq!(status, StatusCode::OK);
  let (status, _) = send(&app, "GET", &format!("/requests/{request_id}"), None).await;
  assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn delete_worksite_roundtrip() {
  let app = app().await;
  let (_, created) =
    send(&app, "POST", "/worksites", Some(worksite_body("Chantier A"))).await;
  let id = created["id"].as_i64().unwrap();

  let (status, body) = send(&app, "DELETE", &format!("/worksites/{id}"), None).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["message"], "worksite deleted");

  let (status, _) = send(&app, "GET", &format!("/worksites/{id}"), None).await;
  assert_eq!(status, StatusCode::NOT_FOUND);
}

// ─── Requests ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn create_request_with_unknown_parents_is_a_400() {
  let app = app().await;
  let (status, body) =
    send(&app, "POST", "/requests", Some(request_body(1, 1, 5000.0, "URGENT"))).await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
  assert_eq!(body["message"], "unknown worksite or supplier id");
}

#[tokio::test]
async fn create_request_with_negative_amount_is_rejected() {
  let app = app().await;
  let (worksite_id, supplier_id, _) = seeded(&app).await;
  let (status, body) = send(
    &app,
    "POST",
    "/requests",
    Some(request_body(worksite_id, supplier_id, -10.0, "NORMAL")),
  )
  .await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
  assert_eq!(body["message"], "amount must be positive");
}

#[tokio::test]
async fn request_detail_includes_relations_and_payments() {
  let app = app().await;
  let (_, _, request_id) = seeded(&app).await;
  send(&app, "POST", "/payments", Some(payment_body(request_id, 2000.0))).await;

  let (status, body) = send(&app, "GET", &format!("/requests/{request_id}"), None).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["worksite"]["name"], "Chantier A");
  assert_eq!(body["supplier"]["name"], "Fournisseur Alpha");
  assert_eq!(body["payments"].as_array().unwrap().len(), 1);
  assert_eq!(body["urgency"], "URGENT");
}

// ─── Payments ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn overpayment_is_accepted() {
  let app = app().await;
  let (_, _, request_id) = seeded(&app).await;

  // 5000 requested, 7000 paid.
  let (status, _) =
    send(&app, "POST", "/payments", Some(payment_body(request_id, 4000.0))).await;
  assert_eq!(status, StatusCode::CREATED);
  let (status, _) =
    send(&app, "POST", "/payments", Some(payment_body(request_id, 3000.0))).await;
  assert_eq!(status, StatusCode::CREATED);

  let (_, body) = send(&app, "GET", "/dashboard", None).await;
  assert_eq!(body["total_outstanding"], -2000.0);
}

#[tokio::test]
async fn payment_against_unknown_request_is_a_400() {
  let app = app().await;
  let (status, body) =
    send(&app, "POST", "/payments", Some(payment_body(42, 1000.0))).await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
  assert_eq!(body["message"], "unknown request id");
}

#[tokio::test]
async fn payment_with_unknown_method_is_rejected() {
  let app = app().await;
  let (_, _, request_id) = seeded(&app).await;
  let mut body = payment_body(request_id, 1000.0);
  body["method"] = json!("BARTER");

  let (status, _) = send(&app, "POST", "/payments", Some(body)).await;
  // Unknown enum tags fail deserialisation before the handler runs.
  assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

// ─── Dashboard ───────────────────────────────────────────────────────────────

/// Two worksites, two requests (one URGENT with 3000 paid, one NORMAL with
/// 3000 paid), matching the worked scenario of the dashboard design.
async fn dashboard_fixture(app: &Router) -> (i64, i64) {
  let (worksite_a, supplier_id, urgent) = seeded(app).await;
  send(app, "POST", "/payments", Some(payment_body(urgent, 2000.0))).await;
  send(app, "POST", "/payments", Some(payment_body(urgent, 1000.0))).await;

  let (_, w) = send(app, "POST", "/worksites", Some(worksite_body("Chantier B"))).await;
  let worksite_b = w["id"].as_i64().unwrap();
  let (_, r) = send(
    app,
    "POST",
    "/requests",
    Some(request_body(worksite_b, supplier_id, 8000.0, "NORMAL")),
  )
  .await;
  let normal = r["id"].as_i64().unwrap();
  let mut p = payment_body(normal, 3000.0);
  p["method"] = json!("CHEQUE");
  p["date"] = json!("2024-06-20");
  send(app, "POST", "/payments", Some(p)).await;

  (worksite_a, worksite_b)
}

#[tokio::test]
async fn dashboard_totals_counts_and_top_urgent() {
  let app = app().await;
  dashboard_fixture(&app).await;

  let (status, body) = send(&app, "GET", "/dashboard", None).await;
  assert_eq!(status, StatusCode::OK);

  assert_eq!(body["worksite_count"], 2);
  assert_eq!(body["supplier_count"], 1);
  assert_eq!(body["request_count"], 2);
  assert_eq!(body["payment_count"], 3);

  assert_eq!(body["total_requested"], 13000.0);
  assert_eq!(body["total_paid"], 6000.0);
  assert_eq!(body["total_outstanding"], 7000.0);

  let top = body["top_urgent"].as_array().unwrap();
  assert_eq!(top.len(), 1);
  assert_eq!(top[0]["balance"], 2000.0);
  assert_eq!(top[0]["worksite"], "Chantier A");

  assert_eq!(body["charts"]["requested_by_worksite"]["Chantier A"], 5000.0);
  assert_eq!(body["charts"]["requested_by_worksite"]["Chantier B"], 8000.0);
  assert_eq!(body["charts"]["paid_by_method"]["TRANSFER"], 3000.0);
  assert_eq!(body["charts"]["paid_by_method"]["CHEQUE"], 3000.0);
  assert_eq!(body["charts"]["paid_by_month"]["2024-07"], 3000.0);
  assert_eq!(body["charts"]["paid_by_month"]["2024-06"], 3000.0);

  assert_eq!(body["recent_payments"].as_array().unwrap().len(), 3);
  assert_eq!(body["recent_worksites"][0]["name"], "Chantier B");
}

#[tokio::test]
async fn dashboard_filters_by_worksite_but_counts_stay_global() {
  let app = app().await;
  let (worksite_a, _) = dashboard_fixture(&app).await;

  let (_, body) = send(
    &app,
    "GET",
    &format!("/dashboard?worksite_id={worksite_a}"),
    None,
  )
  .await;
  assert_eq!(body["total_requested"], 5000.0);
  assert_eq!(body["total_paid"], 3000.0);
  // Counts are never filtered.
  assert_eq!(body["request_count"], 2);
}

#[tokio::test]
async fn dashboard_filters_by_urgency() {
  let app = app().await;
  dashboard_fixture(&app).await;

  let (_, body) = send(&app, "GET", "/dashboard?urgency=NORMAL", None).await;
  assert_eq!(body["total_requested"], 8000.0);
  assert!(body["top_urgent"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn dashboard_filters_by_month() {
  let app = app().await;
  let (worksite_a, supplier_id, _) = seeded(&app).await; // dated 2024-07-01
  let mut june = request_body(worksite_a, supplier_id, 3000.0, "NORMAL");
  june["date"] = json!("2024-06-15");
  send(&app, "POST", "/requests", Some(june)).await;

  let (_, body) = send(&app, "GET", "/dashboard?month=2024-07", None).await;
  assert_eq!(body["total_requested"], 5000.0);

  let (_, body) = send(&app, "GET", "/dashboard?month=2024-06", None).await;
  assert_eq!(body["total_requested"], 3000.0);
}

#[tokio::test]
async fn malformed_dashboard_filters_are_ignored() {
  let app = app().await;
  dashboard_fixture(&app).await;

  let (status, body) = send(
    &app,
    "GET",
    "/dashboard?worksite_id=abc&urgency=SOMEDAY&month=juillet",
    None,
  )
  .await;
  assert_eq!(status, StatusCode::OK);
  // Same as the unfiltered view.
  assert_eq!(body["total_requested"], 13000.0);
}

#[tokio::test]
async fn empty_store_dashboard_is_all_zeros() {
  let app = app().await;
  let (status, body) = send(&app, "GET", "/dashboard", None).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["total_requested"], 0.0);
  assert_eq!(body["total_paid"], 0.0);
  assert_eq!(body["total_outstanding"], 0.0);
  assert!(body["top_urgent"].as_array().unwrap().is_empty());
  assert!(
    body["charts"]["requested_by_worksite"]
      .as_object()
      .unwrap()
      .is_empty()
  );
}

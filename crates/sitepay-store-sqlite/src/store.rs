//! [`SqliteStore`], the SQLite implementation of [`ProcurementStore`].

use std::{collections::HashMap, path::Path};

use rusqlite::OptionalExtension as _;

use sitepay_core::{
  payment::{NewPayment, Payment, PaymentDetails},
  request::{NewRequest, Request, RequestDetails},
  store::{EntityCounts, ProcurementStore},
  supplier::{NewSupplier, Supplier},
  worksite::{NewWorksite, Worksite, WorksiteDetails},
};

use crate::{
  encode::{encode_date, RawPayment, RawPaymentJoined, RawRequest, RawRequestJoined},
  schema::SCHEMA,
  Error, Result,
};

// ─── Row mappers ─────────────────────────────────────────────────────────────

fn worksite_row(row: &rusqlite::Row) -> rusqlite::Result<Worksite> {
  Ok(Worksite {
    id:       row.get(0)?,
    name:     row.get(1)?,
    manager:  row.get(2)?,
    location: row.get(3)?,
  })
}

fn supplier_row(row: &rusqlite::Row) -> rusqlite::Result<Supplier> {
  Ok(Supplier {
    id:       row.get(0)?,
    name:     row.get(1)?,
    category: row.get(2)?,
  })
}

/// Columns: the eight request columns, then worksite name/manager/location,
/// then supplier name/category.
fn request_joined_row(row: &rusqlite::Row) -> rusqlite::Result<RawRequestJoined> {
  Ok(RawRequestJoined {
    request:           RawRequest {
      id:          row.get(0)?,
      worksite_id: row.get(1)?,
      supplier_id: row.get(2)?,
      description: row.get(3)?,
      amount:      row.get(4)?,
      urgency:     row.get(5)?,
      comment:     row.get(6)?,
      date:        row.get(7)?,
    },
    worksite_name:     row.get(8)?,
    worksite_manager:  row.get(9)?,
    worksite_location: row.get(10)?,
    supplier_name:     row.get(11)?,
    supplier_category: row.get(12)?,
  })
}

fn payment_row(row: &rusqlite::Row) -> rusqlite::Result<RawPayment> {
  Ok(RawPayment {
    id:          row.get(0)?,
    request_id:  row.get(1)?,
    amount:      row.get(2)?,
    date:        row.get(3)?,
    month_label: row.get(4)?,
    method:      row.get(5)?,
  })
}

/// Columns: the six payment columns, then the eight request columns, then
/// worksite name/manager/location.
fn payment_joined_row(row: &rusqlite::Row) -> rusqlite::Result<RawPaymentJoined> {
  Ok(RawPaymentJoined {
    payment:           RawPayment {
      id:          row.get(0)?,
      request_id:  row.get(1)?,
      amount:      row.get(2)?,
      date:        row.get(3)?,
      month_label: row.get(4)?,
      method:      row.get(5)?,
    },
    request:           RawRequest {
      id:          row.get(6)?,
      worksite_id: row.get(7)?,
      supplier_id: row.get(8)?,
      description: row.get(9)?,
      amount:      row.get(10)?,
      urgency:     row.get(11)?,
      comment:     row.get(12)?,
      date:        row.get(13)?,
    },
    worksite_name:     row.get(14)?,
    worksite_manager:  row.get(15)?,
    worksite_location: row.get(16)?,
  })
}

const REQUEST_JOIN_SQL: &str = "SELECT
   r.request_id, r.worksite_id, r.supplier_id, r.description, r.amount,
   r.urgency, r.comment, r.request_date,
   w.name, w.manager, w.location,
   s.name, s.category
 FROM requests r
 JOIN worksites w ON w.worksite_id = r.worksite_id
 JOIN suppliers s ON s.supplier_id = r.supplier_id";

const PAYMENT_JOIN_SQL: &str = "SELECT
   p.payment_id, p.request_id, p.amount, p.payment_date, p.month_label,
   p.method,
   r.request_id, r.worksite_id, r.supplier_id, r.description, r.amount,
   r.urgency, r.comment, r.request_date,
   w.name, w.manager, w.location
 FROM payments p
 JOIN requests r ON r.request_id = p.request_id
 JOIN worksites w ON w.worksite_id = r.worksite_id";

/// Attach decoded payments to their owning requests, preserving row order.
fn assemble_details(
  joined: Vec<RawRequestJoined>,
  payments: Vec<RawPayment>,
) -> Result<Vec<RequestDetails>> {
  let mut by_request: HashMap<i64, Vec<Payment>> = HashMap::new();
  for raw in payments {
    let payment = raw.into_payment()?;
    by_request.entry(payment.request_id).or_default().push(payment);
  }

  joined
    .into_iter()
    .map(|raw| {
      let mut details = raw.into_details()?;
      if let Some(ps) = by_request.remove(&details.request.id) {
        details.payments = ps;
      }
      Ok(details)
    })
    .collect()
}

// ─── Store ───────────────────────────────────────────────────────────────────

/// A procurement store backed by a single SQLite file.
///
/// Cloning is cheap; the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store, useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Requests of one worksite, with supplier and payments attached.
  async fn requests_for_worksite(&self, worksite_id: i64) -> Result<Vec<RequestDetails>> {
    let (joined, payments) = self
      .conn
      .call(move |conn| {
        let sql = format!("{REQUEST_JOIN_SQL} WHERE r.worksite_id = ?1 ORDER BY r.request_id");
        let mut stmt = conn.prepare(&sql)?;
        let joined = stmt
          .query_map(rusqlite::params![worksite_id], request_joined_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;

        let mut stmt = conn.prepare(
          "SELECT p.payment_id, p.request_id, p.amount, p.payment_date,
                  p.month_label, p.method
           FROM payments p
           JOIN requests r ON r.request_id = p.request_id
           WHERE r.worksite_id = ?1
           ORDER BY p.payment_id",
        )?;
        let payments = stmt
          .query_map(rusqlite::params![worksite_id], payment_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok((joined, payments))
      })
      .await?;

    assemble_details(joined, payments)
  }
}

// ─── ProcurementStore impl ───────────────────────────────────────────────────

impl ProcurementStore for SqliteStore {
  type Error = Error;

  // ── Worksites ─────────────────────────────────────────────────────────────

  async fn add_worksite(&self, input: NewWorksite) -> Result<Worksite> {
    let NewWorksite { name, manager, location } = input;
    let (id, name, manager, location) = self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO worksites (name, manager, location) VALUES (?1, ?2, ?3)",
          rusqlite::params![name, manager, location],
        )?;
        Ok((conn.last_insert_rowid(), name, manager, location))
      })
      .await?;

    Ok(Worksite { id, name, manager, location })
  }

  async fn get_worksite(&self, id: i64) -> Result<Option<Worksite>> {
    Ok(
      self
        .conn
        .call(move |conn| {
          Ok(
            conn
              .query_row(
                "SELECT worksite_id, name, manager, location
                 FROM worksites WHERE worksite_id = ?1",
                rusqlite::params![id],
                worksite_row,
              )
              .optional()?,
          )
        })
        .await?,
    )
  }

  async fn get_worksite_details(&self, id: i64) -> Result<Option<WorksiteDetails>> {
    let worksite = match self.get_worksite(id).await? {
      Some(w) => w,
      None => return Ok(None),
    };
    let requests = self.requests_for_worksite(id).await?;
    Ok(Some(WorksiteDetails { worksite, requests }))
  }

  async fn list_worksites(&self) -> Result<Vec<Worksite>> {
    Ok(
      self
        .conn
        .call(|conn| {
          let mut stmt = conn.prepare(
            "SELECT worksite_id, name, manager, location
             FROM worksites ORDER BY worksite_id",
          )?;
          Ok(
            stmt
              .query_map([], worksite_row)?
              .collect::<rusqlite::Result<Vec<_>>>()?,
          )
        })
        .await?,
    )
  }

  async fn update_worksite(&self, id: i64, input: NewWorksite) -> Result<Option<Worksite>> {
    let NewWorksite { name, manager, location } = input;
    let updated = self
      .conn
      .call(move |conn| {
        let changed = conn.execute(
          "UPDATE worksites SET name = ?2, manager = ?3, location = ?4
           WHERE worksite_id = ?1",
          rusqlite::params![id, name, manager, location],
        )?;
        Ok(if changed > 0 {
          Some(Worksite { id, name, manager, location })
        } else {
          None
        })
      })
      .await?;
    Ok(updated)
  }

  async fn delete_worksite(&self, id: i64) -> Result<bool> {
    let deleted = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "DELETE FROM worksites WHERE worksite_id = ?1",
          rusqlite::params![id],
        )?)
      })
      .await?;
    Ok(deleted > 0)
  }

  // ── Suppliers ─────────────────────────────────────────────────────────────

  async fn add_supplier(&self, input: NewSupplier) -> Result<Supplier> {
    let NewSupplier { name, category } = input;
    let (id, name, category) = self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO suppliers (name, category) VALUES (?1, ?2)",
          rusqlite::params![name, category],
        )?;
        Ok((conn.last_insert_rowid(), name, category))
      })
      .await?;

    Ok(Supplier { id, name, category })
  }

  async fn get_supplier(&self, id: i64) -> Result<Option<Supplier>> {
    Ok(
      self
        .conn
        .call(move |conn| {
          Ok(
            conn
              .query_row(
                "SELECT supplier_id, name, category
                 FROM suppliers WHERE supplier_id = ?1",
                rusqlite::params![id],
                supplier_row,
              )
              .optional()?,
          )
        })
        .await?,
    )
  }

  async fn list_suppliers(&self) -> Result<Vec<Supplier>> {
    Ok(
      self
        .conn
        .call(|conn| {
          let mut stmt = conn.prepare(
            "SELECT supplier_id, name, category
             FROM suppliers ORDER BY supplier_id",
          )?;
          Ok(
            stmt
              .query_map([], supplier_row)?
              .collect::<rusqlite::Result<Vec<_>>>()?,
          )
        })
        .await?,
    )
  }

  async fn update_supplier(&self, id: i64, input: NewSupplier) -> Result<Option<Supplier>> {
    let NewSupplier { name, category } = input;
    let updated = self
      .conn
      .call(move |conn| {
        let changed = conn.execute(
          "UPDATE suppliers SET name = ?2, category = ?3 WHERE supplier_id = ?1",
          rusqlite::params![id, name, category],
        )?;
        Ok(if changed > 0 {
          Some(Supplier { id, name, category })
        } else {
          None
        })
      })
      .await?;
    Ok(updated)
  }

  async fn delete_supplier(&self, id: i64) -> Result<bool> {
    let deleted = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "DELETE FROM suppliers WHERE supplier_id = ?1",
          rusqlite::params![id],
        )?)
      })
      .await?;
    Ok(deleted > 0)
  }

  // ── Requests ──────────────────────────────────────────────────────────────

  async fn add_request(&self, input: NewRequest) -> Result<Request> {
    let urgency_str = input.urgency.as_str();
    let date_str = encode_date(input.date);
    let NewRequest {
      worksite_id,
      supplier_id,
      description,
      amount,
      urgency,
      comment,
      date,
    } = input;

    let (id, description, comment) = self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO requests
             (worksite_id, supplier_id, description, amount, urgency,
              comment, request_date)
           VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
          rusqlite::params![
            worksite_id,
            supplier_id,
            description,
            amount,
            urgency_str,
            comment,
            date_str,
          ],
        )?;
        Ok((conn.last_insert_rowid(), description, comment))
      })
      .await?;

    Ok(Request {
      id,
      worksite_id,
      supplier_id,
      description,
      amount,
      urgency,
      comment,
      date,
    })
  }

  async fn get_request_details(&self, id: i64) -> Result<Option<RequestDetails>> {
    let found = self
      .conn
      .call(move |conn| {
        let sql = format!("{REQUEST_JOIN_SQL} WHERE r.request_id = ?1");
        let joined = conn
          .query_row(&sql, rusqlite::params![id], request_joined_row)
          .optional()?;

        let joined = match joined {
          Some(j) => j,
          None => return Ok(None),
        };

        let mut stmt = conn.prepare(
          "SELECT payment_id, request_id, amount, payment_date, month_label,
                  method
           FROM payments WHERE request_id = ?1 ORDER BY payment_id",
        )?;
        let payments = stmt
          .query_map(rusqlite::params![id], payment_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(Some((joined, payments)))
      })
      .await?;

    match found {
      Some((joined, payments)) => {
        Ok(assemble_details(vec![joined], payments)?.pop())
      }
      None => Ok(None),
    }
  }

  async fn list_requests_detailed(&self) -> Result<Vec<RequestDetails>> {
    let (joined, payments) = self
      .conn
      .call(|conn| {
        let sql = format!("{REQUEST_JOIN_SQL} ORDER BY r.request_id");
        let mut stmt = conn.prepare(&sql)?;
        let joined = stmt
          .query_map([], request_joined_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;

        let mut stmt = conn.prepare(
          "SELECT payment_id, request_id, amount, payment_date, month_label,
                  method
           FROM payments ORDER BY payment_id",
        )?;
        let payments = stmt
          .query_map([], payment_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok((joined, payments))
      })
      .await?;

    assemble_details(joined, payments)
  }

  async fn update_request(&self, id: i64, input: NewRequest) -> Result<Option<Request>> {
    let urgency_str = input.urgency.as_str();
    let date_str = encode_date(input.date);
    let NewRequest {
      worksite_id,
      supplier_id,
      description,
      amount,
      urgency,
      comment,
      date,
    } = input;

    let updated = self
      .conn
      .call(move |conn| {
        let changed = conn.execute(
          "UPDATE requests
           SET worksite_id = ?2, supplier_id = ?3, description = ?4,
               amount = ?5, urgency = ?6, comment = ?7, request_date = ?8
           WHERE request_id = ?1",
          rusqlite::params![
            id,
            worksite_id,
            supplier_id,
            description,
            amount,
            urgency_str,
            comment,
            date_str,
          ],
        )?;
        Ok(if changed > 0 {
          Some(Request {
            id,
            worksite_id,
            supplier_id,
            description,
            amount,
            urgency,
            comment,
            date,
          })
        } else {
          None
        })
      })
      .await?;
    Ok(updated)
  }

  async fn delete_request(&self, id: i64) -> Result<bool> {
    let deleted = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "DELETE FROM requests WHERE request_id = ?1",
          rusqlite::params![id],
        )?)
      })
      .await?;
    Ok(deleted > 0)
  }

  // ── Payments ──────────────────────────────────────────────────────────────

  async fn add_payment(&self, input: NewPayment) -> Result<Payment> {
    let method_str = input.method.as_str();
    let date_str = encode_date(input.date);
    let NewPayment { request_id, amount, date, month_label, method } = input;

    let (id, month_label) = self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO payments
             (request_id, amount, payment_date, month_label, method)
           VALUES (?1, ?2, ?3, ?4, ?5)",
          rusqlite::params![request_id, amount, date_str, month_label, method_str],
        )?;
        Ok((conn.last_insert_rowid(), month_label))
      })
      .await?;

    Ok(Payment { id, request_id, amount, date, month_label, method })
  }

  async fn get_payment_details(&self, id: i64) -> Result<Option<PaymentDetails>> {
    let raw = self
      .conn
      .call(move |conn| {
        let sql = format!("{PAYMENT_JOIN_SQL} WHERE p.payment_id = ?1");
        Ok(
          conn
            .query_row(&sql, rusqlite::params![id], payment_joined_row)
            .optional()?,
        )
      })
      .await?;

    raw.map(RawPaymentJoined::into_details).transpose()
  }

  async fn list_payments_detailed(&self) -> Result<Vec<PaymentDetails>> {
    let raws = self
      .conn
      .call(|conn| {
        let sql = format!("{PAYMENT_JOIN_SQL} ORDER BY p.payment_id");
        let mut stmt = conn.prepare(&sql)?;
        Ok(
          stmt
            .query_map([], payment_joined_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?,
        )
      })
      .await?;

    raws.into_iter().map(RawPaymentJoined::into_details).collect()
  }

  async fn update_payment(&self, id: i64, input: NewPayment) -> Result<Option<Payment>> {
    let method_str = input.method.as_str();
    let date_str = encode_date(input.date);
    let NewPayment { request_id, amount, date, month_label, method } = input;

    let updated = self
      .conn
      .call(move |conn| {
        let changed = conn.execute(
          "UPDATE payments
           SET request_id = ?2, amount = ?3, payment_date = ?4,
               month_label = ?5, method = ?6
           WHERE payment_id = ?1",
          rusqlite::params![id, request_id, amount, date_str, month_label, method_str],
        )?;
        Ok(if changed > 0 {
          Some(Payment { id, request_id, amount, date, month_label, method })
        } else {
          None
        })
      })
      .await?;
    Ok(updated)
  }

  async fn delete_payment(&self, id: i64) -> Result<bool> {
    let deleted = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "DELETE FROM payments WHERE payment_id = ?1",
          rusqlite::params![id],
        )?)
      })
      .await?;
    Ok(deleted > 0)
  }

  // ── Dashboard reads ───────────────────────────────────────────────────────

  async fn counts(&self) -> Result<EntityCounts> {
    Ok(
      self
        .conn
        .call(|conn| {
          // COUNT(*) comes back as i64; the tables cannot go negative.
          let count = |conn: &rusqlite::Connection, sql: &str| {
            conn
              .query_row(sql, [], |row| row.get::<_, i64>(0))
              .map(|n| n as u64)
          };
          Ok(EntityCounts {
            worksites: count(conn, "SELECT COUNT(*) FROM worksites")?,
            suppliers: count(conn, "SELECT COUNT(*) FROM suppliers")?,
            requests:  count(conn, "SELECT COUNT(*) FROM requests")?,
            payments:  count(conn, "SELECT COUNT(*) FROM payments")?,
          })
        })
        .await?,
    )
  }

  async fn recent_payments(&self, limit: u32) -> Result<Vec<PaymentDetails>> {
    let raws = self
      .conn
      .call(move |conn| {
        let sql = format!(
          "{PAYMENT_JOIN_SQL}
           ORDER BY p.payment_date DESC, p.payment_id DESC LIMIT ?1"
        );
        let mut stmt = conn.prepare(&sql)?;
        Ok(
          stmt
            .query_map(rusqlite::params![limit], payment_joined_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?,
        )
      })
      .await?;

    raws.into_iter().map(RawPaymentJoined::into_details).collect()
  }

  async fn recent_worksites(&self, limit: u32) -> Result<Vec<Worksite>> {
    Ok(
      self
        .conn
        .call(move |conn| {
          let mut stmt = conn.prepare(
            "SELECT worksite_id, name, manager, location
             FROM worksites ORDER BY worksite_id DESC LIMIT ?1",
          )?;
          Ok(
            stmt
              .query_map(rusqlite::params![limit], worksite_row)?
              .collect::<rusqlite::Result<Vec<_>>>()?,
          )
        })
        .await?,
    )
  }
}

//! SQL schema for the Sitepay SQLite store.
//!
//! Executed once at connection startup via `PRAGMA user_version`. Future
//! migrations will be gated on that version number.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
///
/// `foreign_keys = ON` is what turns parent deletes with surviving children
/// into constraint failures; SQLite leaves it off by default.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS worksites (
    worksite_id INTEGER PRIMARY KEY AUTOINCREMENT,
    name        TEXT NOT NULL,
    manager     TEXT NOT NULL,
    location    TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS suppliers (
    supplier_id INTEGER PRIMARY KEY AUTOINCREMENT,
    name        TEXT NOT NULL,
    category    TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS requests (
    request_id   INTEGER PRIMARY KEY AUTOINCREMENT,
    worksite_id  INTEGER NOT NULL REFERENCES worksites(worksite_id),
    supplier_id  INTEGER NOT NULL REFERENCES suppliers(supplier_id),
    description  TEXT NOT NULL,
    amount       REAL NOT NULL CHECK (amount > 0),
    urgency      TEXT NOT NULL,   -- 'URGENT' | 'NORMAL'
    comment      TEXT,
    request_date TEXT NOT NULL    -- ISO 8601 date
);

CREATE TABLE IF NOT EXISTS payments (
    payment_id   INTEGER PRIMARY KEY AUTOINCREMENT,
    request_id   INTEGER NOT NULL REFERENCES requests(request_id),
    amount       REAL NOT NULL CHECK (amount > 0),
    payment_date TEXT NOT NULL,   -- ISO 8601 date
    month_label  TEXT NOT NULL,
    method       TEXT NOT NULL    -- 'TRANSFER' | 'CHEQUE' | 'CASH'
);

CREATE INDEX IF NOT EXISTS requests_worksite_idx ON requests(worksite_id);
CREATE INDEX IF NOT EXISTS requests_supplier_idx ON requests(supplier_id);
CREATE INDEX IF NOT EXISTS payments_request_idx  ON payments(request_id);
CREATE INDEX IF NOT EXISTS payments_date_idx     ON payments(payment_date);

PRAGMA user_version = 1;
";

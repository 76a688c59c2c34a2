//! SQL schema for the simledger SQLite store.
//!
//! Executed once at connection startup; idempotent thanks to
//! `CREATE TABLE IF NOT EXISTS`. Future migrations are gated on
//! `PRAGMA user_version` and must be additive only — never drop or redefine
//! an existing table.

/// Full schema DDL.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS projects (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    name        TEXT NOT NULL,
    description TEXT,
    branch      TEXT NOT NULL,
    start_date  TEXT NOT NULL,   -- YYYY-MM-DD
    end_date    TEXT,
    lat         REAL,
    lng         REAL,
    address     TEXT,
    created_at  TEXT NOT NULL,   -- ISO 8601 UTC; store-assigned
    updated_at  TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS sim_cards (
    id           INTEGER PRIMARY KEY AUTOINCREMENT,
    number       TEXT NOT NULL,
    service_type TEXT NOT NULL,
    provider     TEXT NOT NULL,
    notes        TEXT,
    project_id   INTEGER REFERENCES projects(id) ON DELETE SET NULL,
    lat          REAL,
    lng          REAL,
    address      TEXT,
    dwg_data     TEXT,           -- inline data: URL
    kmz_data     TEXT,           -- inline data: URL
    created_at   TEXT NOT NULL,
    updated_at   TEXT NOT NULL
);

-- Line numbers are unique across the whole collection.
CREATE UNIQUE INDEX IF NOT EXISTS sim_cards_number_idx ON sim_cards(number);
CREATE INDEX IF NOT EXISTS sim_cards_project_idx ON sim_cards(project_id);

CREATE TABLE IF NOT EXISTS monthly_costs (
    id         INTEGER PRIMARY KEY AUTOINCREMENT,
    sim_id     INTEGER NOT NULL REFERENCES sim_cards(id) ON DELETE CASCADE,
    amount     REAL NOT NULL CHECK (amount >= 0),
    month      INTEGER NOT NULL CHECK (month BETWEEN 1 AND 12),
    year       INTEGER NOT NULL,
    created_at TEXT NOT NULL
);

-- At most one entry per (SIM, month, year); current-cost resolution relies
-- on this.
CREATE UNIQUE INDEX IF NOT EXISTS monthly_costs_sim_period_idx
    ON monthly_costs(sim_id, month, year);

CREATE TABLE IF NOT EXISTS invoices (
    id             INTEGER PRIMARY KEY AUTOINCREMENT,
    project_id     INTEGER NOT NULL REFERENCES projects(id) ON DELETE CASCADE,
    invoice_number TEXT NOT NULL,
    issue_date     TEXT NOT NULL,
    total_amount   REAL NOT NULL,
    status         TEXT NOT NULL,   -- 'draft' | 'issued' | 'paid'
    created_at     TEXT NOT NULL,
    updated_at     TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS invoices_project_idx ON invoices(project_id);

PRAGMA user_version = 1;
";

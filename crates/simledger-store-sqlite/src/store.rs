//! [`SqliteStore`] — the SQLite implementation of [`SimStore`].

use std::path::Path;

use chrono::Utc;
use rusqlite::OptionalExtension as _;

use simledger_core::{
  cost::{CostEntry, CostPeriod, NewCostEntry},
  invoice::{Invoice, InvoicePatch, NewInvoice},
  project::{NewProject, Project, ProjectPatch},
  sim::{NewSimCard, SimCard, SimCardPatch, SimWithCost},
  store::SimStore,
};

use crate::{
  encode::{
    RawCostEntry, RawInvoice, RawProject, RawSimCard, RawSimWithCost,
    encode_branch, encode_date, encode_dt, encode_provider,
    encode_service_type, encode_status,
  },
  schema::SCHEMA,
  Error, Result,
};

const SIM_COLUMNS: &str = "id, number, service_type, provider, notes, \
                           project_id, lat, lng, address, dwg_data, \
                           kmz_data, created_at, updated_at";

const PROJECT_COLUMNS: &str = "id, name, description, branch, start_date, \
                               end_date, lat, lng, address, created_at, \
                               updated_at";

const INVOICE_COLUMNS: &str = "id, project_id, invoice_number, issue_date, \
                               total_amount, status, created_at, updated_at";

/// Outcome of a guarded cost insert, reported from inside the connection
/// closure.
enum CostInsert {
  Id(i64),
  NoSim,
  Duplicate,
}

fn sim_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawSimCard> {
  Ok(RawSimCard {
    id:           row.get(0)?,
    number:       row.get(1)?,
    service_type: row.get(2)?,
    provider:     row.get(3)?,
    notes:        row.get(4)?,
    project_id:   row.get(5)?,
    lat:          row.get(6)?,
    lng:          row.get(7)?,
    address:      row.get(8)?,
    dwg_data:     row.get(9)?,
    kmz_data:     row.get(10)?,
    created_at:   row.get(11)?,
    updated_at:   row.get(12)?,
  })
}

fn project_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawProject> {
  Ok(RawProject {
    id:          row.get(0)?,
    name:        row.get(1)?,
    description: row.get(2)?,
    branch:      row.get(3)?,
    start_date:  row.get(4)?,
    end_date:    row.get(5)?,
    lat:         row.get(6)?,
    lng:         row.get(7)?,
    address:     row.get(8)?,
    created_at:  row.get(9)?,
    updated_at:  row.get(10)?,
  })
}

fn invoice_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawInvoice> {
  Ok(RawInvoice {
    id:             row.get(0)?,
    project_id:     row.get(1)?,
    invoice_number: row.get(2)?,
    issue_date:     row.get(3)?,
    total_amount:   row.get(4)?,
    status:         row.get(5)?,
    created_at:     row.get(6)?,
    updated_at:     row.get(7)?,
  })
}

fn cost_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawCostEntry> {
  Ok(RawCostEntry {
    id:         row.get(0)?,
    sim_id:     row.get(1)?,
    amount:     row.get(2)?,
    month:      row.get(3)?,
    year:       row.get(4)?,
    created_at: row.get(5)?,
  })
}

// ─── Store ───────────────────────────────────────────────────────────────────

/// A simledger store backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  /// Re-opening an already-provisioned database is a schema no-op.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
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
}

// ─── SimStore impl ───────────────────────────────────────────────────────────

impl SimStore for SqliteStore {
  type Error = Error;

  // ── SIM cards ─────────────────────────────────────────────────────────────

  async fn add_sim(&self, input: NewSimCard) -> Result<SimCard> {
    if input.monthly_cost < 0.0 {
      return Err(Error::Core(simledger_core::Error::NegativeAmount(
        input.monthly_cost,
      )));
    }

    let now    = Utc::now();
    let period = CostPeriod::current();

    let number       = input.number.clone();
    let service_type = encode_service_type(input.service_type).to_owned();
    let provider     = encode_provider(input.provider).to_owned();
    let notes        = input.notes.clone();
    let project_id   = input.project_id;
    let lat          = input.location.as_ref().map(|l| l.lat);
    let lng          = input.location.as_ref().map(|l| l.lng);
    let address      = input.location.as_ref().map(|l| l.address.clone());
    let dwg          = input.attachments.dwg.clone();
    let kmz          = input.attachments.kmz.clone();
    let now_str      = encode_dt(now);
    let monthly_cost = input.monthly_cost;
    let number_check = number.clone();

    let outcome = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;

        let taken: bool = tx
          .query_row(
            "SELECT 1 FROM sim_cards WHERE number = ?1",
            rusqlite::params![number_check],
            |_| Ok(true),
          )
          .optional()?
          .unwrap_or(false);
        if taken {
          return Ok(None);
        }

        tx.execute(
          "INSERT INTO sim_cards (
             number, service_type, provider, notes, project_id,
             lat, lng, address, dwg_data, kmz_data, created_at, updated_at
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?11)",
          rusqlite::params![
            number_check, service_type, provider, notes, project_id,
            lat, lng, address, dwg, kmz, now_str,
          ],
        )?;
        let id = tx.last_insert_rowid();

        // The creation form carries the first month's charge; record it in
        // the same transaction so a failed add leaves no partial rows.
        if monthly_cost > 0.0 {
          tx.execute(
            "INSERT INTO monthly_costs (sim_id, amount, month, year, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            rusqlite::params![
              id,
              monthly_cost,
              period.month as i64,
              period.year,
              now_str,
            ],
          )?;
        }

        tx.commit()?;
        Ok(Some(id))
      })
      .await?;

    let Some(id) = outcome else {
      return Err(Error::Core(simledger_core::Error::DuplicateNumber(number)));
    };

    Ok(SimCard {
      id,
      number: input.number,
      service_type: input.service_type,
      provider: input.provider,
      notes: input.notes,
      project_id: input.project_id,
      location: input.location,
      attachments: input.attachments,
      created_at: now,
      updated_at: now,
    })
  }

  async fn get_sim(&self, id: i64) -> Result<Option<SimCard>> {
    let raw: Option<RawSimCard> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!("SELECT {SIM_COLUMNS} FROM sim_cards WHERE id = ?1"),
              rusqlite::params![id],
              sim_from_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawSimCard::into_sim).transpose()
  }

  async fn list_sims(&self) -> Result<Vec<SimCard>> {
    let raws: Vec<RawSimCard> = self
      .conn
      .call(|conn| {
        let mut stmt = conn
          .prepare(&format!("SELECT {SIM_COLUMNS} FROM sim_cards ORDER BY id"))?;
        let rows = stmt
          .query_map([], sim_from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawSimCard::into_sim).collect()
  }

  async fn list_sims_with_cost(
    &self,
    period: CostPeriod,
  ) -> Result<Vec<SimWithCost>> {
    let raws: Vec<RawSimWithCost> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT
             s.id, s.number, s.service_type, s.provider, s.notes,
             s.project_id, s.lat, s.lng, s.address, s.dwg_data,
             s.kmz_data, s.created_at, s.updated_at,
             c.amount
           FROM sim_cards s
           LEFT JOIN monthly_costs c
             ON c.sim_id = s.id AND c.month = ?1 AND c.year = ?2
           ORDER BY s.id",
        )?;
        let rows = stmt
          .query_map(
            rusqlite::params![period.month as i64, period.year],
            |row| {
              Ok(RawSimWithCost {
                sim:    sim_from_row(row)?,
                amount: row.get(13)?,
              })
            },
          )?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws
      .into_iter()
      .map(RawSimWithCost::into_sim_with_cost)
      .collect()
  }

  async fn sims_by_project(&self, project_id: i64) -> Result<Vec<SimCard>> {
    let raws: Vec<RawSimCard> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {SIM_COLUMNS} FROM sim_cards WHERE project_id = ?1 ORDER BY id"
        ))?;
        let rows = stmt
          .query_map(rusqlite::params![project_id], sim_from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawSimCard::into_sim).collect()
  }

  async fn update_sim(&self, id: i64, patch: SimCardPatch) -> Result<SimCard> {
    let existing = self
      .get_sim(id)
      .await?
      .ok_or(Error::Core(simledger_core::Error::SimNotFound(id)))?;

    let mut merged = existing;
    if let Some(number) = patch.number {
      merged.number = number;
    }
    if let Some(service_type) = patch.service_type {
      merged.service_type = service_type;
    }
    if let Some(provider) = patch.provider {
      merged.provider = provider;
    }
    if let Some(notes) = patch.notes {
      merged.notes = Some(notes);
    }
    if let Some(project_id) = patch.project_id {
      merged.project_id = Some(project_id);
    }
    if let Some(location) = patch.location {
      merged.location = Some(location);
    }
    if let Some(attachments) = patch.attachments {
      merged.attachments = attachments;
    }
    merged.updated_at = Utc::now();

    let number       = merged.number.clone();
    let service_type = encode_service_type(merged.service_type).to_owned();
    let provider     = encode_provider(merged.provider).to_owned();
    let notes        = merged.notes.clone();
    let project_id   = merged.project_id;
    let lat          = merged.location.as_ref().map(|l| l.lat);
    let lng          = merged.location.as_ref().map(|l| l.lng);
    let address      = merged.location.as_ref().map(|l| l.address.clone());
    let dwg          = merged.attachments.dwg.clone();
    let kmz          = merged.attachments.kmz.clone();
    let updated_str  = encode_dt(merged.updated_at);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "UPDATE sim_cards SET
             number = ?1, service_type = ?2, provider = ?3, notes = ?4,
             project_id = ?5, lat = ?6, lng = ?7, address = ?8,
             dwg_data = ?9, kmz_data = ?10, updated_at = ?11
           WHERE id = ?12",
          rusqlite::params![
            number, service_type, provider, notes, project_id,
            lat, lng, address, dwg, kmz, updated_str, id,
          ],
        )?;
        Ok(())
      })
      .await?;

    Ok(merged)
  }

  async fn delete_sim(&self, id: i64) -> Result<()> {
    // Cost entries go with the SIM via ON DELETE CASCADE. Deleting an
    // absent id affects zero rows.
    self
      .conn
      .call(move |conn| {
        conn.execute("DELETE FROM sim_cards WHERE id = ?1", rusqlite::params![id])?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  // ── Cost entries ──────────────────────────────────────────────────────────

  async fn record_cost(&self, input: NewCostEntry) -> Result<CostEntry> {
    input.validate().map_err(Error::Core)?;

    let now     = Utc::now();
    let now_str = encode_dt(now);
    let sim_id  = input.sim_id;
    let amount  = input.amount;
    let period  = input.period;

    let outcome = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;

        let sim_exists: bool = tx
          .query_row(
            "SELECT 1 FROM sim_cards WHERE id = ?1",
            rusqlite::params![sim_id],
            |_| Ok(true),
          )
          .optional()?
          .unwrap_or(false);
        if !sim_exists {
          return Ok(CostInsert::NoSim);
        }

        let taken: bool = tx
          .query_row(
            "SELECT 1 FROM monthly_costs
             WHERE sim_id = ?1 AND month = ?2 AND year = ?3",
            rusqlite::params![sim_id, period.month as i64, period.year],
            |_| Ok(true),
          )
          .optional()?
          .unwrap_or(false);
        if taken {
          return Ok(CostInsert::Duplicate);
        }

        tx.execute(
          "INSERT INTO monthly_costs (sim_id, amount, month, year, created_at)
           VALUES (?1, ?2, ?3, ?4, ?5)",
          rusqlite::params![sim_id, amount, period.month as i64, period.year, now_str],
        )?;
        let id = tx.last_insert_rowid();

        tx.commit()?;
        Ok(CostInsert::Id(id))
      })
      .await?;

    let id = match outcome {
      CostInsert::Id(id) => id,
      CostInsert::Duplicate => {
        return Err(Error::Core(simledger_core::Error::DuplicateCostPeriod {
          sim_id,
          period,
        }));
      }
      CostInsert::NoSim => {
        return Err(Error::Core(simledger_core::Error::SimNotFound(sim_id)));
      }
    };

    Ok(CostEntry { id, sim_id, amount, period, created_at: now })
  }

  async fn costs_for_sim(&self, sim_id: i64) -> Result<Vec<CostEntry>> {
    let raws: Vec<RawCostEntry> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT id, sim_id, amount, month, year, created_at
           FROM monthly_costs
           WHERE sim_id = ?1
           ORDER BY year, month",
        )?;
        let rows = stmt
          .query_map(rusqlite::params![sim_id], cost_from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawCostEntry::into_entry).collect()
  }

  async fn cost_for_period(
    &self,
    sim_id: i64,
    period: CostPeriod,
  ) -> Result<Option<CostEntry>> {
    let raw: Option<RawCostEntry> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT id, sim_id, amount, month, year, created_at
               FROM monthly_costs
               WHERE sim_id = ?1 AND month = ?2 AND year = ?3",
              rusqlite::params![sim_id, period.month as i64, period.year],
              cost_from_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawCostEntry::into_entry).transpose()
  }

  // ── Projects ──────────────────────────────────────────────────────────────

  async fn add_project(&self, input: NewProject) -> Result<Project> {
    let now = Utc::now();

    let name        = input.name.clone();
    let description = input.description.clone();
    let branch      = encode_branch(input.branch).to_owned();
    let start_date  = encode_date(input.start_date);
    let end_date    = input.end_date.map(encode_date);
    let lat         = input.location.as_ref().map(|l| l.lat);
    let lng         = input.location.as_ref().map(|l| l.lng);
    let address     = input.location.as_ref().map(|l| l.address.clone());
    let now_str     = encode_dt(now);

    let id = self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO projects (
             name, description, branch, start_date, end_date,
             lat, lng, address, created_at, updated_at
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?9)",
          rusqlite::params![
            name, description, branch, start_date, end_date,
            lat, lng, address, now_str,
          ],
        )?;
        Ok(conn.last_insert_rowid())
      })
      .await?;

    Ok(Project {
      id,
      name: input.name,
      description: input.description,
      branch: input.branch,
      start_date: input.start_date,
      end_date: input.end_date,
      location: input.location,
      created_at: now,
      updated_at: now,
    })
  }

  async fn get_project(&self, id: i64) -> Result<Option<Project>> {
    let raw: Option<RawProject> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!("SELECT {PROJECT_COLUMNS} FROM projects WHERE id = ?1"),
              rusqlite::params![id],
              project_from_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawProject::into_project).transpose()
  }

  async fn list_projects(&self) -> Result<Vec<Project>> {
    let raws: Vec<RawProject> = self
      .conn
      .call(|conn| {
        let mut stmt = conn
          .prepare(&format!("SELECT {PROJECT_COLUMNS} FROM projects ORDER BY id"))?;
        let rows = stmt
          .query_map([], project_from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawProject::into_project).collect()
  }

  async fn update_project(&self, id: i64, patch: ProjectPatch) -> Result<Project> {
    let existing = self
      .get_project(id)
      .await?
      .ok_or(Error::Core(simledger_core::Error::ProjectNotFound(id)))?;

    let mut merged = existing;
    if let Some(name) = patch.name {
      merged.name = name;
    }
    if let Some(description) = patch.description {
      merged.description = Some(description);
    }
    if let Some(branch) = patch.branch {
      merged.branch = branch;
    }
    if let Some(start_date) = patch.start_date {
      merged.start_date = start_date;
    }
    if let Some(end_date) = patch.end_date {
      merged.end_date = Some(end_date);
    }
    if let Some(location) = patch.location {
      merged.location = Some(location);
    }
    merged.updated_at = Utc::now();

    let name        = merged.name.clone();
    let description = merged.description.clone();
    let branch      = encode_branch(merged.branch).to_owned();
    let start_date  = encode_date(merged.start_date);
    let end_date    = merged.end_date.map(encode_date);
    let lat         = merged.location.as_ref().map(|l| l.lat);
    let lng         = merged.location.as_ref().map(|l| l.lng);
    let address     = merged.location.as_ref().map(|l| l.address.clone());
    let updated_str = encode_dt(merged.updated_at);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "UPDATE projects SET
             name = ?1, description = ?2, branch = ?3, start_date = ?4,
             end_date = ?5, lat = ?6, lng = ?7, address = ?8, updated_at = ?9
           WHERE id = ?10",
          rusqlite::params![
            name, description, branch, start_date, end_date,
            lat, lng, address, updated_str, id,
          ],
        )?;
        Ok(())
      })
      .await?;

    Ok(merged)
  }

  async fn delete_project(&self, id: i64) -> Result<()> {
    // Invoices cascade away and referencing SIM cards are set back to
    // unassigned, both via the schema's foreign-key actions.
    self
      .conn
      .call(move |conn| {
        conn.execute("DELETE FROM projects WHERE id = ?1", rusqlite::params![id])?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  // ── Invoices ──────────────────────────────────────────────────────────────

  async fn add_invoice(&self, input: NewInvoice) -> Result<Invoice> {
    let now = Utc::now();

    let project_id     = input.project_id;
    let invoice_number = input.invoice_number.clone();
    let issue_date     = encode_date(input.issue_date);
    let total_amount   = input.total_amount;
    let status         = encode_status(input.status).to_owned();
    let now_str        = encode_dt(now);

    let outcome = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;

        let project_exists: bool = tx
          .query_row(
            "SELECT 1 FROM projects WHERE id = ?1",
            rusqlite::params![project_id],
            |_| Ok(true),
          )
          .optional()?
          .unwrap_or(false);
        if !project_exists {
          return Ok(None);
        }

        tx.execute(
          "INSERT INTO invoices (
             project_id, invoice_number, issue_date, total_amount, status,
             created_at, updated_at
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?6)",
          rusqlite::params![
            project_id, invoice_number, issue_date, total_amount, status, now_str,
          ],
        )?;
        let id = tx.last_insert_rowid();

        tx.commit()?;
        Ok(Some(id))
      })
      .await?;

    let Some(id) = outcome else {
      return Err(Error::Core(simledger_core::Error::ProjectNotFound(
        project_id,
      )));
    };

    Ok(Invoice {
      id,
      project_id: input.project_id,
      invoice_number: input.invoice_number,
      issue_date: input.issue_date,
      total_amount: input.total_amount,
      status: input.status,
      created_at: now,
      updated_at: now,
    })
  }

  async fn invoices_for_project(&self, project_id: i64) -> Result<Vec<Invoice>> {
    let raws: Vec<RawInvoice> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {INVOICE_COLUMNS} FROM invoices WHERE project_id = ?1 ORDER BY id"
        ))?;
        let rows = stmt
          .query_map(rusqlite::params![project_id], invoice_from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawInvoice::into_invoice).collect()
  }

  async fn update_invoice(&self, id: i64, patch: InvoicePatch) -> Result<Invoice> {
    let raw: Option<RawInvoice> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!("SELECT {INVOICE_COLUMNS} FROM invoices WHERE id = ?1"),
              rusqlite::params![id],
              invoice_from_row,
            )
            .optional()?,
        )
      })
      .await?;

    let existing = raw
      .map(RawInvoice::into_invoice)
      .transpose()?
      .ok_or(Error::Core(simledger_core::Error::InvoiceNotFound(id)))?;

    let mut merged = existing;
    if let Some(invoice_number) = patch.invoice_number {
      merged.invoice_number = invoice_number;
    }
    if let Some(issue_date) = patch.issue_date {
      merged.issue_date = issue_date;
    }
    if let Some(total_amount) = patch.total_amount {
      merged.total_amount = total_amount;
    }
    if let Some(status) = patch.status {
      merged.status = status;
    }
    merged.updated_at = Utc::now();

    let invoice_number = merged.invoice_number.clone();
    let issue_date     = encode_date(merged.issue_date);
    let total_amount   = merged.total_amount;
    let status         = encode_status(merged.status).to_owned();
    let updated_str    = encode_dt(merged.updated_at);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "UPDATE invoices SET
             invoice_number = ?1, issue_date = ?2, total_amount = ?3,
             status = ?4, updated_at = ?5
           WHERE id = ?6",
          rusqlite::params![
            invoice_number, issue_date, total_amount, status, updated_str, id,
          ],
        )?;
        Ok(())
      })
      .await?;

    Ok(merged)
  }

  async fn delete_invoice(&self, id: i64) -> Result<()> {
    self
      .conn
      .call(move |conn| {
        conn.execute("DELETE FROM invoices WHERE id = ?1", rusqlite::params![id])?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}

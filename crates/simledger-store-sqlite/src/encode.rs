//! Encoding and decoding helpers between Rust domain types and the
//! plain-text representations stored in SQLite columns.
//!
//! Timestamps are stored as RFC 3339 strings, calendar dates as
//! `YYYY-MM-DD`. Closed enums are stored as their lowercase discriminants.

use chrono::{DateTime, NaiveDate, Utc};
use simledger_core::{
  cost::{CostEntry, CostPeriod},
  invoice::{Invoice, InvoiceStatus},
  project::{Branch, Project},
  sim::{Attachments, Location, Provider, ServiceType, SimCard, SimWithCost},
};

use crate::{Error, Result};

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::Decode(format!("timestamp {s:?}: {e}")))
}

// ─── NaiveDate ───────────────────────────────────────────────────────────────

pub fn encode_date(d: NaiveDate) -> String { d.format("%Y-%m-%d").to_string() }

pub fn decode_date(s: &str) -> Result<NaiveDate> {
  NaiveDate::parse_from_str(s, "%Y-%m-%d")
    .map_err(|e| Error::Decode(format!("date {s:?}: {e}")))
}

// ─── ServiceType ─────────────────────────────────────────────────────────────

pub fn encode_service_type(t: ServiceType) -> &'static str {
  match t {
    ServiceType::Data => "data",
    ServiceType::Calls => "calls",
    ServiceType::Mixed => "mixed",
    ServiceType::VsatInternet => "vsat_internet",
    ServiceType::MicrowaveInternet => "microwave_internet",
  }
}

pub fn decode_service_type(s: &str) -> Result<ServiceType> {
  match s {
    "data" => Ok(ServiceType::Data),
    "calls" => Ok(ServiceType::Calls),
    "mixed" => Ok(ServiceType::Mixed),
    "vsat_internet" => Ok(ServiceType::VsatInternet),
    "microwave_internet" => Ok(ServiceType::MicrowaveInternet),
    other => Err(Error::Decode(format!("unknown service type: {other:?}"))),
  }
}

// ─── Provider ────────────────────────────────────────────────────────────────

pub fn encode_provider(p: Provider) -> &'static str {
  match p {
    Provider::Stc => "stc",
    Provider::Mobily => "mobily",
    Provider::Zain => "zain",
  }
}

pub fn decode_provider(s: &str) -> Result<Provider> {
  match s {
    "stc" => Ok(Provider::Stc),
    "mobily" => Ok(Provider::Mobily),
    "zain" => Ok(Provider::Zain),
    other => Err(Error::Decode(format!("unknown provider: {other:?}"))),
  }
}

// ─── Branch ──────────────────────────────────────────────────────────────────

pub fn encode_branch(b: Branch) -> &'static str {
  match b {
    Branch::Main => "main",
    Branch::Tabuk => "tabuk",
    Branch::Riyadh => "riyadh",
    Branch::Qassim => "qassim",
    Branch::Madinah => "madinah",
    Branch::Dammam => "dammam",
    Branch::Abha => "abha",
    Branch::Qiddiya => "qiddiya",
    Branch::Tamama => "tamama",
    Branch::Jeddah => "jeddah",
  }
}

pub fn decode_branch(s: &str) -> Result<Branch> {
  match s {
    "main" => Ok(Branch::Main),
    "tabuk" => Ok(Branch::Tabuk),
    "riyadh" => Ok(Branch::Riyadh),
    "qassim" => Ok(Branch::Qassim),
    "madinah" => Ok(Branch::Madinah),
    "dammam" => Ok(Branch::Dammam),
    "abha" => Ok(Branch::Abha),
    "qiddiya" => Ok(Branch::Qiddiya),
    "tamama" => Ok(Branch::Tamama),
    "jeddah" => Ok(Branch::Jeddah),
    other => Err(Error::Decode(format!("unknown branch: {other:?}"))),
  }
}

// ─── InvoiceStatus ───────────────────────────────────────────────────────────

pub fn encode_status(s: InvoiceStatus) -> &'static str {
  match s {
    InvoiceStatus::Draft => "draft",
    InvoiceStatus::Issued => "issued",
    InvoiceStatus::Paid => "paid",
  }
}

pub fn decode_status(s: &str) -> Result<InvoiceStatus> {
  match s {
    "draft" => Ok(InvoiceStatus::Draft),
    "issued" => Ok(InvoiceStatus::Issued),
    "paid" => Ok(InvoiceStatus::Paid),
    other => Err(Error::Decode(format!("unknown invoice status: {other:?}"))),
  }
}

// ─── Location columns ────────────────────────────────────────────────────────

/// Rebuild a [`Location`] from its three nullable columns. A row carries a
/// location only when both coordinates are present.
pub fn decode_location(
  lat: Option<f64>,
  lng: Option<f64>,
  address: Option<String>,
) -> Option<Location> {
  match (lat, lng) {
    (Some(lat), Some(lng)) => Some(Location {
      lat,
      lng,
      address: address.unwrap_or_default(),
    }),
    _ => None,
  }
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Raw column values read directly from a `sim_cards` row.
pub struct RawSimCard {
  pub id:           i64,
  pub number:       String,
  pub service_type: String,
  pub provider:     String,
  pub notes:        Option<String>,
  pub project_id:   Option<i64>,
  pub lat:          Option<f64>,
  pub lng:          Option<f64>,
  pub address:      Option<String>,
  pub dwg_data:     Option<String>,
  pub kmz_data:     Option<String>,
  pub created_at:   String,
  pub updated_at:   String,
}

impl RawSimCard {
  pub fn into_sim(self) -> Result<SimCard> {
    Ok(SimCard {
      id:           self.id,
      number:       self.number,
      service_type: decode_service_type(&self.service_type)?,
      provider:     decode_provider(&self.provider)?,
      notes:        self.notes,
      project_id:   self.project_id,
      location:     decode_location(self.lat, self.lng, self.address),
      attachments:  Attachments { dwg: self.dwg_data, kmz: self.kmz_data },
      created_at:   decode_dt(&self.created_at)?,
      updated_at:   decode_dt(&self.updated_at)?,
    })
  }
}

/// A `sim_cards` row left-joined with its cost entry for one period.
pub struct RawSimWithCost {
  pub sim:    RawSimCard,
  /// NULL when no entry exists for the period.
  pub amount: Option<f64>,
}

impl RawSimWithCost {
  pub fn into_sim_with_cost(self) -> Result<SimWithCost> {
    Ok(SimWithCost {
      sim:          self.sim.into_sim()?,
      monthly_cost: self.amount.unwrap_or(0.0),
    })
  }
}

/// Raw column values read directly from a `monthly_costs` row.
pub struct RawCostEntry {
  pub id:         i64,
  pub sim_id:     i64,
  pub amount:     f64,
  pub month:      u32,
  pub year:       i32,
  pub created_at: String,
}

impl RawCostEntry {
  pub fn into_entry(self) -> Result<CostEntry> {
    Ok(CostEntry {
      id:         self.id,
      sim_id:     self.sim_id,
      amount:     self.amount,
      period:     CostPeriod { month: self.month, year: self.year },
      created_at: decode_dt(&self.created_at)?,
    })
  }
}

/// Raw column values read directly from a `projects` row.
pub struct RawProject {
  pub id:          i64,
  pub name:        String,
  pub description: Option<String>,
  pub branch:      String,
  pub start_date:  String,
  pub end_date:    Option<String>,
  pub lat:         Option<f64>,
  pub lng:         Option<f64>,
  pub address:     Option<String>,
  pub created_at:  String,
  pub updated_at:  String,
}

impl RawProject {
  pub fn into_project(self) -> Result<Project> {
    Ok(Project {
      id:          self.id,
      name:        self.name,
      description: self.description,
      branch:      decode_branch(&self.branch)?,
      start_date:  decode_date(&self.start_date)?,
      end_date:    self.end_date.as_deref().map(decode_date).transpose()?,
      location:    decode_location(self.lat, self.lng, self.address),
      created_at:  decode_dt(&self.created_at)?,
      updated_at:  decode_dt(&self.updated_at)?,
    })
  }
}

/// Raw column values read directly from an `invoices` row.
pub struct RawInvoice {
  pub id:             i64,
  pub project_id:     i64,
  pub invoice_number: String,
  pub issue_date:     String,
  pub total_amount:   f64,
  pub status:         String,
  pub created_at:     String,
  pub updated_at:     String,
}

impl RawInvoice {
  pub fn into_invoice(self) -> Result<Invoice> {
    Ok(Invoice {
      id:             self.id,
      project_id:     self.project_id,
      invoice_number: self.invoice_number,
      issue_date:     decode_date(&self.issue_date)?,
      total_amount:   self.total_amount,
      status:         decode_status(&self.status)?,
      created_at:     decode_dt(&self.created_at)?,
      updated_at:     decode_dt(&self.updated_at)?,
    })
  }
}

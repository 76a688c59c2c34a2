//! Projects — the organizational grouping SIM cards are assigned to.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::sim::Location;

/// The fixed set of office locations a project belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Branch {
  Main,
  Tabuk,
  Riyadh,
  Qassim,
  Madinah,
  Dammam,
  Abha,
  Qiddiya,
  Tamama,
  Jeddah,
}

/// A persisted project record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
  pub id:          i64,
  pub name:        String,
  pub description: Option<String>,
  pub branch:      Branch,
  pub start_date:  NaiveDate,
  pub end_date:    Option<NaiveDate>,
  pub location:    Option<Location>,
  pub created_at:  DateTime<Utc>,
  pub updated_at:  DateTime<Utc>,
}

/// Input to [`crate::store::SimStore::add_project`].
#[derive(Debug, Clone, Deserialize)]
pub struct NewProject {
  pub name:        String,
  #[serde(default)]
  pub description: Option<String>,
  pub branch:      Branch,
  pub start_date:  NaiveDate,
  #[serde(default)]
  pub end_date:    Option<NaiveDate>,
  #[serde(default)]
  pub location:    Option<Location>,
}

/// Partial update for a project. Absent fields are left untouched.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProjectPatch {
  pub name:        Option<String>,
  pub description: Option<String>,
  pub branch:      Option<Branch>,
  pub start_date:  Option<NaiveDate>,
  pub end_date:    Option<NaiveDate>,
  pub location:    Option<Location>,
}

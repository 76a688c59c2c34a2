//! SIM card — the central record of the ledger.
//!
//! A SIM card stores only subscription identity and assignment metadata.
//! Its monthly cost is never stored on the record; it is resolved from the
//! cost-entry collection at read time (see [`crate::rollup`]).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The service a subscription line carries.
///
/// The two internet-link types are fixed installations and in practice carry
/// a [`Location`]; the store does not enforce this.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ServiceType {
  Data,
  Calls,
  Mixed,
  VsatInternet,
  MicrowaveInternet,
}

/// The mobile network operator the line is subscribed with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
  Stc,
  Mobily,
  Zain,
}

/// A geographic point with its reverse-geocoded address.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
  pub lat:     f64,
  pub lng:     f64,
  pub address: String,
}

/// Inline attachment payloads, stored as `data:` URLs.
///
/// Two named slots: a technical drawing (`dwg`) and a geospatial archive
/// (`kmz`). The store treats both as opaque strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachments {
  pub dwg: Option<String>,
  pub kmz: Option<String>,
}

/// A persisted SIM card record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimCard {
  pub id:           i64,
  /// The phone/line number; unique across the whole collection.
  pub number:       String,
  pub service_type: ServiceType,
  pub provider:     Provider,
  pub notes:        Option<String>,
  /// The project this line is assigned to, if any.
  pub project_id:   Option<i64>,
  pub location:     Option<Location>,
  #[serde(default)]
  pub attachments:  Attachments,
  pub created_at:   DateTime<Utc>,
  pub updated_at:   DateTime<Utc>,
}

/// Input to [`crate::store::SimStore::add_sim`].
///
/// `monthly_cost` is not a field of the stored record: when it is positive
/// the store records a cost entry for the current calendar period in the
/// same transaction as the SIM insert.
#[derive(Debug, Clone, Deserialize)]
pub struct NewSimCard {
  pub number:       String,
  pub service_type: ServiceType,
  pub provider:     Provider,
  #[serde(default)]
  pub notes:        Option<String>,
  #[serde(default)]
  pub project_id:   Option<i64>,
  #[serde(default)]
  pub location:     Option<Location>,
  #[serde(default)]
  pub attachments:  Attachments,
  /// Recurring charge for the current month; `0.0` records no entry.
  #[serde(default)]
  pub monthly_cost: f64,
}

/// Partial update for a SIM card. Absent fields are left untouched.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SimCardPatch {
  pub number:       Option<String>,
  pub service_type: Option<ServiceType>,
  pub provider:     Option<Provider>,
  pub notes:        Option<String>,
  pub project_id:   Option<i64>,
  pub location:     Option<Location>,
  pub attachments:  Option<Attachments>,
}

/// A SIM card paired with its resolved cost for one calendar period.
///
/// Produced by the store's joined read; a SIM with no entry for the period
/// carries a cost of zero.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimWithCost {
  #[serde(flatten)]
  pub sim:          SimCard,
  pub monthly_cost: f64,
}

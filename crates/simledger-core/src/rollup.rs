//! Cost roll-ups — the computed read models, never stored, always derived.
//!
//! Every function here is a pure reduction over in-memory collections the
//! caller has already read from the store; nothing in this module mutates
//! state or caches results. Callers re-read and recompute on every refresh,
//! which is O(n) over a collection of at most a few hundred records.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{
  project::{Branch, Project},
  sim::{Provider, ServiceType, SimWithCost},
};

/// Round to two decimals for money display.
pub fn round2(value: f64) -> f64 { (value * 100.0).round() / 100.0 }

/// Round to one decimal for percentage display.
fn round1(value: f64) -> f64 { (value * 10.0).round() / 10.0 }

// ─── Fleet summary ───────────────────────────────────────────────────────────

/// One SIM's slice of the fleet cost, for the cost-share chart.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CostShare {
  pub sim_id:       i64,
  pub number:       String,
  pub monthly_cost: f64,
  /// Share of the fleet monthly total, as a percentage rounded to one
  /// decimal. Zero when the fleet total is zero.
  pub percent:      f64,
}

/// Fleet-wide totals plus the per-SIM breakdown.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FleetSummary {
  pub sim_count:     usize,
  pub monthly_total: f64,
  pub annual_total:  f64,
  pub shares:        Vec<CostShare>,
}

/// Sum current monthly costs across the whole fleet.
pub fn fleet_summary(sims: &[SimWithCost]) -> FleetSummary {
  let monthly_total: f64 = sims.iter().map(|s| s.monthly_cost).sum();

  let shares = sims
    .iter()
    .map(|s| CostShare {
      sim_id:       s.sim.id,
      number:       s.sim.number.clone(),
      monthly_cost: round2(s.monthly_cost),
      percent:      if monthly_total > 0.0 {
        round1(s.monthly_cost / monthly_total * 100.0)
      } else {
        0.0
      },
    })
    .collect();

  FleetSummary {
    sim_count: sims.len(),
    monthly_total: round2(monthly_total),
    annual_total: round2(monthly_total * 12.0),
    shares,
  }
}

// ─── Project roll-up ─────────────────────────────────────────────────────────

/// Monthly and annual cost of the SIM cards assigned to one project.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectRollup {
  pub project_id:   i64,
  pub sim_count:    usize,
  pub monthly_cost: f64,
  /// Monthly cost × 12; no proration for partial months.
  pub annual_cost:  f64,
}

/// Sum the current monthly costs of exactly the SIM cards whose
/// `project_id` matches.
pub fn project_rollup(project_id: i64, sims: &[SimWithCost]) -> ProjectRollup {
  let assigned: Vec<&SimWithCost> = sims
    .iter()
    .filter(|s| s.sim.project_id == Some(project_id))
    .collect();
  let monthly: f64 = assigned.iter().map(|s| s.monthly_cost).sum();

  ProjectRollup {
    project_id,
    sim_count: assigned.len(),
    monthly_cost: round2(monthly),
    annual_cost: round2(monthly * 12.0),
  }
}

// ─── Invoice preview ─────────────────────────────────────────────────────────

/// One line of a printable invoice.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvoiceLine {
  pub sim_id:       i64,
  pub number:       String,
  pub service_type: ServiceType,
  pub provider:     Provider,
  pub monthly_cost: f64,
  pub annual_cost:  f64,
}

/// A printable invoice assembled on the fly from live project and SIM data.
/// Never persisted; see [`crate::invoice::Invoice`] for the durable records.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvoicePreview {
  pub invoice_number: String,
  pub project_id:     i64,
  pub project_name:   String,
  pub branch:         Branch,
  pub issue_date:     NaiveDate,
  pub lines:          Vec<InvoiceLine>,
  pub monthly_total:  f64,
  pub annual_total:   f64,
}

/// Assemble the printable invoice for `project` from the fleet snapshot.
///
/// Only SIM cards assigned to the project appear. The invoice number is
/// derived from the project id and issue date so repeated previews of the
/// same day are identical.
pub fn invoice_preview(
  project: &Project,
  sims: &[SimWithCost],
  issue_date: NaiveDate,
) -> InvoicePreview {
  let lines: Vec<InvoiceLine> = sims
    .iter()
    .filter(|s| s.sim.project_id == Some(project.id))
    .map(|s| InvoiceLine {
      sim_id:       s.sim.id,
      number:       s.sim.number.clone(),
      service_type: s.sim.service_type,
      provider:     s.sim.provider,
      monthly_cost: round2(s.monthly_cost),
      annual_cost:  round2(s.monthly_cost * 12.0),
    })
    .collect();

  let monthly_total: f64 = lines.iter().map(|l| l.monthly_cost).sum();

  InvoicePreview {
    invoice_number: format!("INV-{}-{}", project.id, issue_date.format("%Y%m%d")),
    project_id: project.id,
    project_name: project.name.clone(),
    branch: project.branch,
    issue_date,
    lines,
    monthly_total: round2(monthly_total),
    annual_total: round2(monthly_total * 12.0),
  }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

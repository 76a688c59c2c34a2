//! Persisted invoices.
//!
//! The printable invoice the presentation layer shows is a
//! [`crate::rollup::InvoicePreview`] computed on the fly; these records are
//! the durable ledger entries a project accumulates. Deleting a project
//! deletes its invoices with it.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InvoiceStatus {
  Draft,
  Issued,
  Paid,
}

/// A persisted invoice record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Invoice {
  pub id:             i64,
  pub project_id:     i64,
  pub invoice_number: String,
  pub issue_date:     NaiveDate,
  pub total_amount:   f64,
  pub status:         InvoiceStatus,
  pub created_at:     DateTime<Utc>,
  pub updated_at:     DateTime<Utc>,
}

/// Input to [`crate::store::SimStore::add_invoice`].
#[derive(Debug, Clone, Deserialize)]
pub struct NewInvoice {
  pub project_id:     i64,
  pub invoice_number: String,
  pub issue_date:     NaiveDate,
  pub total_amount:   f64,
  pub status:         InvoiceStatus,
}

/// Partial update for an invoice. Absent fields are left untouched.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct InvoicePatch {
  pub invoice_number: Option<String>,
  pub issue_date:     Option<NaiveDate>,
  pub total_amount:   Option<f64>,
  pub status:         Option<InvoiceStatus>,
}

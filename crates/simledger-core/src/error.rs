//! Error taxonomy for `simledger-core`.

use thiserror::Error;

use crate::cost::CostPeriod;

#[derive(Debug, Error)]
pub enum Error {
  #[error("SIM card not found: {0}")]
  SimNotFound(i64),

  #[error("project not found: {0}")]
  ProjectNotFound(i64),

  #[error("invoice not found: {0}")]
  InvoiceNotFound(i64),

  #[error("SIM number already registered: {0:?}")]
  DuplicateNumber(String),

  #[error("cost entry already recorded for SIM {sim_id} in {period}")]
  DuplicateCostPeriod { sim_id: i64, period: CostPeriod },

  #[error("invalid calendar month: {0} (expected 1-12)")]
  InvalidMonth(u32),

  #[error("cost amount must be non-negative, got {0}")]
  NegativeAmount(f64),

  #[error("storage error: {0}")]
  Storage(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

//! Monthly cost entries and the calendar periods they apply to.
//!
//! At most one entry exists per (SIM, month, year); the store enforces this
//! with a unique composite index, so "current cost" resolution is
//! unambiguous.

use chrono::{DateTime, Datelike, Utc};
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// A calendar month in a specific year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CostPeriod {
  /// 1-based calendar month.
  pub month: u32,
  pub year:  i32,
}

impl CostPeriod {
  /// Build a period, rejecting out-of-range months.
  pub fn new(month: u32, year: i32) -> Result<Self> {
    if !(1..=12).contains(&month) {
      return Err(Error::InvalidMonth(month));
    }
    Ok(Self { month, year })
  }

  /// The period containing `now`.
  pub fn containing(now: DateTime<Utc>) -> Self {
    Self { month: now.month(), year: now.year() }
  }

  /// The current calendar period.
  pub fn current() -> Self { Self::containing(Utc::now()) }
}

impl std::fmt::Display for CostPeriod {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "{:04}-{:02}", self.year, self.month)
  }
}

/// A persisted record of the recurring charge for one SIM in one month.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CostEntry {
  pub id:         i64,
  pub sim_id:     i64,
  pub amount:     f64,
  pub period:     CostPeriod,
  pub created_at: DateTime<Utc>,
}

/// Input to [`crate::store::SimStore::record_cost`].
#[derive(Debug, Clone, Deserialize)]
pub struct NewCostEntry {
  pub sim_id: i64,
  pub amount: f64,
  pub period: CostPeriod,
}

impl NewCostEntry {
  /// Validate the period and amount without touching the store.
  pub fn validate(&self) -> Result<()> {
    if !(1..=12).contains(&self.period.month) {
      return Err(Error::InvalidMonth(self.period.month));
    }
    if self.amount < 0.0 {
      return Err(Error::NegativeAmount(self.amount));
    }
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use chrono::TimeZone;

  use super::*;

  #[test]
  fn period_rejects_month_zero_and_thirteen() {
    assert!(matches!(CostPeriod::new(0, 2025), Err(Error::InvalidMonth(0))));
    assert!(matches!(
      CostPeriod::new(13, 2025),
      Err(Error::InvalidMonth(13))
    ));
    assert!(CostPeriod::new(1, 2025).is_ok());
    assert!(CostPeriod::new(12, 2025).is_ok());
  }

  #[test]
  fn period_containing_resolves_month_and_year() {
    let now = Utc.with_ymd_and_hms(2025, 3, 31, 23, 59, 0).unwrap();
    let period = CostPeriod::containing(now);
    assert_eq!(period, CostPeriod { month: 3, year: 2025 });
  }

  #[test]
  fn new_entry_validation() {
    let entry = NewCostEntry {
      sim_id: 1,
      amount: -5.0,
      period: CostPeriod { month: 1, year: 2025 },
    };
    assert!(matches!(entry.validate(), Err(Error::NegativeAmount(_))));

    let entry = NewCostEntry {
      sim_id: 1,
      amount: 0.0,
      period: CostPeriod { month: 1, year: 2025 },
    };
    assert!(entry.validate().is_ok());
  }
}

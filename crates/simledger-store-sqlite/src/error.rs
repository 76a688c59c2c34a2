//! Error type for `simledger-store-sqlite`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("core error: {0}")]
  Core(#[from] simledger_core::Error),

  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("decode error: {0}")]
  Decode(String),
}

/// Map store failures onto the core taxonomy so generic callers can react
/// to individual variants (duplicate key, not found) without knowing the
/// backend.
impl From<Error> for simledger_core::Error {
  fn from(err: Error) -> Self {
    match err {
      Error::Core(e) => e,
      other => simledger_core::Error::Storage(other.to_string()),
    }
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

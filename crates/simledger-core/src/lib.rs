//! Core types and trait definitions for the simledger SIM-card ledger.
//!
//! This crate is deliberately free of HTTP and database dependencies.
//! All other crates depend on it; it depends on nothing proprietary.

pub mod cost;
pub mod error;
pub mod invoice;
pub mod project;
pub mod rollup;
pub mod sim;
pub mod store;

pub use error::{Error, Result};

//! The `SimStore` trait.
//!
//! The trait is implemented by storage backends (e.g.
//! `simledger-store-sqlite`). Higher layers (`simledger-api`) depend on this
//! abstraction, not on any concrete backend.

use std::future::Future;

use crate::{
  cost::{CostEntry, CostPeriod, NewCostEntry},
  invoice::{Invoice, InvoicePatch, NewInvoice},
  project::{NewProject, Project, ProjectPatch},
  sim::{NewSimCard, SimCard, SimCardPatch, SimWithCost},
};

/// Abstraction over a simledger storage backend.
///
/// All identities are backend-assigned auto-increment integers. Mutations
/// stamp `created_at`/`updated_at`; partial updates merge onto the stored
/// record and refresh `updated_at`.
///
/// The associated error must convert into [`crate::Error`] so callers can
/// map backend failures onto the ledger's error taxonomy.
///
/// All methods return `Send` futures so the trait can be used in
/// multi-threaded async runtimes (e.g. tokio with `axum`).
pub trait SimStore: Send + Sync {
  type Error: std::error::Error + Into<crate::Error> + Send + Sync + 'static;

  // ── SIM cards ─────────────────────────────────────────────────────────

  /// Persist a new SIM card and return it with its assigned id.
  ///
  /// Fails with [`crate::Error::DuplicateNumber`] if the line number is
  /// already registered. When `input.monthly_cost > 0`, a cost entry for the
  /// current calendar period is recorded in the same transaction; a rejected
  /// add leaves no partial rows behind.
  fn add_sim(
    &self,
    input: NewSimCard,
  ) -> impl Future<Output = Result<SimCard, Self::Error>> + Send + '_;

  /// Retrieve a SIM card by id. Returns `None` if not found.
  fn get_sim(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<Option<SimCard>, Self::Error>> + Send + '_;

  /// List all SIM cards in insertion order.
  fn list_sims(
    &self,
  ) -> impl Future<Output = Result<Vec<SimCard>, Self::Error>> + Send + '_;

  /// List all SIM cards joined with their cost entry for `period`.
  /// A SIM with no entry for the period carries a cost of zero.
  fn list_sims_with_cost(
    &self,
    period: CostPeriod,
  ) -> impl Future<Output = Result<Vec<SimWithCost>, Self::Error>> + Send + '_;

  /// SIM cards assigned to `project_id`.
  fn sims_by_project(
    &self,
    project_id: i64,
  ) -> impl Future<Output = Result<Vec<SimCard>, Self::Error>> + Send + '_;

  /// Merge `patch` onto the stored record and refresh `updated_at`.
  /// Fails with [`crate::Error::SimNotFound`] if the id does not exist.
  fn update_sim(
    &self,
    id: i64,
    patch: SimCardPatch,
  ) -> impl Future<Output = Result<SimCard, Self::Error>> + Send + '_;

  /// Remove a SIM card and its cost entries. Removing an absent id is a
  /// no-op.
  fn delete_sim(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  // ── Cost entries ──────────────────────────────────────────────────────

  /// Record the charge for one SIM in one calendar period.
  ///
  /// Fails with [`crate::Error::DuplicateCostPeriod`] if an entry for the
  /// (SIM, month, year) triple already exists, and with
  /// [`crate::Error::SimNotFound`] if the SIM does not.
  fn record_cost(
    &self,
    input: NewCostEntry,
  ) -> impl Future<Output = Result<CostEntry, Self::Error>> + Send + '_;

  /// All cost entries for a SIM, oldest first.
  fn costs_for_sim(
    &self,
    sim_id: i64,
  ) -> impl Future<Output = Result<Vec<CostEntry>, Self::Error>> + Send + '_;

  /// Composite-index lookup of the entry for one (SIM, period) pair.
  fn cost_for_period(
    &self,
    sim_id: i64,
    period: CostPeriod,
  ) -> impl Future<Output = Result<Option<CostEntry>, Self::Error>> + Send + '_;

  // ── Projects ──────────────────────────────────────────────────────────

  fn add_project(
    &self,
    input: NewProject,
  ) -> impl Future<Output = Result<Project, Self::Error>> + Send + '_;

  fn get_project(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<Option<Project>, Self::Error>> + Send + '_;

  fn list_projects(
    &self,
  ) -> impl Future<Output = Result<Vec<Project>, Self::Error>> + Send + '_;

  /// Merge `patch` onto the stored record and refresh `updated_at`.
  /// Fails with [`crate::Error::ProjectNotFound`] if the id does not exist.
  fn update_project(
    &self,
    id: i64,
    patch: ProjectPatch,
  ) -> impl Future<Output = Result<Project, Self::Error>> + Send + '_;

  /// Remove a project. Its invoices are deleted with it and any SIM cards
  /// still referencing it have their assignment cleared. Removing an absent
  /// id is a no-op.
  fn delete_project(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  // ── Invoices ──────────────────────────────────────────────────────────

  /// Persist an invoice. Fails with [`crate::Error::ProjectNotFound`] if
  /// the referenced project does not exist.
  fn add_invoice(
    &self,
    input: NewInvoice,
  ) -> impl Future<Output = Result<Invoice, Self::Error>> + Send + '_;

  /// Index lookup of all invoices referencing `project_id`.
  fn invoices_for_project(
    &self,
    project_id: i64,
  ) -> impl Future<Output = Result<Vec<Invoice>, Self::Error>> + Send + '_;

  /// Merge `patch` onto the stored record and refresh `updated_at`.
  /// Fails with [`crate::Error::InvoiceNotFound`] if the id does not exist.
  fn update_invoice(
    &self,
    id: i64,
    patch: InvoicePatch,
  ) -> impl Future<Output = Result<Invoice, Self::Error>> + Send + '_;

  /// Remove an invoice. Removing an absent id is a no-op.
  fn delete_invoice(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;
}

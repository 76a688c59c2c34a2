//! JSON REST API for simledger.
//!
//! Exposes an axum [`Router`] backed by any [`simledger_core::store::SimStore`].
//! Auth, TLS, and transport concerns are the caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", simledger_api::api_router(state))
//! ```

pub mod error;
pub mod geocode;
pub mod invoices;
pub mod projects;
pub mod sims;
pub mod summary;

use std::sync::Arc;

use axum::{
  Router,
  routing::get,
};
use simledger_core::store::SimStore;
use simledger_geocode::Geocoder;

pub use error::ApiError;

/// Shared state handed to every handler: the store plus the best-effort
/// geocoding client.
pub struct ApiState<S> {
  pub store:    Arc<S>,
  pub geocoder: Geocoder,
}

// Manual impl: `S` itself need not be `Clone` behind the `Arc`.
impl<S> Clone for ApiState<S> {
  fn clone(&self) -> Self {
    Self { store: Arc::clone(&self.store), geocoder: self.geocoder.clone() }
  }
}

/// Build a fully-materialised API router for `state`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(state: ApiState<S>) -> Router<()>
where
  S: SimStore + Send + Sync + 'static,
{
  Router::new()
    // SIM cards
    .route("/sims", get(sims::list::<S>).post(sims::create::<S>))
    .route(
      "/sims/{id}",
      get(sims::get_one::<S>)
        .patch(sims::update::<S>)
        .delete(sims::delete::<S>),
    )
    .route(
      "/sims/{id}/costs",
      get(sims::list_costs::<S>).post(sims::record_cost::<S>),
    )
    // Projects
    .route(
      "/projects",
      get(projects::list::<S>).post(projects::create::<S>),
    )
    .route(
      "/projects/{id}",
      get(projects::get_one::<S>)
        .patch(projects::update::<S>)
        .delete(projects::delete::<S>),
    )
    .route("/projects/{id}/sims", get(projects::list_sims::<S>))
    .route("/projects/{id}/rollup", get(projects::rollup::<S>))
    .route("/projects/{id}/invoice", get(projects::invoice_preview::<S>))
    .route(
      "/projects/{id}/invoices",
      get(invoices::list_for_project::<S>).post(invoices::create::<S>),
    )
    // Invoices
    .route(
      "/invoices/{id}",
      axum::routing::patch(invoices::update::<S>).delete(invoices::delete::<S>),
    )
    // Fleet summary
    .route("/summary", get(summary::fleet::<S>))
    // Geocoding proxy
    .route("/geocode/reverse", get(geocode::reverse::<S>))
    .route("/geocode/search", get(geocode::search::<S>))
    .with_state(state)
}

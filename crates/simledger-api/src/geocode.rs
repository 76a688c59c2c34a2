//! Geocoding proxy handlers.
//!
//! Both endpoints are best-effort pass-throughs to the configured geocoding
//! service and always answer 200: reverse lookups fall back to a placeholder
//! address, searches to an empty list.

use axum::{
  Json,
  extract::{Query, State},
};
use serde::{Deserialize, Serialize};
use simledger_core::store::SimStore;
use simledger_geocode::Place;

use crate::{ApiState, error::ApiError};

#[derive(Debug, Deserialize)]
pub struct ReverseParams {
  pub lat: f64,
  pub lng: f64,
}

#[derive(Debug, Serialize)]
pub struct ReverseResponse {
  pub address: String,
}

/// `GET /geocode/reverse?lat=..&lng=..`
pub async fn reverse<S>(
  State(state): State<ApiState<S>>,
  Query(params): Query<ReverseParams>,
) -> Result<Json<ReverseResponse>, ApiError>
where
  S: SimStore,
{
  let address = state.geocoder.reverse(params.lat, params.lng).await;
  Ok(Json(ReverseResponse { address }))
}

#[derive(Debug, Deserialize)]
pub struct SearchParams {
  pub q: String,
}

/// `GET /geocode/search?q=..`
pub async fn search<S>(
  State(state): State<ApiState<S>>,
  Query(params): Query<SearchParams>,
) -> Result<Json<Vec<Place>>, ApiError>
where
  S: SimStore,
{
  Ok(Json(state.geocoder.search(&params.q).await))
}

//! Handler for `GET /summary` — fleet-wide totals and the cost-share
//! breakdown the chart renders.

use axum::{Json, extract::State};
use simledger_core::{
  cost::CostPeriod,
  rollup::{self, FleetSummary},
  store::SimStore,
};

use crate::{ApiState, error::ApiError};

/// `GET /summary`
pub async fn fleet<S>(
  State(state): State<ApiState<S>>,
) -> Result<Json<FleetSummary>, ApiError>
where
  S: SimStore,
{
  let snapshot = state
    .store
    .list_sims_with_cost(CostPeriod::current())
    .await
    .map_err(ApiError::from_store)?;
  Ok(Json(rollup::fleet_summary(&snapshot)))
}

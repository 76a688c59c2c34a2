//! Handlers for `/sims` endpoints.
//!
//! | Method  | Path | Notes |
//! |---------|------|-------|
//! | `GET`   | `/sims` | Full collection joined with current-period costs |
//! | `POST`  | `/sims` | Body: [`NewSimCard`]; 409 on duplicate number |
//! | `GET`   | `/sims/:id` | 404 if not found |
//! | `PATCH` | `/sims/:id` | Body: [`SimCardPatch`] |
//! | `DELETE`| `/sims/:id` | Idempotent; always 204 |
//! | `GET`   | `/sims/:id/costs` | Cost history, oldest first |
//! | `POST`  | `/sims/:id/costs` | Body: `{"amount":..,"period":{..}}` |

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use serde::Deserialize;
use simledger_core::{
  cost::{CostEntry, CostPeriod, NewCostEntry},
  sim::{NewSimCard, SimCard, SimCardPatch, SimWithCost},
  store::SimStore,
};

use crate::{ApiState, error::ApiError};

/// `GET /sims` — the full-refresh read the presentation layer runs after
/// every mutation: all SIM cards with their cost for the current period.
pub async fn list<S>(
  State(state): State<ApiState<S>>,
) -> Result<Json<Vec<SimWithCost>>, ApiError>
where
  S: SimStore,
{
  let sims = state
    .store
    .list_sims_with_cost(CostPeriod::current())
    .await
    .map_err(ApiError::from_store)?;
  Ok(Json(sims))
}

/// `POST /sims` — body carries the first month's charge alongside the
/// record fields; the store persists both atomically.
pub async fn create<S>(
  State(state): State<ApiState<S>>,
  Json(body): Json<NewSimCard>,
) -> Result<impl IntoResponse, ApiError>
where
  S: SimStore,
{
  let sim = state
    .store
    .add_sim(body)
    .await
    .map_err(ApiError::from_store)?;
  Ok((StatusCode::CREATED, Json(sim)))
}

/// `GET /sims/:id`
pub async fn get_one<S>(
  State(state): State<ApiState<S>>,
  Path(id): Path<i64>,
) -> Result<Json<SimCard>, ApiError>
where
  S: SimStore,
{
  let sim = state
    .store
    .get_sim(id)
    .await
    .map_err(ApiError::from_store)?
    .ok_or_else(|| ApiError::NotFound(format!("SIM card {id} not found")))?;
  Ok(Json(sim))
}

/// `PATCH /sims/:id`
pub async fn update<S>(
  State(state): State<ApiState<S>>,
  Path(id): Path<i64>,
  Json(patch): Json<SimCardPatch>,
) -> Result<Json<SimCard>, ApiError>
where
  S: SimStore,
{
  let sim = state
    .store
    .update_sim(id, patch)
    .await
    .map_err(ApiError::from_store)?;
  Ok(Json(sim))
}

/// `DELETE /sims/:id` — idempotent, always 204.
pub async fn delete<S>(
  State(state): State<ApiState<S>>,
  Path(id): Path<i64>,
) -> Result<StatusCode, ApiError>
where
  S: SimStore,
{
  state
    .store
    .delete_sim(id)
    .await
    .map_err(ApiError::from_store)?;
  Ok(StatusCode::NO_CONTENT)
}

/// `GET /sims/:id/costs`
pub async fn list_costs<S>(
  State(state): State<ApiState<S>>,
  Path(id): Path<i64>,
) -> Result<Json<Vec<CostEntry>>, ApiError>
where
  S: SimStore,
{
  // Distinguish "no entries" from "no such SIM".
  state
    .store
    .get_sim(id)
    .await
    .map_err(ApiError::from_store)?
    .ok_or_else(|| ApiError::NotFound(format!("SIM card {id} not found")))?;

  let costs = state
    .store
    .costs_for_sim(id)
    .await
    .map_err(ApiError::from_store)?;
  Ok(Json(costs))
}

#[derive(Debug, Deserialize)]
pub struct RecordCostBody {
  pub amount: f64,
  pub period: CostPeriod,
}

/// `POST /sims/:id/costs` — 409 if the period already has an entry.
pub async fn record_cost<S>(
  State(state): State<ApiState<S>>,
  Path(id): Path<i64>,
  Json(body): Json<RecordCostBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: SimStore,
{
  let entry = state
    .store
    .record_cost(NewCostEntry {
      sim_id: id,
      amount: body.amount,
      period: body.period,
    })
    .await
    .map_err(ApiError::from_store)?;
  Ok((StatusCode::CREATED, Json(entry)))
}

//! Handlers for `/projects` endpoints.
//!
//! | Method  | Path | Notes |
//! |---------|------|-------|
//! | `GET`   | `/projects` | Full collection |
//! | `POST`  | `/projects` | Body: [`NewProject`] |
//! | `GET`   | `/projects/:id` | 404 if not found |
//! | `PATCH` | `/projects/:id` | Body: [`ProjectPatch`] |
//! | `DELETE`| `/projects/:id` | 409 while SIM cards still reference it |
//! | `GET`   | `/projects/:id/sims` | Assigned SIM cards |
//! | `GET`   | `/projects/:id/rollup` | Monthly/annual cost roll-up |
//! | `GET`   | `/projects/:id/invoice` | On-the-fly printable invoice |

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use chrono::Utc;
use simledger_core::{
  cost::CostPeriod,
  project::{NewProject, Project, ProjectPatch},
  rollup::{self, InvoicePreview, ProjectRollup},
  sim::SimCard,
  store::SimStore,
};

use crate::{ApiState, error::ApiError};

async fn require_project<S>(state: &ApiState<S>, id: i64) -> Result<Project, ApiError>
where
  S: SimStore,
{
  state
    .store
    .get_project(id)
    .await
    .map_err(ApiError::from_store)?
    .ok_or_else(|| ApiError::NotFound(format!("project {id} not found")))
}

/// `GET /projects`
pub async fn list<S>(
  State(state): State<ApiState<S>>,
) -> Result<Json<Vec<Project>>, ApiError>
where
  S: SimStore,
{
  let projects = state
    .store
    .list_projects()
    .await
    .map_err(ApiError::from_store)?;
  Ok(Json(projects))
}

/// `POST /projects`
pub async fn create<S>(
  State(state): State<ApiState<S>>,
  Json(body): Json<NewProject>,
) -> Result<impl IntoResponse, ApiError>
where
  S: SimStore,
{
  let project = state
    .store
    .add_project(body)
    .await
    .map_err(ApiError::from_store)?;
  Ok((StatusCode::CREATED, Json(project)))
}

/// `GET /projects/:id`
pub async fn get_one<S>(
  State(state): State<ApiState<S>>,
  Path(id): Path<i64>,
) -> Result<Json<Project>, ApiError>
where
  S: SimStore,
{
  Ok(Json(require_project(&state, id).await?))
}

/// `PATCH /projects/:id`
pub async fn update<S>(
  State(state): State<ApiState<S>>,
  Path(id): Path<i64>,
  Json(patch): Json<ProjectPatch>,
) -> Result<Json<Project>, ApiError>
where
  S: SimStore,
{
  let project = state
    .store
    .update_project(id, patch)
    .await
    .map_err(ApiError::from_store)?;
  Ok(Json(project))
}

/// `DELETE /projects/:id`
///
/// Refused with 409 while SIM cards are still assigned, so a project cannot
/// silently lose its fleet from the default surface. Reassign or delete the
/// SIM cards first.
pub async fn delete<S>(
  State(state): State<ApiState<S>>,
  Path(id): Path<i64>,
) -> Result<StatusCode, ApiError>
where
  S: SimStore,
{
  let assigned = state
    .store
    .sims_by_project(id)
    .await
    .map_err(ApiError::from_store)?;
  if !assigned.is_empty() {
    return Err(ApiError::Conflict(format!(
      "project {id} still has {} assigned SIM card(s)",
      assigned.len()
    )));
  }

  state
    .store
    .delete_project(id)
    .await
    .map_err(ApiError::from_store)?;
  Ok(StatusCode::NO_CONTENT)
}

/// `GET /projects/:id/sims`
pub async fn list_sims<S>(
  State(state): State<ApiState<S>>,
  Path(id): Path<i64>,
) -> Result<Json<Vec<SimCard>>, ApiError>
where
  S: SimStore,
{
  require_project(&state, id).await?;
  let sims = state
    .store
    .sims_by_project(id)
    .await
    .map_err(ApiError::from_store)?;
  Ok(Json(sims))
}

/// `GET /projects/:id/rollup`
pub async fn rollup<S>(
  State(state): State<ApiState<S>>,
  Path(id): Path<i64>,
) -> Result<Json<ProjectRollup>, ApiError>
where
  S: SimStore,
{
  require_project(&state, id).await?;
  let snapshot = state
    .store
    .list_sims_with_cost(CostPeriod::current())
    .await
    .map_err(ApiError::from_store)?;
  Ok(Json(rollup::project_rollup(id, &snapshot)))
}

/// `GET /projects/:id/invoice` — the printable invoice, assembled from live
/// data and never persisted.
pub async fn invoice_preview<S>(
  State(state): State<ApiState<S>>,
  Path(id): Path<i64>,
) -> Result<Json<InvoicePreview>, ApiError>
where
  S: SimStore,
{
  let project = require_project(&state, id).await?;
  let snapshot = state
    .store
    .list_sims_with_cost(CostPeriod::current())
    .await
    .map_err(ApiError::from_store)?;
  let today = Utc::now().date_naive();
  Ok(Json(rollup::invoice_preview(&project, &snapshot, today)))
}

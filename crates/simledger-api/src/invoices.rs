//! Handlers for persisted invoices.
//!
//! | Method  | Path | Notes |
//! |---------|------|-------|
//! | `GET`   | `/projects/:id/invoices` | Index lookup by project |
//! | `POST`  | `/projects/:id/invoices` | Body: [`NewInvoiceBody`] |
//! | `PATCH` | `/invoices/:id` | Body: [`InvoicePatch`] |
//! | `DELETE`| `/invoices/:id` | Idempotent; always 204 |

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use chrono::NaiveDate;
use serde::Deserialize;
use simledger_core::{
  invoice::{Invoice, InvoicePatch, InvoiceStatus, NewInvoice},
  store::SimStore,
};

use crate::{ApiState, error::ApiError};

/// `GET /projects/:id/invoices`
pub async fn list_for_project<S>(
  State(state): State<ApiState<S>>,
  Path(project_id): Path<i64>,
) -> Result<Json<Vec<Invoice>>, ApiError>
where
  S: SimStore,
{
  state
    .store
    .get_project(project_id)
    .await
    .map_err(ApiError::from_store)?
    .ok_or_else(|| ApiError::NotFound(format!("project {project_id} not found")))?;

  let invoices = state
    .store
    .invoices_for_project(project_id)
    .await
    .map_err(ApiError::from_store)?;
  Ok(Json(invoices))
}

#[derive(Debug, Deserialize)]
pub struct NewInvoiceBody {
  pub invoice_number: String,
  pub issue_date:     NaiveDate,
  pub total_amount:   f64,
  #[serde(default = "default_status")]
  pub status:         InvoiceStatus,
}

fn default_status() -> InvoiceStatus { InvoiceStatus::Draft }

/// `POST /projects/:id/invoices`
pub async fn create<S>(
  State(state): State<ApiState<S>>,
  Path(project_id): Path<i64>,
  Json(body): Json<NewInvoiceBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: SimStore,
{
  let invoice = state
    .store
    .add_invoice(NewInvoice {
      project_id,
      invoice_number: body.invoice_number,
      issue_date: body.issue_date,
      total_amount: body.total_amount,
      status: body.status,
    })
    .await
    .map_err(ApiError::from_store)?;
  Ok((StatusCode::CREATED, Json(invoice)))
}

/// `PATCH /invoices/:id`
pub async fn update<S>(
  State(state): State<ApiState<S>>,
  Path(id): Path<i64>,
  Json(patch): Json<InvoicePatch>,
) -> Result<Json<Invoice>, ApiError>
where
  S: SimStore,
{
  let invoice = state
    .store
    .update_invoice(id, patch)
    .await
    .map_err(ApiError::from_store)?;
  Ok(Json(invoice))
}

/// `DELETE /invoices/:id` — idempotent, always 204.
pub async fn delete<S>(
  State(state): State<ApiState<S>>,
  Path(id): Path<i64>,
) -> Result<StatusCode, ApiError>
where
  S: SimStore,
{
  state
    .store
    .delete_invoice(id)
    .await
    .map_err(ApiError::from_store)?;
  Ok(StatusCode::NO_CONTENT)
}

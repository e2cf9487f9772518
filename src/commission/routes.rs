//! HTTP handlers for agent commissions

use axum::{
    extract::{Path, State},
    routing::post,
    Json, Router,
};

use crate::error::Result;
use crate::AppState;

use super::requests::{BatchCommissionRequest, CalculateCommissionRequest};
use super::responses::{BatchCommissionResponse, CommissionResponse};
use super::services;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/calculate", post(calculate))
        .route("/batch", post(batch))
        .route("/:id/pay", post(pay))
        .route("/:id/cancel", post(cancel))
}

async fn calculate(
    State(state): State<AppState>,
    Json(req): Json<CalculateCommissionRequest>,
) -> Result<Json<CommissionResponse>> {
    let commission = services::calculate_commission(&state.db, req.agent_id, req.invoice_id).await?;
    Ok(Json(commission.into()))
}

async fn batch(
    State(state): State<AppState>,
    Json(req): Json<BatchCommissionRequest>,
) -> Result<Json<BatchCommissionResponse>> {
    let result = services::calculate_batch(&state.db, req.agent_id, req.invoice_ids).await?;
    Ok(Json(result.into()))
}

async fn pay(State(state): State<AppState>, Path(id): Path<i64>) -> Result<Json<CommissionResponse>> {
    let commission = services::mark_paid(&state.db, id).await?;
    Ok(Json(commission.into()))
}

async fn cancel(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<CommissionResponse>> {
    let commission = services::cancel(&state.db, id).await?;
    Ok(Json(commission.into()))
}

//! HTTP handlers for the pricing engine

use axum::{extract::State, routing::post, Json, Router};
use chrono::Utc;

use crate::error::Result;
use crate::AppState;

use super::requests::{OverlapRequest, ResolvePriceRequest, TieredPriceRequest};
use super::resolver::PriceQuery;
use super::responses::{OverlapResponse, ResolvedPriceResponse, TieredPriceResponse};
use super::services;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/resolve", post(resolve))
        .route("/tiered", post(tiered))
        .route("/overlaps", post(overlaps))
}

/// Best offer for a dive count, `null` when nothing matches
async fn resolve(
    State(state): State<AppState>,
    Json(req): Json<ResolvePriceRequest>,
) -> Result<Json<Option<ResolvedPriceResponse>>> {
    let query = PriceQuery {
        dive_count: req.dive_count,
        service_type: req.service_type,
        customer_type: req.customer_type,
        date: req.date.unwrap_or_else(|| Utc::now().date_naive()),
    };

    let resolved = services::resolve_price(&state.db, &query).await?;
    Ok(Json(resolved.map(ResolvedPriceResponse::from)))
}

async fn tiered(
    State(state): State<AppState>,
    Json(req): Json<TieredPriceRequest>,
) -> Result<Json<TieredPriceResponse>> {
    let total =
        services::calculate_item_tiered_price(&state.db, req.price_list_item_id, req.dive_count)
            .await?;

    Ok(Json(TieredPriceResponse {
        price_list_item_id: req.price_list_item_id,
        dive_count: req.dive_count,
        total_price: total,
    }))
}

async fn overlaps(
    State(state): State<AppState>,
    Json(req): Json<OverlapRequest>,
) -> Result<Json<OverlapResponse>> {
    let overlaps = services::find_overlaps(&state.db, &req.service_type, req.dive_count).await?;

    Ok(Json(OverlapResponse {
        service_type: req.service_type,
        overlaps,
    }))
}

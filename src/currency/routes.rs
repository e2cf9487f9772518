//! HTTP handlers for currency conversion

use axum::{extract::State, routing::post, Json, Router};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::pricing::calculators::round_money;
use crate::AppState;

use super::services;

#[derive(Debug, Deserialize)]
pub struct ConvertRequest {
    pub dive_center_id: i64,
    #[serde(with = "rust_decimal::serde::str")]
    pub amount: Decimal,
    /// Defaults to the dive center's base currency
    #[serde(default)]
    pub from: Option<String>,
    #[serde(default)]
    pub to: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ConvertResponse {
    #[serde(with = "rust_decimal::serde::str")]
    pub amount: Decimal,
    pub from: String,
    #[serde(with = "rust_decimal::serde::str")]
    pub converted: Decimal,
    pub to: String,
}

pub fn router() -> Router<AppState> {
    Router::new().route("/convert", post(convert))
}

async fn convert(
    State(state): State<AppState>,
    Json(req): Json<ConvertRequest>,
) -> Result<Json<ConvertResponse>> {
    let (converted, from, to) = services::convert(
        &state.db,
        &state.cache,
        req.dive_center_id,
        req.amount,
        req.from.as_deref(),
        req.to.as_deref(),
    )
    .await?;

    Ok(Json(ConvertResponse {
        amount: req.amount,
        from,
        converted: round_money(converted, 2),
        to,
    }))
}

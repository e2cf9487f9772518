//! Tax percentages applied on invoices

pub mod services;

use axum::{extract::State, routing::get, Json, Router};

use crate::error::Result;
use crate::models::TaxRates;
use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/", get(show).put(update))
}

async fn show(State(state): State<AppState>) -> Result<Json<TaxRates>> {
    let rates = services::get_tax_rates(&state.db, &state.cache).await?;
    Ok(Json(rates))
}

async fn update(
    State(state): State<AppState>,
    Json(rates): Json<TaxRates>,
) -> Result<Json<TaxRates>> {
    services::update_tax_rates(&state.db, &state.cache, &rates).await?;
    Ok(Json(rates))
}

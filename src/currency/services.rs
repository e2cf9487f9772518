//! Conversion using the dive center's stored rates.

use std::sync::Arc;

use rust_decimal::Decimal;
use sqlx::PgPool;
use tracing::debug;

use crate::cache::AppCache;
use crate::db;
use crate::error::Result;

use super::{CurrencyError, ExchangeRateTable};

/// Exchange-rate table of a dive center, from cache when present
pub async fn rate_table(
    pool: &PgPool,
    cache: &AppCache,
    dive_center_id: i64,
) -> Result<Arc<ExchangeRateTable>> {
    if let Some(cached) = cache.exchange_rates.get(&dive_center_id).await {
        debug!(dive_center_id, "Cache HIT for exchange rates");
        return Ok(cached);
    }

    let center = db::get_dive_center(pool, dive_center_id)
        .await?
        .ok_or(CurrencyError::DiveCenterNotFound(dive_center_id))?;

    let table = Arc::new(center.rate_table());
    cache
        .exchange_rates
        .insert(dive_center_id, Arc::clone(&table))
        .await;

    Ok(table)
}

/// Convert an amount for a dive center; `from`/`to` default to its base currency
pub async fn convert(
    pool: &PgPool,
    cache: &AppCache,
    dive_center_id: i64,
    amount: Decimal,
    from: Option<&str>,
    to: Option<&str>,
) -> Result<(Decimal, String, String)> {
    let table = rate_table(pool, cache, dive_center_id).await?;

    let from = from.unwrap_or(table.base()).to_ascii_uppercase();
    let to = to.unwrap_or(table.base()).to_ascii_uppercase();

    let converted = table.convert(amount, &from, &to)?;
    debug!(dive_center_id, %from, %to, amount = %amount, converted = %converted, "Converted price");

    Ok((converted, from, to))
}

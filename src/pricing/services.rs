//! Pricing service functions with database access.
//!
//! These functions load rows and hand them to the pure calculators.

use rust_decimal::Decimal;
use sqlx::PgPool;
use tracing::debug;

use crate::error::AppError;

use super::calculators::calculate_tiered_price;
use super::models::PricingModel;
use super::overlap::{detect_overlaps, RangeOverlap};
use super::queries;
use super::resolver::{resolve_dive_price, PriceQuery, ResolvedPrice};

/// Pricing calculation error types
#[derive(Debug, Clone, thiserror::Error)]
pub enum PricingError {
    #[error("Dive count must be positive, got {0}")]
    InvalidDiveCount(i32),

    #[error("Price list item {item_id} not found")]
    ItemNotFound { item_id: i64 },

    #[error("Price list item {item_id} uses {model} pricing, expected TIERED")]
    NotTiered { item_id: i64, model: &'static str },

    #[error("No tier of price list item {item_id} applies to {dive_count} dives")]
    NoApplicableTier { item_id: i64, dive_count: i32 },
}

/// Resolve the best offer for a dive count.
///
/// Returns `Ok(None)` when nothing matches.
pub async fn resolve_price(
    pool: &PgPool,
    query: &PriceQuery,
) -> Result<Option<ResolvedPrice>, AppError> {
    if query.dive_count <= 0 {
        return Err(PricingError::InvalidDiveCount(query.dive_count).into());
    }

    let items = queries::find_active_items_by_service_type(pool, &query.service_type).await?;

    let tiered_ids: Vec<i64> = items
        .iter()
        .filter(|item| item.pricing_model == PricingModel::Tiered)
        .map(|item| item.id)
        .collect();
    let tiers = queries::find_tiers_for_items(pool, &tiered_ids).await?;

    let resolved = resolve_dive_price(&items, &tiers, query);

    match &resolved {
        Some(r) => debug!(
            service_type = %query.service_type,
            dive_count = query.dive_count,
            item_id = r.item.id,
            total = %r.total_price,
            "Resolved dive price"
        ),
        None => debug!(
            service_type = %query.service_type,
            dive_count = query.dive_count,
            candidates = items.len(),
            "No price list item matched"
        ),
    }

    Ok(resolved)
}

/// Price a stored `TIERED` item for a dive count.
pub async fn calculate_item_tiered_price(
    pool: &PgPool,
    item_id: i64,
    dive_count: i32,
) -> Result<Decimal, AppError> {
    if dive_count <= 0 {
        return Err(PricingError::InvalidDiveCount(dive_count).into());
    }

    let item = queries::get_item(pool, item_id)
        .await?
        .ok_or(PricingError::ItemNotFound { item_id })?;

    if item.pricing_model != PricingModel::Tiered {
        return Err(PricingError::NotTiered {
            item_id,
            model: item.pricing_model.as_str(),
        }
        .into());
    }

    let tiers = queries::find_tiers_for_items(pool, &[item_id]).await?;
    let item_tiers = tiers.get(&item_id).map(Vec::as_slice).unwrap_or_default();

    let total = calculate_tiered_price(dive_count, item_tiers)
        .ok_or(PricingError::NoApplicableTier { item_id, dive_count })?;

    Ok(total)
}

/// List overlapping dive ranges among the active items of a service type.
pub async fn find_overlaps(
    pool: &PgPool,
    service_type: &str,
    dive_count: Option<i32>,
) -> Result<Vec<RangeOverlap>, AppError> {
    let items = queries::find_active_items_by_service_type(pool, service_type).await?;
    let overlaps = detect_overlaps(&items, service_type, dive_count);

    if !overlaps.is_empty() {
        debug!(
            service_type,
            count = overlaps.len(),
            "Overlapping price list ranges found"
        );
    }

    Ok(overlaps)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pricing_error_display() {
        let err = PricingError::ItemNotFound { item_id: 42 };
        assert!(err.to_string().contains("42"));

        let err = PricingError::NotTiered {
            item_id: 7,
            model: "RANGE",
        };
        assert!(err.to_string().contains("RANGE"));

        let err = PricingError::NoApplicableTier {
            item_id: 7,
            dive_count: 2,
        };
        assert!(err.to_string().contains("2 dives"));
    }
}

//! Database queries for the pricing engine.

use std::collections::HashMap;

use sqlx::PgPool;

use crate::error::AppError;

use super::models::{PriceListItem, PriceListItemTier};

const PRICE_LIST_ITEM_COLUMNS: &str = r#"
    id, price_list_id, service_type, pricing_model,
    min_dives, max_dives, base_price, price, currency,
    priority, applicable_to, is_active,
    valid_from, valid_until, created_at
"#;

/// Active items of a service type; date, range and applicability filtering
/// happens in the resolver.
pub async fn find_active_items_by_service_type(
    pool: &PgPool,
    service_type: &str,
) -> Result<Vec<PriceListItem>, AppError> {
    let sql = format!(
        r#"
        SELECT {PRICE_LIST_ITEM_COLUMNS}
        FROM price_list_items
        WHERE service_type = $1
          AND is_active = true
          AND deleted_at IS NULL
        ORDER BY id
        "#
    );

    let items = sqlx::query_as::<_, PriceListItem>(&sql)
        .bind(service_type)
        .fetch_all(pool)
        .await?;

    Ok(items)
}

/// Get a single item by id
pub async fn get_item(pool: &PgPool, item_id: i64) -> Result<Option<PriceListItem>, AppError> {
    let sql = format!(
        r#"
        SELECT {PRICE_LIST_ITEM_COLUMNS}
        FROM price_list_items
        WHERE id = $1
          AND deleted_at IS NULL
        "#
    );

    let item = sqlx::query_as::<_, PriceListItem>(&sql)
        .bind(item_id)
        .fetch_optional(pool)
        .await?;

    Ok(item)
}

/// Tiers of the given items, grouped by item id and ordered by `from_dives`
pub async fn find_tiers_for_items(
    pool: &PgPool,
    item_ids: &[i64],
) -> Result<HashMap<i64, Vec<PriceListItemTier>>, AppError> {
    if item_ids.is_empty() {
        return Ok(HashMap::new());
    }

    let tiers = sqlx::query_as::<_, PriceListItemTier>(
        r#"
        SELECT id, price_list_item_id, from_dives, to_dives, total_price, price_per_dive
        FROM price_list_item_tiers
        WHERE price_list_item_id = ANY($1)
        ORDER BY price_list_item_id, from_dives
        "#,
    )
    .bind(item_ids)
    .fetch_all(pool)
    .await?;

    let mut grouped: HashMap<i64, Vec<PriceListItemTier>> = HashMap::new();
    for tier in tiers {
        grouped.entry(tier.price_list_item_id).or_default().push(tier);
    }

    Ok(grouped)
}

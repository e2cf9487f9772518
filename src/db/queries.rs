//! Database queries for dive center settings

use rust_decimal::Decimal;
use sqlx::{PgExecutor, PgPool};

use crate::error::Result;
use crate::models::{DiveCenter, TaxSetting};

/// Get a dive center with its exchange-rate table
pub async fn get_dive_center(pool: &PgPool, dive_center_id: i64) -> Result<Option<DiveCenter>> {
    let center = sqlx::query_as::<_, DiveCenter>(
        r#"
        SELECT id, name, base_currency, exchange_rates
        FROM dive_centers
        WHERE id = $1
        "#,
    )
    .bind(dive_center_id)
    .fetch_optional(pool)
    .await?;

    Ok(center)
}

/// Get the tax percentages
pub async fn get_tax_settings(pool: &PgPool, keys: &[&str]) -> Result<Vec<TaxSetting>> {
    let keys: Vec<String> = keys.iter().map(|k| k.to_string()).collect();

    let settings = sqlx::query_as::<_, TaxSetting>(
        r#"
        SELECT key, percentage
        FROM tax_settings
        WHERE key = ANY($1)
        "#,
    )
    .bind(&keys)
    .fetch_all(pool)
    .await?;

    Ok(settings)
}

/// Insert or overwrite one tax percentage
pub async fn upsert_tax_setting<'e, E>(executor: E, key: &str, percentage: Decimal) -> Result<()>
where
    E: PgExecutor<'e>,
{
    sqlx::query(
        r#"
        INSERT INTO tax_settings (key, percentage, updated_at)
        VALUES ($1, $2, NOW())
        ON CONFLICT (key) DO UPDATE
        SET percentage = EXCLUDED.percentage,
            updated_at = NOW()
        "#,
    )
    .bind(key)
    .bind(percentage)
    .execute(executor)
    .await?;

    Ok(())
}

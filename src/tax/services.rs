//! Tax settings with a read-through cache.

use sqlx::PgPool;
use tracing::{debug, info};

use crate::cache::AppCache;
use crate::db;
use crate::error::{AppError, Result};
use crate::models::dive_center::{SERVICE_CHARGE_KEY, VAT_KEY};
use crate::models::TaxRates;

/// Current tax percentages, from cache when present
pub async fn get_tax_rates(pool: &PgPool, cache: &AppCache) -> Result<TaxRates> {
    if let Some(cached) = cache.get_tax_rates().await {
        debug!("Cache HIT for tax rates");
        return Ok((*cached).clone());
    }

    debug!("Cache MISS for tax rates");
    let settings = db::get_tax_settings(pool, &[VAT_KEY, SERVICE_CHARGE_KEY]).await?;
    let rates = TaxRates::from_settings(&settings);
    cache.put_tax_rates(rates.clone()).await;

    Ok(rates)
}

/// Store new tax percentages and drop the cached copy
pub async fn update_tax_rates(pool: &PgPool, cache: &AppCache, rates: &TaxRates) -> Result<()> {
    validate(rates)?;

    let mut tx = pool.begin().await?;
    db::upsert_tax_setting(&mut *tx, VAT_KEY, rates.vat).await?;
    db::upsert_tax_setting(&mut *tx, SERVICE_CHARGE_KEY, rates.service_charge).await?;
    tx.commit().await?;

    cache.invalidate_tax_rates().await;
    info!(vat = %rates.vat, service_charge = %rates.service_charge, "Tax rates updated");

    Ok(())
}

fn validate(rates: &TaxRates) -> Result<()> {
    for (name, value) in [("vat", rates.vat), ("service_charge", rates.service_charge)] {
        if value.is_sign_negative() || value > rust_decimal::Decimal::ONE_HUNDRED {
            return Err(AppError::Validation(format!(
                "{} must be between 0 and 100, got {}",
                name, value
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_validate_bounds() {
        let ok = TaxRates {
            vat: dec!(5),
            service_charge: dec!(0),
        };
        assert!(validate(&ok).is_ok());

        let negative = TaxRates {
            vat: dec!(-1),
            service_charge: dec!(0),
        };
        assert!(validate(&negative).is_err());

        let too_high = TaxRates {
            vat: dec!(5),
            service_charge: dec!(100.5),
        };
        assert!(validate(&too_high).is_err());
    }
}

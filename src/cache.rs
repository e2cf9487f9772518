//! In-memory caching using moka
//!
//! Tax percentages and exchange-rate tables change rarely and are read on
//! every invoice or conversion, so they are served from memory.

use moka::future::Cache;
use serde::Serialize;
use sqlx::PgPool;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::interval;
use tracing::{info, warn};

use crate::config::Config;
use crate::currency::ExchangeRateTable;
use crate::models::TaxRates;
use crate::tax;

const TAX_RATES_KEY: &str = "tax_rates";

/// Application cache holding tax rates and exchange-rate tables
#[derive(Clone)]
pub struct AppCache {
    /// Tax percentages (singleton)
    pub tax_rates: Cache<String, Arc<TaxRates>>,
    /// Exchange-rate tables (dive_center_id -> table)
    pub exchange_rates: Cache<i64, Arc<ExchangeRateTable>>,
}

impl AppCache {
    /// Create a new cache instance with configured TTLs
    pub fn new(tax_ttl: Duration, rate_ttl: Duration) -> Self {
        Self {
            // Tax rates: 1 entry, invalidated explicitly on update
            tax_rates: Cache::builder()
                .max_capacity(1)
                .time_to_live(tax_ttl)
                .build(),

            // Exchange rates: one table per dive center
            exchange_rates: Cache::builder()
                .max_capacity(100)
                .time_to_live(rate_ttl)
                .build(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.tax_cache_ttl, config.rate_cache_ttl)
    }

    /// Get cache statistics for monitoring
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            tax_rates_cached: self.tax_rates.entry_count() > 0,
            exchange_rate_tables: self.exchange_rates.entry_count(),
        }
    }

    pub async fn get_tax_rates(&self) -> Option<Arc<TaxRates>> {
        self.tax_rates.get(TAX_RATES_KEY).await
    }

    pub async fn put_tax_rates(&self, rates: TaxRates) {
        self.tax_rates
            .insert(TAX_RATES_KEY.to_string(), Arc::new(rates))
            .await;
    }

    pub async fn invalidate_tax_rates(&self) {
        self.tax_rates.invalidate(TAX_RATES_KEY).await;
        info!("Tax rate cache invalidated");
    }

    /// Invalidate all caches
    pub fn invalidate_all(&self) {
        self.tax_rates.invalidate_all();
        self.exchange_rates.invalidate_all();
        info!("All caches invalidated");
    }
}

impl Default for AppCache {
    fn default() -> Self {
        Self::new(Duration::from_secs(60 * 60), Duration::from_secs(10 * 60))
    }
}

/// Cache statistics for monitoring endpoint
#[derive(Debug, Clone, Serialize)]
pub struct CacheStats {
    pub tax_rates_cached: bool,
    pub exchange_rate_tables: u64,
}

/// Start background cache warmer
///
/// Warms the tax rates on startup and refreshes them every 30 minutes.
pub async fn start_cache_warmer(cache: AppCache, db: PgPool) {
    let mut interval = interval(Duration::from_secs(30 * 60));
    loop {
        // First tick completes immediately
        interval.tick().await;
        warm_cache(&cache, &db).await;
    }
}

async fn warm_cache(cache: &AppCache, db: &PgPool) {
    cache.invalidate_tax_rates().await;
    match tax::services::get_tax_rates(db, cache).await {
        Ok(rates) => info!(vat = %rates.vat, service_charge = %rates.service_charge, "Tax rates warmed"),
        Err(e) => warn!("Failed to warm tax rate cache: {}", e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[tokio::test]
    async fn test_tax_rates_round_trip_and_invalidate() {
        let cache = AppCache::default();
        assert!(cache.get_tax_rates().await.is_none());

        let rates = TaxRates {
            vat: dec!(5),
            service_charge: dec!(10),
        };
        cache.put_tax_rates(rates.clone()).await;
        assert_eq!(cache.get_tax_rates().await.as_deref(), Some(&rates));

        cache.invalidate_tax_rates().await;
        assert!(cache.get_tax_rates().await.is_none());
    }

    #[tokio::test]
    async fn test_exchange_rate_tables_keyed_by_center() {
        let cache = AppCache::default();
        let table = ExchangeRateTable::new("AED").with_rate("USD", dec!(0.2723));
        cache.exchange_rates.insert(7, Arc::new(table)).await;

        assert!(cache.exchange_rates.get(&7).await.is_some());
        assert!(cache.exchange_rates.get(&8).await.is_none());
    }
}

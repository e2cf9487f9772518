//! Dive center settings models

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::currency::ExchangeRateTable;

/// DiveCenter from dive_centers
#[derive(Debug, Clone, FromRow)]
pub struct DiveCenter {
    pub id: i64,
    pub name: String,
    pub base_currency: String,
    /// Currency code -> rate relative to the base currency
    pub exchange_rates: Option<serde_json::Value>,
}

impl DiveCenter {
    pub fn rate_table(&self) -> ExchangeRateTable {
        match &self.exchange_rates {
            Some(rates) => ExchangeRateTable::from_json(&self.base_currency, rates),
            None => ExchangeRateTable::new(&self.base_currency),
        }
    }
}

/// TaxSetting from tax_settings
#[derive(Debug, Clone, FromRow)]
pub struct TaxSetting {
    pub key: String,
    pub percentage: Decimal,
}

pub const VAT_KEY: &str = "vat";
pub const SERVICE_CHARGE_KEY: &str = "service_charge";

/// The two tax percentages applied on invoices
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaxRates {
    #[serde(with = "rust_decimal::serde::str")]
    pub vat: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub service_charge: Decimal,
}

impl TaxRates {
    /// Missing rows count as 0%
    pub fn from_settings(settings: &[TaxSetting]) -> Self {
        let find = |key: &str| {
            settings
                .iter()
                .find(|s| s.key == key)
                .map(|s| s.percentage)
                .unwrap_or(Decimal::ZERO)
        };

        Self {
            vat: find(VAT_KEY),
            service_charge: find(SERVICE_CHARGE_KEY),
        }
    }
}

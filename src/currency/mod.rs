//! Currency conversion against a dive center's exchange-rate table.

pub mod converter;
pub mod routes;
pub mod services;

use rust_decimal::Decimal;

pub use converter::ExchangeRateTable;
pub use routes::router;

#[derive(Debug, Clone, thiserror::Error)]
pub enum CurrencyError {
    #[error("No exchange rate configured for {0}")]
    MissingRate(String),

    #[error("Exchange rate for {currency} must be positive, got {rate}")]
    InvalidRate { currency: String, rate: Decimal },

    #[error("Converting {from} to {to} overflows the supported amount range")]
    Overflow { from: String, to: String },

    #[error("Dive center {0} not found")]
    DiveCenterNotFound(i64),
}

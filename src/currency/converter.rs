//! Conversion through a dive center's exchange-rate table.

use std::collections::HashMap;
use std::str::FromStr;

use rust_decimal::Decimal;
use tracing::warn;

use super::CurrencyError;

/// Rates relative to a base currency: `1 base = rate × currency`
#[derive(Debug, Clone, PartialEq)]
pub struct ExchangeRateTable {
    base: String,
    rates: HashMap<String, Decimal>,
}

impl ExchangeRateTable {
    pub fn new(base: &str) -> Self {
        Self {
            base: base.to_ascii_uppercase(),
            rates: HashMap::new(),
        }
    }

    pub fn with_rate(mut self, currency: &str, rate: Decimal) -> Self {
        self.rates.insert(currency.to_ascii_uppercase(), rate);
        self
    }

    /// Build a table from the JSON object stored on the dive center.
    ///
    /// Rates may be JSON numbers or numeric strings; anything else is skipped.
    pub fn from_json(base: &str, rates: &serde_json::Value) -> Self {
        let mut table = Self::new(base);

        let Some(object) = rates.as_object() else {
            return table;
        };

        for (code, value) in object {
            let parsed = match value {
                serde_json::Value::String(s) => Decimal::from_str(s.trim()).ok(),
                serde_json::Value::Number(n) => Decimal::from_str(&n.to_string())
                    .or_else(|_| Decimal::from_scientific(&n.to_string()))
                    .ok(),
                _ => None,
            };

            match parsed {
                Some(rate) => table = table.with_rate(code, rate),
                None => warn!(currency = %code, value = %value, "Ignoring unparseable exchange rate"),
            }
        }

        table
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    fn rate(&self, currency: &str) -> Result<Decimal, CurrencyError> {
        let rate = self
            .rates
            .get(currency)
            .copied()
            .ok_or_else(|| CurrencyError::MissingRate(currency.to_string()))?;

        if rate <= Decimal::ZERO {
            return Err(CurrencyError::InvalidRate {
                currency: currency.to_string(),
                rate,
            });
        }

        Ok(rate)
    }

    /// Convert an amount between two currencies.
    ///
    /// Same currency passes through; from the base multiplies by the target's
    /// rate; to the base divides by the source's rate; any other pair goes
    /// through the base. The result is not rounded; a result outside the
    /// Decimal range is reported as `Overflow`.
    pub fn convert(&self, amount: Decimal, from: &str, to: &str) -> Result<Decimal, CurrencyError> {
        let from = from.to_ascii_uppercase();
        let to = to.to_ascii_uppercase();

        if from == to {
            return Ok(amount);
        }

        if from == self.base {
            return multiply(amount, self.rate(&to)?, &from, &to);
        }

        if to == self.base {
            return divide(amount, self.rate(&from)?, &from, &to);
        }

        let in_base = divide(amount, self.rate(&from)?, &from, &to)?;
        multiply(in_base, self.rate(&to)?, &from, &to)
    }
}

fn multiply(amount: Decimal, rate: Decimal, from: &str, to: &str) -> Result<Decimal, CurrencyError> {
    amount.checked_mul(rate).ok_or_else(|| CurrencyError::Overflow {
        from: from.to_string(),
        to: to.to_string(),
    })
}

fn divide(amount: Decimal, rate: Decimal, from: &str, to: &str) -> Result<Decimal, CurrencyError> {
    amount.checked_div(rate).ok_or_else(|| CurrencyError::Overflow {
        from: from.to_string(),
        to: to.to_string(),
    })
}

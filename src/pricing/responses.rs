//! Response DTOs for pricing API endpoints.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use super::models::{Applicability, PricingModel};
use super::overlap::RangeOverlap;
use super::resolver::ResolvedPrice;

/// Money value for JSON responses
#[derive(Debug, Clone, Serialize)]
pub struct MoneyResponse {
    #[serde(with = "rust_decimal::serde::str")]
    pub amount: Decimal,
    pub currency: String,
}

/// Price list item summary returned with a resolved price
#[derive(Debug, Serialize)]
pub struct PriceListItemResponse {
    pub id: i64,
    pub price_list_id: i64,
    pub service_type: String,
    pub pricing_model: PricingModel,
    pub min_dives: Option<i32>,
    pub max_dives: Option<i32>,
    pub priority: i32,
    pub applicable_to: Applicability,
    pub valid_from: Option<NaiveDate>,
    pub valid_until: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
}

/// Response for price resolution
#[derive(Debug, Serialize)]
pub struct ResolvedPriceResponse {
    pub item: PriceListItemResponse,
    pub pricing_model: PricingModel,
    pub dive_count: i32,
    pub unit_price: MoneyResponse,
    pub total_price: MoneyResponse,
}

impl From<ResolvedPrice> for ResolvedPriceResponse {
    fn from(r: ResolvedPrice) -> Self {
        let currency = r.item.currency.clone();
        Self {
            pricing_model: r.pricing_model,
            dive_count: r.dive_count,
            unit_price: MoneyResponse {
                amount: r.unit_price,
                currency: currency.clone(),
            },
            total_price: MoneyResponse {
                amount: r.total_price,
                currency,
            },
            item: PriceListItemResponse {
                id: r.item.id,
                price_list_id: r.item.price_list_id,
                service_type: r.item.service_type,
                pricing_model: r.item.pricing_model,
                min_dives: r.item.min_dives,
                max_dives: r.item.max_dives,
                priority: r.item.priority,
                applicable_to: r.item.applicable_to,
                valid_from: r.item.valid_from,
                valid_until: r.item.valid_until,
                created_at: r.item.created_at,
            },
        }
    }
}

/// Response for a tiered price calculation
#[derive(Debug, Serialize)]
pub struct TieredPriceResponse {
    pub price_list_item_id: i64,
    pub dive_count: i32,
    #[serde(with = "rust_decimal::serde::str")]
    pub total_price: Decimal,
}

/// Response for the overlap report
#[derive(Debug, Serialize)]
pub struct OverlapResponse {
    pub service_type: String,
    pub overlaps: Vec<RangeOverlap>,
}

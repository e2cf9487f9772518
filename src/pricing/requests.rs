//! Request DTOs for pricing API endpoints.

use chrono::NaiveDate;
use serde::Deserialize;

use super::models::Applicability;

/// Request to resolve the best price for a dive count
#[derive(Debug, Deserialize)]
pub struct ResolvePriceRequest {
    pub dive_count: i32,
    pub service_type: String,
    #[serde(default)]
    pub customer_type: Option<Applicability>,
    /// Pricing date, defaults to today
    #[serde(default)]
    pub date: Option<NaiveDate>,
}

/// Request to price a stored tiered item
#[derive(Debug, Deserialize)]
pub struct TieredPriceRequest {
    pub price_list_item_id: i64,
    pub dive_count: i32,
}

/// Request to list overlapping ranges
#[derive(Debug, Deserialize)]
pub struct OverlapRequest {
    pub service_type: String,
    #[serde(default)]
    pub dive_count: Option<i32>,
}

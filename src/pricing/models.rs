//! Database models for pricing queries.
//!
//! These models use sqlx's FromRow derive for direct database deserialization.
//! Enum columns are stored as strings by the main application and parsed on load.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::error::UnknownVariant;

/// How a price list item turns a dive count into a price
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PricingModel {
    Single,
    Range,
    Tiered,
}

impl PricingModel {
    pub fn as_str(&self) -> &'static str {
        match self {
            PricingModel::Single => "SINGLE",
            PricingModel::Range => "RANGE",
            PricingModel::Tiered => "TIERED",
        }
    }
}

impl TryFrom<String> for PricingModel {
    type Error = UnknownVariant;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.to_ascii_uppercase().as_str() {
            "SINGLE" => Ok(PricingModel::Single),
            "RANGE" => Ok(PricingModel::Range),
            "TIERED" => Ok(PricingModel::Tiered),
            _ => Err(UnknownVariant::new("pricing_model", value)),
        }
    }
}

/// Customer segment a price list item is offered to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Applicability {
    All,
    Member,
    NonMember,
    Group,
    Corporate,
}

impl Applicability {
    pub fn as_str(&self) -> &'static str {
        match self {
            Applicability::All => "ALL",
            Applicability::Member => "MEMBER",
            Applicability::NonMember => "NON_MEMBER",
            Applicability::Group => "GROUP",
            Applicability::Corporate => "CORPORATE",
        }
    }

    /// `ALL` items match every customer; a missing customer type matches every item.
    pub fn matches(&self, customer_type: Option<Applicability>) -> bool {
        match customer_type {
            None => true,
            Some(ct) => *self == Applicability::All || *self == ct,
        }
    }
}

impl TryFrom<String> for Applicability {
    type Error = UnknownVariant;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.to_ascii_uppercase().as_str() {
            "ALL" => Ok(Applicability::All),
            "MEMBER" => Ok(Applicability::Member),
            "NON_MEMBER" => Ok(Applicability::NonMember),
            "GROUP" => Ok(Applicability::Group),
            "CORPORATE" => Ok(Applicability::Corporate),
            _ => Err(UnknownVariant::new("applicable_to", value)),
        }
    }
}

/// PriceListItem from price_list_items
#[derive(Debug, Clone, FromRow)]
pub struct PriceListItem {
    pub id: i64,
    pub price_list_id: i64,
    pub service_type: String,
    #[sqlx(try_from = "String")]
    pub pricing_model: PricingModel,
    pub min_dives: Option<i32>,
    pub max_dives: Option<i32>,
    pub base_price: Decimal,
    pub price: Option<Decimal>,
    pub currency: String,
    pub priority: i32,
    #[sqlx(try_from = "String")]
    pub applicable_to: Applicability,
    pub is_active: bool,
    pub valid_from: Option<NaiveDate>,
    pub valid_until: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
}

impl PriceListItem {
    /// Check if the item's validity window contains the given date (bounds inclusive)
    pub fn is_valid_on(&self, date: NaiveDate) -> bool {
        if let Some(from) = self.valid_from {
            if date < from {
                return false;
            }
        }
        match self.valid_until {
            Some(until) => date <= until,
            None => true,
        }
    }

    /// Check if the dive count falls inside `[min_dives, max_dives]`; a missing bound is open
    pub fn covers_dive_count(&self, dive_count: i32) -> bool {
        self.min_dives.map_or(true, |min| dive_count >= min)
            && self.max_dives.map_or(true, |max| dive_count <= max)
    }

    /// Width of the dive range; open ranges sort as least specific
    pub fn range_width(&self) -> i64 {
        match (self.min_dives, self.max_dives) {
            (Some(min), Some(max)) => i64::from(max) - i64::from(min),
            _ => i64::MAX,
        }
    }

    /// Customer-facing price per dive
    pub fn unit_price(&self) -> Decimal {
        self.price.unwrap_or(self.base_price)
    }
}

/// PriceListItemTier from price_list_item_tiers
#[derive(Debug, Clone, FromRow)]
pub struct PriceListItemTier {
    pub id: i64,
    pub price_list_item_id: i64,
    pub from_dives: i32,
    pub to_dives: Option<i32>,
    pub total_price: Option<Decimal>,
    pub price_per_dive: Option<Decimal>,
}

impl PriceListItemTier {
    /// Number of dives in the tier, `None` for an open-ended tier
    pub fn width(&self) -> Option<i32> {
        self.to_dives.map(|to| to - self.from_dives + 1)
    }
}

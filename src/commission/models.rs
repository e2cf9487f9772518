//! Database models for agent commissions.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::error::UnknownVariant;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CommissionType {
    Percentage,
    #[serde(rename = "Fixed Amount")]
    FixedAmount,
}

impl CommissionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            CommissionType::Percentage => "Percentage",
            CommissionType::FixedAmount => "Fixed Amount",
        }
    }
}

impl TryFrom<String> for CommissionType {
    type Error = UnknownVariant;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.as_str() {
            "Percentage" => Ok(CommissionType::Percentage),
            "Fixed Amount" => Ok(CommissionType::FixedAmount),
            _ => Err(UnknownVariant::new("commission_type", value)),
        }
    }
}

/// Lifecycle of a commission row.
///
/// `Pending -> Paid`, `Pending | Paid -> Cancelled`, and `Cancelled -> Pending`
/// when a cancelled commission is recalculated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CommissionStatus {
    Pending,
    Paid,
    Cancelled,
}

impl CommissionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CommissionStatus::Pending => "Pending",
            CommissionStatus::Paid => "Paid",
            CommissionStatus::Cancelled => "Cancelled",
        }
    }

    pub fn can_transition_to(&self, next: CommissionStatus) -> bool {
        matches!(
            (self, next),
            (CommissionStatus::Pending, CommissionStatus::Paid)
                | (CommissionStatus::Pending, CommissionStatus::Cancelled)
                | (CommissionStatus::Paid, CommissionStatus::Cancelled)
                | (CommissionStatus::Cancelled, CommissionStatus::Pending)
        )
    }

    /// Everything except `Cancelled` blocks a new commission for the invoice
    pub fn is_active(&self) -> bool {
        *self != CommissionStatus::Cancelled
    }
}

impl TryFrom<String> for CommissionStatus {
    type Error = UnknownVariant;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.as_str() {
            "Pending" => Ok(CommissionStatus::Pending),
            "Paid" => Ok(CommissionStatus::Paid),
            "Cancelled" => Ok(CommissionStatus::Cancelled),
            _ => Err(UnknownVariant::new("status", value)),
        }
    }
}

/// AgentCommercialTerms from agent_commercial_terms
#[derive(Debug, Clone, FromRow)]
pub struct AgentCommercialTerms {
    pub agent_id: i64,
    #[sqlx(try_from = "String")]
    pub commission_type: CommissionType,
    pub commission_rate: Decimal,
    pub vat_applicable: bool,
    pub exclude_equipment: bool,
    pub include_manual_items: bool,
    pub commission_valid_from: Option<NaiveDate>,
    pub commission_valid_until: Option<NaiveDate>,
}

impl AgentCommercialTerms {
    /// Check if the contract's commission window contains the date (bounds inclusive).
    /// Terms without a window cover every date.
    pub fn covers(&self, date: NaiveDate) -> bool {
        self.commission_valid_from.map_or(true, |from| date >= from)
            && self.commission_valid_until.map_or(true, |until| date <= until)
    }
}

/// AgentCommission from agent_commissions
#[derive(Debug, Clone, FromRow)]
pub struct AgentCommission {
    pub id: i64,
    pub agent_id: i64,
    pub invoice_id: i64,
    #[sqlx(try_from = "String")]
    pub commission_type: CommissionType,
    pub commission_rate: Decimal,
    pub commissionable_amount: Decimal,
    pub commission_amount: Decimal,
    pub vat_applied: bool,
    #[sqlx(try_from = "String")]
    pub status: CommissionStatus,
    pub paid_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Invoice from invoices
#[derive(Debug, Clone, FromRow)]
pub struct Invoice {
    pub id: i64,
    pub agent_id: Option<i64>,
    pub dive_center_id: i64,
    pub invoice_date: NaiveDate,
    pub discount: Decimal,
    pub total: Decimal,
    pub currency: String,
}

/// What an invoice line was billed for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    Dive,
    Equipment,
    Excursion,
    Manual,
}

/// InvoiceItem from invoice_items
#[derive(Debug, Clone, FromRow)]
pub struct InvoiceItem {
    pub id: i64,
    pub invoice_id: i64,
    pub description: String,
    pub total: Decimal,
    pub booking_dive_id: Option<i64>,
    pub booking_equipment_id: Option<i64>,
    pub booking_excursion_id: Option<i64>,
}

impl InvoiceItem {
    /// Lines with no booking reference were typed in by hand
    pub fn kind(&self) -> LineKind {
        if self.booking_equipment_id.is_some() {
            LineKind::Equipment
        } else if self.booking_dive_id.is_some() {
            LineKind::Dive
        } else if self.booking_excursion_id.is_some() {
            LineKind::Excursion
        } else {
            LineKind::Manual
        }
    }
}

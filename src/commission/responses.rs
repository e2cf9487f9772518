//! Response DTOs for commission API endpoints.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use super::models::{AgentCommission, CommissionStatus, CommissionType};
use super::services::{BatchResult, SkippedInvoice};

#[derive(Debug, Serialize)]
pub struct CommissionResponse {
    pub id: i64,
    pub agent_id: i64,
    pub invoice_id: i64,
    pub commission_type: CommissionType,
    #[serde(with = "rust_decimal::serde::str")]
    pub commission_rate: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub commissionable_amount: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub commission_amount: Decimal,
    pub vat_applied: bool,
    pub status: CommissionStatus,
    pub paid_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<AgentCommission> for CommissionResponse {
    fn from(c: AgentCommission) -> Self {
        Self {
            id: c.id,
            agent_id: c.agent_id,
            invoice_id: c.invoice_id,
            commission_type: c.commission_type,
            commission_rate: c.commission_rate,
            commissionable_amount: c.commissionable_amount,
            commission_amount: c.commission_amount,
            vat_applied: c.vat_applied,
            status: c.status,
            paid_at: c.paid_at,
            created_at: c.created_at,
            updated_at: c.updated_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct BatchCommissionResponse {
    pub calculated: Vec<CommissionResponse>,
    pub skipped: Vec<SkippedInvoice>,
}

impl From<BatchResult> for BatchCommissionResponse {
    fn from(result: BatchResult) -> Self {
        Self {
            calculated: result
                .calculated
                .into_iter()
                .map(CommissionResponse::from)
                .collect(),
            skipped: result.skipped,
        }
    }
}

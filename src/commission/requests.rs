//! Request DTOs for commission API endpoints.

use serde::Deserialize;

/// Request to calculate one commission
#[derive(Debug, Deserialize)]
pub struct CalculateCommissionRequest {
    pub agent_id: i64,
    pub invoice_id: i64,
}

/// Request to calculate commissions for many invoices
#[derive(Debug, Deserialize)]
pub struct BatchCommissionRequest {
    pub agent_id: i64,
    /// Every un-commissioned invoice of the agent when omitted
    #[serde(default)]
    pub invoice_ids: Option<Vec<i64>>,
}

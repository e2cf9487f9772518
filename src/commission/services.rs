//! Commission service functions with database access.

use std::future::Future;

use chrono::NaiveDate;
use serde::Serialize;
use sqlx::PgPool;
use tracing::{info, warn};

use super::calculators::{
    commission_amount, commissionable_amount, validate_calculation, Persistence,
};
use super::models::{AgentCommission, CommissionStatus};
use super::queries::{self, CommissionDraft};

/// Commission calculation error types
#[derive(Debug, thiserror::Error)]
pub enum CommissionError {
    #[error("Invoice {0} not found")]
    InvoiceNotFound(i64),

    #[error("Commission {0} not found")]
    CommissionNotFound(i64),

    #[error("Invoice {invoice_id} does not belong to agent {agent_id}")]
    InvoiceAgentMismatch { agent_id: i64, invoice_id: i64 },

    #[error("Agent {0} has no commercial terms configured")]
    MissingCommercialTerms(i64),

    #[error("Invoice date {invoice_date} is outside the commission validity window of agent {agent_id}")]
    OutsideValidityWindow {
        agent_id: i64,
        invoice_date: NaiveDate,
    },

    #[error("Commission already exists for agent {agent_id} and invoice {invoice_id}")]
    DuplicateCommission { agent_id: i64, invoice_id: i64 },

    #[error("Commission for invoice {invoice_id} overflows the supported amount range")]
    AmountOverflow { invoice_id: i64 },

    #[error("Commission cannot move from {from} to {to}")]
    InvalidTransition {
        from: &'static str,
        to: &'static str,
    },

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Calculate and store the commission an agent earns on an invoice.
///
/// Runs in one transaction with the invoice row locked, so two concurrent
/// calculations for the same invoice cannot both insert.
pub async fn calculate_commission(
    pool: &PgPool,
    agent_id: i64,
    invoice_id: i64,
) -> Result<AgentCommission, CommissionError> {
    let mut tx = pool.begin().await?;

    let invoice = queries::lock_invoice(&mut *tx, invoice_id)
        .await?
        .ok_or(CommissionError::InvoiceNotFound(invoice_id))?;
    let existing = queries::find_commission_for_invoice(&mut *tx, invoice_id).await?;
    let terms = queries::get_commercial_terms(&mut *tx, agent_id).await?;

    let (persistence, terms) =
        validate_calculation(agent_id, &invoice, existing.as_ref(), terms.as_ref())?;

    let overflow = || CommissionError::AmountOverflow { invoice_id };
    let items = queries::get_invoice_items(&mut *tx, invoice_id).await?;
    let base = commissionable_amount(&items, invoice.discount, terms).ok_or_else(overflow)?;
    let amount = commission_amount(
        base,
        terms.commission_type,
        terms.commission_rate,
        terms.vat_applicable,
    )
    .ok_or_else(overflow)?;

    let draft = CommissionDraft {
        agent_id,
        invoice_id,
        commission_type: terms.commission_type,
        commission_rate: terms.commission_rate,
        commissionable_amount: base,
        commission_amount: amount,
        vat_applied: terms.vat_applicable,
    };

    let commission = match persistence {
        Persistence::Insert => queries::insert_commission(&mut *tx, &draft).await?,
        Persistence::Recalculate { commission_id } => {
            queries::recalculate_commission(&mut *tx, commission_id, &draft).await?
        }
    };

    tx.commit().await?;

    info!(
        agent_id,
        invoice_id,
        commission_id = commission.id,
        base = %base,
        amount = %amount,
        recalculated = matches!(persistence, Persistence::Recalculate { .. }),
        "Agent commission calculated"
    );

    Ok(commission)
}

/// An invoice the batch could not commission
#[derive(Debug, Clone, Serialize)]
pub struct SkippedInvoice {
    pub invoice_id: i64,
    pub reason: String,
}

/// Outcome of a batch run
#[derive(Debug)]
pub struct BatchResult {
    pub calculated: Vec<AgentCommission>,
    pub skipped: Vec<SkippedInvoice>,
}

/// Calculate commissions for several invoices independently.
///
/// With no ids given every invoice of the agent lacking an active commission
/// is processed. A failing invoice is logged and skipped; only a failure to
/// list the invoices is returned as an error.
pub async fn calculate_batch(
    pool: &PgPool,
    agent_id: i64,
    invoice_ids: Option<Vec<i64>>,
) -> Result<BatchResult, CommissionError> {
    let invoice_ids = match invoice_ids {
        Some(ids) => ids,
        None => queries::find_uncommissioned_invoice_ids(pool, agent_id).await?,
    };

    let result = run_batch(agent_id, invoice_ids, |invoice_id| {
        calculate_commission(pool, agent_id, invoice_id)
    })
    .await;

    info!(
        agent_id,
        calculated = result.calculated.len(),
        skipped = result.skipped.len(),
        "Commission batch finished"
    );

    Ok(result)
}

/// Apply `calculate` to each invoice in order, collecting failures instead of
/// stopping at the first one
async fn run_batch<F, Fut>(agent_id: i64, invoice_ids: Vec<i64>, mut calculate: F) -> BatchResult
where
    F: FnMut(i64) -> Fut,
    Fut: Future<Output = Result<AgentCommission, CommissionError>>,
{
    let mut result = BatchResult {
        calculated: Vec::with_capacity(invoice_ids.len()),
        skipped: Vec::new(),
    };

    for invoice_id in invoice_ids {
        match calculate(invoice_id).await {
            Ok(commission) => result.calculated.push(commission),
            Err(e) => {
                warn!(agent_id, invoice_id, error = %e, "Skipping invoice in commission batch");
                result.skipped.push(SkippedInvoice {
                    invoice_id,
                    reason: e.to_string(),
                });
            }
        }
    }

    result
}

/// Record that a pending commission has been paid out
pub async fn mark_paid(
    pool: &PgPool,
    commission_id: i64,
) -> Result<AgentCommission, CommissionError> {
    transition(pool, commission_id, CommissionStatus::Paid).await
}

/// Cancel a pending or paid commission; it can be recalculated afterwards
pub async fn cancel(
    pool: &PgPool,
    commission_id: i64,
) -> Result<AgentCommission, CommissionError> {
    transition(pool, commission_id, CommissionStatus::Cancelled).await
}

async fn transition(
    pool: &PgPool,
    commission_id: i64,
    next: CommissionStatus,
) -> Result<AgentCommission, CommissionError> {
    let mut tx = pool.begin().await?;

    let current = queries::lock_commission(&mut *tx, commission_id)
        .await?
        .ok_or(CommissionError::CommissionNotFound(commission_id))?;

    if !current.status.can_transition_to(next) {
        return Err(CommissionError::InvalidTransition {
            from: current.status.as_str(),
            to: next.as_str(),
        });
    }

    let updated = queries::update_status(&mut *tx, commission_id, next).await?;
    tx.commit().await?;

    info!(
        commission_id,
        from = current.status.as_str(),
        to = next.as_str(),
        "Commission status changed"
    );

    Ok(updated)
}

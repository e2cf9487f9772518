//! Commission math - no database access.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::pricing::round_money;

use super::models::{
    AgentCommercialTerms, AgentCommission, CommissionType, Invoice, InvoiceItem, LineKind,
};
use super::CommissionError;

/// 5% VAT added on top of VAT-applicable commissions
pub const VAT_MULTIPLIER: Decimal = dec!(1.05);

/// Invoice value the agent earns commission on.
///
/// Equipment lines are dropped when the terms exclude equipment; manual lines
/// are dropped unless the terms include them. The invoice discount is shared
/// out in proportion to the kept lines' share of the full subtotal. Never
/// negative. Returns `None` when a sum leaves the Decimal range.
pub fn commissionable_amount(
    items: &[InvoiceItem],
    discount: Decimal,
    terms: &AgentCommercialTerms,
) -> Option<Decimal> {
    let invoice_subtotal = checked_sum(items.iter().map(|i| i.total))?;

    let filtered_subtotal = checked_sum(
        items
            .iter()
            .filter(|i| match i.kind() {
                LineKind::Equipment => !terms.exclude_equipment,
                LineKind::Manual => terms.include_manual_items,
                LineKind::Dive | LineKind::Excursion => true,
            })
            .map(|i| i.total),
    )?;

    let discount_share = if invoice_subtotal > Decimal::ZERO {
        filtered_subtotal
            .checked_div(invoice_subtotal)?
            .checked_mul(discount)?
    } else {
        Decimal::ZERO
    };

    let base = filtered_subtotal.checked_sub(discount_share)?;
    Some(round_money(base.max(Decimal::ZERO), 2))
}

fn checked_sum(mut values: impl Iterator<Item = Decimal>) -> Option<Decimal> {
    values.try_fold(Decimal::ZERO, |acc, v| acc.checked_add(v))
}

/// Commission for a base amount.
///
/// `Percentage` takes `rate` percent of the base, `Fixed Amount` pays `rate`
/// flat. VAT-applicable commissions are grossed up by 5%. Returns `None`
/// when the product leaves the Decimal range.
pub fn commission_amount(
    base: Decimal,
    commission_type: CommissionType,
    rate: Decimal,
    vat_applicable: bool,
) -> Option<Decimal> {
    let amount = match commission_type {
        CommissionType::Percentage => base.checked_mul(rate)?.checked_div(Decimal::ONE_HUNDRED)?,
        CommissionType::FixedAmount => rate,
    };

    let amount = if vat_applicable {
        amount.checked_mul(VAT_MULTIPLIER)?
    } else {
        amount
    };

    Some(round_money(amount, 2))
}

/// How a fresh calculation is stored given the existing row for the pair
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Persistence {
    Insert,
    /// Reuse a cancelled row
    Recalculate { commission_id: i64 },
}

/// Decide whether a calculation may proceed for the invoice.
///
/// A non-cancelled commission blocks a second one, whichever agent it was
/// recorded for.
pub fn plan_persistence(
    existing: Option<&AgentCommission>,
    agent_id: i64,
    invoice_id: i64,
) -> Result<Persistence, CommissionError> {
    match existing {
        None => Ok(Persistence::Insert),
        Some(c) if c.status.is_active() => Err(CommissionError::DuplicateCommission {
            agent_id,
            invoice_id,
        }),
        Some(c) => Ok(Persistence::Recalculate { commission_id: c.id }),
    }
}

/// Run the pre-calculation checks against the loaded rows.
///
/// Checks run in order: the invoice belongs to the agent, no active
/// commission exists for it, the agent has terms, and the invoice date lies
/// in the terms' commission window. Returns how to store the result and the
/// terms to price it with.
pub fn validate_calculation<'a>(
    agent_id: i64,
    invoice: &Invoice,
    existing: Option<&AgentCommission>,
    terms: Option<&'a AgentCommercialTerms>,
) -> Result<(Persistence, &'a AgentCommercialTerms), CommissionError> {
    if invoice.agent_id != Some(agent_id) {
        return Err(CommissionError::InvoiceAgentMismatch {
            agent_id,
            invoice_id: invoice.id,
        });
    }

    let persistence = plan_persistence(existing, agent_id, invoice.id)?;

    let terms = terms.ok_or(CommissionError::MissingCommercialTerms(agent_id))?;

    if !terms.covers(invoice.invoice_date) {
        return Err(CommissionError::OutsideValidityWindow {
            agent_id,
            invoice_date: invoice.invoice_date,
        });
    }

    Ok((persistence, terms))
}

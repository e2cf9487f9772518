//! Database queries for agent commissions.
//!
//! Functions take any Postgres executor so the calculation can run them
//! inside one transaction.

use rust_decimal::Decimal;
use sqlx::PgExecutor;

use super::models::{
    AgentCommercialTerms, AgentCommission, CommissionStatus, CommissionType, Invoice, InvoiceItem,
};

const COMMISSION_COLUMNS: &str = r#"
    id, agent_id, invoice_id, commission_type, commission_rate,
    commissionable_amount, commission_amount, vat_applied,
    status, paid_at, created_at, updated_at
"#;

/// Values written by a calculation
#[derive(Debug, Clone)]
pub struct CommissionDraft {
    pub agent_id: i64,
    pub invoice_id: i64,
    pub commission_type: CommissionType,
    pub commission_rate: Decimal,
    pub commissionable_amount: Decimal,
    pub commission_amount: Decimal,
    pub vat_applied: bool,
}

/// Get an invoice and lock it for the rest of the transaction
pub async fn lock_invoice<'e, E>(executor: E, invoice_id: i64) -> Result<Option<Invoice>, sqlx::Error>
where
    E: PgExecutor<'e>,
{
    sqlx::query_as::<_, Invoice>(
        r#"
        SELECT id, agent_id, dive_center_id, invoice_date, discount, total, currency
        FROM invoices
        WHERE id = $1
          AND deleted_at IS NULL
        FOR UPDATE
        "#,
    )
    .bind(invoice_id)
    .fetch_optional(executor)
    .await
}

pub async fn get_invoice_items<'e, E>(
    executor: E,
    invoice_id: i64,
) -> Result<Vec<InvoiceItem>, sqlx::Error>
where
    E: PgExecutor<'e>,
{
    sqlx::query_as::<_, InvoiceItem>(
        r#"
        SELECT id, invoice_id, description, total,
               booking_dive_id, booking_equipment_id, booking_excursion_id
        FROM invoice_items
        WHERE invoice_id = $1
        ORDER BY id
        "#,
    )
    .bind(invoice_id)
    .fetch_all(executor)
    .await
}

pub async fn get_commercial_terms<'e, E>(
    executor: E,
    agent_id: i64,
) -> Result<Option<AgentCommercialTerms>, sqlx::Error>
where
    E: PgExecutor<'e>,
{
    sqlx::query_as::<_, AgentCommercialTerms>(
        r#"
        SELECT agent_id, commission_type, commission_rate, vat_applicable,
               exclude_equipment, include_manual_items,
               commission_valid_from, commission_valid_until
        FROM agent_commercial_terms
        WHERE agent_id = $1
        "#,
    )
    .bind(agent_id)
    .fetch_optional(executor)
    .await
}

/// Commission row for the invoice, whichever agent it was recorded for.
///
/// A non-cancelled row wins over cancelled ones; otherwise the most recent.
pub async fn find_commission_for_invoice<'e, E>(
    executor: E,
    invoice_id: i64,
) -> Result<Option<AgentCommission>, sqlx::Error>
where
    E: PgExecutor<'e>,
{
    let sql = format!(
        r#"
        SELECT {COMMISSION_COLUMNS}
        FROM agent_commissions
        WHERE invoice_id = $1
        ORDER BY (status <> 'Cancelled') DESC, updated_at DESC
        LIMIT 1
        "#
    );

    sqlx::query_as::<_, AgentCommission>(&sql)
        .bind(invoice_id)
        .fetch_optional(executor)
        .await
}

/// Get a commission and lock it for the rest of the transaction
pub async fn lock_commission<'e, E>(
    executor: E,
    commission_id: i64,
) -> Result<Option<AgentCommission>, sqlx::Error>
where
    E: PgExecutor<'e>,
{
    let sql = format!(
        r#"
        SELECT {COMMISSION_COLUMNS}
        FROM agent_commissions
        WHERE id = $1
        FOR UPDATE
        "#
    );

    sqlx::query_as::<_, AgentCommission>(&sql)
        .bind(commission_id)
        .fetch_optional(executor)
        .await
}

pub async fn insert_commission<'e, E>(
    executor: E,
    draft: &CommissionDraft,
) -> Result<AgentCommission, sqlx::Error>
where
    E: PgExecutor<'e>,
{
    let sql = format!(
        r#"
        INSERT INTO agent_commissions (
            agent_id, invoice_id, commission_type, commission_rate,
            commissionable_amount, commission_amount, vat_applied,
            status, paid_at, created_at, updated_at
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, 'Pending', NULL, NOW(), NOW())
        RETURNING {COMMISSION_COLUMNS}
        "#
    );

    sqlx::query_as::<_, AgentCommission>(&sql)
        .bind(draft.agent_id)
        .bind(draft.invoice_id)
        .bind(draft.commission_type.as_str())
        .bind(draft.commission_rate)
        .bind(draft.commissionable_amount)
        .bind(draft.commission_amount)
        .bind(draft.vat_applied)
        .fetch_one(executor)
        .await
}

/// Overwrite a cancelled row with a fresh calculation, back to `Pending`.
/// The row moves to the calculating agent.
pub async fn recalculate_commission<'e, E>(
    executor: E,
    commission_id: i64,
    draft: &CommissionDraft,
) -> Result<AgentCommission, sqlx::Error>
where
    E: PgExecutor<'e>,
{
    let sql = format!(
        r#"
        UPDATE agent_commissions
        SET agent_id = $2,
            commission_type = $3,
            commission_rate = $4,
            commissionable_amount = $5,
            commission_amount = $6,
            vat_applied = $7,
            status = 'Pending',
            paid_at = NULL,
            updated_at = NOW()
        WHERE id = $1
        RETURNING {COMMISSION_COLUMNS}
        "#
    );

    sqlx::query_as::<_, AgentCommission>(&sql)
        .bind(commission_id)
        .bind(draft.agent_id)
        .bind(draft.commission_type.as_str())
        .bind(draft.commission_rate)
        .bind(draft.commissionable_amount)
        .bind(draft.commission_amount)
        .bind(draft.vat_applied)
        .fetch_one(executor)
        .await
}

/// Move a commission to a new status; `paid_at` is stamped when it becomes `Paid`
pub async fn update_status<'e, E>(
    executor: E,
    commission_id: i64,
    status: CommissionStatus,
) -> Result<AgentCommission, sqlx::Error>
where
    E: PgExecutor<'e>,
{
    let sql = format!(
        r#"
        UPDATE agent_commissions
        SET status = $2,
            paid_at = CASE WHEN $2 = 'Paid' THEN NOW() ELSE paid_at END,
            updated_at = NOW()
        WHERE id = $1
        RETURNING {COMMISSION_COLUMNS}
        "#
    );

    sqlx::query_as::<_, AgentCommission>(&sql)
        .bind(commission_id)
        .bind(status.as_str())
        .fetch_one(executor)
        .await
}

/// Invoices of the agent without a non-cancelled commission from any agent
pub async fn find_uncommissioned_invoice_ids<'e, E>(
    executor: E,
    agent_id: i64,
) -> Result<Vec<i64>, sqlx::Error>
where
    E: PgExecutor<'e>,
{
    sqlx::query_scalar(
        r#"
        SELECT i.id
        FROM invoices i
        WHERE i.agent_id = $1
          AND i.deleted_at IS NULL
          AND NOT EXISTS (
              SELECT 1
              FROM agent_commissions c
              WHERE c.invoice_id = i.id
                AND c.status <> 'Cancelled'
          )
        ORDER BY i.invoice_date, i.id
        "#,
    )
    .bind(agent_id)
    .fetch_all(executor)
    .await
}

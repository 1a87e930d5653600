//! Pay slip minting.
//!
//! Slip numbers look like `PS2024030001`: prefix, the period's start year and
//! month, then a four digit sequence within that month.

use chrono::{Datelike as _, NaiveDate};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QuerySelect,
    TransactionTrait,
};
use tracing::{info, instrument};
use uuid::Uuid;

use super::find_period;
use crate::{
    consts::SLIP_NUMBER_PREFIX,
    entity::{pay_slip, payroll, prelude::*},
    error::PayrollError,
    lifecycle::{self, Action},
    utils,
};

pub fn slip_prefix(period_start: NaiveDate) -> String {
    format!("{SLIP_NUMBER_PREFIX}{}{:02}", period_start.year(), period_start.month())
}

/// Sequence starts after the slips already minted for the month and skips
/// any number that is somehow taken.
pub fn next_slip_number(prefix: &str, taken: &[String]) -> String {
    let mut sequence = taken.len() + 1;

    loop {
        let candidate = format!("{prefix}{sequence:04}");
        if !taken.contains(&candidate) {
            return candidate;
        }
        sequence += 1;
    }
}

/// Returns the payroll's slip and whether it was minted by this call.
#[instrument(skip(db, payroll), fields(payroll_id = %payroll.id))]
pub async fn generate_payslip(db: &DatabaseConnection, payroll: payroll::Model, actor: Uuid) -> Result<(pay_slip::Model, bool), PayrollError> {
    lifecycle::ensure_allowed(payroll.status, Action::GeneratePayslip)?;

    let txn = db.begin().await?;

    let existing = PaySlip::find()
        .filter(pay_slip::Column::PayrollId.eq(payroll.id))
        .one(&txn).await?;
    if let Some(slip) = existing {
        return Ok((slip, false));
    }

    let period = find_period(&txn, payroll.payroll_period_id).await?;
    let prefix = slip_prefix(period.start_date);

    let taken = PaySlip::find()
        .select_only()
        .column(pay_slip::Column::SlipNumber)
        .filter(pay_slip::Column::SlipNumber.starts_with(&prefix))
        .into_tuple::<String>()
        .all(&txn).await?;

    let now = utils::now();
    let slip = pay_slip::ActiveModel {
        created_at: Set(now),
        updated_at: Set(now),
        payroll_id: Set(payroll.id),
        slip_number: Set(next_slip_number(&prefix, &taken)),
        generated_by: Set(actor),
        emailed_to: Set(None),
        emailed_at: Set(None),
        ..Default::default()
    }
    .insert(&txn).await
    .map_err(|err| PayrollError::on_unique_violation(err, || PayrollError::DuplicateRecord(format!("pay slip for payroll {}", payroll.id))))?;

    txn.commit().await?;

    info!(slip_number = %slip.slip_number, "pay slip generated");
    Ok((slip, true))
}

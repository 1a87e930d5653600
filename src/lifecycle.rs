//! Payroll status machine and audit entries.
//!
//! ```text
//! DRAFT --calculate--> CALCULATED --approve--> APPROVED --mark_paid--> PAID
//!   ^                       |
//!   +------reject-----------+
//! ```
//!
//! Recalculating a CALCULATED payroll keeps it CALCULATED. Attaching a manual
//! bonus or deduction sends it back to DRAFT.

use std::fmt;

use rust_decimal::Decimal;
use sea_orm::{ActiveValue::{NotSet, Set}, DbErr};
use serde::Serialize;
use uuid::Uuid;

use crate::{
    entity::{
        payroll, payroll_history,
        sea_orm_active_enums::{HistoryAction, PayrollStatus},
    },
    error::PayrollError,
    utils,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Calculate,
    Approve,
    Reject,
    MarkPaid,
    GeneratePayslip,
    Modify,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let verb = match self {
            Action::Calculate => "calculate",
            Action::Approve => "approve",
            Action::Reject => "reject",
            Action::MarkPaid => "mark as paid",
            Action::GeneratePayslip => "generate a pay slip for",
            Action::Modify => "modify",
        };

        f.write_str(verb)
    }
}

impl Action {
    /// History action recorded when this action succeeds
    pub fn recorded_as(self) -> Option<HistoryAction> {
        match self {
            Action::Calculate => Some(HistoryAction::Calculated),
            Action::Approve => Some(HistoryAction::Approved),
            Action::Reject => Some(HistoryAction::Rejected),
            Action::MarkPaid => Some(HistoryAction::Paid),
            Action::Modify => Some(HistoryAction::Modified),
            Action::GeneratePayslip => None,
        }
    }
}

/// Status the payroll ends up in after `action`, or the guard error.
pub fn next_status(status: PayrollStatus, action: Action) -> Result<PayrollStatus, PayrollError> {
    use PayrollStatus::*;

    let next = match (action, status) {
        (Action::Calculate, Draft | Calculated) => Calculated,
        (Action::Approve, Calculated) => Approved,
        (Action::Reject, Calculated) => Draft,
        (Action::MarkPaid, Approved) => Paid,
        (Action::GeneratePayslip, Approved | Paid) => status,
        (Action::Modify, Draft | Calculated) => Draft,
        _ => return Err(PayrollError::InvalidStateTransition { action, status }),
    };

    Ok(next)
}

pub fn ensure_allowed(status: PayrollStatus, action: Action) -> Result<(), PayrollError> {
    next_status(status, action).map(|_| ())
}

/// Money fields captured before and after a change
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MoneySnapshot {
    pub status: PayrollStatus,
    pub gross_salary: Decimal,
    pub overtime_amount: Decimal,
    pub total_bonuses: Decimal,
    pub total_deductions: Decimal,
    pub tax_amount: Decimal,
    pub net_salary: Decimal,
}

impl From<&payroll::Model> for MoneySnapshot {
    fn from(payroll: &payroll::Model) -> Self {
        Self {
            status: payroll.status,
            gross_salary: payroll.gross_salary,
            overtime_amount: payroll.overtime_amount,
            total_bonuses: payroll.total_bonuses,
            total_deductions: payroll.total_deductions,
            tax_amount: payroll.tax_amount,
            net_salary: payroll.net_salary,
        }
    }
}

fn snapshot(model: Option<&payroll::Model>) -> Result<Option<serde_json::Value>, DbErr> {
    model
        .map(|model| serde_json::to_value(MoneySnapshot::from(model)))
        .transpose()
        .map_err(|err| DbErr::Json(err.to_string()))
}

pub fn history_entry(
    payroll_id: Uuid,
    action: HistoryAction,
    performed_by: Uuid,
    notes: impl Into<String>,
    previous: Option<&payroll::Model>,
    new: Option<&payroll::Model>,
) -> Result<payroll_history::ActiveModel, DbErr> {
    let now = utils::now();

    Ok(payroll_history::ActiveModel {
        id: NotSet,
        created_at: Set(now),
        updated_at: Set(now),
        payroll_id: Set(payroll_id),
        action: Set(action),
        performed_by: Set(performed_by),
        notes: Set(notes.into()),
        previous_values: Set(snapshot(previous)?),
        new_values: Set(snapshot(new)?),
    })
}

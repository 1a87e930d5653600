//! Whole-period calculation and multi-payroll approval, one transaction per
//! payroll. A failure is recorded and the run moves on.

use std::collections::HashMap;

use rust_decimal::Decimal;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, TransactionTrait};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};
use uuid::Uuid;

use super::{find_open_period, payroll::{self as payroll_service, calculate_in, find_for, insert_draft}};
use crate::{
    entity::{employee, payroll, payroll_period, prelude::*, sea_orm_active_enums::PayrollStatus},
    error::PayrollError,
};

#[derive(Debug, Clone, Deserialize)]
pub struct BulkRequest {
    pub payroll_period_id: Uuid,
    /// All active employees when absent or empty
    #[serde(default)]
    pub employee_ids: Vec<Uuid>,
    /// Recalculate payrolls that already exist
    #[serde(default)]
    pub recalculate: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BulkResult {
    pub employee_id: Uuid,
    pub employee_name: String,
    pub payroll_id: Uuid,
    pub net_salary: Decimal,
    pub status: PayrollStatus,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BulkError {
    pub employee_id: Uuid,
    pub message: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BulkOutcome {
    pub results: Vec<BulkResult>,
    pub errors: Vec<BulkError>,
}

async fn calculate_one(
    db: &DatabaseConnection,
    employee: &employee::Model,
    period: &payroll_period::Model,
    recalculate: bool,
    actor: Uuid,
) -> Result<BulkResult, PayrollError> {
    let txn = db.begin().await?;

    let payroll = match find_for(&txn, employee.id, period.id).await? {
        Some(_) if !recalculate => {
            return Err(PayrollError::DuplicateRecord(format!("payroll for {}", employee.full_name())));
        }
        Some(payroll) => payroll,
        None => insert_draft(&txn, employee, period, actor).await?,
    };

    let payroll = calculate_in(&txn, &payroll, employee, period, actor).await?;
    txn.commit().await?;

    Ok(BulkResult {
        employee_id: employee.id,
        employee_name: employee.full_name(),
        payroll_id: payroll.id,
        net_salary: payroll.net_salary,
        status: payroll.status,
    })
}

/// Failures are collected per employee and never abort the run.
#[instrument(skip(db, request), fields(period_id = %request.payroll_period_id))]
pub async fn bulk_calculate(db: &DatabaseConnection, request: &BulkRequest, actor: Uuid) -> Result<BulkOutcome, PayrollError> {
    let period = find_open_period(db, request.payroll_period_id).await?;

    let mut query = Employee::find()
        .filter(employee::Column::IsActive.eq(true))
        .order_by_asc(employee::Column::EmployeeCode);
    if !request.employee_ids.is_empty() {
        query = query.filter(employee::Column::Id.is_in(request.employee_ids.clone()));
    }
    let employees = query.all(db).await?;

    let mut outcome = BulkOutcome::default();
    for employee in &employees {
        match calculate_one(db, employee, &period, request.recalculate, actor).await {
            Ok(result) => outcome.results.push(result),
            Err(err) => {
                warn!(employee_id = %employee.id, error = %err, "payroll calculation failed");
                outcome.errors.push(BulkError {
                    employee_id: employee.id,
                    message: format!("{}: {err}", employee.full_name()),
                });
            }
        }
    }

    info!(calculated = outcome.results.len(), failed = outcome.errors.len(), "bulk calculation finished");
    Ok(outcome)
}

#[derive(Debug, Clone, Deserialize)]
pub struct BulkApproveRequest {
    pub payroll_ids: Vec<Uuid>,
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApprovalError {
    pub payroll_id: Uuid,
    pub message: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BulkApproval {
    pub approved_count: usize,
    pub approved: Vec<Uuid>,
    pub errors: Vec<ApprovalError>,
}

/// Approves each payroll in request order. Unknown ids and payrolls that are
/// not CALCULATED end up in `errors`.
#[instrument(skip(db, request), fields(requested = request.payroll_ids.len()))]
pub async fn bulk_approve(db: &DatabaseConnection, request: &BulkApproveRequest, actor: Uuid) -> Result<BulkApproval, PayrollError> {
    let mut payrolls: HashMap<Uuid, payroll::Model> = Payroll::find()
        .filter(payroll::Column::Id.is_in(request.payroll_ids.clone()))
        .all(db).await?
        .into_iter()
        .map(|payroll| (payroll.id, payroll))
        .collect();

    let mut outcome = BulkApproval::default();
    for &payroll_id in &request.payroll_ids {
        let result = match payrolls.remove(&payroll_id) {
            Some(payroll) => payroll_service::approve(db, payroll, actor, request.notes.clone()).await,
            None => Err(PayrollError::not_found("payroll", payroll_id)),
        };

        match result {
            Ok(payroll) => outcome.approved.push(payroll.id),
            Err(err) => {
                warn!(%payroll_id, error = %err, "payroll approval failed");
                outcome.errors.push(ApprovalError { payroll_id, message: err.to_string() });
            }
        }
    }
    outcome.approved_count = outcome.approved.len();

    info!(approved = outcome.approved_count, failed = outcome.errors.len(), "bulk approval finished");
    Ok(outcome)
}

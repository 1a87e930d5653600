//! Database-backed operations. Every state change runs in one transaction.

pub mod bulk;
pub mod payroll;
pub mod payslip;
pub mod period;
pub mod report;

use sea_orm::{ConnectionTrait, EntityTrait};
use uuid::Uuid;

use crate::{
    entity::{employee, payroll_period, prelude::*, role},
    error::PayrollError,
};

pub(crate) async fn find_employee<C: ConnectionTrait>(conn: &C, id: Uuid) -> Result<employee::Model, PayrollError> {
    Employee::find_by_id(id)
        .one(conn).await?
        .ok_or_else(|| PayrollError::not_found("employee", id))
}

pub(crate) async fn find_role<C: ConnectionTrait>(conn: &C, employee: &employee::Model) -> Result<Option<role::Model>, PayrollError> {
    let Some(role_id) = employee.role_id else {
        return Ok(None);
    };

    Ok(Role::find_by_id(role_id).one(conn).await?)
}

pub(crate) async fn find_period<C: ConnectionTrait>(conn: &C, id: Uuid) -> Result<payroll_period::Model, PayrollError> {
    PayrollPeriod::find_by_id(id)
        .one(conn).await?
        .ok_or_else(|| PayrollError::not_found("payroll period", id))
}

/// Period the payroll may still be written against
pub(crate) async fn find_open_period<C: ConnectionTrait>(conn: &C, id: Uuid) -> Result<payroll_period::Model, PayrollError> {
    let period = find_period(conn, id).await?;

    if period.is_finalized {
        return Err(PayrollError::FinalizedPeriod(period.id));
    }

    Ok(period)
}

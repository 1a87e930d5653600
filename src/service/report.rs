//! Read-only reports over payrolls and leave.

use std::collections::BTreeMap;

use chrono::{Datelike as _, NaiveDate};
use rust_decimal::Decimal;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder};
use serde::Serialize;
use uuid::Uuid;

use super::find_employee;
use crate::{
    entity::{
        employee, leave_application, leave_type, payroll, payroll_period,
        prelude::*,
        sea_orm_active_enums::{LeaveCategory, LeaveStatus, PayrollStatus},
    },
    error::PayrollError,
    utils::{self, round_money},
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PeriodSummary {
    pub period_id: Uuid,
    pub period_name: String,
    pub total_days: i64,
    pub total_payrolls: usize,
    pub total_gross: Decimal,
    pub total_net: Decimal,
    pub average_net: Decimal,
    pub status_counts: BTreeMap<PayrollStatus, usize>,
}

pub fn summarize(period: &payroll_period::Model, payrolls: &[payroll::Model]) -> PeriodSummary {
    let total_gross = payrolls.iter().map(|p| p.gross_salary).sum::<Decimal>();
    let total_net = payrolls.iter().map(|p| p.net_salary).sum::<Decimal>();

    let average_net = if payrolls.is_empty() {
        Decimal::ZERO
    } else {
        round_money(total_net / Decimal::from(payrolls.len()))
    };

    let mut status_counts = BTreeMap::new();
    for payroll in payrolls {
        *status_counts.entry(payroll.status).or_insert(0) += 1;
    }

    PeriodSummary {
        period_id: period.id,
        period_name: period.name.clone(),
        total_days: period.total_days(),
        total_payrolls: payrolls.len(),
        total_gross,
        total_net,
        average_net,
        status_counts,
    }
}

pub async fn period_summary(db: &DatabaseConnection, period: &payroll_period::Model) -> Result<PeriodSummary, PayrollError> {
    let payrolls = Payroll::find()
        .filter(payroll::Column::PayrollPeriodId.eq(period.id))
        .all(db).await?;

    Ok(summarize(period, &payrolls))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmployeePayrollRow {
    pub payroll_id: Uuid,
    pub period_name: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub gross_salary: Decimal,
    pub total_deductions: Decimal,
    pub tax_amount: Decimal,
    pub net_salary: Decimal,
    pub status: PayrollStatus,
}

/// Most recent period first
pub async fn employee_payroll_history(db: &DatabaseConnection, employee_id: Uuid) -> Result<Vec<EmployeePayrollRow>, PayrollError> {
    let employee = find_employee(db, employee_id).await?;

    let rows = Payroll::find()
        .filter(payroll::Column::EmployeeId.eq(employee.id))
        .find_also_related(PayrollPeriod)
        .order_by_desc(payroll_period::Column::StartDate)
        .all(db).await?;

    Ok(rows.into_iter().map(|(payroll, period)| EmployeePayrollRow {
        payroll_id: payroll.id,
        period_name: period.as_ref().map(|p| p.name.clone()),
        start_date: period.as_ref().map(|p| p.start_date),
        end_date: period.as_ref().map(|p| p.end_date),
        gross_salary: payroll.gross_salary,
        total_deductions: payroll.total_deductions,
        tax_amount: payroll.tax_amount,
        net_salary: payroll.net_salary,
        status: payroll.status,
    }).collect())
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LeaveBalance {
    pub employee_id: Uuid,
    pub year: i32,
    pub annual_leave_balance: i32,
    pub sick_leave_balance: i32,
    pub casual_leave_balance: i32,
    pub used_leaves_this_year: i32,
    pub annual_leaves_taken: i32,
    pub sick_leaves_taken: i32,
    pub casual_leaves_taken: i32,
    pub remaining_annual_leave: i32,
}

/// `applications` are the employee's APPROVED applications starting in `year`.
pub fn leave_balance(
    employee: &employee::Model,
    year: i32,
    applications: &[(leave_application::Model, Option<leave_type::Model>)],
) -> LeaveBalance {
    let taken = |category: LeaveCategory| -> i32 {
        applications
            .iter()
            .filter(|(_, leave_type)| leave_type.as_ref().is_some_and(|t| t.category == category))
            .map(|(application, _)| application.total_days)
            .sum()
    };

    let annual_leaves_taken = taken(LeaveCategory::Annual);

    LeaveBalance {
        employee_id: employee.id,
        year,
        annual_leave_balance: employee.annual_leave_balance,
        sick_leave_balance: employee.sick_leave_balance,
        casual_leave_balance: employee.casual_leave_balance,
        used_leaves_this_year: applications.iter().map(|(application, _)| application.total_days).sum(),
        annual_leaves_taken,
        sick_leaves_taken: taken(LeaveCategory::Sick),
        casual_leaves_taken: taken(LeaveCategory::Casual),
        remaining_annual_leave: (employee.annual_leave_balance - annual_leaves_taken).max(0),
    }
}

pub async fn employee_leave_balance(db: &DatabaseConnection, employee_id: Uuid) -> Result<LeaveBalance, PayrollError> {
    let employee = find_employee(db, employee_id).await?;
    let year = utils::today().year();

    let (Some(first_day), Some(last_day)) = (NaiveDate::from_ymd_opt(year, 1, 1), NaiveDate::from_ymd_opt(year, 12, 31)) else {
        return Ok(leave_balance(&employee, year, &[]));
    };

    let applications = LeaveApplication::find()
        .filter(leave_application::Column::EmployeeId.eq(employee.id))
        .filter(leave_application::Column::Status.eq(LeaveStatus::Approved))
        .filter(leave_application::Column::StartDate.between(first_day, last_day))
        .find_also_related(LeaveType)
        .all(db).await?;

    Ok(leave_balance(&employee, year, &applications))
}

#[cfg(test)]
mod tests {
    use chrono::Local;
    use rust_decimal_macros::dec;
    use sea_orm::{DatabaseBackend, MockDatabase};

    use super::*;
    use crate::{
        engine::compensation::tests::employee,
        entity::sea_orm_active_enums::SalaryType,
        lifecycle::tests::payroll,
        service::payroll::tests::period,
    };

    fn leave(category: LeaveCategory, days: i32) -> (leave_application::Model, Option<leave_type::Model>) {
        let leave_type = leave_type::Model {
            id: Uuid::new_v4(),
            created_at: Local::now().into(),
            updated_at: Local::now().into(),
            name: format!("{category:?} leave"),
            category,
            max_days_per_year: 30,
            is_paid: true,
            requires_approval: true,
            advance_notice_days: 0,
            is_active: true,
        };
        let application = leave_application::Model {
            id: Uuid::new_v4(),
            created_at: Local::now().into(),
            updated_at: Local::now().into(),
            employee_id: Uuid::nil(),
            leave_type_id: leave_type.id,
            start_date: NaiveDate::from_ymd_opt(2024, 4, 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2024, 4, 1).unwrap(),
            total_days: days,
            reason: String::new(),
            status: LeaveStatus::Approved,
            approved_by: None,
            approved_at: None,
        };

        (application, Some(leave_type))
    }

    #[test]
    fn test_leave_balance_by_category() {
        let e = employee(SalaryType::Fixed, Some(dec!(3000)), None);
        let applications = [
            leave(LeaveCategory::Annual, 5),
            leave(LeaveCategory::Annual, 3),
            leave(LeaveCategory::Sick, 2),
            leave(LeaveCategory::Emergency, 1),
        ];

        let balance = leave_balance(&e, 2024, &applications);

        assert_eq!(balance.used_leaves_this_year, 11);
        assert_eq!(balance.annual_leaves_taken, 8);
        assert_eq!(balance.sick_leaves_taken, 2);
        assert_eq!(balance.casual_leaves_taken, 0);
        assert_eq!(balance.remaining_annual_leave, 13);
    }

    #[test]
    fn test_remaining_annual_leave_never_negative() {
        let e = employee(SalaryType::Fixed, Some(dec!(3000)), None);

        let balance = leave_balance(&e, 2024, &[leave(LeaveCategory::Annual, 30)]);

        assert_eq!(balance.remaining_annual_leave, 0);
    }

    #[test]
    fn test_summarize() {
        let p = period(NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(), NaiveDate::from_ymd_opt(2024, 3, 31).unwrap(), false);
        let payrolls = [
            payroll(PayrollStatus::Approved),
            payroll(PayrollStatus::Approved),
            payroll::Model { net_salary: dec!(1000), ..payroll(PayrollStatus::Draft) },
        ];

        let summary = summarize(&p, &payrolls);

        assert_eq!(summary.total_days, 31);
        assert_eq!(summary.total_payrolls, 3);
        assert_eq!(summary.total_gross, dec!(8100));
        assert_eq!(summary.total_net, dec!(5390));
        assert_eq!(summary.average_net, dec!(1796.67));
        assert_eq!(summary.status_counts.get(&PayrollStatus::Approved), Some(&2));
        assert_eq!(summary.status_counts.get(&PayrollStatus::Draft), Some(&1));
        assert_eq!(summary.status_counts.get(&PayrollStatus::Paid), None);
    }

    #[test]
    fn test_summarize_empty_period() {
        let p = period(NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(), NaiveDate::from_ymd_opt(2024, 3, 31).unwrap(), false);

        let summary = summarize(&p, &[]);

        assert_eq!(summary.total_payrolls, 0);
        assert_eq!(summary.average_net, Decimal::ZERO);
    }

    #[actix_web::test]
    async fn test_leave_balance_unknown_employee() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<employee::Model>::new()])
            .into_connection();

        let result = employee_leave_balance(&db, Uuid::new_v4()).await;

        assert!(matches!(result, Err(PayrollError::ReferenceNotFound { entity: "employee", .. })));
    }
}

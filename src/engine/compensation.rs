//! Effective pay rates for an employee: direct values first, then the role's.

use rust_decimal::Decimal;
use serde::Serialize;

use crate::{consts::DEFAULT_OVERTIME_MULTIPLIER, entity::{employee, payroll, role, sea_orm_active_enums::SalaryType}, error::PayrollError};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Rates {
    pub salary_type: SalaryType,
    pub base_salary: Decimal,
    pub hourly_rate: Decimal,
    pub overtime_multiplier: Decimal,
}

/// Rates frozen on a payroll row. Zero means not frozen yet.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Snapshot {
    pub base_salary: Decimal,
    pub hourly_rate: Decimal,
}

impl From<&payroll::Model> for Snapshot {
    fn from(payroll: &payroll::Model) -> Self {
        Self {
            base_salary: payroll.base_salary,
            hourly_rate: payroll.hourly_rate,
        }
    }
}

fn non_zero(value: Decimal) -> Option<Decimal> {
    (!value.is_zero()).then_some(value)
}

pub fn resolve(employee: &employee::Model, role: Option<&role::Model>, snapshot: Snapshot) -> Result<Rates, PayrollError> {
    let base_salary = non_zero(snapshot.base_salary)
        .or(employee.base_salary.and_then(non_zero))
        .or(role.map(|r| r.base_salary).and_then(non_zero));

    let hourly_rate = non_zero(snapshot.hourly_rate)
        .or(employee.hourly_rate.and_then(non_zero))
        .or(role.and_then(|r| r.hourly_rate).and_then(non_zero));

    let primary = match employee.salary_type {
        SalaryType::Fixed => base_salary,
        SalaryType::Hourly => hourly_rate,
    };

    if primary.is_none() {
        return Err(PayrollError::MissingCompensationConfig {
            employee_id: employee.id,
            salary_type: employee.salary_type,
        });
    }

    let overtime_multiplier = role
        .map(|r| r.overtime_rate_multiplier)
        .filter(|m| m.is_sign_positive() && !m.is_zero())
        .unwrap_or(DEFAULT_OVERTIME_MULTIPLIER);

    Ok(Rates {
        salary_type: employee.salary_type,
        base_salary: base_salary.unwrap_or_default(),
        hourly_rate: hourly_rate.unwrap_or_default(),
        overtime_multiplier,
    })
}

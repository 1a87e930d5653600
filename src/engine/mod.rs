//! Payroll calculation engine.
//!
//! Everything in here is pure except the loaders; the caller gathers the
//! inputs, runs [`calculate`] and persists the outcome.

pub mod adjustments;
pub mod aggregate;
pub mod compensation;
pub mod earnings;
pub mod tax;

use rust_decimal::Decimal;
use serde::Serialize;

use self::{
    adjustments::{AutomaticDeduction, LineItem, MandatoryDeduction},
    aggregate::AttendanceSummary,
    compensation::Rates,
    tax::TaxBracket,
};
use crate::utils::round_money;

pub struct CalculationInput<'a> {
    pub rates: Rates,
    pub total_working_days: i32,
    pub attendance: AttendanceSummary,
    pub bonuses: &'a [LineItem],
    pub deductions: &'a [LineItem],
    pub mandatory_deductions: &'a [MandatoryDeduction],
    pub tax_brackets: &'a [TaxBracket],
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Calculation {
    pub rates: Rates,
    pub total_working_days: i32,
    pub attendance: AttendanceSummary,
    pub gross_salary: Decimal,
    pub overtime_amount: Decimal,
    pub total_bonuses: Decimal,
    pub total_deductions: Decimal,
    pub taxable_income: Decimal,
    pub tax_amount: Decimal,
    pub net_salary: Decimal,
    /// Mandatory deductions the payroll does not carry yet
    pub automatic_deductions: Vec<AutomaticDeduction>,
}

impl Calculation {
    /// Folds extra amounts into the totals after tax, as a what-if.
    pub fn with_extra(mut self, bonus: Decimal, deduction: Decimal) -> Self {
        self.total_bonuses = round_money(self.total_bonuses + bonus);
        self.total_deductions = round_money(self.total_deductions + deduction);
        self.net_salary = net_salary(
            self.gross_salary,
            self.overtime_amount,
            self.total_bonuses,
            self.total_deductions,
            self.tax_amount,
        );
        self
    }
}

pub fn net_salary(gross: Decimal, overtime: Decimal, bonuses: Decimal, deductions: Decimal, tax: Decimal) -> Decimal {
    round_money((gross + overtime + bonuses - deductions - tax).max(Decimal::ZERO))
}

pub fn calculate(input: &CalculationInput) -> Calculation {
    let gross_salary = earnings::base_pay(&input.rates, input.total_working_days, &input.attendance);
    let overtime_amount = earnings::overtime_pay(&input.rates, input.total_working_days, &input.attendance);

    let adjustments = adjustments::resolve(gross_salary, input.bonuses, input.deductions, input.mandatory_deductions);

    let taxable_income = (gross_salary + overtime_amount + adjustments.taxable_bonuses - adjustments.non_taxable_deductions)
        .max(Decimal::ZERO);
    let tax_amount = tax::progressive_tax(taxable_income, input.tax_brackets);

    let net_salary = net_salary(
        gross_salary,
        overtime_amount,
        adjustments.total_bonuses,
        adjustments.total_deductions,
        tax_amount,
    );

    Calculation {
        rates: input.rates.clone(),
        total_working_days: input.total_working_days,
        attendance: input.attendance.clone(),
        gross_salary,
        overtime_amount,
        total_bonuses: adjustments.total_bonuses,
        total_deductions: adjustments.total_deductions,
        taxable_income: round_money(taxable_income),
        tax_amount,
        net_salary,
        automatic_deductions: adjustments.automatic,
    }
}

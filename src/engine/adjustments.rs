//! Bonuses and deductions attached to a payroll, plus the mandatory
//! deductions that still have to be applied.

use rust_decimal::Decimal;
use serde::Serialize;
use uuid::Uuid;

use crate::{entity::{deduction_type, sea_orm_active_enums::CalculationType}, utils::round_money};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AmountRule {
    Fixed(Decimal),
    /// Percent of gross salary
    Percentage(Decimal),
}

impl AmountRule {
    pub fn new(calculation_type: CalculationType, default_amount: Decimal) -> Self {
        match calculation_type {
            CalculationType::Fixed => AmountRule::Fixed(default_amount),
            CalculationType::Percentage => AmountRule::Percentage(default_amount),
        }
    }

    pub fn amount_on(&self, gross_salary: Decimal) -> Decimal {
        match *self {
            AmountRule::Fixed(amount) => amount,
            AmountRule::Percentage(percent) => round_money(gross_salary * percent / Decimal::ONE_HUNDRED),
        }
    }
}

/// A bonus or deduction already attached to the payroll
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineItem {
    pub type_id: Uuid,
    pub amount: Decimal,
    pub is_taxable: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MandatoryDeduction {
    pub type_id: Uuid,
    pub name: String,
    pub rule: AmountRule,
    pub is_taxable: bool,
}

impl From<&deduction_type::Model> for MandatoryDeduction {
    fn from(deduction_type: &deduction_type::Model) -> Self {
        Self {
            type_id: deduction_type.id,
            name: deduction_type.name.clone(),
            rule: AmountRule::new(deduction_type.calculation_type, deduction_type.default_amount),
            is_taxable: deduction_type.is_taxable,
        }
    }
}

/// Deduction line the caller has to persist
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AutomaticDeduction {
    pub deduction_type_id: Uuid,
    pub amount: Decimal,
    pub description: String,
    #[serde(skip)]
    pub is_taxable: bool,
}

impl AutomaticDeduction {
    pub fn as_line_item(&self) -> LineItem {
        LineItem {
            type_id: self.deduction_type_id,
            amount: self.amount,
            is_taxable: self.is_taxable,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Adjustments {
    pub total_bonuses: Decimal,
    pub total_deductions: Decimal,
    /// Bonuses that count toward taxable income
    pub taxable_bonuses: Decimal,
    /// Deductions taken out of taxable income
    pub non_taxable_deductions: Decimal,
    pub automatic: Vec<AutomaticDeduction>,
}

pub fn resolve(
    gross_salary: Decimal,
    bonuses: &[LineItem],
    deductions: &[LineItem],
    mandatory: &[MandatoryDeduction],
) -> Adjustments {
    let mut adjustments = Adjustments::default();

    for bonus in bonuses {
        adjustments.total_bonuses += bonus.amount;
        if bonus.is_taxable {
            adjustments.taxable_bonuses += bonus.amount;
        }
    }

    let automatic = mandatory
        .iter()
        .filter(|m| !deductions.iter().any(|d| d.type_id == m.type_id))
        .map(|m| AutomaticDeduction {
            deduction_type_id: m.type_id,
            amount: m.rule.amount_on(gross_salary),
            description: format!("Automatic {}", m.name),
            is_taxable: m.is_taxable,
        })
        .filter(|auto| auto.amount > Decimal::ZERO)
        .collect::<Vec<_>>();

    for deduction in deductions.iter().cloned().chain(automatic.iter().map(AutomaticDeduction::as_line_item)) {
        adjustments.total_deductions += deduction.amount;
        if !deduction.is_taxable {
            adjustments.non_taxable_deductions += deduction.amount;
        }
    }

    adjustments.total_bonuses = round_money(adjustments.total_bonuses);
    adjustments.total_deductions = round_money(adjustments.total_deductions);
    adjustments.automatic = automatic;
    adjustments
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;

    fn mandatory(name: &str, rule: AmountRule, is_taxable: bool) -> MandatoryDeduction {
        MandatoryDeduction {
            type_id: Uuid::new_v4(),
            name: name.to_owned(),
            rule,
            is_taxable,
        }
    }

    #[test]
    fn test_amount_rule() {
        assert_eq!(AmountRule::Fixed(dec!(100)).amount_on(dec!(2700)), dec!(100));
        assert_eq!(AmountRule::Percentage(dec!(5)).amount_on(dec!(2700)), dec!(135.00));
        assert_eq!(AmountRule::Percentage(dec!(3.3)).amount_on(dec!(1234.56)), dec!(40.74));
    }

    #[test]
    fn test_sums_attached_items() {
        let bonuses = [
            LineItem { type_id: Uuid::new_v4(), amount: dec!(200), is_taxable: true },
            LineItem { type_id: Uuid::new_v4(), amount: dec!(50), is_taxable: false },
        ];
        let deductions = [
            LineItem { type_id: Uuid::new_v4(), amount: dec!(30), is_taxable: false },
            LineItem { type_id: Uuid::new_v4(), amount: dec!(20), is_taxable: true },
        ];

        let adjustments = resolve(dec!(2000), &bonuses, &deductions, &[]);

        assert_eq!(adjustments.total_bonuses, dec!(250));
        assert_eq!(adjustments.taxable_bonuses, dec!(200));
        assert_eq!(adjustments.total_deductions, dec!(50));
        assert_eq!(adjustments.non_taxable_deductions, dec!(30));
        assert!(adjustments.automatic.is_empty());
    }

    #[test]
    fn test_plans_missing_mandatory_deductions() {
        let pension = mandatory("Pension", AmountRule::Percentage(dec!(5)), false);
        let insurance = mandatory("Insurance", AmountRule::Fixed(dec!(100)), true);

        let adjustments = resolve(dec!(2000), &[], &[], &[pension.clone(), insurance.clone()]);

        assert_eq!(adjustments.automatic.len(), 2);
        assert_eq!(adjustments.automatic[0].description, "Automatic Pension");
        assert_eq!(adjustments.automatic[0].amount, dec!(100.00));
        assert_eq!(adjustments.automatic[1].deduction_type_id, insurance.type_id);
        assert_eq!(adjustments.total_deductions, dec!(200));
        assert_eq!(adjustments.non_taxable_deductions, dec!(100));
    }

    #[test]
    fn test_manual_item_suppresses_mandatory() {
        let insurance = mandatory("Insurance", AmountRule::Fixed(dec!(100)), true);
        let manual = [LineItem { type_id: insurance.type_id, amount: dec!(80), is_taxable: true }];

        let adjustments = resolve(dec!(2000), &[], &manual, &[insurance]);

        assert!(adjustments.automatic.is_empty());
        assert_eq!(adjustments.total_deductions, dec!(80));
    }

    #[test]
    fn test_zero_amount_is_not_applied() {
        let pension = mandatory("Pension", AmountRule::Percentage(dec!(5)), true);
        let empty = mandatory("Empty", AmountRule::Fixed(Decimal::ZERO), true);

        let adjustments = resolve(Decimal::ZERO, &[], &[], &[pension, empty]);

        assert!(adjustments.automatic.is_empty());
        assert_eq!(adjustments.total_deductions, Decimal::ZERO);
    }
}

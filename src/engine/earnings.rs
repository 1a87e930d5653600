//! Base pay and overtime premium.

use rust_decimal::Decimal;

use super::{aggregate::AttendanceSummary, compensation::Rates};
use crate::{consts::STANDARD_HOURS_PER_DAY, entity::sea_orm_active_enums::SalaryType, utils::round_money};

/// Fixed salaries are prorated by PRESENT days over working days; with no
/// working days in the period the full base is paid. Hourly pay covers
/// regular hours only.
pub fn base_pay(rates: &Rates, total_working_days: i32, attendance: &AttendanceSummary) -> Decimal {
    let amount = match rates.salary_type {
        SalaryType::Fixed if total_working_days > 0 => {
            let daily_rate = rates.base_salary / Decimal::from(total_working_days);
            daily_rate * Decimal::from(attendance.days_worked)
        }
        SalaryType::Fixed => rates.base_salary,
        SalaryType::Hourly => attendance.regular_hours * rates.hourly_rate,
    };

    round_money(amount)
}

/// Hourly rate overtime is priced from
pub fn regular_hourly_rate(rates: &Rates, total_working_days: i32) -> Decimal {
    match rates.salary_type {
        SalaryType::Hourly => rates.hourly_rate,
        SalaryType::Fixed => {
            let scheduled_hours = Decimal::from(total_working_days) * STANDARD_HOURS_PER_DAY;
            if scheduled_hours > Decimal::ZERO {
                rates.base_salary / scheduled_hours
            } else {
                Decimal::ZERO
            }
        }
    }
}

pub fn overtime_pay(rates: &Rates, total_working_days: i32, attendance: &AttendanceSummary) -> Decimal {
    if attendance.overtime_hours <= Decimal::ZERO {
        return Decimal::ZERO;
    }

    let overtime_rate = regular_hourly_rate(rates, total_working_days) * rates.overtime_multiplier;
    round_money(attendance.overtime_hours * overtime_rate)
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;

    fn rates(salary_type: SalaryType, base_salary: Decimal, hourly_rate: Decimal) -> Rates {
        Rates {
            salary_type,
            base_salary,
            hourly_rate,
            overtime_multiplier: dec!(1.5),
        }
    }

    fn attendance(days_worked: i32, regular_hours: Decimal, overtime_hours: Decimal) -> AttendanceSummary {
        AttendanceSummary {
            days_worked,
            regular_hours,
            overtime_hours,
            total_hours: regular_hours + overtime_hours,
            ..Default::default()
        }
    }

    #[test]
    fn test_fixed_prorated_by_days_worked() {
        let r = rates(SalaryType::Fixed, dec!(3000), Decimal::ZERO);

        assert_eq!(base_pay(&r, 20, &attendance(18, dec!(40), dec!(0))), dec!(2700.00));
        assert_eq!(base_pay(&r, 21, &attendance(20, dec!(0), dec!(0))), dec!(2857.14));
    }

    #[test]
    fn test_fixed_without_working_days_is_unprorated() {
        let r = rates(SalaryType::Fixed, dec!(3000), Decimal::ZERO);

        assert_eq!(base_pay(&r, 0, &attendance(0, dec!(0), dec!(0))), dec!(3000));
        assert_eq!(base_pay(&r, 0, &attendance(2, dec!(16), dec!(0))), dec!(3000));
    }

    #[test]
    fn test_hourly_uses_regular_hours() {
        let r = rates(SalaryType::Hourly, Decimal::ZERO, dec!(12.50));

        assert_eq!(base_pay(&r, 20, &attendance(3, dec!(37.5), dec!(4))), dec!(468.75));
    }

    #[test]
    fn test_no_overtime() {
        let r = rates(SalaryType::Hourly, Decimal::ZERO, dec!(20));

        assert_eq!(overtime_pay(&r, 20, &attendance(5, dec!(40), dec!(0))), Decimal::ZERO);
        assert_eq!(overtime_pay(&r, 20, &attendance(5, dec!(40), dec!(-1))), Decimal::ZERO);
    }

    #[test]
    fn test_hourly_overtime() {
        let r = rates(SalaryType::Hourly, Decimal::ZERO, dec!(20));

        assert_eq!(overtime_pay(&r, 20, &attendance(5, dec!(40), dec!(3))), dec!(90.00));
    }

    #[test]
    fn test_fixed_overtime_from_scheduled_hours() {
        let r = rates(SalaryType::Fixed, dec!(3200), Decimal::ZERO);

        // 3200 / (20 * 8) = 20 per hour, 30 with premium
        assert_eq!(overtime_pay(&r, 20, &attendance(20, dec!(160), dec!(2.5))), dec!(75.00));
        assert_eq!(overtime_pay(&r, 0, &attendance(0, dec!(0), dec!(2.5))), Decimal::ZERO);
    }

    #[test]
    fn test_configured_multiplier() {
        let mut r = rates(SalaryType::Hourly, Decimal::ZERO, dec!(20));
        r.overtime_multiplier = dec!(2);

        assert_eq!(overtime_pay(&r, 20, &attendance(5, dec!(40), dec!(3))), dec!(120.00));
    }
}

//! Hour bookkeeping for a single attendance record.
//!
//! `attendance_record::ActiveModel::before_save` runs [`derive_hours`] so the
//! stored `total_hours`, `regular_hours` and `overtime_hours` always follow
//! the punches. The payroll engine only ever reads those stored values.

use chrono::{Duration, NaiveDate, NaiveTime, TimeDelta};
use rust_decimal::Decimal;
use sea_orm::{prelude::DateTimeWithTimeZone, ActiveValue, Value};

use crate::{consts::DEFAULT_SHIFT_HOURS, entity::shift, utils::round_money};

/// Value currently held by an active model field, if any
pub fn current<V>(value: &ActiveValue<V>) -> Option<V>
where
    V: Into<Value> + Clone,
{
    match value {
        ActiveValue::Set(v) | ActiveValue::Unchanged(v) => Some(v.clone()),
        ActiveValue::NotSet => None,
    }
}

#[derive(Debug, Clone)]
pub struct Punches {
    pub date: NaiveDate,
    pub time_in: Option<DateTimeWithTimeZone>,
    pub time_out: Option<DateTimeWithTimeZone>,
    pub break_start: Option<DateTimeWithTimeZone>,
    pub break_end: Option<DateTimeWithTimeZone>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DerivedHours {
    pub total_hours: Decimal,
    pub regular_hours: Decimal,
    pub overtime_hours: Decimal,
    pub break_duration: Decimal,
    pub is_late: bool,
    pub late_minutes: i32,
}

fn to_hours(delta: TimeDelta) -> Decimal {
    round_money(Decimal::from(delta.num_seconds()) / Decimal::from(3600))
}

/// Scheduled hours of a shift minus its break. A shift ending before it
/// starts runs past midnight.
pub fn shift_working_hours(start: NaiveTime, end: NaiveTime, break_minutes: i32) -> Decimal {
    let mut span = end.signed_duration_since(start);
    if end < start {
        span = span + Duration::days(1);
    }

    let worked = span - Duration::minutes(i64::from(break_minutes));
    to_hours(worked.max(TimeDelta::zero()))
}

/// `None` until both `time_in` and `time_out` are punched
pub fn derive_hours(punches: &Punches, shift: Option<&shift::Model>) -> Option<DerivedHours> {
    let (time_in, time_out) = (punches.time_in?, punches.time_out?);

    let mut worked = time_out.signed_duration_since(time_in);

    let mut break_duration = Decimal::ZERO;
    if let (Some(start), Some(end)) = (punches.break_start, punches.break_end) {
        let taken = end.signed_duration_since(start).max(TimeDelta::zero());
        break_duration = to_hours(taken);
        worked = worked - taken;
    }

    let total_hours = to_hours(worked.max(TimeDelta::zero()));

    let expected_hours = shift.map(|s| s.working_hours).unwrap_or(DEFAULT_SHIFT_HOURS);
    let (regular_hours, overtime_hours) = if total_hours <= expected_hours {
        (total_hours, Decimal::ZERO)
    } else {
        (expected_hours, total_hours - expected_hours)
    };

    let (is_late, late_minutes) = match shift {
        Some(shift) => {
            // Shift start is read in the punch's own offset
            let expected_start = punches.date.and_time(shift.start_time);
            let arrived = time_in.naive_local();

            if arrived > expected_start {
                (true, arrived.signed_duration_since(expected_start).num_minutes() as i32)
            } else {
                (false, 0)
            }
        }
        None => (false, 0),
    };

    Some(DerivedHours {
        total_hours,
        regular_hours,
        overtime_hours,
        break_duration,
        is_late,
        late_minutes,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    use chrono::{FixedOffset, TimeZone as _};
    use rust_decimal_macros::dec;
    use uuid::Uuid;

    fn at(h: u32, m: u32) -> DateTimeWithTimeZone {
        FixedOffset::east_opt(7 * 3600).unwrap().with_ymd_and_hms(2024, 3, 4, h, m, 0).unwrap()
    }

    fn time(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    fn day_shift() -> shift::Model {
        shift::Model {
            id: Uuid::new_v4(),
            created_at: at(0, 0),
            updated_at: at(0, 0),
            name: "Day".to_owned(),
            start_time: time(9, 0),
            end_time: time(17, 0),
            break_minutes: 60,
            working_hours: dec!(7),
            is_active: true,
        }
    }

    fn punches(time_in: Option<DateTimeWithTimeZone>, time_out: Option<DateTimeWithTimeZone>) -> Punches {
        Punches {
            date: NaiveDate::from_ymd_opt(2024, 3, 4).unwrap(),
            time_in,
            time_out,
            break_start: None,
            break_end: None,
        }
    }

    #[test]
    fn test_shift_working_hours() {
        assert_eq!(shift_working_hours(time(9, 0), time(17, 0), 60), dec!(7));
        assert_eq!(shift_working_hours(time(22, 0), time(6, 0), 60), dec!(7));
        assert_eq!(shift_working_hours(time(9, 0), time(9, 30), 60), dec!(0));
    }

    #[test]
    fn test_hours_round_half_away_from_zero() {
        // 18 seconds is exactly 0.005 hours
        assert_eq!(to_hours(TimeDelta::seconds(18)), dec!(0.01));
        assert_eq!(to_hours(TimeDelta::seconds(90)), dec!(0.03));
    }

    #[test]
    fn test_derive_hours_requires_both_punches() {
        assert_eq!(derive_hours(&punches(Some(at(9, 0)), None), None), None);
        assert_eq!(derive_hours(&punches(None, Some(at(17, 0))), None), None);
    }

    #[test]
    fn test_derive_hours_with_break_and_overtime() {
        let mut p = punches(Some(at(9, 0)), Some(at(18, 30)));
        p.break_start = Some(at(12, 0));
        p.break_end = Some(at(13, 0));

        let hours = derive_hours(&p, None).unwrap();
        assert_eq!(hours.total_hours, dec!(8.5));
        assert_eq!(hours.regular_hours, dec!(8));
        assert_eq!(hours.overtime_hours, dec!(0.5));
        assert_eq!(hours.break_duration, dec!(1));
        assert!(!hours.is_late);
    }

    #[test]
    fn test_derive_hours_under_shift_expectation() {
        let shift = day_shift();
        let hours = derive_hours(&punches(Some(at(9, 0)), Some(at(15, 0))), Some(&shift)).unwrap();

        assert_eq!(hours.total_hours, dec!(6));
        assert_eq!(hours.regular_hours, dec!(6));
        assert_eq!(hours.overtime_hours, dec!(0));
    }

    #[test]
    fn test_derive_hours_lateness() {
        let shift = day_shift();

        let late = derive_hours(&punches(Some(at(9, 17)), Some(at(17, 0))), Some(&shift)).unwrap();
        assert!(late.is_late);
        assert_eq!(late.late_minutes, 17);
        assert_eq!(late.total_hours, dec!(7.72));
        assert_eq!(late.overtime_hours, dec!(0.72));

        let on_time = derive_hours(&punches(Some(at(8, 55)), Some(at(17, 0))), Some(&shift)).unwrap();
        assert!(!on_time.is_late);
        assert_eq!(on_time.late_minutes, 0);
    }
}

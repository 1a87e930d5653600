use chrono::{Datelike as _, Local, NaiveDate, Weekday};
use rust_decimal::{Decimal, RoundingStrategy};
use sea_orm::prelude::DateTimeWithTimeZone;

use crate::consts::MONEY_DECIMAL_PLACES;

pub fn now() -> DateTimeWithTimeZone {
    Local::now().fixed_offset()
}

pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Monday to Friday dates in `[start, end]`. Holidays are not modelled.
pub fn count_working_days(start: NaiveDate, end: NaiveDate) -> i32 {
    start
        .iter_days()
        .take_while(|day| *day <= end)
        .filter(|day| !matches!(day.weekday(), Weekday::Sat | Weekday::Sun))
        .count() as i32
}

/// Round half away from zero to cents
pub fn round_money(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(MONEY_DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
}

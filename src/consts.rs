use rust_decimal::Decimal;

/// Fractional digits kept on every monetary amount
pub const MONEY_DECIMAL_PLACES: u32 = 2;

/// Hours in a working day, used to turn a fixed salary into an hourly rate
pub const STANDARD_HOURS_PER_DAY: Decimal = Decimal::from_parts(8, 0, 0, false, 0);

/// Expected hours for an attendance record without a shift
pub const DEFAULT_SHIFT_HOURS: Decimal = Decimal::from_parts(8, 0, 0, false, 0);

/// Overtime premium for employees whose role does not configure one
pub const DEFAULT_OVERTIME_MULTIPLIER: Decimal = Decimal::from_parts(15, 0, 0, false, 1);

pub const SLIP_NUMBER_PREFIX: &str = "PS";

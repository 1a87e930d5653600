//! Entities mirroring the schema created by the `migration` crate.

pub mod prelude;

pub mod attendance_record;
pub mod bonus_type;
pub mod deduction_type;
pub mod employee;
pub mod leave_application;
pub mod leave_type;
pub mod pay_slip;
pub mod payroll;
pub mod payroll_bonus;
pub mod payroll_deduction;
pub mod payroll_history;
pub mod payroll_period;
pub mod role;
pub mod sea_orm_active_enums;
pub mod shift;
pub mod tax_slab;

pub use super::attendance_record::Entity as AttendanceRecord;
pub use super::bonus_type::Entity as BonusType;
pub use super::deduction_type::Entity as DeductionType;
pub use super::employee::Entity as Employee;
pub use super::leave_application::Entity as LeaveApplication;
pub use super::leave_type::Entity as LeaveType;
pub use super::pay_slip::Entity as PaySlip;
pub use super::payroll::Entity as Payroll;
pub use super::payroll_bonus::Entity as PayrollBonus;
pub use super::payroll_deduction::Entity as PayrollDeduction;
pub use super::payroll_history::Entity as PayrollHistory;
pub use super::payroll_period::Entity as PayrollPeriod;
pub use super::role::Entity as Role;

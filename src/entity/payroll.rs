use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::PayrollStatus;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "payroll")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
    pub employee_id: Uuid,
    pub payroll_period_id: Uuid,
    #[sea_orm(column_type = "Decimal(Some((12, 2)))")]
    pub base_salary: Decimal,
    #[sea_orm(column_type = "Decimal(Some((8, 2)))")]
    pub hourly_rate: Decimal,
    pub total_working_days: i32,
    pub days_worked: i32,
    pub days_absent: i32,
    pub days_on_leave: i32,
    #[sea_orm(column_type = "Decimal(Some((6, 2)))")]
    pub regular_hours: Decimal,
    #[sea_orm(column_type = "Decimal(Some((6, 2)))")]
    pub overtime_hours: Decimal,
    #[sea_orm(column_type = "Decimal(Some((12, 2)))")]
    pub gross_salary: Decimal,
    #[sea_orm(column_type = "Decimal(Some((10, 2)))")]
    pub overtime_amount: Decimal,
    #[sea_orm(column_type = "Decimal(Some((10, 2)))")]
    pub total_bonuses: Decimal,
    #[sea_orm(column_type = "Decimal(Some((10, 2)))")]
    pub total_deductions: Decimal,
    #[sea_orm(column_type = "Decimal(Some((10, 2)))")]
    pub tax_amount: Decimal,
    #[sea_orm(column_type = "Decimal(Some((12, 2)))")]
    pub net_salary: Decimal,
    pub status: PayrollStatus,
    pub calculated_at: Option<DateTimeWithTimeZone>,
    pub approved_by: Option<Uuid>,
    pub approved_at: Option<DateTimeWithTimeZone>,
    pub paid_at: Option<DateTimeWithTimeZone>,
    pub notes: String,
    /// Bumped on every write; updates are conditional on the value read
    pub version: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::employee::Entity",
        from = "Column::EmployeeId",
        to = "super::employee::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    Employee,
    #[sea_orm(
        belongs_to = "super::payroll_period::Entity",
        from = "Column::PayrollPeriodId",
        to = "super::payroll_period::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    PayrollPeriod,
    #[sea_orm(has_many = "super::payroll_bonus::Entity")]
    PayrollBonus,
    #[sea_orm(has_many = "super::payroll_deduction::Entity")]
    PayrollDeduction,
    #[sea_orm(has_many = "super::payroll_history::Entity")]
    PayrollHistory,
    #[sea_orm(has_one = "super::pay_slip::Entity")]
    PaySlip,
}

impl Related<super::employee::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Employee.def()
    }
}

impl Related<super::payroll_period::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PayrollPeriod.def()
    }
}

impl Related<super::payroll_bonus::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PayrollBonus.def()
    }
}

impl Related<super::payroll_deduction::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PayrollDeduction.def()
    }
}

impl Related<super::payroll_history::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PayrollHistory.def()
    }
}

impl Related<super::pay_slip::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PaySlip.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

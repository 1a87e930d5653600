use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::CalculationType;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "deduction_type")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
    pub name: String,
    pub description: String,
    pub calculation_type: CalculationType,
    /// Fixed amount or percentage, depending on `calculation_type`
    #[sea_orm(column_type = "Decimal(Some((10, 2)))")]
    pub default_amount: Decimal,
    pub is_mandatory: bool,
    pub is_taxable: bool,
    pub is_active: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::payroll_deduction::Entity")]
    PayrollDeduction,
}

impl Related<super::payroll_deduction::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PayrollDeduction.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

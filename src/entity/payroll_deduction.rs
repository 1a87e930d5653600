use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "payroll_deduction")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
    pub payroll_id: Uuid,
    pub deduction_type_id: Uuid,
    #[sea_orm(column_type = "Decimal(Some((10, 2)))")]
    pub amount: Decimal,
    pub description: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::payroll::Entity",
        from = "Column::PayrollId",
        to = "super::payroll::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    Payroll,
    #[sea_orm(
        belongs_to = "super::deduction_type::Entity",
        from = "Column::DeductionTypeId",
        to = "super::deduction_type::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    DeductionType,
}

impl Related<super::payroll::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Payroll.def()
    }
}

impl Related<super::deduction_type::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::DeductionType.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

use sea_orm::{entity::prelude::*, ActiveValue::Set};
use serde::{Deserialize, Serialize};

use crate::attendance;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "shift")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
    pub name: String,
    pub start_time: Time,
    pub end_time: Time,
    pub break_minutes: i32,
    #[sea_orm(column_type = "Decimal(Some((4, 2)))")]
    pub working_hours: Decimal,
    pub is_active: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::attendance_record::Entity")]
    AttendanceRecord,
}

impl Related<super::attendance_record::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::AttendanceRecord.def()
    }
}

#[async_trait::async_trait]
impl ActiveModelBehavior for ActiveModel {
    /// Fields left out of a partial update are read from the stored row
    async fn before_save<C>(mut self, db: &C, insert: bool) -> Result<Self, DbErr>
    where
        C: ConnectionTrait,
    {
        if !(self.start_time.is_set() || self.end_time.is_set() || self.break_minutes.is_set()) {
            return Ok(self);
        }

        let stored = match attendance::current(&self.id) {
            Some(id) if !insert => Entity::find_by_id(id).one(db).await?,
            _ => None,
        };

        let start = attendance::current(&self.start_time).or(stored.as_ref().map(|s| s.start_time));
        let end = attendance::current(&self.end_time).or(stored.as_ref().map(|s| s.end_time));
        let break_minutes = attendance::current(&self.break_minutes).or(stored.as_ref().map(|s| s.break_minutes));

        if let (Some(start), Some(end), Some(break_minutes)) = (start, end, break_minutes) {
            self.working_hours = Set(attendance::shift_working_hours(start, end, break_minutes));
        }

        Ok(self)
    }
}

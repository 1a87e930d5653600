use sea_orm::{entity::prelude::*, ActiveValue::Set};
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::AttendanceStatus;
use crate::attendance::{self, Punches};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "attendance_record")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
    pub employee_id: Uuid,
    pub date: Date,
    pub shift_id: Option<Uuid>,
    pub time_in: Option<DateTimeWithTimeZone>,
    pub time_out: Option<DateTimeWithTimeZone>,
    pub break_start: Option<DateTimeWithTimeZone>,
    pub break_end: Option<DateTimeWithTimeZone>,
    #[sea_orm(column_type = "Decimal(Some((5, 2)))")]
    pub total_hours: Decimal,
    #[sea_orm(column_type = "Decimal(Some((5, 2)))")]
    pub regular_hours: Decimal,
    #[sea_orm(column_type = "Decimal(Some((5, 2)))")]
    pub overtime_hours: Decimal,
    #[sea_orm(column_type = "Decimal(Some((4, 2)))")]
    pub break_duration: Decimal,
    pub status: AttendanceStatus,
    pub is_late: bool,
    pub late_minutes: i32,
    pub notes: String,
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
        belongs_to = "super::shift::Entity",
        from = "Column::ShiftId",
        to = "super::shift::Column::Id",
        on_update = "Cascade",
        on_delete = "SetNull"
    )]
    Shift,
}

impl Related<super::employee::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Employee.def()
    }
}

impl Related<super::shift::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Shift.def()
    }
}

#[async_trait::async_trait]
impl ActiveModelBehavior for ActiveModel {
    /// Derived hour fields are recomputed whenever a punch, the date or the
    /// shift changes. Fields left out of a partial update come from the stored row.
    async fn before_save<C>(mut self, db: &C, insert: bool) -> Result<Self, DbErr>
    where
        C: ConnectionTrait,
    {
        let touched = self.date.is_set()
            || self.shift_id.is_set()
            || self.time_in.is_set()
            || self.time_out.is_set()
            || self.break_start.is_set()
            || self.break_end.is_set();
        if !touched {
            return Ok(self);
        }

        let stored = match attendance::current(&self.id) {
            Some(id) if !insert => Entity::find_by_id(id).one(db).await?,
            _ => None,
        };
        let stored = stored.as_ref();

        let Some(date) = attendance::current(&self.date).or(stored.map(|r| r.date)) else {
            return Ok(self);
        };

        let shift_id = attendance::current(&self.shift_id).unwrap_or_else(|| stored.and_then(|r| r.shift_id));
        let shift = match shift_id {
            Some(shift_id) => super::shift::Entity::find_by_id(shift_id).one(db).await?,
            None => None,
        };

        let punches = Punches {
            date,
            time_in: attendance::current(&self.time_in).unwrap_or_else(|| stored.and_then(|r| r.time_in)),
            time_out: attendance::current(&self.time_out).unwrap_or_else(|| stored.and_then(|r| r.time_out)),
            break_start: attendance::current(&self.break_start).unwrap_or_else(|| stored.and_then(|r| r.break_start)),
            break_end: attendance::current(&self.break_end).unwrap_or_else(|| stored.and_then(|r| r.break_end)),
        };

        if let Some(hours) = attendance::derive_hours(&punches, shift.as_ref()) {
            self.total_hours = Set(hours.total_hours);
            self.regular_hours = Set(hours.regular_hours);
            self.overtime_hours = Set(hours.overtime_hours);
            self.break_duration = Set(hours.break_duration);
            self.is_late = Set(hours.is_late);
            self.late_minutes = Set(hours.late_minutes);
        }

        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use chrono::{FixedOffset, NaiveDate, TimeZone as _};
    use rust_decimal_macros::dec;
    use sea_orm::{ActiveValue::Unchanged, DatabaseBackend, MockDatabase};

    use super::*;

    fn at(h: u32, m: u32) -> DateTimeWithTimeZone {
        FixedOffset::east_opt(7 * 3600).unwrap().with_ymd_and_hms(2024, 3, 4, h, m, 0).unwrap()
    }

    #[actix_web::test]
    async fn test_clock_out_recomputes_from_stored_punches() {
        let stored = Model {
            id: Uuid::new_v4(),
            created_at: at(9, 0),
            updated_at: at(9, 0),
            employee_id: Uuid::new_v4(),
            date: NaiveDate::from_ymd_opt(2024, 3, 4).unwrap(),
            shift_id: None,
            time_in: Some(at(9, 0)),
            time_out: None,
            break_start: None,
            break_end: None,
            total_hours: Decimal::ZERO,
            regular_hours: Decimal::ZERO,
            overtime_hours: Decimal::ZERO,
            break_duration: Decimal::ZERO,
            status: AttendanceStatus::Present,
            is_late: false,
            late_minutes: 0,
            notes: String::new(),
        };

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![stored.clone()]])
            .into_connection();

        let active = ActiveModel {
            id: Unchanged(stored.id),
            time_out: Set(Some(at(18, 30))),
            ..Default::default()
        };

        let saved = active.before_save(&db, false).await.unwrap();
        assert_eq!(saved.total_hours, Set(dec!(9.5)));
        assert_eq!(saved.regular_hours, Set(dec!(8)));
        assert_eq!(saved.overtime_hours, Set(dec!(1.5)));
    }
}

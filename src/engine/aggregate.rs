//! Reduces an employee's attendance rows for a period to day and hour counters.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sea_orm::{ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter};
use serde::Serialize;
use uuid::Uuid;

use crate::entity::{attendance_record, prelude::*, sea_orm_active_enums::AttendanceStatus};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AttendanceSummary {
    /// Days marked PRESENT. LATE and HALF_DAY rows are not counted.
    pub days_worked: i32,
    pub days_absent: i32,
    pub days_on_leave: i32,
    pub total_hours: Decimal,
    pub regular_hours: Decimal,
    pub overtime_hours: Decimal,
}

impl AttendanceSummary {
    /// Every row contributes its hours whatever its status; dates without a
    /// row contribute nothing and are not absences.
    pub fn from_records<'a>(records: impl IntoIterator<Item = &'a attendance_record::Model>) -> Self {
        records.into_iter().fold(Self::default(), |mut summary, record| {
            match record.status {
                AttendanceStatus::Present => summary.days_worked += 1,
                AttendanceStatus::Absent => summary.days_absent += 1,
                AttendanceStatus::Leave => summary.days_on_leave += 1,
                _ => {}
            }

            summary.total_hours += record.total_hours;
            summary.regular_hours += record.regular_hours;
            summary.overtime_hours += record.overtime_hours;
            summary
        })
    }

    pub async fn load<C>(conn: &C, employee_id: Uuid, start: NaiveDate, end: NaiveDate) -> Result<Self, DbErr>
    where
        C: ConnectionTrait,
    {
        let records = AttendanceRecord::find()
            .filter(attendance_record::Column::EmployeeId.eq(employee_id))
            .filter(attendance_record::Column::Date.between(start, end))
            .all(conn).await?;

        Ok(Self::from_records(&records))
    }
}

use sea_orm_migration::prelude::*;

use crate::m20251006_090000_init::{Employee, LeaveType, Role};

const ROLES: [(&str, i64); 16] = [
    ("HR Manager", 80_000),
    ("HR Specialist", 55_000),
    ("Recruiter", 50_000),
    ("IT Manager", 90_000),
    ("Senior Developer", 75_000),
    ("Junior Developer", 55_000),
    ("System Administrator", 65_000),
    ("Finance Manager", 85_000),
    ("Accountant", 60_000),
    ("Financial Analyst", 65_000),
    ("Sales Manager", 75_000),
    ("Sales Representative", 45_000),
    ("Account Executive", 55_000),
    ("Marketing Manager", 70_000),
    ("Marketing Specialist", 50_000),
    ("Content Creator", 45_000),
];

/// name, category, max days per year, paid, needs approval, notice days
const LEAVE_TYPES: [(&str, &str, i32, bool, bool, i32); 6] = [
    ("Annual Leave", "ANNUAL", 21, true, true, 7),
    ("Sick Leave", "SICK", 10, true, false, 0),
    ("Casual Leave", "CASUAL", 5, true, true, 1),
    ("Maternity Leave", "MATERNITY", 90, true, true, 30),
    ("Paternity Leave", "PATERNITY", 14, true, true, 14),
    ("Emergency Leave", "EMERGENCY", 3, false, true, 0),
];

const LEAVE_TYPE_ID_OFFSET: u128 = 1_000;
const ADMIN_ID: u128 = 12_345;

fn fixed_uuid(n: u128) -> SimpleExpr {
    Expr::val(format!("{:032x}", n)).cast_as("uuid")
}

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let time = Expr::val("2025-10-06T09:10:00.000Z").cast_as("timestamptz");

        for (i, (title, base_salary)) in ROLES.into_iter().enumerate() {
            manager
                .exec_stmt(Query::insert()
                    .into_table(Role::Table)
                    .columns(["id", "created_at", "updated_at", "title", "base_salary"])
                    .values_panic([fixed_uuid(i as u128 + 1), time.clone(), time.clone(), title.into(), Expr::val(base_salary).cast_as("numeric")])
                    .to_owned()
            ).await?;
        }

        for (i, (name, category, max_days, is_paid, requires_approval, notice)) in LEAVE_TYPES.into_iter().enumerate() {
            manager
                .exec_stmt(Query::insert()
                    .into_table(LeaveType::Table)
                    .columns(["id", "created_at", "updated_at", "name", "category", "max_days_per_year", "is_paid", "requires_approval", "advance_notice_days"])
                    .values_panic([
                        fixed_uuid(LEAVE_TYPE_ID_OFFSET + i as u128 + 1),
                        time.clone(),
                        time.clone(),
                        name.into(),
                        category.into(),
                        max_days.into(),
                        is_paid.into(),
                        requires_approval.into(),
                        notice.into(),
                    ])
                    .to_owned()
            ).await?;
        }

        // The administrator holds the HR Manager role
        manager
            .exec_stmt(Query::insert()
                .into_table(Employee::Table)
                .columns(["id", "created_at", "updated_at", "employee_code", "first_name", "last_name", "access_role", "salary_type", "base_salary", "role_id"])
                .values_panic([
                    fixed_uuid(ADMIN_ID),
                    time.clone(),
                    time.clone(),
                    "EMP0000".into(),
                    "System".into(),
                    "Administrator".into(),
                    Expr::val("admin").cast_as("access_role"),
                    "FIXED".into(),
                    Expr::val(100_000).cast_as("numeric"),
                    fixed_uuid(1),
                ])
                .to_owned()
        ).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .exec_stmt(Query::delete()
                .from_table(Employee::Table)
                .and_where(Expr::col("id").eq(fixed_uuid(ADMIN_ID)))
                .to_owned()
        ).await?;

        for i in 1..=LEAVE_TYPES.len() as u128 {
            manager
                .exec_stmt(Query::delete()
                    .from_table(LeaveType::Table)
                    .and_where(Expr::col("id").eq(fixed_uuid(LEAVE_TYPE_ID_OFFSET + i)))
                    .to_owned()
            ).await?;
        }

        for i in 1..=ROLES.len() as u128 {
            manager
                .exec_stmt(Query::delete()
                    .from_table(Role::Table)
                    .and_where(Expr::col("id").eq(fixed_uuid(i)))
                    .to_owned()
            ).await?;
        }

        Ok(())
    }
}

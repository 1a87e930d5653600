use sea_orm_migration::{prelude::{extension::postgres::TypeDropStatement, *}, sea_orm::{ActiveEnum, DbBackend, DeriveActiveEnum, EnumIter, Schema}};

use crate::util::{belongs_to, default_table_statement, optionally_belongs_to, unique_index};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let schema = Schema::new(DbBackend::Postgres);

        manager
            .create_type(
                schema.create_enum_from_active_enum::<AccessRole>()
            ).await?;

        manager
            .create_table(default_table_statement()
                .table(Role::Table)
                .col(ColumnDef::new(Role::Title)
                    .text()
                    .not_null())
                .col(ColumnDef::new(Role::BaseSalary)
                    .decimal_len(12, 2)
                    .not_null())
                .col(ColumnDef::new(Role::HourlyRate)
                    .decimal_len(8, 2))
                .col(ColumnDef::new(Role::OvertimeRateMultiplier)
                    .decimal_len(3, 2)
                    .not_null()
                    .default(1.5))
                .col(ColumnDef::new(Role::IsActive)
                    .boolean()
                    .not_null()
                    .default(true))
                .take()
            ).await?;

        manager
            .create_table(default_table_statement()
                .table(Employee::Table)
                .col(ColumnDef::new(Employee::EmployeeCode)
                    .text()
                    .unique_key()
                    .not_null())
                .col(ColumnDef::new(Employee::FirstName)
                    .text()
                    .not_null())
                .col(ColumnDef::new(Employee::LastName)
                    .text()
                    .not_null())
                .col(ColumnDef::new(Employee::AccessRole)
                    .custom(AccessRole::name())
                    .not_null())
                .col(ColumnDef::new(Employee::SalaryType)
                    .text()
                    .not_null()
                    .default("FIXED"))
                .col(ColumnDef::new(Employee::BaseSalary)
                    .decimal_len(12, 2))
                .col(ColumnDef::new(Employee::HourlyRate)
                    .decimal_len(8, 2))
                .col(ColumnDef::new(Employee::RoleId)
                    .uuid())
                .col(ColumnDef::new(Employee::AnnualLeaveBalance)
                    .integer()
                    .not_null()
                    .default(21))
                .col(ColumnDef::new(Employee::SickLeaveBalance)
                    .integer()
                    .not_null()
                    .default(10))
                .col(ColumnDef::new(Employee::CasualLeaveBalance)
                    .integer()
                    .not_null()
                    .default(5))
                .col(ColumnDef::new(Employee::IsActive)
                    .boolean()
                    .not_null()
                    .default(true))
                .take()
            ).await?;
        manager.create_foreign_key(optionally_belongs_to(Employee::Table, Employee::RoleId, Role::Table)).await?;

        manager
            .create_table(default_table_statement()
                .table(Shift::Table)
                .col(ColumnDef::new(Shift::Name)
                    .text()
                    .not_null())
                .col(ColumnDef::new(Shift::StartTime)
                    .time()
                    .not_null())
                .col(ColumnDef::new(Shift::EndTime)
                    .time()
                    .not_null())
                .col(ColumnDef::new(Shift::BreakMinutes)
                    .integer()
                    .not_null()
                    .default(0))
                .col(ColumnDef::new(Shift::WorkingHours)
                    .decimal_len(4, 2)
                    .not_null()
                    .default(0))
                .col(ColumnDef::new(Shift::IsActive)
                    .boolean()
                    .not_null()
                    .default(true))
                .take()
            ).await?;

        manager
            .create_table(default_table_statement()
                .table(AttendanceRecord::Table)
                .col(ColumnDef::new(AttendanceRecord::EmployeeId)
                    .uuid()
                    .not_null())
                .col(ColumnDef::new(AttendanceRecord::Date)
                    .date()
                    .not_null())
                .col(ColumnDef::new(AttendanceRecord::ShiftId)
                    .uuid())
                .col(ColumnDef::new(AttendanceRecord::TimeIn)
                    .timestamp_with_time_zone())
                .col(ColumnDef::new(AttendanceRecord::TimeOut)
                    .timestamp_with_time_zone())
                .col(ColumnDef::new(AttendanceRecord::BreakStart)
                    .timestamp_with_time_zone())
                .col(ColumnDef::new(AttendanceRecord::BreakEnd)
                    .timestamp_with_time_zone())
                .col(ColumnDef::new(AttendanceRecord::TotalHours)
                    .decimal_len(5, 2)
                    .not_null()
                    .default(0))
                .col(ColumnDef::new(AttendanceRecord::RegularHours)
                    .decimal_len(5, 2)
                    .not_null()
                    .default(0))
                .col(ColumnDef::new(AttendanceRecord::OvertimeHours)
                    .decimal_len(5, 2)
                    .not_null()
                    .default(0))
                .col(ColumnDef::new(AttendanceRecord::BreakDuration)
                    .decimal_len(4, 2)
                    .not_null()
                    .default(0))
                .col(ColumnDef::new(AttendanceRecord::Status)
                    .text()
                    .not_null()
                    .default("PRESENT"))
                .col(ColumnDef::new(AttendanceRecord::IsLate)
                    .boolean()
                    .not_null()
                    .default(false))
                .col(ColumnDef::new(AttendanceRecord::LateMinutes)
                    .integer()
                    .not_null()
                    .default(0))
                .col(ColumnDef::new(AttendanceRecord::Notes)
                    .text()
                    .not_null()
                    .default(""))
                .take()
            ).await?;
        manager.create_foreign_key(belongs_to(AttendanceRecord::Table, AttendanceRecord::EmployeeId, Employee::Table)).await?;
        manager.create_foreign_key(optionally_belongs_to(AttendanceRecord::Table, AttendanceRecord::ShiftId, Shift::Table)).await?;
        manager.create_index(unique_index("attendance_record_employee_date", AttendanceRecord::Table, [AttendanceRecord::EmployeeId, AttendanceRecord::Date])).await?;

        manager
            .create_table(default_table_statement()
                .table(LeaveType::Table)
                .col(ColumnDef::new(LeaveType::Name)
                    .text()
                    .unique_key()
                    .not_null())
                .col(ColumnDef::new(LeaveType::Category)
                    .text()
                    .not_null()
                    .default("OTHER"))
                .col(ColumnDef::new(LeaveType::MaxDaysPerYear)
                    .integer()
                    .not_null())
                .col(ColumnDef::new(LeaveType::IsPaid)
                    .boolean()
                    .not_null()
                    .default(true))
                .col(ColumnDef::new(LeaveType::RequiresApproval)
                    .boolean()
                    .not_null()
                    .default(true))
                .col(ColumnDef::new(LeaveType::AdvanceNoticeDays)
                    .integer()
                    .not_null()
                    .default(0))
                .col(ColumnDef::new(LeaveType::IsActive)
                    .boolean()
                    .not_null()
                    .default(true))
                .take()
            ).await?;

        manager
            .create_table(default_table_statement()
                .table(LeaveApplication::Table)
                .col(ColumnDef::new(LeaveApplication::EmployeeId)
                    .uuid()
                    .not_null())
                .col(ColumnDef::new(LeaveApplication::LeaveTypeId)
                    .uuid()
                    .not_null())
                .col(ColumnDef::new(LeaveApplication::StartDate)
                    .date()
                    .not_null())
                .col(ColumnDef::new(LeaveApplication::EndDate)
                    .date()
                    .not_null())
                .col(ColumnDef::new(LeaveApplication::TotalDays)
                    .integer()
                    .not_null())
                .col(ColumnDef::new(LeaveApplication::Reason)
                    .text()
                    .not_null()
                    .default(""))
                .col(ColumnDef::new(LeaveApplication::Status)
                    .text()
                    .not_null()
                    .default("PENDING"))
                .col(ColumnDef::new(LeaveApplication::ApprovedBy)
                    .uuid())
                .col(ColumnDef::new(LeaveApplication::ApprovedAt)
                    .timestamp_with_time_zone())
                .take()
            ).await?;
        manager.create_foreign_key(belongs_to(LeaveApplication::Table, LeaveApplication::EmployeeId, Employee::Table)).await?;
        manager.create_foreign_key(belongs_to(LeaveApplication::Table, LeaveApplication::LeaveTypeId, LeaveType::Table)).await?;

        manager
            .create_table(default_table_statement()
                .table(PayrollPeriod::Table)
                .col(ColumnDef::new(PayrollPeriod::Name)
                    .text()
                    .not_null())
                .col(ColumnDef::new(PayrollPeriod::PeriodType)
                    .text()
                    .not_null()
                    .default("MONTHLY"))
                .col(ColumnDef::new(PayrollPeriod::StartDate)
                    .date()
                    .not_null())
                .col(ColumnDef::new(PayrollPeriod::EndDate)
                    .date()
                    .not_null())
                .col(ColumnDef::new(PayrollPeriod::PayDate)
                    .date()
                    .not_null())
                .col(ColumnDef::new(PayrollPeriod::IsProcessed)
                    .boolean()
                    .not_null()
                    .default(false))
                .col(ColumnDef::new(PayrollPeriod::IsFinalized)
                    .boolean()
                    .not_null()
                    .default(false))
                .take()
            ).await?;
        manager.create_index(unique_index("payroll_period_dates", PayrollPeriod::Table, [PayrollPeriod::StartDate, PayrollPeriod::EndDate])).await?;

        manager
            .create_table(default_table_statement()
                .table(TaxSlab::Table)
                .col(ColumnDef::new(TaxSlab::Name)
                    .text()
                    .not_null())
                .col(ColumnDef::new(TaxSlab::MinAmount)
                    .decimal_len(12, 2)
                    .not_null())
                .col(ColumnDef::new(TaxSlab::MaxAmount)
                    .decimal_len(12, 2))
                .col(ColumnDef::new(TaxSlab::TaxRate)
                    .decimal_len(5, 2)
                    .not_null())
                .col(ColumnDef::new(TaxSlab::IsActive)
                    .boolean()
                    .not_null()
                    .default(true))
                .col(ColumnDef::new(TaxSlab::EffectiveFrom)
                    .date()
                    .not_null())
                .col(ColumnDef::new(TaxSlab::EffectiveTo)
                    .date())
                .take()
            ).await?;

        for table in [LineType::DeductionType, LineType::BonusType] {
            let mut statement = default_table_statement()
                .table(table)
                .col(ColumnDef::new(LineType::Name)
                    .text()
                    .not_null())
                .col(ColumnDef::new(LineType::Description)
                    .text()
                    .not_null()
                    .default(""))
                .col(ColumnDef::new(LineType::CalculationType)
                    .text()
                    .not_null()
                    .default("FIXED"))
                .col(ColumnDef::new(LineType::DefaultAmount)
                    .decimal_len(10, 2)
                    .not_null()
                    .default(0))
                .col(ColumnDef::new(LineType::IsTaxable)
                    .boolean()
                    .not_null()
                    .default(true))
                .col(ColumnDef::new(LineType::IsActive)
                    .boolean()
                    .not_null()
                    .default(true))
                .take();

            if let LineType::DeductionType = table {
                statement.col(ColumnDef::new(LineType::IsMandatory)
                    .boolean()
                    .not_null()
                    .default(false));
            }

            manager.create_table(statement).await?;
        }

        manager
            .create_table(default_table_statement()
                .table(Payroll::Table)
                .col(ColumnDef::new(Payroll::EmployeeId)
                    .uuid()
                    .not_null())
                .col(ColumnDef::new(Payroll::PayrollPeriodId)
                    .uuid()
                    .not_null())
                .col(ColumnDef::new(Payroll::BaseSalary)
                    .decimal_len(12, 2)
                    .not_null()
                    .default(0))
                .col(ColumnDef::new(Payroll::HourlyRate)
                    .decimal_len(8, 2)
                    .not_null()
                    .default(0))
                .col(ColumnDef::new(Payroll::TotalWorkingDays)
                    .integer()
                    .not_null()
                    .default(0))
                .col(ColumnDef::new(Payroll::DaysWorked)
                    .integer()
                    .not_null()
                    .default(0))
                .col(ColumnDef::new(Payroll::DaysAbsent)
                    .integer()
                    .not_null()
                    .default(0))
                .col(ColumnDef::new(Payroll::DaysOnLeave)
                    .integer()
                    .not_null()
                    .default(0))
                .col(ColumnDef::new(Payroll::RegularHours)
                    .decimal_len(6, 2)
                    .not_null()
                    .default(0))
                .col(ColumnDef::new(Payroll::OvertimeHours)
                    .decimal_len(6, 2)
                    .not_null()
                    .default(0))
                .col(ColumnDef::new(Payroll::GrossSalary)
                    .decimal_len(12, 2)
                    .not_null()
                    .default(0))
                .col(ColumnDef::new(Payroll::OvertimeAmount)
                    .decimal_len(10, 2)
                    .not_null()
                    .default(0))
                .col(ColumnDef::new(Payroll::TotalBonuses)
                    .decimal_len(10, 2)
                    .not_null()
                    .default(0))
                .col(ColumnDef::new(Payroll::TotalDeductions)
                    .decimal_len(10, 2)
                    .not_null()
                    .default(0))
                .col(ColumnDef::new(Payroll::TaxAmount)
                    .decimal_len(10, 2)
                    .not_null()
                    .default(0))
                .col(ColumnDef::new(Payroll::NetSalary)
                    .decimal_len(12, 2)
                    .not_null()
                    .default(0))
                .col(ColumnDef::new(Payroll::Status)
                    .text()
                    .not_null()
                    .default("DRAFT"))
                .col(ColumnDef::new(Payroll::CalculatedAt)
                    .timestamp_with_time_zone())
                .col(ColumnDef::new(Payroll::ApprovedBy)
                    .uuid())
                .col(ColumnDef::new(Payroll::ApprovedAt)
                    .timestamp_with_time_zone())
                .col(ColumnDef::new(Payroll::PaidAt)
                    .timestamp_with_time_zone())
                .col(ColumnDef::new(Payroll::Notes)
                    .text()
                    .not_null()
                    .default(""))
                .col(ColumnDef::new(Payroll::Version)
                    .integer()
                    .not_null()
                    .default(1))
                .take()
            ).await?;
        manager.create_foreign_key(belongs_to(Payroll::Table, Payroll::EmployeeId, Employee::Table)).await?;
        manager.create_foreign_key(belongs_to(Payroll::Table, Payroll::PayrollPeriodId, PayrollPeriod::Table)).await?;
        manager.create_foreign_key(optionally_belongs_to(Payroll::Table, Payroll::ApprovedBy, Employee::Table)).await?;
        manager.create_index(unique_index("payroll_employee_period", Payroll::Table, [Payroll::EmployeeId, Payroll::PayrollPeriodId])).await?;

        for (table, type_column, type_table, index) in [
            (LineItem::PayrollBonus, LineItem::BonusTypeId, LineType::BonusType, "payroll_bonus_payroll_type"),
            (LineItem::PayrollDeduction, LineItem::DeductionTypeId, LineType::DeductionType, "payroll_deduction_payroll_type"),
        ] {
            manager
                .create_table(default_table_statement()
                    .table(table)
                    .col(ColumnDef::new(LineItem::PayrollId)
                        .uuid()
                        .not_null())
                    .col(ColumnDef::new(type_column)
                        .uuid()
                        .not_null())
                    .col(ColumnDef::new(LineItem::Amount)
                        .decimal_len(10, 2)
                        .not_null())
                    .col(ColumnDef::new(LineItem::Description)
                        .text()
                        .not_null()
                        .default(""))
                    .take()
                ).await?;
            manager.create_foreign_key(belongs_to(table, LineItem::PayrollId, Payroll::Table)).await?;
            manager.create_foreign_key(belongs_to(table, type_column, type_table)).await?;
            manager.create_index(unique_index(index, table, [LineItem::PayrollId, type_column])).await?;
        }

        manager
            .create_table(default_table_statement()
                .table(PayrollHistory::Table)
                .col(ColumnDef::new(PayrollHistory::PayrollId)
                    .uuid()
                    .not_null())
                .col(ColumnDef::new(PayrollHistory::Action)
                    .text()
                    .not_null())
                .col(ColumnDef::new(PayrollHistory::PerformedBy)
                    .uuid()
                    .not_null())
                .col(ColumnDef::new(PayrollHistory::Notes)
                    .text()
                    .not_null()
                    .default(""))
                .col(ColumnDef::new(PayrollHistory::PreviousValues)
                    .json_binary())
                .col(ColumnDef::new(PayrollHistory::NewValues)
                    .json_binary())
                .take()
            ).await?;
        manager.create_foreign_key(belongs_to(PayrollHistory::Table, PayrollHistory::PayrollId, Payroll::Table)).await?;

        manager
            .create_table(default_table_statement()
                .table(PaySlip::Table)
                .col(ColumnDef::new(PaySlip::PayrollId)
                    .uuid()
                    .unique_key()
                    .not_null())
                .col(ColumnDef::new(PaySlip::SlipNumber)
                    .text()
                    .unique_key()
                    .not_null())
                .col(ColumnDef::new(PaySlip::GeneratedBy)
                    .uuid()
                    .not_null())
                .col(ColumnDef::new(PaySlip::EmailedTo)
                    .text())
                .col(ColumnDef::new(PaySlip::EmailedAt)
                    .timestamp_with_time_zone())
                .take()
            ).await?;
        manager.create_foreign_key(belongs_to(PaySlip::Table, PaySlip::PayrollId, Payroll::Table)).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let tables = [
            PaySlip::Table.into_iden(),
            PayrollHistory::Table.into_iden(),
            LineItem::PayrollDeduction.into_iden(),
            LineItem::PayrollBonus.into_iden(),
            Payroll::Table.into_iden(),
            LineType::BonusType.into_iden(),
            LineType::DeductionType.into_iden(),
            TaxSlab::Table.into_iden(),
            PayrollPeriod::Table.into_iden(),
            LeaveApplication::Table.into_iden(),
            LeaveType::Table.into_iden(),
            AttendanceRecord::Table.into_iden(),
            Shift::Table.into_iden(),
            Employee::Table.into_iden(),
            Role::Table.into_iden(),
        ];

        for table in tables {
            manager
                .drop_table(
                    TableDropStatement::new()
                        .table(table)
                        .if_exists()
                        .take()
                ).await?;
        }

        manager
            .drop_type(
                TypeDropStatement::new()
                    .name(AccessRole::name())
                    .to_owned()
            ).await?;

        Ok(())
    }
}

#[derive(EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "access_role")]
enum AccessRole {
    #[sea_orm(string_value = "admin")]
    Admin,
    #[sea_orm(string_value = "hr")]
    Hr,
    #[sea_orm(string_value = "finance")]
    Finance,
    #[sea_orm(string_value = "manager")]
    Manager,
    #[sea_orm(string_value = "employee")]
    Employee,
}

#[derive(Iden)]
pub(crate) enum Role {
    Table,
    Title,
    BaseSalary,
    HourlyRate,
    OvertimeRateMultiplier,
    IsActive,
}

#[derive(Iden)]
pub(crate) enum Employee {
    Table,
    EmployeeCode,
    FirstName,
    LastName,
    AccessRole,
    SalaryType,
    BaseSalary,
    HourlyRate,
    RoleId,
    AnnualLeaveBalance,
    SickLeaveBalance,
    CasualLeaveBalance,
    IsActive,
}

#[derive(Iden)]
enum Shift {
    Table,
    Name,
    StartTime,
    EndTime,
    BreakMinutes,
    WorkingHours,
    IsActive,
}

#[derive(Iden)]
enum AttendanceRecord {
    Table,
    EmployeeId,
    Date,
    ShiftId,
    TimeIn,
    TimeOut,
    BreakStart,
    BreakEnd,
    TotalHours,
    RegularHours,
    OvertimeHours,
    BreakDuration,
    Status,
    IsLate,
    LateMinutes,
    Notes,
}

#[derive(Iden)]
pub(crate) enum LeaveType {
    Table,
    Name,
    Category,
    MaxDaysPerYear,
    IsPaid,
    RequiresApproval,
    AdvanceNoticeDays,
    IsActive,
}

#[derive(Iden)]
enum LeaveApplication {
    Table,
    EmployeeId,
    LeaveTypeId,
    StartDate,
    EndDate,
    TotalDays,
    Reason,
    Status,
    ApprovedBy,
    ApprovedAt,
}

#[derive(Iden)]
enum PayrollPeriod {
    Table,
    Name,
    PeriodType,
    StartDate,
    EndDate,
    PayDate,
    IsProcessed,
    IsFinalized,
}

#[derive(Iden)]
enum TaxSlab {
    Table,
    Name,
    MinAmount,
    MaxAmount,
    TaxRate,
    IsActive,
    EffectiveFrom,
    EffectiveTo,
}

/// Shared shape of `deduction_type` and `bonus_type`
#[derive(Iden, Clone, Copy)]
enum LineType {
    DeductionType,
    BonusType,
    Name,
    Description,
    CalculationType,
    DefaultAmount,
    IsMandatory,
    IsTaxable,
    IsActive,
}

#[derive(Iden)]
enum Payroll {
    Table,
    EmployeeId,
    PayrollPeriodId,
    BaseSalary,
    HourlyRate,
    TotalWorkingDays,
    DaysWorked,
    DaysAbsent,
    DaysOnLeave,
    RegularHours,
    OvertimeHours,
    GrossSalary,
    OvertimeAmount,
    TotalBonuses,
    TotalDeductions,
    TaxAmount,
    NetSalary,
    Status,
    CalculatedAt,
    ApprovedBy,
    ApprovedAt,
    PaidAt,
    Notes,
    Version,
}

/// Shared shape of `payroll_bonus` and `payroll_deduction`
#[derive(Iden, Clone, Copy)]
enum LineItem {
    PayrollBonus,
    PayrollDeduction,
    PayrollId,
    BonusTypeId,
    DeductionTypeId,
    Amount,
    Description,
}

#[derive(Iden)]
enum PayrollHistory {
    Table,
    PayrollId,
    Action,
    PerformedBy,
    Notes,
    PreviousValues,
    NewValues,
}

#[derive(Iden)]
enum PaySlip {
    Table,
    PayrollId,
    SlipNumber,
    GeneratedBy,
    EmailedTo,
    EmailedAt,
}

//! Payroll lifecycle operations backed by the database.

use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    IntoActiveModel, QueryFilter, QueryOrder, TransactionTrait, TryIntoModel,
};
use serde::Deserialize;
use tracing::{info, instrument};
use uuid::Uuid;

use super::{find_employee, find_open_period, find_period, find_role};
use crate::{
    engine::{
        self,
        adjustments::{AmountRule, LineItem, MandatoryDeduction},
        aggregate::AttendanceSummary,
        compensation::{self, Rates, Snapshot},
        tax::{self, TaxBracket},
        Calculation, CalculationInput,
    },
    entity::{
        bonus_type, deduction_type, employee, payroll, payroll_bonus, payroll_deduction, payroll_history, payroll_period,
        prelude::*,
        sea_orm_active_enums::{HistoryAction, PayrollStatus},
    },
    error::PayrollError,
    lifecycle::{self, Action},
    utils,
};

/// Manual bonus or deduction. Without an amount the type's default rule is
/// applied to the payroll's current gross salary.
#[derive(Debug, Clone, Deserialize)]
pub struct LineItemRequest {
    pub type_id: Uuid,
    pub amount: Option<Decimal>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PreviewRequest {
    pub employee_id: Uuid,
    pub payroll_period_id: Uuid,
    pub base_salary_override: Option<Decimal>,
    pub hourly_rate_override: Option<Decimal>,
    #[serde(default)]
    pub bonus_amount: Decimal,
    #[serde(default)]
    pub deduction_amount: Decimal,
}

/// Everything the engine needs for one employee and period
pub(crate) struct Inputs {
    rates: Rates,
    total_working_days: i32,
    attendance: AttendanceSummary,
    bonuses: Vec<LineItem>,
    deductions: Vec<LineItem>,
    mandatory: Vec<MandatoryDeduction>,
    brackets: Vec<TaxBracket>,
}

impl Inputs {
    pub(crate) async fn load<C: ConnectionTrait>(
        conn: &C,
        employee: &employee::Model,
        period: &payroll_period::Model,
        snapshot: Snapshot,
        payroll_id: Option<Uuid>,
    ) -> Result<Self, PayrollError> {
        let role = find_role(conn, employee).await?;
        let rates = compensation::resolve(employee, role.as_ref(), snapshot)?;

        let attendance = AttendanceSummary::load(conn, employee.id, period.start_date, period.end_date).await?;

        let (bonuses, deductions) = match payroll_id {
            Some(payroll_id) => (attached_bonuses(conn, payroll_id).await?, attached_deductions(conn, payroll_id).await?),
            None => Default::default(),
        };

        let mandatory = DeductionType::find()
            .filter(deduction_type::Column::IsMandatory.eq(true))
            .filter(deduction_type::Column::IsActive.eq(true))
            .all(conn).await?
            .iter()
            .map(MandatoryDeduction::from)
            .collect();

        let brackets = tax::active_brackets(conn, utils::today()).await?;

        Ok(Self {
            rates,
            total_working_days: utils::count_working_days(period.start_date, period.end_date),
            attendance,
            bonuses,
            deductions,
            mandatory,
            brackets,
        })
    }

    pub(crate) fn run(&self) -> Calculation {
        engine::calculate(&CalculationInput {
            rates: self.rates.clone(),
            total_working_days: self.total_working_days,
            attendance: self.attendance.clone(),
            bonuses: &self.bonuses,
            deductions: &self.deductions,
            mandatory_deductions: &self.mandatory,
            tax_brackets: &self.brackets,
        })
    }
}

async fn attached_bonuses<C: ConnectionTrait>(conn: &C, payroll_id: Uuid) -> Result<Vec<LineItem>, DbErr> {
    let rows = PayrollBonus::find()
        .filter(payroll_bonus::Column::PayrollId.eq(payroll_id))
        .find_also_related(BonusType)
        .all(conn).await?;

    Ok(rows.into_iter().map(|(bonus, bonus_type)| LineItem {
        type_id: bonus.bonus_type_id,
        amount: bonus.amount,
        is_taxable: bonus_type.is_none_or(|t| t.is_taxable),
    }).collect())
}

async fn attached_deductions<C: ConnectionTrait>(conn: &C, payroll_id: Uuid) -> Result<Vec<LineItem>, DbErr> {
    let rows = PayrollDeduction::find()
        .filter(payroll_deduction::Column::PayrollId.eq(payroll_id))
        .find_also_related(DeductionType)
        .all(conn).await?;

    Ok(rows.into_iter().map(|(deduction, deduction_type)| LineItem {
        type_id: deduction.deduction_type_id,
        amount: deduction.amount,
        is_taxable: deduction_type.is_none_or(|t| t.is_taxable),
    }).collect())
}

/// Writes the payroll only if nobody bumped its version since `current` was read.
async fn write_versioned<C: ConnectionTrait>(
    conn: &C,
    current: &payroll::Model,
    mut active: payroll::ActiveModel,
) -> Result<payroll::Model, PayrollError> {
    active.version = Set(current.version + 1);
    active.updated_at = Set(utils::now());

    let result = Payroll::update_many()
        .set(active.clone())
        .filter(payroll::Column::Id.eq(current.id))
        .filter(payroll::Column::Version.eq(current.version))
        .exec(conn).await?;

    if result.rows_affected == 0 {
        return Err(PayrollError::ConcurrentModification(current.id));
    }

    Ok(active.try_into_model()?)
}

async fn record<C: ConnectionTrait>(
    conn: &C,
    action: Action,
    actor: Uuid,
    notes: &str,
    previous: &payroll::Model,
    new: &payroll::Model,
) -> Result<(), PayrollError> {
    let Some(history_action) = action.recorded_as() else {
        return Ok(());
    };

    lifecycle::history_entry(new.id, history_action, actor, notes, Some(previous), Some(new))?
        .insert(conn).await?;

    Ok(())
}

fn apply_calculation(active: &mut payroll::ActiveModel, calculation: &Calculation) {
    active.base_salary = Set(calculation.rates.base_salary);
    active.hourly_rate = Set(calculation.rates.hourly_rate);
    active.total_working_days = Set(calculation.total_working_days);
    active.days_worked = Set(calculation.attendance.days_worked);
    active.days_absent = Set(calculation.attendance.days_absent);
    active.days_on_leave = Set(calculation.attendance.days_on_leave);
    active.regular_hours = Set(calculation.attendance.regular_hours);
    active.overtime_hours = Set(calculation.attendance.overtime_hours);
    active.gross_salary = Set(calculation.gross_salary);
    active.overtime_amount = Set(calculation.overtime_amount);
    active.total_bonuses = Set(calculation.total_bonuses);
    active.total_deductions = Set(calculation.total_deductions);
    active.tax_amount = Set(calculation.tax_amount);
    active.net_salary = Set(calculation.net_salary);
}

fn draft(employee_id: Uuid, period: &payroll_period::Model) -> payroll::ActiveModel {
    let now = utils::now();

    payroll::ActiveModel {
        created_at: Set(now),
        updated_at: Set(now),
        employee_id: Set(employee_id),
        payroll_period_id: Set(period.id),
        base_salary: Set(Decimal::ZERO),
        hourly_rate: Set(Decimal::ZERO),
        total_working_days: Set(utils::count_working_days(period.start_date, period.end_date)),
        days_worked: Set(0),
        days_absent: Set(0),
        days_on_leave: Set(0),
        regular_hours: Set(Decimal::ZERO),
        overtime_hours: Set(Decimal::ZERO),
        gross_salary: Set(Decimal::ZERO),
        overtime_amount: Set(Decimal::ZERO),
        total_bonuses: Set(Decimal::ZERO),
        total_deductions: Set(Decimal::ZERO),
        tax_amount: Set(Decimal::ZERO),
        net_salary: Set(Decimal::ZERO),
        status: Set(PayrollStatus::Draft),
        calculated_at: Set(None),
        approved_by: Set(None),
        approved_at: Set(None),
        paid_at: Set(None),
        notes: Set(String::new()),
        version: Set(1),
        ..Default::default()
    }
}

pub(crate) async fn find_for<C: ConnectionTrait>(conn: &C, employee_id: Uuid, period_id: Uuid) -> Result<Option<payroll::Model>, DbErr> {
    Payroll::find()
        .filter(payroll::Column::EmployeeId.eq(employee_id))
        .filter(payroll::Column::PayrollPeriodId.eq(period_id))
        .one(conn).await
}

/// Inserts a DRAFT payroll inside an open transaction.
pub(crate) async fn insert_draft<C: ConnectionTrait>(
    conn: &C,
    employee: &employee::Model,
    period: &payroll_period::Model,
    actor: Uuid,
) -> Result<payroll::Model, PayrollError> {
    let payroll = draft(employee.id, period)
        .insert(conn).await
        .map_err(|err| PayrollError::on_unique_violation(err, || {
            PayrollError::DuplicateRecord(format!("payroll for {} in {}", employee.full_name(), period.name))
        }))?;

    lifecycle::history_entry(payroll.id, HistoryAction::Created, actor, "Payroll created", None, Some(&payroll))?
        .insert(conn).await?;

    Ok(payroll)
}

#[instrument(skip(db))]
pub async fn create_payroll(db: &DatabaseConnection, employee_id: Uuid, period_id: Uuid, actor: Uuid) -> Result<payroll::Model, PayrollError> {
    let txn = db.begin().await?;

    let employee = find_employee(&txn, employee_id).await?;
    let period = find_open_period(&txn, period_id).await?;

    if find_for(&txn, employee.id, period.id).await?.is_some() {
        return Err(PayrollError::DuplicateRecord(format!("payroll for {} in {}", employee.full_name(), period.name)));
    }

    let payroll = insert_draft(&txn, &employee, &period, actor).await?;
    txn.commit().await?;

    info!(payroll_id = %payroll.id, "payroll created");
    Ok(payroll)
}

/// Calculation step shared with bulk runs; the caller owns the transaction.
pub(crate) async fn calculate_in<C: ConnectionTrait>(
    conn: &C,
    payroll: &payroll::Model,
    employee: &employee::Model,
    period: &payroll_period::Model,
    actor: Uuid,
) -> Result<payroll::Model, PayrollError> {
    let status = lifecycle::next_status(payroll.status, Action::Calculate)?;

    let inputs = Inputs::load(conn, employee, period, Snapshot::from(payroll), Some(payroll.id)).await?;
    let calculation = inputs.run();

    for automatic in &calculation.automatic_deductions {
        let now = utils::now();
        payroll_deduction::ActiveModel {
            created_at: Set(now),
            updated_at: Set(now),
            payroll_id: Set(payroll.id),
            deduction_type_id: Set(automatic.deduction_type_id),
            amount: Set(automatic.amount),
            description: Set(automatic.description.clone()),
            ..Default::default()
        }
        .insert(conn).await
        .map_err(|err| PayrollError::on_unique_violation(err, || PayrollError::ConcurrentModification(payroll.id)))?;
    }

    let mut active = payroll.clone().into_active_model();
    apply_calculation(&mut active, &calculation);
    active.status = Set(status);
    active.calculated_at = Set(Some(utils::now()));

    let updated = write_versioned(conn, payroll, active).await?;
    record(conn, Action::Calculate, actor, "Payroll calculated", payroll, &updated).await?;

    Ok(updated)
}

#[instrument(skip(db, payroll), fields(payroll_id = %payroll.id))]
pub async fn calculate(db: &DatabaseConnection, payroll: payroll::Model, actor: Uuid) -> Result<payroll::Model, PayrollError> {
    lifecycle::ensure_allowed(payroll.status, Action::Calculate)?;

    let txn = db.begin().await?;
    let period = find_open_period(&txn, payroll.payroll_period_id).await?;
    let employee = find_employee(&txn, payroll.employee_id).await?;

    let updated = calculate_in(&txn, &payroll, &employee, &period, actor).await?;
    txn.commit().await?;

    info!(net_salary = %updated.net_salary, "payroll calculated");
    Ok(updated)
}

async fn transition(
    db: &DatabaseConnection,
    payroll: payroll::Model,
    action: Action,
    actor: Uuid,
    notes: Option<String>,
    stamp: impl FnOnce(&mut payroll::ActiveModel),
) -> Result<payroll::Model, PayrollError> {
    let status = lifecycle::next_status(payroll.status, action)?;

    let txn = db.begin().await?;

    let mut active = payroll.clone().into_active_model();
    active.status = Set(status);
    stamp(&mut active);

    let updated = write_versioned(&txn, &payroll, active).await?;

    let notes = notes
        .filter(|notes| !notes.trim().is_empty())
        .unwrap_or_else(|| format!("Payroll moved to {status}"));
    record(&txn, action, actor, &notes, &payroll, &updated).await?;

    txn.commit().await?;

    info!(payroll_id = %updated.id, %status, "payroll status changed");
    Ok(updated)
}

#[instrument(skip(db, payroll), fields(payroll_id = %payroll.id))]
pub async fn approve(db: &DatabaseConnection, payroll: payroll::Model, actor: Uuid, notes: Option<String>) -> Result<payroll::Model, PayrollError> {
    transition(db, payroll, Action::Approve, actor, notes, |active| {
        active.approved_by = Set(Some(actor));
        active.approved_at = Set(Some(utils::now()));
    }).await
}

#[instrument(skip(db, payroll), fields(payroll_id = %payroll.id))]
pub async fn reject(db: &DatabaseConnection, payroll: payroll::Model, actor: Uuid, notes: Option<String>) -> Result<payroll::Model, PayrollError> {
    transition(db, payroll, Action::Reject, actor, notes, |active| {
        active.approved_by = Set(None);
        active.approved_at = Set(None);
    }).await
}

#[instrument(skip(db, payroll), fields(payroll_id = %payroll.id))]
pub async fn mark_paid(db: &DatabaseConnection, payroll: payroll::Model, actor: Uuid, notes: Option<String>) -> Result<payroll::Model, PayrollError> {
    transition(db, payroll, Action::MarkPaid, actor, notes, |active| {
        active.paid_at = Set(Some(utils::now()));
    }).await
}

/// Sends the payroll back to DRAFT after its line items changed.
async fn mark_modified<C: ConnectionTrait>(conn: &C, payroll: &payroll::Model, actor: Uuid, notes: &str) -> Result<(), PayrollError> {
    let status = lifecycle::next_status(payroll.status, Action::Modify)?;

    let mut active = payroll.clone().into_active_model();
    active.status = Set(status);

    let updated = write_versioned(conn, payroll, active).await?;
    record(conn, Action::Modify, actor, notes, payroll, &updated).await
}

#[instrument(skip(db, payroll), fields(payroll_id = %payroll.id))]
pub async fn add_bonus(db: &DatabaseConnection, payroll: payroll::Model, request: LineItemRequest, actor: Uuid) -> Result<payroll_bonus::Model, PayrollError> {
    lifecycle::ensure_allowed(payroll.status, Action::Modify)?;

    let txn = db.begin().await?;
    find_open_period(&txn, payroll.payroll_period_id).await?;

    let bonus_type = BonusType::find_by_id(request.type_id)
        .filter(bonus_type::Column::IsActive.eq(true))
        .one(&txn).await?
        .ok_or_else(|| PayrollError::not_found("bonus type", request.type_id))?;

    let existing = PayrollBonus::find()
        .filter(payroll_bonus::Column::PayrollId.eq(payroll.id))
        .filter(payroll_bonus::Column::BonusTypeId.eq(bonus_type.id))
        .one(&txn).await?;
    if existing.is_some() {
        return Err(PayrollError::DuplicateRecord(format!("bonus {} on payroll {}", bonus_type.name, payroll.id)));
    }

    let amount = request.amount
        .unwrap_or_else(|| AmountRule::new(bonus_type.calculation_type, bonus_type.default_amount).amount_on(payroll.gross_salary));

    let now = utils::now();
    let bonus = payroll_bonus::ActiveModel {
        created_at: Set(now),
        updated_at: Set(now),
        payroll_id: Set(payroll.id),
        bonus_type_id: Set(bonus_type.id),
        amount: Set(utils::round_money(amount)),
        description: Set(request.description.unwrap_or_else(|| bonus_type.name.clone())),
        ..Default::default()
    }
    .insert(&txn).await
    .map_err(|err| PayrollError::on_unique_violation(err, || {
        PayrollError::DuplicateRecord(format!("bonus {} on payroll {}", bonus_type.name, payroll.id))
    }))?;

    mark_modified(&txn, &payroll, actor, &format!("Bonus {} added: {}", bonus_type.name, bonus.amount)).await?;
    txn.commit().await?;

    Ok(bonus)
}

#[instrument(skip(db, payroll), fields(payroll_id = %payroll.id))]
pub async fn add_deduction(db: &DatabaseConnection, payroll: payroll::Model, request: LineItemRequest, actor: Uuid) -> Result<payroll_deduction::Model, PayrollError> {
    lifecycle::ensure_allowed(payroll.status, Action::Modify)?;

    let txn = db.begin().await?;
    find_open_period(&txn, payroll.payroll_period_id).await?;

    let deduction_type = DeductionType::find_by_id(request.type_id)
        .filter(deduction_type::Column::IsActive.eq(true))
        .one(&txn).await?
        .ok_or_else(|| PayrollError::not_found("deduction type", request.type_id))?;

    let existing = PayrollDeduction::find()
        .filter(payroll_deduction::Column::PayrollId.eq(payroll.id))
        .filter(payroll_deduction::Column::DeductionTypeId.eq(deduction_type.id))
        .one(&txn).await?;
    if existing.is_some() {
        return Err(PayrollError::DuplicateRecord(format!("deduction {} on payroll {}", deduction_type.name, payroll.id)));
    }

    let amount = request.amount
        .unwrap_or_else(|| AmountRule::new(deduction_type.calculation_type, deduction_type.default_amount).amount_on(payroll.gross_salary));

    let now = utils::now();
    let deduction = payroll_deduction::ActiveModel {
        created_at: Set(now),
        updated_at: Set(now),
        payroll_id: Set(payroll.id),
        deduction_type_id: Set(deduction_type.id),
        amount: Set(utils::round_money(amount)),
        description: Set(request.description.unwrap_or_else(|| deduction_type.name.clone())),
        ..Default::default()
    }
    .insert(&txn).await
    .map_err(|err| PayrollError::on_unique_violation(err, || {
        PayrollError::DuplicateRecord(format!("deduction {} on payroll {}", deduction_type.name, payroll.id))
    }))?;

    mark_modified(&txn, &payroll, actor, &format!("Deduction {} added: {}", deduction_type.name, deduction.amount)).await?;
    txn.commit().await?;

    Ok(deduction)
}

/// Newest entry first
pub async fn history(db: &DatabaseConnection, payroll_id: Uuid) -> Result<Vec<payroll_history::Model>, PayrollError> {
    let entries = PayrollHistory::find()
        .filter(payroll_history::Column::PayrollId.eq(payroll_id))
        .order_by_desc(payroll_history::Column::CreatedAt)
        .all(db).await?;

    Ok(entries)
}

/// Runs the engine without writing anything.
#[instrument(skip(db))]
pub async fn preview(db: &DatabaseConnection, request: &PreviewRequest) -> Result<Calculation, PayrollError> {
    let employee = find_employee(db, request.employee_id).await?;
    let period = find_period(db, request.payroll_period_id).await?;

    let snapshot = Snapshot {
        base_salary: request.base_salary_override.unwrap_or_default(),
        hourly_rate: request.hourly_rate_override.unwrap_or_default(),
    };

    let calculation = Inputs::load(db, &employee, &period, snapshot, None).await?.run();

    Ok(calculation.with_extra(request.bonus_amount, request.deduction_amount))
}

#[cfg(test)]
pub(crate) mod tests {
    use chrono::{Datelike as _, Local, NaiveDate, Weekday};
    use rust_decimal_macros::dec;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};

    use super::*;
    use crate::{
        engine::compensation::tests::employee,
        entity::{attendance_record, sea_orm_active_enums::{AttendanceStatus, CalculationType, PeriodType, SalaryType}, tax_slab},
        lifecycle::tests::{history_row, payroll},
    };

    pub(crate) fn period(start: NaiveDate, end: NaiveDate, is_finalized: bool) -> payroll_period::Model {
        payroll_period::Model {
            id: Uuid::new_v4(),
            created_at: Local::now().into(),
            updated_at: Local::now().into(),
            name: start.format("%B %Y").to_string(),
            period_type: PeriodType::Monthly,
            start_date: start,
            end_date: end,
            pay_date: end,
            is_processed: false,
            is_finalized,
        }
    }

    fn june_2024(is_finalized: bool) -> payroll_period::Model {
        period(
            NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
            NaiveDate::from_ymd_opt(2024, 6, 30).unwrap(),
            is_finalized,
        )
    }

    #[actix_web::test]
    async fn test_approve_draft_is_rejected() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();

        let result = approve(&db, payroll(PayrollStatus::Draft), Uuid::new_v4(), None).await;

        assert!(matches!(
            result,
            Err(PayrollError::InvalidStateTransition { action: Action::Approve, status: PayrollStatus::Draft })
        ));
    }

    #[actix_web::test]
    async fn test_mark_paid_calculated_is_rejected() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();

        let result = mark_paid(&db, payroll(PayrollStatus::Calculated), Uuid::new_v4(), None).await;

        assert!(matches!(result, Err(PayrollError::InvalidStateTransition { action: Action::MarkPaid, .. })));
    }

    #[actix_web::test]
    async fn test_calculate_frozen_payroll_is_rejected() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();

        for status in [PayrollStatus::Approved, PayrollStatus::Paid] {
            let result = calculate(&db, payroll(status), Uuid::new_v4()).await;
            assert!(matches!(result, Err(PayrollError::InvalidStateTransition { action: Action::Calculate, .. })));
        }
    }

    #[actix_web::test]
    async fn test_duplicate_payroll() {
        let employee = employee(SalaryType::Fixed, Some(dec!(3000)), None);
        let period = june_2024(false);
        let existing = payroll::Model {
            employee_id: employee.id,
            payroll_period_id: period.id,
            ..payroll(PayrollStatus::Draft)
        };

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![employee.clone()]])
            .append_query_results([vec![period.clone()]])
            .append_query_results([vec![existing]])
            .into_connection();

        let result = create_payroll(&db, employee.id, period.id, Uuid::new_v4()).await;

        assert!(matches!(result, Err(PayrollError::DuplicateRecord(_))));
    }

    #[actix_web::test]
    async fn test_create_against_finalized_period() {
        let employee = employee(SalaryType::Fixed, Some(dec!(3000)), None);
        let period = june_2024(true);

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![employee.clone()]])
            .append_query_results([vec![period.clone()]])
            .into_connection();

        let result = create_payroll(&db, employee.id, period.id, Uuid::new_v4()).await;

        assert!(matches!(result, Err(PayrollError::FinalizedPeriod(id)) if id == period.id));
    }

    #[actix_web::test]
    async fn test_create_unknown_employee() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<employee::Model>::new()])
            .into_connection();

        let result = create_payroll(&db, Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4()).await;

        assert!(matches!(result, Err(PayrollError::ReferenceNotFound { entity: "employee", .. })));
    }

    #[actix_web::test]
    async fn test_stale_version_is_rejected() {
        let calculated = payroll(PayrollStatus::Calculated);

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results([MockExecResult { last_insert_id: 0, rows_affected: 0 }])
            .into_connection();

        let result = approve(&db, calculated.clone(), Uuid::new_v4(), None).await;

        assert!(matches!(result, Err(PayrollError::ConcurrentModification(id)) if id == calculated.id));
    }

    /// First `days` weekdays of the period, eight regular hours each
    pub(crate) fn attendance(employee_id: Uuid, period: &payroll_period::Model, days: usize) -> Vec<attendance_record::Model> {
        period.start_date
            .iter_days()
            .take_while(|day| *day <= period.end_date)
            .filter(|day| !matches!(day.weekday(), Weekday::Sat | Weekday::Sun))
            .take(days)
            .map(|date| attendance_record::Model {
                id: Uuid::new_v4(),
                created_at: Local::now().into(),
                updated_at: Local::now().into(),
                employee_id,
                date,
                shift_id: None,
                time_in: None,
                time_out: None,
                break_start: None,
                break_end: None,
                total_hours: dec!(8),
                regular_hours: dec!(8),
                overtime_hours: Decimal::ZERO,
                break_duration: Decimal::ZERO,
                status: AttendanceStatus::Present,
                is_late: false,
                late_minutes: 0,
                notes: String::new(),
            })
            .collect()
    }

    fn insurance() -> deduction_type::Model {
        deduction_type::Model {
            id: Uuid::new_v4(),
            created_at: Local::now().into(),
            updated_at: Local::now().into(),
            name: "Insurance".to_owned(),
            description: String::new(),
            calculation_type: CalculationType::Fixed,
            default_amount: dec!(100),
            is_mandatory: true,
            is_taxable: true,
            is_active: true,
        }
    }

    pub(crate) fn flat_slab() -> tax_slab::Model {
        tax_slab::Model {
            id: Uuid::new_v4(),
            created_at: Local::now().into(),
            updated_at: Local::now().into(),
            name: "Flat".to_owned(),
            min_amount: Decimal::ZERO,
            max_amount: None,
            tax_rate: dec!(15),
            is_active: true,
            effective_from: NaiveDate::from_ymd_opt(2000, 1, 1).unwrap(),
            effective_to: None,
        }
    }

    fn deduction_line(payroll_id: Uuid, deduction_type: &deduction_type::Model) -> payroll_deduction::Model {
        payroll_deduction::Model {
            id: Uuid::new_v4(),
            created_at: Local::now().into(),
            updated_at: Local::now().into(),
            payroll_id,
            deduction_type_id: deduction_type.id,
            amount: deduction_type.default_amount,
            description: format!("Automatic {}", deduction_type.name),
        }
    }

    #[actix_web::test]
    async fn test_preview_fixed_salary() {
        let employee = employee(SalaryType::Fixed, Some(dec!(3000)), None);
        let period = june_2024(false);

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![employee.clone()]])
            .append_query_results([vec![period.clone()]])
            .append_query_results([attendance(employee.id, &period, 18)])
            .append_query_results([vec![insurance()]])
            .append_query_results([vec![flat_slab()]])
            .into_connection();

        let request = PreviewRequest {
            employee_id: employee.id,
            payroll_period_id: period.id,
            base_salary_override: None,
            hourly_rate_override: None,
            bonus_amount: Decimal::ZERO,
            deduction_amount: Decimal::ZERO,
        };

        let calculation = preview(&db, &request).await.unwrap();

        assert_eq!(calculation.total_working_days, 20);
        assert_eq!(calculation.attendance.days_worked, 18);
        assert_eq!(calculation.gross_salary, dec!(2700));
        assert_eq!(calculation.total_deductions, dec!(100));
        assert_eq!(calculation.tax_amount, dec!(405));
        assert_eq!(calculation.net_salary, dec!(2195));
        assert_eq!(calculation.automatic_deductions.len(), 1);
    }

    #[actix_web::test]
    async fn test_calculate_draft_persists_totals() {
        let employee = employee(SalaryType::Fixed, Some(dec!(3000)), None);
        let period = june_2024(false);
        let insurance = insurance();
        let draft = payroll::Model {
            employee_id: employee.id,
            payroll_period_id: period.id,
            base_salary: Decimal::ZERO,
            gross_salary: Decimal::ZERO,
            total_deductions: Decimal::ZERO,
            tax_amount: Decimal::ZERO,
            net_salary: Decimal::ZERO,
            ..payroll(PayrollStatus::Draft)
        };

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![period.clone()]])
            .append_query_results([vec![employee.clone()]])
            .append_query_results([attendance(employee.id, &period, 18)])
            .append_query_results([Vec::<payroll_bonus::Model>::new()])
            .append_query_results([Vec::<payroll_deduction::Model>::new()])
            .append_query_results([vec![insurance.clone()]])
            .append_query_results([vec![flat_slab()]])
            .append_query_results([vec![deduction_line(draft.id, &insurance)]])
            .append_query_results([vec![history_row(draft.id, HistoryAction::Calculated)]])
            .append_exec_results([MockExecResult { last_insert_id: 0, rows_affected: 1 }])
            .into_connection();

        let calculated = calculate(&db, draft.clone(), Uuid::new_v4()).await.unwrap();

        assert_eq!(calculated.status, PayrollStatus::Calculated);
        assert_eq!(calculated.base_salary, dec!(3000));
        assert_eq!(calculated.gross_salary, dec!(2700));
        assert_eq!(calculated.total_deductions, dec!(100));
        assert_eq!(calculated.tax_amount, dec!(405));
        assert_eq!(calculated.net_salary, dec!(2195));
        assert_eq!(calculated.version, draft.version + 1);
        assert!(calculated.calculated_at.is_some());

        let log = format!("{:?}", db.into_transaction_log());
        assert!(log.contains("Automatic Insurance"));
    }

    #[actix_web::test]
    async fn test_recalculate_adds_no_second_automatic_deduction() {
        let employee = employee(SalaryType::Fixed, Some(dec!(3000)), None);
        let period = june_2024(false);
        let insurance = insurance();
        let calculated = payroll::Model {
            employee_id: employee.id,
            payroll_period_id: period.id,
            version: 2,
            ..payroll(PayrollStatus::Calculated)
        };

        // The next query result after the brackets is the history row, so an
        // extra deduction insert would fail to decode
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![period.clone()]])
            .append_query_results([vec![employee.clone()]])
            .append_query_results([attendance(employee.id, &period, 18)])
            .append_query_results([Vec::<payroll_bonus::Model>::new()])
            .append_query_results([vec![(deduction_line(calculated.id, &insurance), insurance.clone())]])
            .append_query_results([vec![insurance.clone()]])
            .append_query_results([vec![flat_slab()]])
            .append_query_results([vec![history_row(calculated.id, HistoryAction::Calculated)]])
            .append_exec_results([MockExecResult { last_insert_id: 0, rows_affected: 1 }])
            .into_connection();

        let recalculated = calculate(&db, calculated.clone(), Uuid::new_v4()).await.unwrap();

        assert_eq!(recalculated.status, PayrollStatus::Calculated);
        assert_eq!(recalculated.total_deductions, dec!(100));
        assert_eq!(recalculated.net_salary, dec!(2195));
        assert_eq!(recalculated.version, 3);

        let log = format!("{:?}", db.into_transaction_log());
        assert!(!log.contains("Automatic Insurance"));
    }

    #[actix_web::test]
    async fn test_approve_stamps_approver() {
        let calculated = payroll(PayrollStatus::Calculated);
        let approver = Uuid::new_v4();

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results([MockExecResult { last_insert_id: 0, rows_affected: 1 }])
            .append_query_results([vec![history_row(calculated.id, HistoryAction::Approved)]])
            .into_connection();

        let approved = approve(&db, calculated.clone(), approver, None).await.unwrap();

        assert_eq!(approved.status, PayrollStatus::Approved);
        assert_eq!(approved.approved_by, Some(approver));
        assert!(approved.approved_at.is_some());
        assert_eq!(approved.version, calculated.version + 1);

        let log = format!("{:?}", db.into_transaction_log());
        assert!(log.contains("Payroll moved to approved"));
    }

    #[actix_web::test]
    async fn test_add_bonus_sends_payroll_back_to_draft() {
        let period = june_2024(false);
        let calculated = payroll::Model { payroll_period_id: period.id, ..payroll(PayrollStatus::Calculated) };
        let performance = bonus_type::Model {
            id: Uuid::new_v4(),
            created_at: Local::now().into(),
            updated_at: Local::now().into(),
            name: "Performance".to_owned(),
            description: String::new(),
            calculation_type: CalculationType::Percentage,
            default_amount: dec!(10),
            is_taxable: true,
            is_active: true,
        };
        let attached = payroll_bonus::Model {
            id: Uuid::new_v4(),
            created_at: Local::now().into(),
            updated_at: Local::now().into(),
            payroll_id: calculated.id,
            bonus_type_id: performance.id,
            amount: dec!(270),
            description: "Performance".to_owned(),
        };

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![period.clone()]])
            .append_query_results([vec![performance.clone()]])
            .append_query_results([Vec::<payroll_bonus::Model>::new()])
            .append_query_results([vec![attached.clone()]])
            .append_query_results([vec![history_row(calculated.id, HistoryAction::Modified)]])
            .append_exec_results([MockExecResult { last_insert_id: 0, rows_affected: 1 }])
            .into_connection();

        let request = LineItemRequest { type_id: performance.id, amount: None, description: None };
        let bonus = add_bonus(&db, calculated, request, Uuid::new_v4()).await.unwrap();

        assert_eq!(bonus, attached);

        let log = format!("{:?}", db.into_transaction_log());
        assert!(log.contains("Bonus Performance added: 270"));
        assert!(log.contains("DRAFT"));
    }
}

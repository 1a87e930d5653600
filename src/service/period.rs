//! Payroll period bookkeeping: creation, processing and finalisation.

use chrono::NaiveDate;
use sea_orm::{
    ActiveModelTrait, ActiveValue::{Set, Unchanged}, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter,
};
use serde::Deserialize;
use tracing::{info, instrument};

use crate::{
    entity::{payroll_period, prelude::*, sea_orm_active_enums::PeriodType},
    error::PayrollError,
    utils,
};

#[derive(Debug, Clone, Deserialize)]
pub struct NewPeriod {
    pub name: String,
    pub period_type: PeriodType,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub pay_date: NaiveDate,
}

impl NewPeriod {
    fn validate(&self) -> Result<(), PayrollError> {
        if self.end_date < self.start_date {
            return Err(PayrollError::InvalidPeriod("end_date is before start_date".to_owned()));
        }

        Ok(())
    }
}

pub fn check_process(period: &payroll_period::Model) -> Result<(), PayrollError> {
    if period.is_finalized {
        return Err(PayrollError::FinalizedPeriod(period.id));
    }
    if period.is_processed {
        return Err(PayrollError::InvalidPeriod("payroll period is already processed".to_owned()));
    }

    Ok(())
}

pub fn check_finalize(period: &payroll_period::Model) -> Result<(), PayrollError> {
    if period.is_finalized {
        return Err(PayrollError::FinalizedPeriod(period.id));
    }
    if !period.is_processed {
        return Err(PayrollError::InvalidPeriod("payroll period must be processed before finalizing".to_owned()));
    }

    Ok(())
}

#[instrument(skip(db))]
pub async fn create_period(db: &DatabaseConnection, new: NewPeriod) -> Result<payroll_period::Model, PayrollError> {
    new.validate()?;

    let existing = PayrollPeriod::find()
        .filter(payroll_period::Column::StartDate.eq(new.start_date))
        .filter(payroll_period::Column::EndDate.eq(new.end_date))
        .one(db).await?;
    if let Some(existing) = existing {
        return Err(PayrollError::DuplicateRecord(format!("payroll period {}", existing.name)));
    }

    let now = utils::now();
    let period = payroll_period::ActiveModel {
        created_at: Set(now),
        updated_at: Set(now),
        name: Set(new.name),
        period_type: Set(new.period_type),
        start_date: Set(new.start_date),
        end_date: Set(new.end_date),
        pay_date: Set(new.pay_date),
        is_processed: Set(false),
        is_finalized: Set(false),
        ..Default::default()
    }.insert(db).await?;

    info!(period_id = %period.id, "payroll period created");
    Ok(period)
}

#[instrument(skip(db, period), fields(period_id = %period.id))]
pub async fn process_period(db: &DatabaseConnection, period: payroll_period::Model) -> Result<payroll_period::Model, PayrollError> {
    check_process(&period)?;

    let period = PayrollPeriod::update(payroll_period::ActiveModel {
        id: Unchanged(period.id),
        is_processed: Set(true),
        updated_at: Set(utils::now()),
        ..Default::default()
    }).exec(db).await?;

    info!("payroll period processed");
    Ok(period)
}

/// No payroll of a finalized period can be created or recalculated.
#[instrument(skip(db, period), fields(period_id = %period.id))]
pub async fn finalize_period(db: &DatabaseConnection, period: payroll_period::Model) -> Result<payroll_period::Model, PayrollError> {
    check_finalize(&period)?;

    let period = PayrollPeriod::update(payroll_period::ActiveModel {
        id: Unchanged(period.id),
        is_finalized: Set(true),
        updated_at: Set(utils::now()),
        ..Default::default()
    }).exec(db).await?;

    info!("payroll period finalized");
    Ok(period)
}

#[cfg(test)]
mod tests {
    use sea_orm::{DatabaseBackend, MockDatabase};

    use super::*;
    use crate::service::payroll::tests::period;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn new_period(start: NaiveDate, end: NaiveDate) -> NewPeriod {
        NewPeriod {
            name: "March 2024".to_owned(),
            period_type: PeriodType::Monthly,
            start_date: start,
            end_date: end,
            pay_date: end,
        }
    }

    #[actix_web::test]
    async fn test_inverted_dates() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();

        let result = create_period(&db, new_period(date(2024, 3, 31), date(2024, 3, 1))).await;

        assert!(matches!(result, Err(PayrollError::InvalidPeriod(_))));
    }

    #[actix_web::test]
    async fn test_duplicate_period() {
        let existing = period(date(2024, 3, 1), date(2024, 3, 31), false);

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![existing]])
            .into_connection();

        let result = create_period(&db, new_period(date(2024, 3, 1), date(2024, 3, 31))).await;

        assert!(matches!(result, Err(PayrollError::DuplicateRecord(_))));
    }

    #[test]
    fn test_process_then_finalize() {
        let mut p = period(date(2024, 3, 1), date(2024, 3, 31), false);

        assert!(check_process(&p).is_ok());
        assert!(matches!(check_finalize(&p), Err(PayrollError::InvalidPeriod(_))));

        p.is_processed = true;
        assert!(matches!(check_process(&p), Err(PayrollError::InvalidPeriod(_))));
        assert!(check_finalize(&p).is_ok());

        p.is_finalized = true;
        assert!(matches!(check_process(&p), Err(PayrollError::FinalizedPeriod(_))));
        assert!(matches!(check_finalize(&p), Err(PayrollError::FinalizedPeriod(_))));
    }
}

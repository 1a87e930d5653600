use actix_web::{body, http::{header::ContentType, StatusCode}, HttpResponse};
use sea_orm::{DbErr, SqlErr};
use thiserror::Error;
use uuid::Uuid;

use crate::{entity::sea_orm_active_enums::{PayrollStatus, SalaryType}, lifecycle::Action};

#[derive(Debug, Error)]
pub enum PayrollError {
    #[error("cannot {action} a payroll that is {status}")]
    InvalidStateTransition {
        action: Action,
        status: PayrollStatus,
    },

    #[error("{0} already exists")]
    DuplicateRecord(String),

    #[error("payroll period {0} is finalized")]
    FinalizedPeriod(Uuid),

    #[error("employee {employee_id} has no {salary_type} rate configured")]
    MissingCompensationConfig {
        employee_id: Uuid,
        salary_type: SalaryType,
    },

    #[error("{entity} {id} not found")]
    ReferenceNotFound {
        entity: &'static str,
        id: Uuid,
    },

    #[error("{0}")]
    InvalidPeriod(String),

    #[error("payroll {0} was modified by another request")]
    ConcurrentModification(Uuid),

    #[error("database error")]
    Database(#[from] DbErr),
}

impl PayrollError {
    pub fn not_found(entity: &'static str, id: Uuid) -> Self {
        Self::ReferenceNotFound { entity, id }
    }

    /// A unique index rejected the write because a concurrent request got
    /// there first. Becomes `conflict`, any other failure stays `Database`.
    pub fn on_unique_violation(err: DbErr, conflict: impl FnOnce() -> Self) -> Self {
        let sql_err = err.sql_err();
        Self::classify(sql_err, err, conflict)
    }

    fn classify(sql_err: Option<SqlErr>, err: DbErr, conflict: impl FnOnce() -> Self) -> Self {
        match sql_err {
            Some(SqlErr::UniqueConstraintViolation(_)) => conflict(),
            _ => Self::Database(err),
        }
    }
}

impl actix_web::error::ResponseError for PayrollError {
    fn error_response(&self) -> HttpResponse<body::BoxBody> {
        HttpResponse::build(self.status_code())
            .insert_header(ContentType::plaintext())
            .body(self.to_string())
    }

    fn status_code(&self) -> StatusCode {
        match self {
            PayrollError::InvalidStateTransition { .. } => StatusCode::BAD_REQUEST,
            PayrollError::DuplicateRecord(_) => StatusCode::CONFLICT,
            PayrollError::FinalizedPeriod(_) => StatusCode::BAD_REQUEST,
            PayrollError::MissingCompensationConfig { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            PayrollError::ReferenceNotFound { .. } => StatusCode::NOT_FOUND,
            PayrollError::InvalidPeriod(_) => StatusCode::BAD_REQUEST,
            PayrollError::ConcurrentModification(_) => StatusCode::CONFLICT,
            PayrollError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

use actix_web::{dev, get, post, web, FromRequest, HttpRequest, HttpResponse};
use futures_util::future::LocalBoxFuture;
use sea_orm::{DatabaseConnection, EntityTrait};

use crate::{
    auth::PayrollManager,
    entity::{payroll_period, prelude::*},
    error::PayrollError,
    pages::{database, path_id},
    service::{self, period::NewPeriod},
};

mod extractor;

pub(super) fn config(cfg: &mut web::ServiceConfig) {
    cfg
        .service(create_period)
        .service(process_period)
        .service(finalize_period)
        .service(get_summary);
}

#[post("")]
async fn create_period(_manager: PayrollManager, db: web::Data<DatabaseConnection>, payload: web::Json<NewPeriod>) -> Result<HttpResponse, PayrollError> {
    let period = service::period::create_period(db.as_ref(), payload.into_inner()).await?;

    Ok(HttpResponse::Created().json(web::Json(period)))
}

#[post("/{period_id}/process")]
async fn process_period(_manager: PayrollManager, db: web::Data<DatabaseConnection>, period: payroll_period::Model) -> Result<HttpResponse, PayrollError> {
    let period = service::period::process_period(db.as_ref(), period).await?;

    Ok(HttpResponse::Ok().json(web::Json(period)))
}

#[post("/{period_id}/finalize")]
async fn finalize_period(_manager: PayrollManager, db: web::Data<DatabaseConnection>, period: payroll_period::Model) -> Result<HttpResponse, PayrollError> {
    let period = service::period::finalize_period(db.as_ref(), period).await?;

    Ok(HttpResponse::Ok().json(web::Json(period)))
}

#[get("/{period_id}/summary")]
async fn get_summary(_manager: PayrollManager, db: web::Data<DatabaseConnection>, period: payroll_period::Model) -> Result<HttpResponse, PayrollError> {
    let summary = service::report::period_summary(db.as_ref(), &period).await?;

    Ok(HttpResponse::Ok().json(web::Json(summary)))
}

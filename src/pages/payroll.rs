use actix_web::{dev, get, post, web, FromRequest, HttpRequest, HttpResponse, Responder};
use futures_util::future::LocalBoxFuture;
use sea_orm::{DatabaseConnection, EntityTrait};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    auth::{Actor, PayrollManager},
    entity::{payroll, prelude::*},
    error::PayrollError,
    pages::{database, path_id},
    service::{
        self,
        bulk::{BulkApproveRequest, BulkRequest},
        payroll::{LineItemRequest, PreviewRequest},
    },
};

use model::*;

mod extractor;
mod model;

pub(super) fn config(cfg: &mut web::ServiceConfig) {
    cfg
        .service(create_payroll)
        .service(bulk_calculate)
        .service(bulk_approve)
        .service(preview)
        .service(get_payroll)
        .service(calculate)
        .service(approve)
        .service(reject)
        .service(mark_paid)
        .service(generate_payslip)
        .service(add_bonus)
        .service(add_deduction)
        .service(get_history);
}

#[post("")]
async fn create_payroll(manager: PayrollManager, db: web::Data<DatabaseConnection>, payload: web::Json<CreatePayroll>) -> Result<HttpResponse, PayrollError> {
    let payroll = service::payroll::create_payroll(db.as_ref(), payload.employee_id, payload.payroll_period_id, manager.id).await?;

    Ok(HttpResponse::Created().json(web::Json(payroll)))
}

#[post("/bulk_calculate")]
async fn bulk_calculate(manager: PayrollManager, db: web::Data<DatabaseConnection>, payload: web::Json<BulkRequest>) -> Result<HttpResponse, PayrollError> {
    let outcome = service::bulk::bulk_calculate(db.as_ref(), &payload, manager.id).await?;

    Ok(HttpResponse::Ok().json(web::Json(outcome)))
}

#[post("/bulk_approve")]
async fn bulk_approve(manager: PayrollManager, db: web::Data<DatabaseConnection>, payload: web::Json<BulkApproveRequest>) -> Result<HttpResponse, PayrollError> {
    let outcome = service::bulk::bulk_approve(db.as_ref(), &payload, manager.id).await?;

    Ok(HttpResponse::Ok().json(web::Json(outcome)))
}

#[post("/preview")]
async fn preview(_manager: PayrollManager, db: web::Data<DatabaseConnection>, payload: web::Json<PreviewRequest>) -> Result<HttpResponse, PayrollError> {
    let calculation = service::payroll::preview(db.as_ref(), &payload).await?;

    Ok(HttpResponse::Ok().json(web::Json(calculation)))
}

/// Employees may read their own payroll, managers any
#[get("/{payroll_id}")]
async fn get_payroll(actor: Actor, payroll: payroll::Model) -> impl Responder {
    if !actor.access_role.manages_payroll() && actor.id != payroll.employee_id {
        return Err(actix_web::error::ErrorForbidden("forbidden"))
    }

    Ok(web::Json(payroll))
}

#[post("/{payroll_id}/calculate")]
async fn calculate(manager: PayrollManager, db: web::Data<DatabaseConnection>, payroll: payroll::Model) -> Result<HttpResponse, PayrollError> {
    let payroll = service::payroll::calculate(db.as_ref(), payroll, manager.id).await?;

    Ok(HttpResponse::Ok().json(web::Json(payroll)))
}

#[post("/{payroll_id}/approve")]
async fn approve(manager: PayrollManager, db: web::Data<DatabaseConnection>, payroll: payroll::Model, body: Option<web::Json<TransitionNotes>>) -> Result<HttpResponse, PayrollError> {
    let payroll = service::payroll::approve(db.as_ref(), payroll, manager.id, TransitionNotes::from_body(body)).await?;

    Ok(HttpResponse::Ok().json(web::Json(payroll)))
}

#[post("/{payroll_id}/reject")]
async fn reject(manager: PayrollManager, db: web::Data<DatabaseConnection>, payroll: payroll::Model, body: Option<web::Json<TransitionNotes>>) -> Result<HttpResponse, PayrollError> {
    let payroll = service::payroll::reject(db.as_ref(), payroll, manager.id, TransitionNotes::from_body(body)).await?;

    Ok(HttpResponse::Ok().json(web::Json(payroll)))
}

#[post("/{payroll_id}/mark_paid")]
async fn mark_paid(manager: PayrollManager, db: web::Data<DatabaseConnection>, payroll: payroll::Model, body: Option<web::Json<TransitionNotes>>) -> Result<HttpResponse, PayrollError> {
    let payroll = service::payroll::mark_paid(db.as_ref(), payroll, manager.id, TransitionNotes::from_body(body)).await?;

    Ok(HttpResponse::Ok().json(web::Json(payroll)))
}

#[post("/{payroll_id}/payslip")]
async fn generate_payslip(manager: PayrollManager, db: web::Data<DatabaseConnection>, payroll: payroll::Model) -> Result<HttpResponse, PayrollError> {
    let (slip, minted) = service::payslip::generate_payslip(db.as_ref(), payroll, manager.id).await?;

    if minted {
        Ok(HttpResponse::Created().json(web::Json(slip)))
    } else {
        Ok(HttpResponse::Ok().json(web::Json(slip)))
    }
}

#[post("/{payroll_id}/bonuses")]
async fn add_bonus(manager: PayrollManager, db: web::Data<DatabaseConnection>, payroll: payroll::Model, payload: web::Json<LineItemRequest>) -> Result<HttpResponse, PayrollError> {
    let bonus = service::payroll::add_bonus(db.as_ref(), payroll, payload.into_inner(), manager.id).await?;

    Ok(HttpResponse::Created().json(web::Json(bonus)))
}

#[post("/{payroll_id}/deductions")]
async fn add_deduction(manager: PayrollManager, db: web::Data<DatabaseConnection>, payroll: payroll::Model, payload: web::Json<LineItemRequest>) -> Result<HttpResponse, PayrollError> {
    let deduction = service::payroll::add_deduction(db.as_ref(), payroll, payload.into_inner(), manager.id).await?;

    Ok(HttpResponse::Created().json(web::Json(deduction)))
}

#[get("/{payroll_id}/history")]
async fn get_history(_manager: PayrollManager, db: web::Data<DatabaseConnection>, payroll: payroll::Model) -> Result<HttpResponse, PayrollError> {
    let history = service::payroll::history(db.as_ref(), payroll.id).await?;

    Ok(HttpResponse::Ok().json(web::Json(history)))
}

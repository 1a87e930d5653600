use actix_web::{get, web, HttpResponse};
use sea_orm::DatabaseConnection;
use uuid::Uuid;

use crate::{auth::Actor, service};

pub(super) fn config(cfg: &mut web::ServiceConfig) {
    cfg
        .service(get_payroll_history)
        .service(get_leave_balance);
}

/// Managers see everyone, other employees only themselves
fn ensure_can_view(actor: &Actor, employee_id: Uuid) -> Result<(), actix_web::Error> {
    if !actor.access_role.manages_payroll() && actor.id != employee_id {
        return Err(actix_web::error::ErrorForbidden("forbidden"))
    }

    Ok(())
}

#[get("/{employee_id}/payroll_history")]
async fn get_payroll_history(actor: Actor, db: web::Data<DatabaseConnection>, path: web::Path<Uuid>) -> Result<HttpResponse, actix_web::Error> {
    let employee_id = path.into_inner();
    ensure_can_view(&actor, employee_id)?;

    let rows = service::report::employee_payroll_history(db.as_ref(), employee_id).await?;

    Ok(HttpResponse::Ok().json(web::Json(rows)))
}

#[get("/{employee_id}/leave_balance")]
async fn get_leave_balance(actor: Actor, db: web::Data<DatabaseConnection>, path: web::Path<Uuid>) -> Result<HttpResponse, actix_web::Error> {
    let employee_id = path.into_inner();
    ensure_can_view(&actor, employee_id)?;

    let balance = service::report::employee_leave_balance(db.as_ref(), employee_id).await?;

    Ok(HttpResponse::Ok().json(web::Json(balance)))
}

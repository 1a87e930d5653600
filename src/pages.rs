use std::str::FromStr;

use actix_web::{web, HttpRequest};
use sea_orm::DatabaseConnection;
use uuid::Uuid;

mod employee;
mod payroll;
mod period;

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg
        .service(web::scope("/payroll")
            .configure(payroll::config))
        .service(web::scope("/periods")
            .configure(period::config))
        .service(web::scope("/employees")
            .configure(employee::config));
}

/// Parses the `name` path segment of the matched route
fn path_id(req: &HttpRequest, name: &str) -> Result<Uuid, actix_web::Error> {
    let Some(raw) = req.match_info().get(name) else {
        return Err(actix_web::error::ErrorInternalServerError(format!("route has no `{name}` segment")))
    };

    Uuid::from_str(raw).map_err(|_| actix_web::error::ErrorBadRequest(format!("invalid `{name}`")))
}

fn database(req: &HttpRequest) -> Result<web::Data<DatabaseConnection>, actix_web::Error> {
    req.app_data::<web::Data<DatabaseConnection>>()
        .cloned()
        .ok_or_else(|| actix_web::error::ErrorInternalServerError("database is not attached"))
}

use super::*;

impl FromRequest for payroll::Model {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut dev::Payload) -> Self::Future {
        let req = req.clone();

        Box::pin(async move {
            let payroll_id = path_id(&req, "payroll_id")?;
            let db = database(&req)?;

            let payroll = Payroll::find_by_id(payroll_id)
                .one(db.as_ref()).await
                .map_err(PayrollError::from)?
                .ok_or_else(|| PayrollError::not_found("payroll", payroll_id))?;

            Ok(payroll)
        })
    }
}

#[cfg(test)]
mod tests {
    use actix_web::{get, http::StatusCode, test, App};
    use sea_orm::{DatabaseBackend, MockDatabase};

    use crate::{entity::sea_orm_active_enums::PayrollStatus, lifecycle::tests::payroll as payroll_model};

    use super::*;

    #[actix_web::test]
    async fn test_payroll_extractor() {
        #[get("/{payroll_id}")]
        async fn test_handler(payroll: payroll::Model) -> impl Responder {
            web::Json(payroll)
        }

        let calculated = payroll_model(PayrollStatus::Calculated);

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([
                vec![ calculated.clone() ],
                vec![],
            ]);

        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(db.into_connection()))
                .service(test_handler)
        ).await;

        let req = test::TestRequest::default()
            .uri(&format!("/{}", calculated.id))
            .to_request();

        let returned: payroll::Model = test::call_and_read_body_json(&app, req).await;
        assert_eq!(returned, calculated);

        let req = test::TestRequest::default()
            .uri(&format!("/{}", Uuid::new_v4()))
            .to_request();

        let response = test::call_service(&app, req).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let req = test::TestRequest::default()
            .uri("/not-a-uuid")
            .to_request();

        let response = test::call_service(&app, req).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}

use super::*;

impl FromRequest for payroll_period::Model {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut dev::Payload) -> Self::Future {
        let req = req.clone();

        Box::pin(async move {
            let period_id = path_id(&req, "period_id")?;
            let db = database(&req)?;

            let period = PayrollPeriod::find_by_id(period_id)
                .one(db.as_ref()).await
                .map_err(PayrollError::from)?
                .ok_or_else(|| PayrollError::not_found("payroll period", period_id))?;

            Ok(period)
        })
    }
}

use super::*;

#[derive(Debug, Serialize, Deserialize)]
pub(super) struct CreatePayroll {
    pub(super) employee_id: Uuid,
    pub(super) payroll_period_id: Uuid,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub(super) struct TransitionNotes {
    pub(super) notes: Option<String>,
}

impl TransitionNotes {
    /// Body is optional on status changes
    pub(super) fn from_body(body: Option<web::Json<Self>>) -> Option<String> {
        body.and_then(|body| body.into_inner().notes)
    }
}

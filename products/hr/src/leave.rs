use chrono::NaiveDate;
use entity::{LeaveStatus, LeaveType, leave_request};
use sea_orm::prelude::DateTimeWithTimeZone;
use sea_orm::{
    ActiveModelBehavior, ActiveModelTrait, ActiveValue::Set, ColumnTrait, ConnectionTrait,
    EntityTrait, QueryFilter, QueryOrder,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::instrument;
use validator::{Validate, ValidationError};

use crate::{ApiResult, load, validated};

/// `end_date` may precede `start_date`; ordering is left to the caller.
#[derive(Clone, Debug, Deserialize, Validate)]
pub struct LeaveRequestCreate {
    pub leave_type: LeaveType,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[validate(length(max = 1000))]
    pub reason: String,
    #[serde(default)]
    pub supporting_documents: Vec<String>,
}

impl LeaveRequestCreate {
    /// Inclusive calendar days; zero or negative when the range is inverted.
    pub fn requested_days(&self) -> i32 {
        let span = (self.end_date - self.start_date).num_days() + 1;
        span.clamp(i32::MIN as i64, i32::MAX as i64) as i32
    }

    pub fn into_active_model(self, employee_id: i32) -> leave_request::ActiveModel {
        let days = self.requested_days();
        let documents = self.supporting_documents.into_iter().map(Value::String).collect();
        leave_request::ActiveModel {
            employee_id: Set(employee_id),
            leave_type: Set(self.leave_type),
            start_date: Set(self.start_date),
            end_date: Set(self.end_date),
            days_requested: Set(days),
            reason: Set(self.reason),
            supporting_documents: Set(Value::Array(documents)),
            ..leave_request::ActiveModel::new()
        }
    }
}

fn reason_matches_status(payload: &LeaveRequestApproval) -> Result<(), ValidationError> {
    if payload.status != LeaveStatus::Rejected && !payload.rejection_reason.trim().is_empty() {
        let mut err = ValidationError::new("rejection_reason");
        err.message = Some("a rejection reason is only allowed when rejecting".into());
        return Err(err);
    }
    Ok(())
}

#[derive(Clone, Debug, Deserialize, Validate)]
#[validate(schema(function = "reason_matches_status"))]
pub struct LeaveRequestApproval {
    pub status: LeaveStatus,
    #[serde(default)]
    #[validate(length(max = 500))]
    pub rejection_reason: String,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct LeaveRequestResponse {
    pub id: i32,
    pub employee_id: i32,
    pub leave_type: LeaveType,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub days_requested: i32,
    pub reason: String,
    pub status: LeaveStatus,
    pub approved_by: Option<i32>,
    pub approved_at: Option<DateTimeWithTimeZone>,
    pub rejection_reason: String,
    pub supporting_documents: Value,
    pub created_at: DateTimeWithTimeZone,
}

impl From<leave_request::Model> for LeaveRequestResponse {
    fn from(model: leave_request::Model) -> Self {
        Self {
            id: model.id,
            employee_id: model.employee_id,
            leave_type: model.leave_type,
            start_date: model.start_date,
            end_date: model.end_date,
            days_requested: model.days_requested,
            reason: model.reason,
            status: model.status,
            approved_by: model.approved_by,
            approved_at: model.approved_at,
            rejection_reason: model.rejection_reason,
            supporting_documents: model.supporting_documents,
            created_at: model.created_at,
        }
    }
}

#[instrument(name = "hr.leave.submit", skip(db, payload), fields(kind = ?payload.leave_type))]
pub async fn submit<C>(
    db: &C,
    employee_id: i32,
    payload: LeaveRequestCreate,
) -> ApiResult<leave_request::Model>
where
    C: ConnectionTrait,
{
    let payload = validated(payload)?;
    Ok(payload.into_active_model(employee_id).insert(db).await?)
}

/// Sets the status. Any status may follow any other; `approved` and `rejected`
/// stamp the deciding employee and time, a return to `pending` clears them and
/// `cancelled` keeps whatever decision came before.
#[instrument(name = "hr.leave.decide", skip(db, payload), fields(status = ?payload.status))]
pub async fn decide<C>(
    db: &C,
    id: i32,
    approver_id: i32,
    payload: LeaveRequestApproval,
) -> ApiResult<leave_request::Model>
where
    C: ConnectionTrait,
{
    let payload = validated(payload)?;
    let mut active: leave_request::ActiveModel =
        load::<leave_request::Entity, _>(db, id).await?.into();
    match payload.status {
        LeaveStatus::Approved | LeaveStatus::Rejected => {
            active.approved_by = Set(Some(approver_id));
            active.approved_at = Set(Some(entity::now()));
        }
        LeaveStatus::Pending => {
            active.approved_by = Set(None);
            active.approved_at = Set(None);
        }
        LeaveStatus::Cancelled => {}
    }
    active.status = Set(payload.status);
    active.rejection_reason = Set(payload.rejection_reason);
    Ok(active.update(db).await?)
}

pub async fn for_employee<C>(db: &C, employee_id: i32) -> ApiResult<Vec<leave_request::Model>>
where
    C: ConnectionTrait,
{
    Ok(leave_request::Entity::find()
        .filter(leave_request::Column::EmployeeId.eq(employee_id))
        .order_by_desc(leave_request::Column::StartDate)
        .all(db)
        .await?)
}

pub async fn pending<C>(db: &C) -> ApiResult<Vec<leave_request::Model>>
where
    C: ConnectionTrait,
{
    Ok(leave_request::Entity::find()
        .filter(leave_request::Column::Status.eq(LeaveStatus::Pending))
        .order_by_asc(leave_request::Column::CreatedAt)
        .all(db)
        .await?)
}

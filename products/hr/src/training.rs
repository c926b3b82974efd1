use entity::{TrainingStatus, employee, training_enrollment, training_program};
use rust_decimal::Decimal;
use sea_orm::prelude::DateTimeWithTimeZone;
use sea_orm::{
    ActiveModelBehavior, ActiveModelTrait, ActiveValue::Set, ColumnTrait, ConnectionTrait,
    EntityTrait, ModelTrait, PaginatorTrait, QueryFilter, QueryOrder,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{info, instrument};
use validator::{Validate, ValidationError};

use crate::validation::{money, not_blank, percentage};
use crate::{ApiError, ApiResult, load, nullable, validated};

/// Values conventionally stored in `completion_status`.
pub const COMPLETION_STATUSES: [&str; 4] =
    [training_enrollment::ENROLLED, "completed", "failed", "withdrawn"];

fn known_completion_status(value: &str) -> Result<(), ValidationError> {
    if COMPLETION_STATUSES.contains(&value) {
        return Ok(());
    }
    let mut err = ValidationError::new("completion_status");
    err.message = Some("expected enrolled, completed, failed or withdrawn".into());
    Err(err)
}

fn schedule_in_order(payload: &TrainingProgramCreate) -> Result<(), ValidationError> {
    if payload.end_date < payload.start_date {
        let mut err = ValidationError::new("schedule");
        err.message = Some("end_date precedes start_date".into());
        return Err(err);
    }
    Ok(())
}

#[derive(Clone, Debug, Deserialize, Validate)]
#[validate(schema(function = "schedule_in_order"))]
pub struct TrainingProgramCreate {
    #[validate(length(max = 200), custom(function = "not_blank"))]
    pub title: String,
    #[validate(length(max = 2000))]
    pub description: String,
    #[validate(length(max = 200))]
    pub trainer: String,
    #[validate(range(min = 1))]
    pub duration_hours: i32,
    #[serde(default)]
    #[validate(range(min = 1))]
    pub max_participants: Option<i32>,
    #[serde(default)]
    #[validate(custom(function = "money"))]
    pub cost_per_participant: Option<Decimal>,
    pub start_date: DateTimeWithTimeZone,
    pub end_date: DateTimeWithTimeZone,
    #[validate(length(max = 255))]
    pub location: String,
    #[serde(default)]
    pub materials: Vec<String>,
    #[serde(default)]
    #[validate(length(max = 1000))]
    pub prerequisites: String,
}

#[derive(Clone, Debug, Default, Deserialize, Validate)]
pub struct TrainingProgramUpdate {
    #[validate(length(max = 200), custom(function = "not_blank"))]
    pub title: Option<String>,
    #[validate(length(max = 2000))]
    pub description: Option<String>,
    #[validate(length(max = 200))]
    pub trainer: Option<String>,
    #[validate(range(min = 1))]
    pub duration_hours: Option<i32>,
    #[serde(default, deserialize_with = "nullable")]
    pub max_participants: Option<Option<i32>>,
    #[serde(default, deserialize_with = "nullable")]
    #[validate(custom(function = "money"))]
    pub cost_per_participant: Option<Option<Decimal>>,
    pub start_date: Option<DateTimeWithTimeZone>,
    pub end_date: Option<DateTimeWithTimeZone>,
    #[validate(length(max = 255))]
    pub location: Option<String>,
    pub status: Option<TrainingStatus>,
    pub materials: Option<Vec<String>>,
    #[validate(length(max = 1000))]
    pub prerequisites: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TrainingProgramResponse {
    pub id: i32,
    pub title: String,
    pub description: String,
    pub trainer: String,
    pub duration_hours: i32,
    pub max_participants: Option<i32>,
    pub cost_per_participant: Option<Decimal>,
    pub start_date: DateTimeWithTimeZone,
    pub end_date: DateTimeWithTimeZone,
    pub location: String,
    pub status: TrainingStatus,
    pub materials: Value,
    pub prerequisites: String,
    pub created_at: DateTimeWithTimeZone,
}

impl From<training_program::Model> for TrainingProgramResponse {
    fn from(model: training_program::Model) -> Self {
        Self {
            id: model.id,
            title: model.title,
            description: model.description,
            trainer: model.trainer,
            duration_hours: model.duration_hours,
            max_participants: model.max_participants,
            cost_per_participant: model.cost_per_participant,
            start_date: model.start_date,
            end_date: model.end_date,
            location: model.location,
            status: model.status,
            materials: model.materials,
            prerequisites: model.prerequisites,
            created_at: model.created_at,
        }
    }
}

fn string_list(items: Vec<String>) -> Value {
    Value::Array(items.into_iter().map(Value::String).collect())
}

impl TrainingProgramCreate {
    pub fn into_active_model(self) -> training_program::ActiveModel {
        training_program::ActiveModel {
            title: Set(self.title),
            description: Set(self.description),
            trainer: Set(self.trainer),
            duration_hours: Set(self.duration_hours),
            max_participants: Set(self.max_participants),
            cost_per_participant: Set(self.cost_per_participant),
            start_date: Set(self.start_date),
            end_date: Set(self.end_date),
            location: Set(self.location),
            materials: Set(string_list(self.materials)),
            prerequisites: Set(self.prerequisites),
            ..training_program::ActiveModel::new()
        }
    }
}

impl TrainingProgramUpdate {
    pub fn apply(self, active: &mut training_program::ActiveModel) {
        if let Some(title) = self.title {
            active.title = Set(title);
        }
        if let Some(description) = self.description {
            active.description = Set(description);
        }
        if let Some(trainer) = self.trainer {
            active.trainer = Set(trainer);
        }
        if let Some(hours) = self.duration_hours {
            active.duration_hours = Set(hours);
        }
        if let Some(max) = self.max_participants {
            active.max_participants = Set(max);
        }
        if let Some(cost) = self.cost_per_participant {
            active.cost_per_participant = Set(cost);
        }
        if let Some(start) = self.start_date {
            active.start_date = Set(start);
        }
        if let Some(end) = self.end_date {
            active.end_date = Set(end);
        }
        if let Some(location) = self.location {
            active.location = Set(location);
        }
        if let Some(status) = self.status {
            active.status = Set(status);
        }
        if let Some(materials) = self.materials {
            active.materials = Set(string_list(materials));
        }
        if let Some(prerequisites) = self.prerequisites {
            active.prerequisites = Set(prerequisites);
        }
    }
}

#[derive(Clone, Debug, Deserialize, Validate)]
pub struct TrainingEnrollmentCreate {
    pub employee_id: i32,
    pub training_program_id: i32,
}

#[derive(Clone, Debug, Default, Deserialize, Validate)]
pub struct TrainingEnrollmentUpdate {
    #[serde(default, deserialize_with = "nullable")]
    pub completion_date: Option<Option<DateTimeWithTimeZone>>,
    #[validate(custom(function = "known_completion_status"))]
    pub completion_status: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    #[validate(custom(function = "percentage"))]
    pub score: Option<Option<Decimal>>,
    pub certificate_issued: Option<bool>,
    #[validate(length(max = 1000))]
    pub feedback: Option<String>,
}

impl TrainingEnrollmentCreate {
    pub fn into_active_model(self) -> training_enrollment::ActiveModel {
        training_enrollment::ActiveModel {
            employee_id: Set(self.employee_id),
            training_program_id: Set(self.training_program_id),
            ..training_enrollment::ActiveModel::new()
        }
    }
}

impl TrainingEnrollmentUpdate {
    pub fn apply(self, active: &mut training_enrollment::ActiveModel) {
        if let Some(date) = self.completion_date {
            active.completion_date = Set(date);
        }
        if let Some(status) = self.completion_status {
            active.completion_status = Set(status);
        }
        if let Some(score) = self.score {
            active.score = Set(score);
        }
        if let Some(issued) = self.certificate_issued {
            active.certificate_issued = Set(issued);
        }
        if let Some(feedback) = self.feedback {
            active.feedback = Set(feedback);
        }
    }
}

#[instrument(name = "hr.training.create_program", skip_all)]
pub async fn create_program<C>(
    db: &C,
    payload: TrainingProgramCreate,
) -> ApiResult<training_program::Model>
where
    C: ConnectionTrait,
{
    let payload = validated(payload)?;
    Ok(payload.into_active_model().insert(db).await?)
}

#[instrument(name = "hr.training.update_program", skip(db, payload))]
pub async fn update_program<C>(
    db: &C,
    id: i32,
    payload: TrainingProgramUpdate,
) -> ApiResult<training_program::Model>
where
    C: ConnectionTrait,
{
    let payload = validated(payload)?;
    let current = load::<training_program::Entity, _>(db, id).await?;
    let start = payload.start_date.unwrap_or(current.start_date);
    let end = payload.end_date.unwrap_or(current.end_date);
    if end < start {
        return Err(ApiError::InvalidInput("end_date precedes start_date".into()));
    }
    let mut active: training_program::ActiveModel = current.into();
    payload.apply(&mut active);
    Ok(active.update(db).await?)
}

/// Enrolls an employee, refusing when the program is already at capacity.
#[instrument(name = "hr.training.enroll", skip_all, fields(program = payload.training_program_id))]
pub async fn enroll<C>(
    db: &C,
    payload: TrainingEnrollmentCreate,
) -> ApiResult<training_enrollment::Model>
where
    C: ConnectionTrait,
{
    let payload = validated(payload)?;
    let program = load::<training_program::Entity, _>(db, payload.training_program_id).await?;
    if let Some(max) = program.max_participants {
        let taken = program
            .find_related(training_enrollment::Entity)
            .filter(training_enrollment::Column::CompletionStatus.ne("withdrawn"))
            .count(db)
            .await?;
        if taken >= max.max(0) as u64 {
            info!(taken, max, "program full");
            return Err(ApiError::Conflict(format!(
                "training program {} is full",
                program.id
            )));
        }
    }
    Ok(payload.into_active_model().insert(db).await?)
}

#[instrument(name = "hr.training.update_enrollment", skip(db, payload))]
pub async fn update_enrollment<C>(
    db: &C,
    id: i32,
    payload: TrainingEnrollmentUpdate,
) -> ApiResult<training_enrollment::Model>
where
    C: ConnectionTrait,
{
    let payload = validated(payload)?;
    let mut active: training_enrollment::ActiveModel =
        load::<training_enrollment::Entity, _>(db, id).await?.into();
    payload.apply(&mut active);
    Ok(active.update(db).await?)
}

/// Programs the employee is enrolled in, soonest first.
pub async fn programs_for<C>(
    db: &C,
    employee: &employee::Model,
) -> ApiResult<Vec<training_program::Model>>
where
    C: ConnectionTrait,
{
    Ok(employee
        .find_related(training_program::Entity)
        .order_by_asc(training_program::Column::StartDate)
        .all(db)
        .await?)
}

pub async fn participants<C>(
    db: &C,
    program: &training_program::Model,
) -> ApiResult<Vec<employee::Model>>
where
    C: ConnectionTrait,
{
    Ok(program.find_related(employee::Entity).all(db).await?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, FixedOffset};

    fn at(raw: &str) -> DateTime<FixedOffset> {
        DateTime::parse_from_rfc3339(raw).unwrap()
    }

    fn workshop() -> TrainingProgramCreate {
        TrainingProgramCreate {
            title: "Rust for services".into(),
            description: "Two day workshop".into(),
            trainer: "Ferris".into(),
            duration_hours: 16,
            max_participants: Some(12),
            cost_per_participant: None,
            start_date: at("2024-05-06T09:00:00+00:00"),
            end_date: at("2024-05-07T17:00:00+00:00"),
            location: "Room 4".into(),
            materials: vec!["slides.pdf".into()],
            prerequisites: String::new(),
        }
    }

    #[test]
    fn schedule_must_not_run_backwards() {
        let mut create = workshop();
        assert!(create.validate().is_ok());
        create.end_date = at("2024-05-05T09:00:00+00:00");
        assert!(create.validate().is_err());
    }

    #[test]
    fn zero_duration_is_rejected() {
        let mut create = workshop();
        create.duration_hours = 0;
        let errors = create.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("duration_hours"));
    }

    #[test]
    fn new_programs_are_scheduled() {
        let active = workshop().into_active_model();
        assert_eq!(active.status.as_ref(), &TrainingStatus::Scheduled);
        assert_eq!(active.materials.as_ref(), &serde_json::json!(["slides.pdf"]));
    }

    #[test]
    fn enrollment_score_and_status_are_checked() {
        let ok = TrainingEnrollmentUpdate {
            completion_status: Some("completed".into()),
            score: Some(Some(Decimal::from(87))),
            ..TrainingEnrollmentUpdate::default()
        };
        assert!(ok.validate().is_ok());

        let bad_score = TrainingEnrollmentUpdate {
            score: Some(Some(Decimal::from(101))),
            ..TrainingEnrollmentUpdate::default()
        };
        assert!(bad_score.validate().is_err());

        let bad_status = TrainingEnrollmentUpdate {
            completion_status: Some("graduated".into()),
            ..TrainingEnrollmentUpdate::default()
        };
        assert!(bad_status.validate().is_err());
    }

    #[test]
    fn new_enrollments_start_enrolled() {
        let active = TrainingEnrollmentCreate {
            employee_id: 1,
            training_program_id: 2,
        }
        .into_active_model();
        assert_eq!(active.completion_status.as_ref(), training_enrollment::ENROLLED);
        assert_eq!(active.certificate_issued.as_ref(), &false);
    }
}

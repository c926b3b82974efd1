//! Daily check-in / check-out and the worked-hours computation.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use entity::{AttendanceStatus, attendance};
use rust_decimal::Decimal;
use sea_orm::prelude::DateTimeWithTimeZone;
use sea_orm::{
    ActiveModelBehavior, ActiveModelTrait, ActiveValue::Set, ColumnTrait, ConnectionTrait,
    EntityTrait, QueryFilter, QueryOrder,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};
use validator::{Validate, ValidationError, ValidationErrors};

use crate::settings;
use crate::{ApiError, ApiResult, validated};

/// Hours beyond this count as overtime.
pub const STANDARD_DAY_HOURS: i64 = 8;

/// Setting holding the `HH:MM` check-in cutoff after which arrivals are late.
pub const LATE_AFTER_KEY: &str = "attendance.late_after";

/// Capacity of `hrd_attendance.notes`, shared by the check-in and check-out text.
pub const NOTES_MAX_CHARS: usize = 500;

fn default_late_after() -> NaiveTime {
    NaiveTime::from_hms_opt(9, 0, 0).unwrap_or(NaiveTime::MIN)
}

#[derive(Clone, Debug, Default, Deserialize, Validate)]
pub struct AttendanceCheckIn {
    #[validate(length(max = 255))]
    pub location: Option<String>,
    #[serde(default)]
    #[validate(length(max = 500))]
    pub notes: String,
}

#[derive(Clone, Debug, Default, Deserialize, Validate)]
pub struct AttendanceCheckOut {
    #[validate(length(max = 255))]
    pub location: Option<String>,
    #[serde(default)]
    #[validate(length(max = 500))]
    pub notes: String,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct AttendanceResponse {
    pub id: i32,
    pub user_id: i32,
    pub date: NaiveDate,
    pub check_in_time: Option<NaiveTime>,
    pub check_out_time: Option<NaiveTime>,
    pub break_start_time: Option<NaiveTime>,
    pub break_end_time: Option<NaiveTime>,
    pub total_hours: Option<Decimal>,
    pub overtime_hours: Decimal,
    pub status: AttendanceStatus,
    pub check_in_location: Option<String>,
    pub check_out_location: Option<String>,
    pub notes: String,
    pub created_at: DateTimeWithTimeZone,
}

impl From<attendance::Model> for AttendanceResponse {
    fn from(model: attendance::Model) -> Self {
        Self {
            id: model.id,
            user_id: model.user_id,
            date: model.date,
            check_in_time: model.check_in_time,
            check_out_time: model.check_out_time,
            break_start_time: model.break_start_time,
            break_end_time: model.break_end_time,
            total_hours: model.total_hours,
            overtime_hours: model.overtime_hours,
            status: model.status,
            check_in_location: model.check_in_location,
            check_out_location: model.check_out_location,
            notes: model.notes,
            created_at: model.created_at,
        }
    }
}

/// Worked and overtime hours for one day.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WorkedHours {
    pub total: Decimal,
    pub overtime: Decimal,
}

/// Presence minus the break, clamped at zero and rounded to two places.
/// An unfinished or inverted break is ignored.
pub fn worked_hours(
    check_in: NaiveTime,
    check_out: NaiveTime,
    break_start: Option<NaiveTime>,
    break_end: Option<NaiveTime>,
) -> WorkedHours {
    let mut seconds = (check_out - check_in).num_seconds();
    if let (Some(start), Some(end)) = (break_start, break_end) {
        if end > start {
            seconds -= (end - start).num_seconds();
        }
    }
    let total = (Decimal::from(seconds.max(0)) / Decimal::from(3600)).round_dp(2);
    let overtime = (total - Decimal::from(STANDARD_DAY_HOURS)).max(Decimal::ZERO);
    WorkedHours { total, overtime }
}

/// `Late` strictly after the cutoff, `Present` otherwise.
pub fn arrival_status(check_in: NaiveTime, late_after: NaiveTime) -> AttendanceStatus {
    if check_in > late_after {
        AttendanceStatus::Late
    } else {
        AttendanceStatus::Present
    }
}

/// The configured lateness cutoff, 09:00 when unset.
pub async fn late_cutoff<C>(db: &C) -> ApiResult<NaiveTime>
where
    C: ConnectionTrait,
{
    let raw = match settings::get(db, LATE_AFTER_KEY).await {
        Ok(stored) => stored.value,
        Err(ApiError::NotFound) => return Ok(default_late_after()),
        Err(err) => return Err(err),
    };
    NaiveTime::parse_from_str(raw.trim(), "%H:%M")
        .map_err(|_| ApiError::InvalidInput(format!("`{LATE_AFTER_KEY}` is not HH:MM: {raw}")))
}

async fn day_record<C>(db: &C, user_id: i32, date: NaiveDate) -> ApiResult<attendance::Model>
where
    C: ConnectionTrait,
{
    attendance::Entity::find()
        .filter(attendance::Column::UserId.eq(user_id))
        .filter(attendance::Column::Date.eq(date))
        .one(db)
        .await?
        .ok_or(ApiError::NotFound)
}

/// Opens the day's record. A second check-in on the same date is a conflict.
#[instrument(name = "hr.attendance.check_in", skip(db, payload))]
pub async fn check_in<C>(
    db: &C,
    user_id: i32,
    at: NaiveDateTime,
    late_after: NaiveTime,
    payload: AttendanceCheckIn,
) -> ApiResult<attendance::Model>
where
    C: ConnectionTrait,
{
    let payload = validated(payload)?;
    let status = arrival_status(at.time(), late_after);
    let record = attendance::ActiveModel {
        user_id: Set(user_id),
        date: Set(at.date()),
        check_in_time: Set(Some(at.time())),
        check_in_location: Set(payload.location),
        notes: Set(payload.notes),
        status: Set(status),
        ..attendance::ActiveModel::new()
    };
    debug!(?status, "checked in");
    Ok(record.insert(db).await?)
}

#[instrument(name = "hr.attendance.break_start", skip(db))]
pub async fn start_break<C>(db: &C, user_id: i32, at: NaiveDateTime) -> ApiResult<attendance::Model>
where
    C: ConnectionTrait,
{
    let mut active: attendance::ActiveModel = day_record(db, user_id, at.date()).await?.into();
    active.break_start_time = Set(Some(at.time()));
    active.break_end_time = Set(None);
    Ok(active.update(db).await?)
}

#[instrument(name = "hr.attendance.break_end", skip(db))]
pub async fn end_break<C>(db: &C, user_id: i32, at: NaiveDateTime) -> ApiResult<attendance::Model>
where
    C: ConnectionTrait,
{
    let record = day_record(db, user_id, at.date()).await?;
    if record.break_start_time.is_none() {
        return Err(ApiError::InvalidInput("no break in progress".into()));
    }
    let mut active: attendance::ActiveModel = record.into();
    active.break_end_time = Set(Some(at.time()));
    Ok(active.update(db).await?)
}

/// Closes the day's record and fills in total and overtime hours.
#[instrument(name = "hr.attendance.check_out", skip(db, payload))]
pub async fn check_out<C>(
    db: &C,
    user_id: i32,
    at: NaiveDateTime,
    payload: AttendanceCheckOut,
) -> ApiResult<attendance::Model>
where
    C: ConnectionTrait,
{
    let payload = validated(payload)?;
    let record = day_record(db, user_id, at.date()).await?;
    let Some(check_in) = record.check_in_time else {
        return Err(ApiError::InvalidInput("not checked in".into()));
    };
    if record.check_out_time.is_some() {
        return Err(ApiError::Conflict("already checked out".into()));
    }
    let hours = worked_hours(
        check_in,
        at.time(),
        record.break_start_time,
        record.break_end_time,
    );
    let notes = match (record.notes.is_empty(), payload.notes.is_empty()) {
        (_, true) => record.notes.clone(),
        (true, false) => payload.notes,
        (false, false) => format!("{}\n{}", record.notes, payload.notes),
    };
    if notes.chars().count() > NOTES_MAX_CHARS {
        let mut err = ValidationError::new("length");
        err.message = Some(
            format!(
                "check-in notes already use {} of {NOTES_MAX_CHARS} characters",
                record.notes.chars().count()
            )
            .into(),
        );
        err.add_param("max".into(), &NOTES_MAX_CHARS);
        let mut errors = ValidationErrors::new();
        errors.add("notes", err);
        return Err(errors.into());
    }
    let mut active: attendance::ActiveModel = record.into();
    active.check_out_time = Set(Some(at.time()));
    active.check_out_location = Set(payload.location);
    active.total_hours = Set(Some(hours.total));
    active.overtime_hours = Set(hours.overtime);
    active.notes = Set(notes);
    Ok(active.update(db).await?)
}

/// Records for `user_id` between `from` and `to` inclusive, oldest first.
pub async fn history<C>(
    db: &C,
    user_id: i32,
    from: NaiveDate,
    to: NaiveDate,
) -> ApiResult<Vec<attendance::Model>>
where
    C: ConnectionTrait,
{
    Ok(attendance::Entity::find()
        .filter(attendance::Column::UserId.eq(user_id))
        .filter(attendance::Column::Date.between(from, to))
        .order_by_asc(attendance::Column::Date)
        .all(db)
        .await?)
}

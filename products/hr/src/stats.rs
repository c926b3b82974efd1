//! Dashboard counters for HR staff and for a single employee.

use std::collections::BTreeMap;

use chrono::{Datelike, Duration, NaiveDate, NaiveTime};
use entity::{
    AttendanceStatus, EmploymentStatus, LeaveStatus, TrainingStatus, attendance, employee,
    leave_request, training_enrollment, training_program,
};
use sea_orm::prelude::DateTimeWithTimeZone;
use sea_orm::{
    ActiveEnum, ColumnTrait, Condition, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter,
    QuerySelect, RelationTrait,
};
use sea_orm::sea_query::JoinType;
use serde::Serialize;
use serde_json::Value;
use tracing::{instrument, warn};

use crate::settings::{self, SettingValue};
use crate::{ApiError, ApiResult};

/// Setting holding a JSON object of leave type to yearly allowance in days.
pub const LEAVE_ENTITLEMENTS_KEY: &str = "leave.entitlements";

/// Hires within this many days count as recent.
pub const RECENT_HIRE_DAYS: i64 = 30;

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct DashboardStats {
    pub total_employees: u64,
    pub active_employees: u64,
    pub present_today: u64,
    pub on_leave_today: u64,
    pub pending_leave_requests: u64,
    pub upcoming_trainings: u64,
    pub recent_hires: u64,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct EmployeeStats {
    pub my_attendance_this_month: u64,
    pub my_leave_balance: BTreeMap<String, i64>,
    pub my_upcoming_trainings: u64,
    pub my_pending_requests: u64,
}

fn start_of(day: NaiveDate) -> DateTimeWithTimeZone {
    day.and_time(NaiveTime::MIN).and_utc().fixed_offset()
}

fn attended() -> Condition {
    Condition::any()
        .add(attendance::Column::Status.eq(AttendanceStatus::Present))
        .add(attendance::Column::Status.eq(AttendanceStatus::Late))
        .add(attendance::Column::Status.eq(AttendanceStatus::HalfDay))
}

#[instrument(name = "hr.stats.dashboard", skip(db))]
pub async fn dashboard<C>(db: &C, today: NaiveDate) -> ApiResult<DashboardStats>
where
    C: ConnectionTrait,
{
    let total_employees = employee::Entity::find().count(db).await?;
    let active_employees = employee::Entity::find()
        .filter(employee::Column::EmploymentStatus.eq(EmploymentStatus::Active))
        .count(db)
        .await?;
    let present_today = attendance::Entity::find()
        .filter(attendance::Column::Date.eq(today))
        .filter(attended())
        .count(db)
        .await?;
    let on_leave_today = leave_request::Entity::find()
        .filter(leave_request::Column::Status.eq(LeaveStatus::Approved))
        .filter(leave_request::Column::StartDate.lte(today))
        .filter(leave_request::Column::EndDate.gte(today))
        .count(db)
        .await?;
    let pending_leave_requests = leave_request::Entity::find()
        .filter(leave_request::Column::Status.eq(LeaveStatus::Pending))
        .count(db)
        .await?;
    let upcoming_trainings = training_program::Entity::find()
        .filter(training_program::Column::Status.eq(TrainingStatus::Scheduled))
        .filter(training_program::Column::StartDate.gte(start_of(today)))
        .count(db)
        .await?;
    let recent_hires = employee::Entity::find()
        .filter(employee::Column::HireDate.gte(today - Duration::days(RECENT_HIRE_DAYS)))
        .filter(employee::Column::HireDate.lte(today))
        .count(db)
        .await?;

    Ok(DashboardStats {
        total_employees,
        active_employees,
        present_today,
        on_leave_today,
        pending_leave_requests,
        upcoming_trainings,
        recent_hires,
    })
}

/// Yearly allowances from the `leave.entitlements` setting. Missing setting
/// means no allowances; non-integer entries are skipped.
pub async fn entitlements_from_settings<C>(db: &C) -> ApiResult<BTreeMap<String, i64>>
where
    C: ConnectionTrait,
{
    let value = match settings::get_value(db, LEAVE_ENTITLEMENTS_KEY).await {
        Ok(value) => value,
        Err(ApiError::NotFound) => return Ok(BTreeMap::new()),
        Err(err) => return Err(err),
    };
    let Some(Value::Object(entries)) = value.as_json().cloned() else {
        warn!(key = LEAVE_ENTITLEMENTS_KEY, "setting is not a JSON object");
        return Ok(BTreeMap::new());
    };
    Ok(entries
        .into_iter()
        .filter_map(|(kind, days)| days.as_i64().map(|days| (kind, days)))
        .collect())
}

/// Counters for one employee. Leave balance is each allowance minus the
/// approved days of that type starting in `today`'s year.
#[instrument(name = "hr.stats.for_employee", skip(db, person, entitlements), fields(employee_id = person.id))]
pub async fn for_employee<C>(
    db: &C,
    person: &employee::Model,
    today: NaiveDate,
    entitlements: &BTreeMap<String, i64>,
) -> ApiResult<EmployeeStats>
where
    C: ConnectionTrait,
{
    let month_start = today.with_day(1).unwrap_or(today);
    let my_attendance_this_month = attendance::Entity::find()
        .filter(attendance::Column::UserId.eq(person.user_id))
        .filter(attendance::Column::Date.between(month_start, today))
        .filter(attended())
        .count(db)
        .await?;

    let year_start = NaiveDate::from_ymd_opt(today.year(), 1, 1).unwrap_or(today);
    let year_end = NaiveDate::from_ymd_opt(today.year(), 12, 31).unwrap_or(today);
    let approved = leave_request::Entity::find()
        .filter(leave_request::Column::EmployeeId.eq(person.id))
        .filter(leave_request::Column::Status.eq(LeaveStatus::Approved))
        .filter(leave_request::Column::StartDate.between(year_start, year_end))
        .all(db)
        .await?;
    let mut used: BTreeMap<String, i64> = BTreeMap::new();
    for request in approved {
        *used.entry(request.leave_type.to_value()).or_default() +=
            i64::from(request.days_requested.max(0));
    }
    let my_leave_balance = entitlements
        .iter()
        .map(|(kind, allowance)| {
            let taken = used.get(kind).copied().unwrap_or_default();
            (kind.clone(), allowance.saturating_sub(taken))
        })
        .collect();

    let my_upcoming_trainings = training_program::Entity::find()
        .join(JoinType::InnerJoin, training_program::Relation::Enrollment.def())
        .filter(training_enrollment::Column::EmployeeId.eq(person.id))
        .filter(training_enrollment::Column::CompletionStatus.eq("enrolled"))
        .filter(training_program::Column::Status.eq(TrainingStatus::Scheduled))
        .filter(training_program::Column::StartDate.gte(start_of(today)))
        .count(db)
        .await?;

    let my_pending_requests = leave_request::Entity::find()
        .filter(leave_request::Column::EmployeeId.eq(person.id))
        .filter(leave_request::Column::Status.eq(LeaveStatus::Pending))
        .count(db)
        .await?;

    Ok(EmployeeStats {
        my_attendance_this_month,
        my_leave_balance,
        my_upcoming_trainings,
        my_pending_requests,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{PlainHasher, migrated_db};
    use crate::{employees, leave, users};
    use serde_json::json;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[tokio::test]
    async fn counters_reflect_stored_rows() {
        let db = migrated_db().await;
        let user = users::register(
            &db,
            serde_json::from_value(json!({"email": "kim@example.com", "password": "secret1"}))
                .unwrap(),
            &PlainHasher,
        )
        .await
        .unwrap();
        let person = employees::create(
            &db,
            serde_json::from_value(json!({
                "employee_id": "E200",
                "user_id": user.id,
                "first_name": "Kim",
                "last_name": "Lee",
                "date_of_birth": "1990-05-01",
                "phone": "+15550100",
                "address": "1 Main St",
                "emergency_contact_name": "Sam Lee",
                "emergency_contact_phone": "+15550101",
                "hire_date": "2024-05-20"
            }))
            .unwrap(),
        )
        .await
        .unwrap();

        let today = day(2024, 6, 10);
        let trip = leave::submit(
            &db,
            person.id,
            serde_json::from_value(json!({
                "leave_type": "annual",
                "start_date": "2024-06-10",
                "end_date": "2024-06-12",
                "reason": "trip"
            }))
            .unwrap(),
        )
        .await
        .unwrap();
        leave::submit(
            &db,
            person.id,
            serde_json::from_value(json!({
                "leave_type": "sick",
                "start_date": "2024-07-01",
                "end_date": "2024-07-01",
                "reason": "checkup"
            }))
            .unwrap(),
        )
        .await
        .unwrap();
        leave::decide(
            &db,
            trip.id,
            person.id,
            serde_json::from_value(json!({"status": "approved"})).unwrap(),
        )
        .await
        .unwrap();

        let board = dashboard(&db, today).await.unwrap();
        assert_eq!(board.total_employees, 1);
        assert_eq!(board.active_employees, 1);
        assert_eq!(board.on_leave_today, 1);
        assert_eq!(board.pending_leave_requests, 1);
        assert_eq!(board.recent_hires, 1);
        assert_eq!(board.present_today, 0);

        let allowances = BTreeMap::from([("annual".to_string(), 21), ("sick".to_string(), 10)]);
        let mine = for_employee(&db, &person, today, &allowances).await.unwrap();
        assert_eq!(mine.my_leave_balance["annual"], 18);
        assert_eq!(mine.my_leave_balance["sick"], 10);
        assert_eq!(mine.my_pending_requests, 1);
        assert_eq!(mine.my_upcoming_trainings, 0);
    }

    #[tokio::test]
    async fn extreme_allowance_saturates() {
        let db = migrated_db().await;
        let user = users::register(
            &db,
            serde_json::from_value(json!({"email": "max@example.com", "password": "secret1"}))
                .unwrap(),
            &PlainHasher,
        )
        .await
        .unwrap();
        let person = employees::create(
            &db,
            serde_json::from_value(json!({
                "employee_id": "E201",
                "user_id": user.id,
                "first_name": "Max",
                "last_name": "Ode",
                "date_of_birth": "1988-02-11",
                "phone": "+15550110",
                "address": "2 Main St",
                "emergency_contact_name": "Ada Ode",
                "emergency_contact_phone": "+15550111",
                "hire_date": "2020-01-06"
            }))
            .unwrap(),
        )
        .await
        .unwrap();
        let trip = leave::submit(
            &db,
            person.id,
            serde_json::from_value(json!({
                "leave_type": "annual",
                "start_date": "2024-03-04",
                "end_date": "2024-03-05",
                "reason": "trip"
            }))
            .unwrap(),
        )
        .await
        .unwrap();
        leave::decide(
            &db,
            trip.id,
            person.id,
            serde_json::from_value(json!({"status": "approved"})).unwrap(),
        )
        .await
        .unwrap();

        let allowances = BTreeMap::from([("annual".to_string(), i64::MIN)]);
        let mine = for_employee(&db, &person, day(2024, 6, 10), &allowances)
            .await
            .unwrap();
        assert_eq!(mine.my_leave_balance["annual"], i64::MIN);
    }

    #[tokio::test]
    async fn entitlements_default_to_empty() {
        let db = migrated_db().await;
        assert!(entitlements_from_settings(&db).await.unwrap().is_empty());
    }
}

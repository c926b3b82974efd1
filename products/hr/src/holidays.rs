use chrono::{Datelike, NaiveDate};
use entity::holiday;
use sea_orm::prelude::DateTimeWithTimeZone;
use sea_orm::{
    ActiveModelBehavior, ActiveModelTrait, ActiveValue::Set, ColumnTrait, ConnectionTrait,
    EntityTrait, QueryFilter, QueryOrder,
};
use serde::{Deserialize, Serialize};
use tracing::instrument;
use validator::Validate;

use crate::validation::not_blank;
use crate::{ApiResult, load, validated};

#[derive(Clone, Debug, Deserialize, Validate)]
pub struct HolidayCreate {
    #[validate(length(max = 200), custom(function = "not_blank"))]
    pub name: String,
    pub date: NaiveDate,
    #[serde(default)]
    #[validate(length(max = 500))]
    pub description: String,
    #[serde(default)]
    pub is_recurring: bool,
    #[serde(default)]
    pub is_working_day: bool,
}

#[derive(Clone, Debug, Default, Deserialize, Validate)]
pub struct HolidayUpdate {
    #[validate(length(max = 200), custom(function = "not_blank"))]
    pub name: Option<String>,
    pub date: Option<NaiveDate>,
    #[validate(length(max = 500))]
    pub description: Option<String>,
    pub is_recurring: Option<bool>,
    pub is_working_day: Option<bool>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct HolidayResponse {
    pub id: i32,
    pub name: String,
    pub date: NaiveDate,
    pub description: String,
    pub is_recurring: bool,
    pub is_working_day: bool,
    pub created_by: i32,
    pub created_at: DateTimeWithTimeZone,
}

impl From<holiday::Model> for HolidayResponse {
    fn from(model: holiday::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            date: model.date,
            description: model.description,
            is_recurring: model.is_recurring,
            is_working_day: model.is_working_day,
            created_by: model.created_by,
            created_at: model.created_at,
        }
    }
}

impl HolidayCreate {
    pub fn into_active_model(self, created_by: i32) -> holiday::ActiveModel {
        holiday::ActiveModel {
            name: Set(self.name),
            date: Set(self.date),
            description: Set(self.description),
            is_recurring: Set(self.is_recurring),
            is_working_day: Set(self.is_working_day),
            created_by: Set(created_by),
            ..holiday::ActiveModel::new()
        }
    }
}

impl HolidayUpdate {
    pub fn apply(self, active: &mut holiday::ActiveModel) {
        if let Some(name) = self.name {
            active.name = Set(name);
        }
        if let Some(date) = self.date {
            active.date = Set(date);
        }
        if let Some(description) = self.description {
            active.description = Set(description);
        }
        if let Some(recurring) = self.is_recurring {
            active.is_recurring = Set(recurring);
        }
        if let Some(working) = self.is_working_day {
            active.is_working_day = Set(working);
        }
    }
}

#[instrument(name = "hr.holidays.create", skip(db, payload), fields(date = %payload.date))]
pub async fn create<C>(db: &C, created_by: i32, payload: HolidayCreate) -> ApiResult<holiday::Model>
where
    C: ConnectionTrait,
{
    let payload = validated(payload)?;
    Ok(payload.into_active_model(created_by).insert(db).await?)
}

#[instrument(name = "hr.holidays.update", skip(db, payload))]
pub async fn update<C>(db: &C, id: i32, payload: HolidayUpdate) -> ApiResult<holiday::Model>
where
    C: ConnectionTrait,
{
    let payload = validated(payload)?;
    let mut active: holiday::ActiveModel = load::<holiday::Entity, _>(db, id).await?.into();
    payload.apply(&mut active);
    Ok(active.update(db).await?)
}

/// The holiday falling on `day`, matching recurring ones by month and day.
pub async fn holiday_on<C>(db: &C, day: NaiveDate) -> ApiResult<Option<holiday::Model>>
where
    C: ConnectionTrait,
{
    let calendar = holiday::Entity::find()
        .filter(
            holiday::Column::Date
                .eq(day)
                .or(holiday::Column::IsRecurring.eq(true)),
        )
        .order_by_asc(holiday::Column::Id)
        .all(db)
        .await?;
    Ok(calendar.into_iter().find(|holiday| holiday.falls_on(day)))
}

/// Holidays observed within `[from, to]`, one entry per occurrence, ordered by
/// day. Recurring rows appear once for every year their month and day fall in
/// the range; a recurring 29 February is skipped in common years.
pub async fn between<C>(
    db: &C,
    from: NaiveDate,
    to: NaiveDate,
) -> ApiResult<Vec<(NaiveDate, holiday::Model)>>
where
    C: ConnectionTrait,
{
    if to < from {
        return Ok(Vec::new());
    }
    let calendar = holiday::Entity::find()
        .filter(
            holiday::Column::Date
                .between(from, to)
                .or(holiday::Column::IsRecurring.eq(true)),
        )
        .order_by_asc(holiday::Column::Id)
        .all(db)
        .await?;

    let mut observed = Vec::new();
    for holiday in calendar {
        if !holiday.is_recurring {
            observed.push((holiday.date, holiday));
            continue;
        }
        for year in from.year()..=to.year() {
            match holiday.date.with_year(year) {
                Some(day) if day >= from && day <= to => observed.push((day, holiday.clone())),
                _ => {}
            }
        }
    }
    observed.sort_by_key(|(day, holiday)| (*day, holiday.id));
    Ok(observed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{PlainHasher, migrated_db};
    use crate::users::{self, UserCreate};

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn blank_name_is_rejected() {
        let holiday: HolidayCreate =
            serde_json::from_value(serde_json::json!({"name": "  ", "date": "2024-12-25"}))
                .unwrap();
        let errors = holiday.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("name"));
    }

    #[tokio::test]
    async fn recurring_holiday_matches_any_year() {
        let db = migrated_db().await;
        let admin = users::register(
            &db,
            UserCreate {
                email: "cal@example.com".into(),
                password: "secret1".into(),
                role: Default::default(),
            },
            &PlainHasher,
        )
        .await
        .unwrap();

        let new_year = create(
            &db,
            admin.id,
            HolidayCreate {
                name: "New Year".into(),
                date: day(2024, 1, 1),
                description: String::new(),
                is_recurring: true,
                is_working_day: false,
            },
        )
        .await
        .unwrap();
        create(
            &db,
            admin.id,
            HolidayCreate {
                name: "Founders day".into(),
                date: day(2024, 6, 3),
                description: String::new(),
                is_recurring: false,
                is_working_day: true,
            },
        )
        .await
        .unwrap();

        let found = holiday_on(&db, day(2031, 1, 1)).await.unwrap();
        assert_eq!(found.map(|h| h.id), Some(new_year.id));
        assert!(holiday_on(&db, day(2025, 6, 3)).await.unwrap().is_none());
        assert!(holiday_on(&db, day(2024, 6, 3)).await.unwrap().is_some());

        let renamed = update(
            &db,
            new_year.id,
            HolidayUpdate {
                name: Some("New Year's Day".into()),
                ..HolidayUpdate::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(renamed.name, "New Year's Day");
        assert!(renamed.is_recurring);
    }

    #[tokio::test]
    async fn between_expands_recurring_holidays_per_year() {
        let db = migrated_db().await;
        let admin = users::register(
            &db,
            UserCreate {
                email: "range@example.com".into(),
                password: "secret1".into(),
                role: Default::default(),
            },
            &PlainHasher,
        )
        .await
        .unwrap();
        let entry = |name: &str, date: NaiveDate, is_recurring: bool| HolidayCreate {
            name: name.into(),
            date,
            description: String::new(),
            is_recurring,
            is_working_day: false,
        };
        create(&db, admin.id, entry("New Year", day(2020, 1, 1), true))
            .await
            .unwrap();
        create(&db, admin.id, entry("Leap party", day(2020, 2, 29), true))
            .await
            .unwrap();
        create(&db, admin.id, entry("Office move", day(2024, 7, 15), false))
            .await
            .unwrap();
        create(&db, admin.id, entry("Old closure", day(2019, 7, 15), false))
            .await
            .unwrap();

        let observed: Vec<(NaiveDate, String)> = between(&db, day(2023, 6, 1), day(2025, 3, 1))
            .await
            .unwrap()
            .into_iter()
            .map(|(on, holiday)| (on, holiday.name))
            .collect();
        assert_eq!(
            observed,
            vec![
                (day(2024, 1, 1), "New Year".to_string()),
                (day(2024, 2, 29), "Leap party".to_string()),
                (day(2024, 7, 15), "Office move".to_string()),
                (day(2025, 1, 1), "New Year".to_string()),
            ]
        );
        assert!(between(&db, day(2025, 3, 1), day(2023, 6, 1)).await.unwrap().is_empty());
    }
}

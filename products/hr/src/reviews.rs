use chrono::NaiveDate;
use entity::{employee, performance_review};
use rust_decimal::Decimal;
use sea_orm::prelude::DateTimeWithTimeZone;
use sea_orm::{
    ActiveModelBehavior, ActiveModelTrait, ActiveValue::Set, ColumnTrait, ConnectionTrait,
    EntityTrait, ModelTrait, QueryFilter, QueryOrder,
};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::instrument;
use validator::Validate;

use crate::validation::{percentage, rating};
use crate::{ApiError, ApiResult, load, validated};

/// The reviewer is the calling employee and is passed to [`create`] separately.
#[derive(Clone, Debug, Deserialize, Validate)]
pub struct PerformanceReviewCreate {
    pub employee_id: i32,
    pub review_period_start: NaiveDate,
    pub review_period_end: NaiveDate,
    #[validate(custom(function = "rating"))]
    pub overall_rating: Decimal,
    #[validate(custom(function = "percentage"))]
    pub goals_achievement: Decimal,
    #[serde(default)]
    pub competency_scores: Map<String, Value>,
    #[validate(length(max = 2000))]
    pub strengths: String,
    #[validate(length(max = 2000))]
    pub areas_for_improvement: String,
    #[validate(length(max = 2000))]
    pub development_plan: String,
    #[validate(length(max = 2000))]
    pub reviewer_comments: String,
}

#[derive(Clone, Debug, Default, Deserialize, Validate)]
pub struct PerformanceReviewUpdate {
    #[validate(custom(function = "rating"))]
    pub overall_rating: Option<Decimal>,
    #[validate(custom(function = "percentage"))]
    pub goals_achievement: Option<Decimal>,
    pub competency_scores: Option<Map<String, Value>>,
    #[validate(length(max = 2000))]
    pub strengths: Option<String>,
    #[validate(length(max = 2000))]
    pub areas_for_improvement: Option<String>,
    #[validate(length(max = 2000))]
    pub development_plan: Option<String>,
    #[validate(length(max = 2000))]
    pub employee_comments: Option<String>,
    #[validate(length(max = 2000))]
    pub reviewer_comments: Option<String>,
    pub is_final: Option<bool>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PerformanceReviewResponse {
    pub id: i32,
    pub employee_id: i32,
    pub reviewer_id: i32,
    pub review_period_start: NaiveDate,
    pub review_period_end: NaiveDate,
    pub overall_rating: Decimal,
    pub goals_achievement: Decimal,
    pub competency_scores: Value,
    pub strengths: String,
    pub areas_for_improvement: String,
    pub development_plan: String,
    pub employee_comments: String,
    pub reviewer_comments: String,
    pub is_final: bool,
    pub created_at: DateTimeWithTimeZone,
}

impl From<performance_review::Model> for PerformanceReviewResponse {
    fn from(model: performance_review::Model) -> Self {
        Self {
            id: model.id,
            employee_id: model.employee_id,
            reviewer_id: model.reviewer_id,
            review_period_start: model.review_period_start,
            review_period_end: model.review_period_end,
            overall_rating: model.overall_rating,
            goals_achievement: model.goals_achievement,
            competency_scores: model.competency_scores,
            strengths: model.strengths,
            areas_for_improvement: model.areas_for_improvement,
            development_plan: model.development_plan,
            employee_comments: model.employee_comments,
            reviewer_comments: model.reviewer_comments,
            is_final: model.is_final,
            created_at: model.created_at,
        }
    }
}

impl PerformanceReviewCreate {
    pub fn into_active_model(self, reviewer_id: i32) -> performance_review::ActiveModel {
        performance_review::ActiveModel {
            employee_id: Set(self.employee_id),
            reviewer_id: Set(reviewer_id),
            review_period_start: Set(self.review_period_start),
            review_period_end: Set(self.review_period_end),
            overall_rating: Set(self.overall_rating),
            goals_achievement: Set(self.goals_achievement),
            competency_scores: Set(Value::Object(self.competency_scores)),
            strengths: Set(self.strengths),
            areas_for_improvement: Set(self.areas_for_improvement),
            development_plan: Set(self.development_plan),
            reviewer_comments: Set(self.reviewer_comments),
            ..performance_review::ActiveModel::new()
        }
    }
}

impl PerformanceReviewUpdate {
    pub fn apply(self, active: &mut performance_review::ActiveModel) {
        if let Some(rating) = self.overall_rating {
            active.overall_rating = Set(rating);
        }
        if let Some(goals) = self.goals_achievement {
            active.goals_achievement = Set(goals);
        }
        if let Some(scores) = self.competency_scores {
            active.competency_scores = Set(Value::Object(scores));
        }
        if let Some(strengths) = self.strengths {
            active.strengths = Set(strengths);
        }
        if let Some(areas) = self.areas_for_improvement {
            active.areas_for_improvement = Set(areas);
        }
        if let Some(plan) = self.development_plan {
            active.development_plan = Set(plan);
        }
        if let Some(comments) = self.employee_comments {
            active.employee_comments = Set(comments);
        }
        if let Some(comments) = self.reviewer_comments {
            active.reviewer_comments = Set(comments);
        }
        if let Some(is_final) = self.is_final {
            active.is_final = Set(is_final);
        }
    }
}

#[instrument(name = "hr.reviews.create", skip(db, payload))]
pub async fn create<C>(
    db: &C,
    reviewer_id: i32,
    payload: PerformanceReviewCreate,
) -> ApiResult<performance_review::Model>
where
    C: ConnectionTrait,
{
    let payload = validated(payload)?;
    if payload.employee_id == reviewer_id {
        return Err(ApiError::InvalidInput(
            "employees cannot review themselves".into(),
        ));
    }
    Ok(payload.into_active_model(reviewer_id).insert(db).await?)
}

#[instrument(name = "hr.reviews.update", skip(db, payload))]
pub async fn update<C>(
    db: &C,
    id: i32,
    payload: PerformanceReviewUpdate,
) -> ApiResult<performance_review::Model>
where
    C: ConnectionTrait,
{
    let payload = validated(payload)?;
    let mut active: performance_review::ActiveModel =
        load::<performance_review::Entity, _>(db, id).await?.into();
    payload.apply(&mut active);
    Ok(active.update(db).await?)
}

/// Reviews of one employee, latest period first.
pub async fn for_employee<C>(
    db: &C,
    employee_id: i32,
) -> ApiResult<Vec<performance_review::Model>>
where
    C: ConnectionTrait,
{
    Ok(performance_review::Entity::find()
        .filter(performance_review::Column::EmployeeId.eq(employee_id))
        .order_by_desc(performance_review::Column::ReviewPeriodEnd)
        .all(db)
        .await?)
}

pub async fn reviewer<C>(
    db: &C,
    review: &performance_review::Model,
) -> ApiResult<employee::Model>
where
    C: ConnectionTrait,
{
    review
        .find_linked(performance_review::ReviewerLink)
        .one(db)
        .await?
        .ok_or(ApiError::NotFound)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(raw: &str) -> Decimal {
        Decimal::from_str(raw).unwrap()
    }

    fn yearly() -> PerformanceReviewCreate {
        PerformanceReviewCreate {
            employee_id: 2,
            review_period_start: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            review_period_end: NaiveDate::from_ymd_opt(2024, 12, 31).unwrap(),
            overall_rating: dec("4.25"),
            goals_achievement: dec("92.5"),
            competency_scores: Map::new(),
            strengths: "Ownership".into(),
            areas_for_improvement: "Delegation".into(),
            development_plan: "Lead a project".into(),
            reviewer_comments: "Strong year".into(),
        }
    }

    #[test]
    fn rating_outside_one_to_five_is_rejected() {
        for raw in ["0.99", "5.01", "0", "10"] {
            let mut review = yearly();
            review.overall_rating = dec(raw);
            let errors = review.validate().unwrap_err();
            assert!(errors.field_errors().contains_key("overall_rating"), "{raw}");
        }
    }

    #[test]
    fn goals_outside_zero_to_hundred_are_rejected() {
        for raw in ["-1", "100.01"] {
            let mut review = yearly();
            review.goals_achievement = dec(raw);
            let errors = review.validate().unwrap_err();
            assert!(errors.field_errors().contains_key("goals_achievement"), "{raw}");
        }
    }

    #[test]
    fn bounds_themselves_are_accepted() {
        let mut review = yearly();
        review.overall_rating = dec("1");
        review.goals_achievement = dec("100");
        assert!(review.validate().is_ok());
        review.overall_rating = dec("5");
        review.goals_achievement = dec("0");
        assert!(review.validate().is_ok());
    }

    #[test]
    fn update_rating_is_bounded_when_present() {
        assert!(PerformanceReviewUpdate::default().validate().is_ok());
        let update = PerformanceReviewUpdate {
            overall_rating: Some(dec("6")),
            ..PerformanceReviewUpdate::default()
        };
        assert!(update.validate().is_err());
    }

    #[test]
    fn update_keeps_absent_fields() {
        let mut active = yearly().into_active_model(1);
        PerformanceReviewUpdate {
            employee_comments: Some("Agreed".into()),
            ..PerformanceReviewUpdate::default()
        }
        .apply(&mut active);
        assert_eq!(active.employee_comments.as_ref(), "Agreed");
        assert_eq!(active.strengths.as_ref(), "Ownership");
        assert_eq!(active.is_final.as_ref(), &false);
    }
}

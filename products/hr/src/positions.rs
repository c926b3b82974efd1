use entity::position;
use rust_decimal::Decimal;
use sea_orm::prelude::DateTimeWithTimeZone;
use sea_orm::{
    ActiveModelBehavior, ActiveModelTrait, ActiveValue::Set, ColumnTrait, ConnectionTrait,
    EntityTrait, QueryFilter, QueryOrder,
};
use serde::{Deserialize, Serialize};
use tracing::instrument;
use validator::{Validate, ValidationError};

use crate::validation::{money, not_blank};
use crate::{ApiError, ApiResult, load, nullable, validated};

fn ordered_band(min: Option<Decimal>, max: Option<Decimal>) -> Result<(), ValidationError> {
    match (min, max) {
        (Some(min), Some(max)) if min > max => {
            let mut err = ValidationError::new("salary_band");
            err.message = Some("min_salary must not exceed max_salary".into());
            Err(err)
        }
        _ => Ok(()),
    }
}

fn create_band(payload: &PositionCreate) -> Result<(), ValidationError> {
    ordered_band(payload.min_salary, payload.max_salary)
}

fn update_band(payload: &PositionUpdate) -> Result<(), ValidationError> {
    ordered_band(payload.min_salary.flatten(), payload.max_salary.flatten())
}

#[derive(Clone, Debug, Deserialize, Validate)]
#[validate(schema(function = "create_band"))]
pub struct PositionCreate {
    #[validate(length(max = 100), custom(function = "not_blank"))]
    pub title: String,
    #[validate(length(max = 20), custom(function = "not_blank"))]
    pub code: String,
    #[serde(default)]
    #[validate(length(max = 1000))]
    pub description: String,
    pub department_id: i32,
    /// Entry, Mid, Senior, Executive.
    #[validate(length(max = 50))]
    pub level: String,
    #[serde(default)]
    #[validate(custom(function = "money"))]
    pub min_salary: Option<Decimal>,
    #[serde(default)]
    #[validate(custom(function = "money"))]
    pub max_salary: Option<Decimal>,
    #[serde(default)]
    #[validate(length(max = 2000))]
    pub requirements: String,
}

/// Partial update. The band check only sees the values supplied here; a
/// half-supplied band is checked against the stored bound in [`update`].
#[derive(Clone, Debug, Default, Deserialize, Validate)]
#[validate(schema(function = "update_band"))]
pub struct PositionUpdate {
    #[validate(length(max = 100), custom(function = "not_blank"))]
    pub title: Option<String>,
    #[validate(length(max = 1000))]
    pub description: Option<String>,
    pub department_id: Option<i32>,
    #[validate(length(max = 50))]
    pub level: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    #[validate(custom(function = "money"))]
    pub min_salary: Option<Option<Decimal>>,
    #[serde(default, deserialize_with = "nullable")]
    #[validate(custom(function = "money"))]
    pub max_salary: Option<Option<Decimal>>,
    #[validate(length(max = 2000))]
    pub requirements: Option<String>,
    pub is_active: Option<bool>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PositionResponse {
    pub id: i32,
    pub title: String,
    pub code: String,
    pub description: String,
    pub department_id: i32,
    pub level: String,
    pub min_salary: Option<Decimal>,
    pub max_salary: Option<Decimal>,
    pub requirements: String,
    pub is_active: bool,
    pub created_at: DateTimeWithTimeZone,
}

impl From<position::Model> for PositionResponse {
    fn from(model: position::Model) -> Self {
        Self {
            id: model.id,
            title: model.title,
            code: model.code,
            description: model.description,
            department_id: model.department_id,
            level: model.level,
            min_salary: model.min_salary,
            max_salary: model.max_salary,
            requirements: model.requirements,
            is_active: model.is_active,
            created_at: model.created_at,
        }
    }
}

impl PositionCreate {
    pub fn into_active_model(self) -> position::ActiveModel {
        position::ActiveModel {
            title: Set(self.title),
            code: Set(self.code),
            description: Set(self.description),
            department_id: Set(self.department_id),
            level: Set(self.level),
            min_salary: Set(self.min_salary),
            max_salary: Set(self.max_salary),
            requirements: Set(self.requirements),
            ..position::ActiveModel::new()
        }
    }
}

impl PositionUpdate {
    pub fn apply(self, active: &mut position::ActiveModel) {
        if let Some(title) = self.title {
            active.title = Set(title);
        }
        if let Some(description) = self.description {
            active.description = Set(description);
        }
        if let Some(department_id) = self.department_id {
            active.department_id = Set(department_id);
        }
        if let Some(level) = self.level {
            active.level = Set(level);
        }
        if let Some(min_salary) = self.min_salary {
            active.min_salary = Set(min_salary);
        }
        if let Some(max_salary) = self.max_salary {
            active.max_salary = Set(max_salary);
        }
        if let Some(requirements) = self.requirements {
            active.requirements = Set(requirements);
        }
        if let Some(is_active) = self.is_active {
            active.is_active = Set(is_active);
        }
    }
}

#[instrument(name = "hr.positions.create", skip_all, fields(code = %payload.code))]
pub async fn create<C>(db: &C, payload: PositionCreate) -> ApiResult<position::Model>
where
    C: ConnectionTrait,
{
    let payload = validated(payload)?;
    Ok(payload.into_active_model().insert(db).await?)
}

#[instrument(name = "hr.positions.update", skip(db, payload))]
pub async fn update<C>(db: &C, id: i32, payload: PositionUpdate) -> ApiResult<position::Model>
where
    C: ConnectionTrait,
{
    let payload = validated(payload)?;
    let current = load::<position::Entity, _>(db, id).await?;
    let min = payload.min_salary.unwrap_or(current.min_salary);
    let max = payload.max_salary.unwrap_or(current.max_salary);
    ordered_band(min, max).map_err(|err| {
        ApiError::InvalidInput(err.message.map(|m| m.into_owned()).unwrap_or_default())
    })?;
    let mut active: position::ActiveModel = current.into();
    payload.apply(&mut active);
    Ok(active.update(db).await?)
}

pub async fn list_for_department<C>(db: &C, department_id: i32) -> ApiResult<Vec<position::Model>>
where
    C: ConnectionTrait,
{
    Ok(position::Entity::find()
        .filter(position::Column::DepartmentId.eq(department_id))
        .order_by_asc(position::Column::Code)
        .all(db)
        .await?)
}

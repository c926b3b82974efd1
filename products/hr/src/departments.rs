use entity::{department, employee, position};
use rust_decimal::Decimal;
use sea_orm::prelude::DateTimeWithTimeZone;
use sea_orm::{
    ActiveModelBehavior, ActiveModelTrait, ActiveValue::Set, ColumnTrait, ConnectionTrait,
    EntityTrait, ModelTrait, QueryFilter, QueryOrder,
};
use serde::{Deserialize, Serialize};
use tracing::instrument;
use validator::Validate;

use crate::validation::{money, not_blank};
use crate::{ApiError, ApiResult, load, nullable, validated};

#[derive(Clone, Debug, Deserialize, Validate)]
pub struct DepartmentCreate {
    #[validate(length(max = 100), custom(function = "not_blank"))]
    pub name: String,
    #[validate(length(max = 20), custom(function = "not_blank"))]
    pub code: String,
    #[serde(default)]
    #[validate(length(max = 500))]
    pub description: String,
    #[serde(default)]
    pub manager_id: Option<i32>,
    #[serde(default)]
    #[validate(custom(function = "money"))]
    pub budget: Option<Decimal>,
}

#[derive(Clone, Debug, Default, Deserialize, Validate)]
pub struct DepartmentUpdate {
    #[validate(length(max = 100), custom(function = "not_blank"))]
    pub name: Option<String>,
    #[validate(length(max = 500))]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub manager_id: Option<Option<i32>>,
    #[serde(default, deserialize_with = "nullable")]
    #[validate(custom(function = "money"))]
    pub budget: Option<Option<Decimal>>,
    pub is_active: Option<bool>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct DepartmentResponse {
    pub id: i32,
    pub name: String,
    pub code: String,
    pub description: String,
    pub manager_id: Option<i32>,
    pub budget: Option<Decimal>,
    pub is_active: bool,
    pub created_at: DateTimeWithTimeZone,
}

impl From<department::Model> for DepartmentResponse {
    fn from(model: department::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            code: model.code,
            description: model.description,
            manager_id: model.manager_id,
            budget: model.budget,
            is_active: model.is_active,
            created_at: model.created_at,
        }
    }
}

impl DepartmentCreate {
    pub fn into_active_model(self) -> department::ActiveModel {
        department::ActiveModel {
            name: Set(self.name),
            code: Set(self.code),
            description: Set(self.description),
            manager_id: Set(self.manager_id),
            budget: Set(self.budget),
            ..department::ActiveModel::new()
        }
    }
}

impl DepartmentUpdate {
    pub fn apply(self, active: &mut department::ActiveModel) {
        if let Some(name) = self.name {
            active.name = Set(name);
        }
        if let Some(description) = self.description {
            active.description = Set(description);
        }
        if let Some(manager_id) = self.manager_id {
            active.manager_id = Set(manager_id);
        }
        if let Some(budget) = self.budget {
            active.budget = Set(budget);
        }
        if let Some(is_active) = self.is_active {
            active.is_active = Set(is_active);
        }
    }
}

#[instrument(name = "hr.departments.create", skip_all, fields(code = %payload.code))]
pub async fn create<C>(db: &C, payload: DepartmentCreate) -> ApiResult<department::Model>
where
    C: ConnectionTrait,
{
    let payload = validated(payload)?;
    Ok(payload.into_active_model().insert(db).await?)
}

#[instrument(name = "hr.departments.update", skip(db, payload))]
pub async fn update<C>(db: &C, id: i32, payload: DepartmentUpdate) -> ApiResult<department::Model>
where
    C: ConnectionTrait,
{
    let payload = validated(payload)?;
    let mut active: department::ActiveModel = load::<department::Entity, _>(db, id).await?.into();
    payload.apply(&mut active);
    Ok(active.update(db).await?)
}

pub async fn find_by_code<C>(db: &C, code: &str) -> ApiResult<department::Model>
where
    C: ConnectionTrait,
{
    department::Entity::find()
        .filter(department::Column::Code.eq(code))
        .one(db)
        .await?
        .ok_or(ApiError::NotFound)
}

/// Active departments ordered by code.
pub async fn list_active<C>(db: &C) -> ApiResult<Vec<department::Model>>
where
    C: ConnectionTrait,
{
    Ok(department::Entity::find()
        .filter(department::Column::IsActive.eq(true))
        .order_by_asc(department::Column::Code)
        .all(db)
        .await?)
}

pub async fn members<C>(db: &C, department: &department::Model) -> ApiResult<Vec<employee::Model>>
where
    C: ConnectionTrait,
{
    Ok(department.find_related(employee::Entity).all(db).await?)
}

pub async fn positions<C>(db: &C, department: &department::Model) -> ApiResult<Vec<position::Model>>
where
    C: ConnectionTrait,
{
    Ok(department.find_related(position::Entity).all(db).await?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::migrated_db;
    use std::str::FromStr;

    fn engineering() -> DepartmentCreate {
        DepartmentCreate {
            name: "Engineering".into(),
            code: "ENG".into(),
            description: String::new(),
            manager_id: None,
            budget: Some(Decimal::from_str("250000.00").unwrap()),
        }
    }

    #[test]
    fn budget_with_three_places_is_rejected() {
        let mut create = engineering();
        create.budget = Some(Decimal::from_str("1.005").unwrap());
        let errors = create.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("budget"));
    }

    #[test]
    fn blank_code_is_rejected() {
        let mut create = engineering();
        create.code = "  ".into();
        assert!(create.validate().is_err());
    }

    #[test]
    fn description_defaults_to_empty() {
        let parsed: DepartmentCreate =
            serde_json::from_str(r#"{"name":"Sales","code":"SAL"}"#).unwrap();
        assert_eq!(parsed.description, "");
        assert!(parsed.budget.is_none());
    }

    #[tokio::test]
    async fn codes_are_unique() {
        let db = migrated_db().await;
        let created = create(&db, engineering()).await.unwrap();
        assert!(created.is_active);
        let err = create(&db, engineering()).await.unwrap_err();
        assert!(matches!(err, ApiError::Conflict(_)), "got {err:?}");
    }

    #[tokio::test]
    async fn clearing_the_budget_with_null() {
        let db = migrated_db().await;
        let created = create(&db, engineering()).await.unwrap();
        let patch: DepartmentUpdate =
            serde_json::from_value(serde_json::json!({ "budget": null, "is_active": false }))
                .unwrap();
        let updated = update(&db, created.id, patch).await.unwrap();
        assert_eq!(updated.budget, None);
        assert!(!updated.is_active);
        assert_eq!(updated.name, "Engineering");
        assert!(list_active(&db).await.unwrap().is_empty());
    }
}

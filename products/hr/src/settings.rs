//! Key/value settings stored as text and read back through their declared type.

use std::fmt;
use std::str::FromStr;

use entity::setting;
use sea_orm::prelude::DateTimeWithTimeZone;
use sea_orm::{
    ActiveModelBehavior, ActiveModelTrait, ActiveValue::Set, ColumnTrait, ConnectionTrait,
    EntityTrait, ModelTrait, QueryFilter,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{info, instrument};
use validator::{Validate, ValidationError};

use crate::validation::not_blank;
use crate::{ApiError, ApiResult, validated};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SettingType {
    #[default]
    String,
    Integer,
    Boolean,
    Json,
}

impl SettingType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Integer => "integer",
            Self::Boolean => "boolean",
            Self::Json => "json",
        }
    }
}

impl fmt::Display for SettingType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SettingType {
    type Err = ApiError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw {
            "string" => Ok(Self::String),
            "integer" => Ok(Self::Integer),
            "boolean" => Ok(Self::Boolean),
            "json" => Ok(Self::Json),
            other => Err(ApiError::InvalidInput(format!(
                "unknown setting type `{other}`"
            ))),
        }
    }
}

/// A stored value interpreted according to its [`SettingType`].
#[derive(Clone, Debug, PartialEq)]
pub enum SettingValue {
    String(String),
    Integer(i64),
    Boolean(bool),
    Json(Value),
}

impl SettingValue {
    pub fn parse(kind: SettingType, raw: &str) -> Result<Self, String> {
        match kind {
            SettingType::String => Ok(Self::String(raw.to_string())),
            SettingType::Integer => raw
                .trim()
                .parse::<i64>()
                .map(Self::Integer)
                .map_err(|_| format!("`{raw}` is not an integer")),
            SettingType::Boolean => match raw.trim().to_ascii_lowercase().as_str() {
                "true" => Ok(Self::Boolean(true)),
                "false" => Ok(Self::Boolean(false)),
                _ => Err(format!("`{raw}` is not true or false")),
            },
            SettingType::Json => serde_json::from_str(raw)
                .map(Self::Json)
                .map_err(|err| format!("invalid JSON: {err}")),
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Integer(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Boolean(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_json(&self) -> Option<&Value> {
        match self {
            Self::Json(value) => Some(value),
            _ => None,
        }
    }
}

impl TryFrom<&setting::Model> for SettingValue {
    type Error = ApiError;

    fn try_from(model: &setting::Model) -> Result<Self, Self::Error> {
        let kind: SettingType = model.data_type.parse()?;
        Self::parse(kind, &model.value).map_err(ApiError::InvalidInput)
    }
}

fn value_matches_type(payload: &SettingCreate) -> Result<(), ValidationError> {
    SettingValue::parse(payload.data_type, &payload.value)
        .map(|_| ())
        .map_err(|message| {
            let mut err = ValidationError::new("value");
            err.message = Some(message.into());
            err
        })
}

#[derive(Clone, Debug, Deserialize, Validate)]
#[validate(schema(function = "value_matches_type"))]
pub struct SettingCreate {
    #[validate(length(max = 100), custom(function = "not_blank"))]
    pub key: String,
    #[validate(length(max = 2000))]
    pub value: String,
    #[serde(default)]
    #[validate(length(max = 500))]
    pub description: String,
    #[serde(default)]
    pub data_type: SettingType,
    #[serde(default)]
    pub is_system: bool,
}

/// Type changes are not allowed; `value` is checked against the stored type.
#[derive(Clone, Debug, Default, Deserialize, Validate)]
pub struct SettingUpdate {
    #[validate(length(max = 2000))]
    pub value: Option<String>,
    #[validate(length(max = 500))]
    pub description: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SettingResponse {
    pub id: i32,
    pub key: String,
    pub value: String,
    pub description: String,
    pub data_type: String,
    pub is_system: bool,
    pub updated_by: i32,
    pub updated_at: DateTimeWithTimeZone,
}

impl From<setting::Model> for SettingResponse {
    fn from(model: setting::Model) -> Self {
        Self {
            id: model.id,
            key: model.key,
            value: model.value,
            description: model.description,
            data_type: model.data_type,
            is_system: model.is_system,
            updated_by: model.updated_by,
            updated_at: model.updated_at,
        }
    }
}

impl SettingCreate {
    pub fn into_active_model(self, updated_by: i32) -> setting::ActiveModel {
        setting::ActiveModel {
            key: Set(self.key),
            value: Set(self.value),
            description: Set(self.description),
            data_type: Set(self.data_type.as_str().to_string()),
            is_system: Set(self.is_system),
            updated_by: Set(updated_by),
            ..setting::ActiveModel::new()
        }
    }
}

pub async fn get<C>(db: &C, key: &str) -> ApiResult<setting::Model>
where
    C: ConnectionTrait,
{
    setting::Entity::find()
        .filter(setting::Column::Key.eq(key))
        .one(db)
        .await?
        .ok_or(ApiError::NotFound)
}

pub async fn get_value<C>(db: &C, key: &str) -> ApiResult<SettingValue>
where
    C: ConnectionTrait,
{
    SettingValue::try_from(&get(db, key).await?)
}

#[instrument(name = "hr.settings.create", skip(db, payload), fields(key = %payload.key))]
pub async fn create<C>(db: &C, updated_by: i32, payload: SettingCreate) -> ApiResult<setting::Model>
where
    C: ConnectionTrait,
{
    let payload = validated(payload)?;
    Ok(payload.into_active_model(updated_by).insert(db).await?)
}

#[instrument(name = "hr.settings.update", skip(db, payload))]
pub async fn update<C>(
    db: &C,
    key: &str,
    updated_by: i32,
    payload: SettingUpdate,
) -> ApiResult<setting::Model>
where
    C: ConnectionTrait,
{
    let payload = validated(payload)?;
    let stored = get(db, key).await?;
    if let Some(value) = &payload.value {
        let kind: SettingType = stored.data_type.parse()?;
        SettingValue::parse(kind, value).map_err(ApiError::InvalidInput)?;
    }
    let mut active: setting::ActiveModel = stored.into();
    if let Some(value) = payload.value {
        active.value = Set(value);
    }
    if let Some(description) = payload.description {
        active.description = Set(description);
    }
    active.updated_by = Set(updated_by);
    Ok(active.update(db).await?)
}

/// Removes a setting. System settings are refused.
#[instrument(name = "hr.settings.delete", skip(db))]
pub async fn delete<C>(db: &C, key: &str) -> ApiResult<()>
where
    C: ConnectionTrait,
{
    let stored = get(db, key).await?;
    if stored.is_system {
        return Err(ApiError::InvalidInput(format!(
            "setting `{key}` is a system setting"
        )));
    }
    stored.delete(db).await?;
    info!("setting removed");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{PlainHasher, migrated_db};
    use crate::users::{self, UserCreate};
    use serde_json::json;

    fn setting(key: &str, value: &str, data_type: &str) -> SettingCreate {
        serde_json::from_value(json!({"key": key, "value": value, "data_type": data_type}))
            .unwrap()
    }

    #[test]
    fn values_parse_per_type() {
        assert_eq!(
            SettingValue::parse(SettingType::Integer, " 21 "),
            Ok(SettingValue::Integer(21))
        );
        assert_eq!(
            SettingValue::parse(SettingType::Boolean, "TRUE"),
            Ok(SettingValue::Boolean(true))
        );
        assert_eq!(
            SettingValue::parse(SettingType::Json, r#"{"annual":21}"#),
            Ok(SettingValue::Json(json!({"annual": 21})))
        );
        assert!(SettingValue::parse(SettingType::Integer, "twenty").is_err());
        assert!(SettingValue::parse(SettingType::Boolean, "yes").is_err());
        assert!(SettingValue::parse(SettingType::Json, "{").is_err());
    }

    #[test]
    fn create_checks_value_against_type() {
        assert!(setting("leave.annual_days", "21", "integer").validate().is_ok());
        let errors = setting("leave.annual_days", "many", "integer")
            .validate()
            .unwrap_err();
        assert!(errors.errors().contains_key("__all__"));
    }

    #[test]
    fn data_type_defaults_to_string() {
        let create: SettingCreate =
            serde_json::from_value(json!({"key": "company.name", "value": "Acme"})).unwrap();
        assert_eq!(create.data_type, SettingType::String);
        assert!(serde_json::from_value::<SettingCreate>(
            json!({"key": "k", "value": "v", "data_type": "float"})
        )
        .is_err());
    }

    #[tokio::test]
    async fn update_and_delete_follow_stored_rules() {
        let db = migrated_db().await;
        let admin = users::register(
            &db,
            UserCreate {
                email: "ops@example.com".into(),
                password: "secret1".into(),
                role: Default::default(),
            },
            &PlainHasher,
        )
        .await
        .unwrap();

        create(&db, admin.id, setting("attendance.track", "true", "boolean"))
            .await
            .unwrap();
        let mut system = setting("company.currency", "EUR", "string");
        system.is_system = true;
        create(&db, admin.id, system).await.unwrap();

        let err = update(
            &db,
            "attendance.track",
            admin.id,
            SettingUpdate {
                value: Some("maybe".into()),
                ..SettingUpdate::default()
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ApiError::InvalidInput(_)), "got {err:?}");

        update(
            &db,
            "attendance.track",
            admin.id,
            SettingUpdate {
                value: Some("false".into()),
                ..SettingUpdate::default()
            },
        )
        .await
        .unwrap();
        let value = get_value(&db, "attendance.track").await.unwrap();
        assert_eq!(value.as_bool(), Some(false));

        let refused = delete(&db, "company.currency").await.unwrap_err();
        assert!(matches!(refused, ApiError::InvalidInput(_)));
        delete(&db, "attendance.track").await.unwrap();
        assert!(matches!(
            get(&db, "attendance.track").await,
            Err(ApiError::NotFound)
        ));
    }
}

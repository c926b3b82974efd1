//! Append-only audit trail.

use std::fmt;

use entity::audit_log;
use sea_orm::{
    ActiveModelBehavior, ActiveModelTrait, ActiveValue::Set, ColumnTrait, ConnectionTrait,
    EntityTrait, QueryFilter, QueryOrder,
};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, instrument};
use validator::Validate;

use crate::validation::{ip_address, not_blank};
use crate::{ApiError, ApiResult, validated};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AuditAction {
    Create,
    Update,
    Delete,
    Login,
    Logout,
}

impl AuditAction {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Create => "CREATE",
            Self::Update => "UPDATE",
            Self::Delete => "DELETE",
            Self::Login => "LOGIN",
            Self::Logout => "LOGOUT",
        }
    }
}

impl fmt::Display for AuditAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Debug, Deserialize, Validate)]
pub struct AuditEntry {
    pub user_id: i32,
    pub action: AuditAction,
    #[validate(length(max = 100), custom(function = "not_blank"))]
    pub table_name: String,
    #[serde(default)]
    pub record_id: Option<i32>,
    #[serde(default)]
    pub old_values: Map<String, Value>,
    #[serde(default)]
    pub new_values: Map<String, Value>,
    #[validate(length(max = 45), custom(function = "ip_address"))]
    pub ip_address: String,
    #[serde(default)]
    #[validate(length(max = 500))]
    pub user_agent: String,
}

impl AuditEntry {
    /// Restricts two snapshots to the keys whose values differ. A key present
    /// on one side only lands in that side's map.
    pub fn changes(
        old: &Map<String, Value>,
        new: &Map<String, Value>,
    ) -> (Map<String, Value>, Map<String, Value>) {
        let mut before = Map::new();
        let mut after = Map::new();
        for (key, value) in old {
            if new.get(key) != Some(value) {
                before.insert(key.clone(), value.clone());
            }
        }
        for (key, value) in new {
            if old.get(key) != Some(value) {
                after.insert(key.clone(), value.clone());
            }
        }
        (before, after)
    }

    pub fn into_active_model(self) -> audit_log::ActiveModel {
        audit_log::ActiveModel {
            user_id: Set(self.user_id),
            action: Set(self.action.as_str().to_string()),
            table_name: Set(self.table_name),
            record_id: Set(self.record_id),
            old_values: Set(Value::Object(self.old_values)),
            new_values: Set(Value::Object(self.new_values)),
            ip_address: Set(self.ip_address),
            user_agent: Set(self.user_agent),
            ..audit_log::ActiveModel::new()
        }
    }
}

/// Serializes a record into the object form stored in `old_values` / `new_values`.
pub fn snapshot<T: Serialize>(record: &T) -> ApiResult<Map<String, Value>> {
    match serde_json::to_value(record) {
        Ok(Value::Object(fields)) => Ok(fields),
        Ok(_) => Err(ApiError::InvalidInput(
            "audit snapshots must serialize to an object".into(),
        )),
        Err(err) => Err(ApiError::InvalidInput(err.to_string())),
    }
}

#[instrument(
    name = "hr.audit.record",
    skip(db, entry),
    fields(action = %entry.action, table = %entry.table_name)
)]
pub async fn record<C>(db: &C, entry: AuditEntry) -> ApiResult<audit_log::Model>
where
    C: ConnectionTrait,
{
    let entry = validated(entry)?;
    let saved = entry.into_active_model().insert(db).await?;
    debug!(audit_id = saved.id, "audit entry stored");
    Ok(saved)
}

/// Entries for one row, newest first.
pub async fn history<C>(
    db: &C,
    table_name: &str,
    record_id: i32,
) -> ApiResult<Vec<audit_log::Model>>
where
    C: ConnectionTrait,
{
    Ok(audit_log::Entity::find()
        .filter(audit_log::Column::TableName.eq(table_name))
        .filter(audit_log::Column::RecordId.eq(record_id))
        .order_by_desc(audit_log::Column::Timestamp)
        .order_by_desc(audit_log::Column::Id)
        .all(db)
        .await?)
}

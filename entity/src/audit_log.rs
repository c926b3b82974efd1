use crate::constraints;
use sea_orm::entity::prelude::*;
use sea_orm::{ActiveValue::Set, ConnectionTrait};
use serde_json::json;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "hrd_audit_logs")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(indexed)]
    pub user_id: i32,
    /// CREATE, UPDATE, DELETE, LOGIN, LOGOUT.
    pub action: String,
    pub table_name: String,
    pub record_id: Option<i32>,
    pub old_values: Json,
    pub new_values: Json,
    pub ip_address: String,
    pub user_agent: String,
    #[sea_orm(indexed)]
    pub timestamp: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id",
        on_delete = "Restrict"
    )]
    User,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

#[async_trait::async_trait]
impl ActiveModelBehavior for ActiveModel {
    fn new() -> Self {
        Self {
            record_id: Set(None),
            old_values: Set(json!({})),
            new_values: Set(json!({})),
            user_agent: Set(String::new()),
            ..<Self as ActiveModelTrait>::default()
        }
    }

    async fn before_save<C>(mut self, _db: &C, insert: bool) -> Result<Self, DbErr>
    where
        C: ConnectionTrait,
    {
        constraints::max_len("hrd_audit_logs.action", &self.action, 100)?;
        constraints::max_len("hrd_audit_logs.table_name", &self.table_name, 100)?;
        // IPv6 text form tops out at 45 characters.
        constraints::max_len("hrd_audit_logs.ip_address", &self.ip_address, 45)?;
        constraints::max_len("hrd_audit_logs.user_agent", &self.user_agent, 500)?;

        if insert && self.timestamp.is_not_set() {
            self.timestamp = Set(crate::now());
        }
        Ok(self)
    }
}

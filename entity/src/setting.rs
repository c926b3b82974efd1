use crate::constraints;
use sea_orm::entity::prelude::*;
use sea_orm::{ActiveValue::Set, ConnectionTrait};

/// Key/value configuration row. `value` is stored as text and interpreted per `data_type`.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "hrd_settings")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub key: String,
    pub value: String,
    pub description: String,
    /// string, integer, boolean, json.
    pub data_type: String,
    /// System settings cannot be deleted.
    pub is_system: bool,
    pub updated_by: i32,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UpdatedBy",
        to = "super::user::Column::Id",
        on_delete = "Restrict"
    )]
    UpdatedByUser,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::UpdatedByUser.def()
    }
}

#[async_trait::async_trait]
impl ActiveModelBehavior for ActiveModel {
    fn new() -> Self {
        Self {
            description: Set(String::new()),
            data_type: Set("string".to_string()),
            is_system: Set(false),
            ..<Self as ActiveModelTrait>::default()
        }
    }

    async fn before_save<C>(mut self, _db: &C, _insert: bool) -> Result<Self, DbErr>
    where
        C: ConnectionTrait,
    {
        constraints::max_len("hrd_settings.key", &self.key, 100)?;
        constraints::max_len("hrd_settings.value", &self.value, 2000)?;
        constraints::max_len("hrd_settings.description", &self.description, 500)?;
        constraints::max_len("hrd_settings.data_type", &self.data_type, 20)?;

        self.updated_at = Set(crate::now());
        Ok(self)
    }
}

use crate::constraints;
use sea_orm::entity::prelude::*;
use sea_orm::{ActiveValue::Set, ConnectionTrait};
use serde::{Deserialize, Serialize};

/// File metadata only; the bytes live in an external store addressed by `file_path`.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "hrd_documents")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(indexed)]
    pub employee_id: i32,
    pub document_type: DocumentType,
    pub title: String,
    pub file_name: String,
    pub file_path: String,
    /// Bytes.
    pub file_size: i64,
    pub mime_type: String,
    pub description: String,
    pub uploaded_by: i32,
    pub is_confidential: bool,
    pub expiry_date: Option<Date>,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::employee::Entity",
        from = "Column::EmployeeId",
        to = "super::employee::Column::Id",
        on_delete = "Cascade"
    )]
    Employee,
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UploadedBy",
        to = "super::user::Column::Id",
        on_delete = "Restrict"
    )]
    Uploader,
}

impl Related<super::employee::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Employee.def()
    }
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Uploader.def()
    }
}

impl Model {
    pub fn is_expired(&self, today: Date) -> bool {
        self.expiry_date.is_some_and(|expiry| expiry < today)
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveActiveEnum, Eq, PartialEq, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(Some(32))")]
#[serde(rename_all = "snake_case")]
pub enum DocumentType {
    #[sea_orm(string_value = "contract")]
    Contract,
    #[sea_orm(string_value = "id_card")]
    IdCard,
    #[sea_orm(string_value = "cv")]
    Cv,
    #[sea_orm(string_value = "certificate")]
    Certificate,
    #[sea_orm(string_value = "performance_review")]
    PerformanceReview,
    #[sea_orm(string_value = "other")]
    Other,
}

#[async_trait::async_trait]
impl ActiveModelBehavior for ActiveModel {
    fn new() -> Self {
        Self {
            description: Set(String::new()),
            is_confidential: Set(false),
            expiry_date: Set(None),
            ..<Self as ActiveModelTrait>::default()
        }
    }

    async fn before_save<C>(mut self, _db: &C, insert: bool) -> Result<Self, DbErr>
    where
        C: ConnectionTrait,
    {
        constraints::max_len("hrd_documents.title", &self.title, 255)?;
        constraints::max_len("hrd_documents.file_name", &self.file_name, 255)?;
        constraints::max_len("hrd_documents.file_path", &self.file_path, 500)?;
        constraints::non_negative("hrd_documents.file_size", &self.file_size)?;
        constraints::max_len("hrd_documents.mime_type", &self.mime_type, 100)?;
        constraints::max_len("hrd_documents.description", &self.description, 500)?;

        if insert && self.created_at.is_not_set() {
            self.created_at = Set(crate::now());
        }
        Ok(self)
    }
}

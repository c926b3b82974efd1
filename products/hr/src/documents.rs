use chrono::NaiveDate;
use entity::{DocumentType, document};
use sea_orm::prelude::DateTimeWithTimeZone;
use sea_orm::{
    ActiveModelBehavior, ActiveModelTrait, ActiveValue::Set, ColumnTrait, ConnectionTrait,
    EntityTrait, QueryFilter, QueryOrder,
};
use serde::{Deserialize, Serialize};
use tracing::instrument;
use validator::Validate;

use crate::validation::not_blank;
use crate::{ApiResult, validated};

/// Metadata for a file already handed to storage. The uploader comes from
/// the session, not the body.
#[derive(Clone, Debug, Deserialize, Validate)]
pub struct DocumentCreate {
    pub employee_id: i32,
    pub document_type: DocumentType,
    #[validate(length(max = 255), custom(function = "not_blank"))]
    pub title: String,
    #[validate(length(max = 255), custom(function = "not_blank"))]
    pub file_name: String,
    #[validate(length(max = 500), custom(function = "not_blank"))]
    pub file_path: String,
    #[validate(range(min = 0))]
    pub file_size: i64,
    #[validate(length(max = 100))]
    pub mime_type: String,
    #[serde(default)]
    #[validate(length(max = 500))]
    pub description: String,
    #[serde(default)]
    pub is_confidential: bool,
    #[serde(default)]
    pub expiry_date: Option<NaiveDate>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct DocumentResponse {
    pub id: i32,
    pub employee_id: i32,
    pub document_type: DocumentType,
    pub title: String,
    pub file_name: String,
    pub file_path: String,
    pub file_size: i64,
    pub mime_type: String,
    pub description: String,
    pub uploaded_by: i32,
    pub is_confidential: bool,
    pub expiry_date: Option<NaiveDate>,
    pub created_at: DateTimeWithTimeZone,
}

impl From<document::Model> for DocumentResponse {
    fn from(model: document::Model) -> Self {
        Self {
            id: model.id,
            employee_id: model.employee_id,
            document_type: model.document_type,
            title: model.title,
            file_name: model.file_name,
            file_path: model.file_path,
            file_size: model.file_size,
            mime_type: model.mime_type,
            description: model.description,
            uploaded_by: model.uploaded_by,
            is_confidential: model.is_confidential,
            expiry_date: model.expiry_date,
            created_at: model.created_at,
        }
    }
}

impl DocumentCreate {
    pub fn into_active_model(self, uploaded_by: i32) -> document::ActiveModel {
        document::ActiveModel {
            employee_id: Set(self.employee_id),
            document_type: Set(self.document_type),
            title: Set(self.title),
            file_name: Set(self.file_name),
            file_path: Set(self.file_path),
            file_size: Set(self.file_size),
            mime_type: Set(self.mime_type),
            description: Set(self.description),
            uploaded_by: Set(uploaded_by),
            is_confidential: Set(self.is_confidential),
            expiry_date: Set(self.expiry_date),
            ..document::ActiveModel::new()
        }
    }
}

#[instrument(name = "hr.documents.record", skip(db, payload), fields(kind = ?payload.document_type))]
pub async fn record<C>(
    db: &C,
    uploaded_by: i32,
    payload: DocumentCreate,
) -> ApiResult<document::Model>
where
    C: ConnectionTrait,
{
    let payload = validated(payload)?;
    Ok(payload.into_active_model(uploaded_by).insert(db).await?)
}

/// Documents of one employee; confidential ones only when `include_confidential`.
pub async fn for_employee<C>(
    db: &C,
    employee_id: i32,
    include_confidential: bool,
) -> ApiResult<Vec<document::Model>>
where
    C: ConnectionTrait,
{
    let mut query = document::Entity::find().filter(document::Column::EmployeeId.eq(employee_id));
    if !include_confidential {
        query = query.filter(document::Column::IsConfidential.eq(false));
    }
    Ok(query
        .order_by_desc(document::Column::CreatedAt)
        .all(db)
        .await?)
}

/// Documents whose expiry date is before `today`.
pub async fn expired<C>(db: &C, today: NaiveDate) -> ApiResult<Vec<document::Model>>
where
    C: ConnectionTrait,
{
    let candidates = document::Entity::find()
        .filter(document::Column::ExpiryDate.lt(today))
        .order_by_asc(document::Column::ExpiryDate)
        .all(db)
        .await?;
    Ok(candidates
        .into_iter()
        .filter(|doc| doc.is_expired(today))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn passport() -> serde_json::Value {
        serde_json::json!({
            "employee_id": 1,
            "document_type": "id_card",
            "title": "Passport",
            "file_name": "passport.pdf",
            "file_path": "/docs/1/passport.pdf",
            "file_size": 20480,
            "mime_type": "application/pdf"
        })
    }

    #[test]
    fn binds_with_defaults() {
        let create: DocumentCreate = serde_json::from_value(passport()).unwrap();
        assert!(create.validate().is_ok());
        assert_eq!(create.document_type, DocumentType::IdCard);
        assert!(!create.is_confidential);

        let active = create.into_active_model(9);
        assert_eq!(active.uploaded_by.as_ref(), &9);
        assert_eq!(active.description.as_ref(), "");
    }

    #[test]
    fn negative_size_is_rejected() {
        let mut raw = passport();
        raw["file_size"] = serde_json::json!(-1);
        let create: DocumentCreate = serde_json::from_value(raw).unwrap();
        let errors = create.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("file_size"));
    }

    #[test]
    fn unknown_document_type_fails_to_bind() {
        let mut raw = passport();
        raw["document_type"] = serde_json::json!("payslip");
        assert!(serde_json::from_value::<DocumentCreate>(raw).is_err());
    }
}

use std::{collections::BTreeMap, sync::Arc};

use sea_orm::{DbErr, SqlErr};
use serde::Serialize;
use thiserror::Error;
use validator::ValidationErrors;

/// Shared result type for anything that validates, maps and persists HR records.
pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug, Error, Clone)]
pub enum ApiError {
    /// A transfer schema rejected one or more fields.
    #[error("validation failed: {0}")]
    Validation(ValidationErrors),
    /// An entity constraint rejected the value right before persistence.
    #[error("bad request: {0}")]
    InvalidInput(String),
    #[error("conflict: {0}")]
    Conflict(String),
    #[error("integrity violation: {0}")]
    Integrity(String),
    #[error("resource not found")]
    NotFound,
    #[error("internal server error")]
    Internal(Arc<anyhow::Error>),
}

impl ApiError {
    pub fn code(&self) -> &'static str {
        match self {
            ApiError::Validation(_) => "VALIDATION_FAILED",
            ApiError::InvalidInput(_) => "INVALID_INPUT",
            ApiError::Conflict(_) => "CONFLICT",
            ApiError::Integrity(_) => "INTEGRITY_VIOLATION",
            ApiError::NotFound => "NOT_FOUND",
            ApiError::Internal(_) => "INTERNAL",
        }
    }

    pub fn internal(err: anyhow::Error) -> Self {
        Self::Internal(Arc::new(err))
    }

    /// Payload safe to hand to a caller: internals are reduced to their code.
    pub fn body(&self) -> ErrorBody {
        let fields = match self {
            ApiError::Validation(errors) => Some(field_codes(errors)),
            _ => None,
        };
        ErrorBody {
            code: self.code(),
            message: self.to_string(),
            fields,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ErrorBody {
    pub code: &'static str,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fields: Option<BTreeMap<String, Vec<String>>>,
}

fn field_codes(errors: &ValidationErrors) -> BTreeMap<String, Vec<String>> {
    errors
        .field_errors()
        .into_iter()
        .map(|(field, errs)| {
            let codes = errs.iter().map(|e| e.code.to_string()).collect();
            (field.to_string(), codes)
        })
        .collect()
}

impl From<ValidationErrors> for ApiError {
    fn from(value: ValidationErrors) -> Self {
        Self::Validation(value)
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(value: anyhow::Error) -> Self {
        Self::internal(value)
    }
}

impl From<DbErr> for ApiError {
    fn from(value: DbErr) -> Self {
        match value.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(detail)) => return Self::Conflict(detail),
            Some(SqlErr::ForeignKeyConstraintViolation(detail)) => {
                return Self::Integrity(detail);
            }
            _ => {}
        }
        match value {
            DbErr::RecordNotFound(_) | DbErr::RecordNotUpdated => Self::NotFound,
            DbErr::Custom(message) => Self::InvalidInput(message),
            other => {
                tracing::error!(error = %other, "database call failed");
                Self::internal(anyhow::Error::new(other))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::ValidationError;

    #[test]
    fn internal_errors_are_masked() {
        let err = ApiError::internal(anyhow::anyhow!("connection string leaked"));
        let body = err.body();
        assert_eq!(body.message, "internal server error");
        assert_eq!(body.code, "INTERNAL");
        assert!(body.fields.is_none());
    }

    #[test]
    fn validation_errors_list_failing_fields() {
        let mut errors = ValidationErrors::new();
        errors.add("email", ValidationError::new("regex"));
        errors.add("password", ValidationError::new("length"));

        let body = ApiError::from(errors).body();
        assert_eq!(body.code, "VALIDATION_FAILED");
        let fields = body.fields.unwrap();
        assert_eq!(fields["email"], vec!["regex".to_string()]);
        assert_eq!(fields["password"], vec!["length".to_string()]);
    }

    #[test]
    fn entity_constraint_failures_become_invalid_input() {
        let err = ApiError::from(DbErr::Custom("hrd_users.email: not a valid email address".into()));
        assert!(matches!(err, ApiError::InvalidInput(ref msg) if msg.starts_with("hrd_users.email")));
        assert_eq!(err.code(), "INVALID_INPUT");
    }

    #[test]
    fn missing_records_become_not_found() {
        let err = ApiError::from(DbErr::RecordNotFound("hrd_employees".into()));
        assert!(matches!(err, ApiError::NotFound));
    }

    #[test]
    fn body_serializes_without_empty_fields() {
        let json = serde_json::to_value(ApiError::Conflict("email taken".into()).body()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "code": "CONFLICT", "message": "conflict: email taken" })
        );
    }
}

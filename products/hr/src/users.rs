use entity::constraints::EMAIL_PATTERN;
use entity::{UserRole, user};
use sea_orm::prelude::DateTimeWithTimeZone;
use sea_orm::{
    ActiveModelBehavior, ActiveModelTrait, ActiveValue::Set, ColumnTrait, ConnectionTrait,
    EntityTrait, QueryFilter,
};
use serde::{Deserialize, Serialize};
use tracing::instrument;
use validator::Validate;

use crate::{ApiResult, PasswordHasher, load, validated};

#[derive(Clone, Debug, Deserialize, Validate)]
pub struct UserLogin {
    #[validate(length(max = 255))]
    pub email: String,
    #[validate(length(max = 100))]
    pub password: String,
}

#[derive(Clone, Debug, Deserialize, Validate)]
pub struct UserCreate {
    #[validate(length(max = 255), regex(path = *EMAIL_PATTERN))]
    pub email: String,
    #[validate(length(min = 6, max = 100))]
    pub password: String,
    #[serde(default)]
    pub role: UserRole,
}

#[derive(Clone, Debug, Default, Deserialize, Validate)]
pub struct UserUpdate {
    #[validate(length(max = 255), regex(path = *EMAIL_PATTERN))]
    pub email: Option<String>,
    #[validate(length(min = 6, max = 100))]
    pub password: Option<String>,
    pub role: Option<UserRole>,
    pub is_active: Option<bool>,
}

/// Outbound view of a user; the password hash never leaves the service.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct UserResponse {
    pub id: i32,
    pub email: String,
    pub role: UserRole,
    pub is_active: bool,
    pub last_login: Option<DateTimeWithTimeZone>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

impl From<user::Model> for UserResponse {
    fn from(model: user::Model) -> Self {
        Self {
            id: model.id,
            email: model.email,
            role: model.role,
            is_active: model.is_active,
            last_login: model.last_login,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

impl UserCreate {
    pub fn into_active_model(self, password_hash: String) -> user::ActiveModel {
        user::ActiveModel {
            email: Set(self.email),
            password_hash: Set(password_hash),
            role: Set(self.role),
            ..user::ActiveModel::new()
        }
    }
}

impl UserUpdate {
    /// Copies supplied fields; the password must already be hashed by the caller.
    pub fn apply(self, active: &mut user::ActiveModel, password_hash: Option<String>) {
        if let Some(email) = self.email {
            active.email = Set(email);
        }
        if let Some(hash) = password_hash {
            active.password_hash = Set(hash);
        }
        if let Some(role) = self.role {
            active.role = Set(role);
        }
        if let Some(is_active) = self.is_active {
            active.is_active = Set(is_active);
        }
    }
}

#[instrument(name = "hr.users.register", skip_all, fields(role = ?payload.role))]
pub async fn register<C>(
    db: &C,
    payload: UserCreate,
    hasher: &dyn PasswordHasher,
) -> ApiResult<user::Model>
where
    C: ConnectionTrait,
{
    let payload = validated(payload)?;
    let hash = hasher.hash(&payload.password)?;
    Ok(payload.into_active_model(hash).insert(db).await?)
}

#[instrument(name = "hr.users.update", skip(db, payload, hasher))]
pub async fn update<C>(
    db: &C,
    id: i32,
    payload: UserUpdate,
    hasher: &dyn PasswordHasher,
) -> ApiResult<user::Model>
where
    C: ConnectionTrait,
{
    let payload = validated(payload)?;
    let current = load::<user::Entity, _>(db, id).await?;
    let hash = payload
        .password
        .as_deref()
        .map(|password| hasher.hash(password))
        .transpose()?;
    let mut active: user::ActiveModel = current.into();
    payload.apply(&mut active, hash);
    Ok(active.update(db).await?)
}

/// Checks credentials and stamps `last_login`. `None` covers unknown email,
/// wrong password and deactivated accounts alike.
pub async fn authenticate<C>(
    db: &C,
    login: UserLogin,
    hasher: &dyn PasswordHasher,
) -> ApiResult<Option<user::Model>>
where
    C: ConnectionTrait,
{
    let login = validated(login)?;
    let Some(found) = user::Entity::find()
        .filter(user::Column::Email.eq(login.email.as_str()))
        .one(db)
        .await?
    else {
        return Ok(None);
    };
    if !found.is_active || !hasher.verify(&login.password, &found.password_hash)? {
        tracing::debug!(user_id = found.id, "login rejected");
        return Ok(None);
    }
    let mut active: user::ActiveModel = found.into();
    active.last_login = Set(Some(entity::now()));
    Ok(Some(active.update(db).await?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ApiError;
    use crate::testing::{PlainHasher, migrated_db};

    fn create(email: &str) -> UserCreate {
        UserCreate {
            email: email.into(),
            password: "secret1".into(),
            role: UserRole::default(),
        }
    }

    #[test]
    fn rejects_malformed_email() {
        let errors = create("not-an-email").validate().unwrap_err();
        assert!(errors.field_errors().contains_key("email"));
    }

    #[test]
    fn short_password_is_rejected() {
        let mut payload = create("a@example.com");
        payload.password = "12345".into();
        let errors = payload.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("password"));
    }

    #[test]
    fn role_defaults_to_employee_and_unknown_roles_fail() {
        let parsed: UserCreate =
            serde_json::from_str(r#"{"email":"a@example.com","password":"secret1"}"#).unwrap();
        assert_eq!(parsed.role, UserRole::Employee);

        let unknown = serde_json::from_str::<UserCreate>(
            r#"{"email":"a@example.com","password":"secret1","role":"owner"}"#,
        );
        assert!(unknown.is_err());
    }

    #[test]
    fn missing_password_fails_to_bind() {
        assert!(serde_json::from_str::<UserCreate>(r#"{"email":"a@example.com"}"#).is_err());
    }

    #[test]
    fn update_email_is_pattern_checked_only_when_present() {
        assert!(UserUpdate::default().validate().is_ok());
        let update = UserUpdate {
            email: Some("broken@".into()),
            ..UserUpdate::default()
        };
        assert!(update.validate().is_err());
    }

    #[tokio::test]
    async fn register_hashes_and_response_hides_hash() {
        let db = migrated_db().await;
        let user = register(&db, create("jane@example.com"), &PlainHasher)
            .await
            .unwrap();
        assert_eq!(user.password_hash, "plain$secret1");
        assert!(user.is_active);

        let json = serde_json::to_value(UserResponse::from(user)).unwrap();
        assert!(json.get("password_hash").is_none());
        assert_eq!(json["role"], "employee");
    }

    #[tokio::test]
    async fn duplicate_email_is_a_conflict() {
        let db = migrated_db().await;
        register(&db, create("dup@example.com"), &PlainHasher)
            .await
            .unwrap();
        let err = register(&db, create("dup@example.com"), &PlainHasher)
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Conflict(_)), "got {err:?}");
    }

    #[tokio::test]
    async fn authenticate_checks_password_and_stamps_login() {
        let db = migrated_db().await;
        register(&db, create("login@example.com"), &PlainHasher)
            .await
            .unwrap();

        let wrong = UserLogin {
            email: "login@example.com".into(),
            password: "nope".into(),
        };
        assert!(authenticate(&db, wrong, &PlainHasher).await.unwrap().is_none());

        let right = UserLogin {
            email: "login@example.com".into(),
            password: "secret1".into(),
        };
        let user = authenticate(&db, right, &PlainHasher).await.unwrap().unwrap();
        assert!(user.last_login.is_some());
    }

    #[tokio::test]
    async fn update_leaves_absent_fields_alone() {
        let db = migrated_db().await;
        let user = register(&db, create("keep@example.com"), &PlainHasher)
            .await
            .unwrap();
        let patch = UserUpdate {
            role: Some(UserRole::Manager),
            ..UserUpdate::default()
        };
        let updated = update(&db, user.id, patch, &PlainHasher).await.unwrap();
        assert_eq!(updated.role, UserRole::Manager);
        assert_eq!(updated.email, "keep@example.com");
        assert_eq!(updated.password_hash, user.password_hash);
    }

    #[tokio::test]
    async fn update_unknown_user_is_not_found() {
        let db = migrated_db().await;
        let err = update(&db, 999, UserUpdate::default(), &PlainHasher)
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::NotFound));
    }
}

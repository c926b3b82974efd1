//! HR transfer schemas and the services that persist them.
//!
//! Every module pairs the create / update / response shapes of one record
//! type with the functions that validate, map and store them. Callers bind
//! request bodies to the shapes here and never touch `ActiveModel`s directly.

pub mod attendance;
pub mod audit;
pub mod contracts;
pub mod departments;
pub mod documents;
pub mod employees;
pub mod holidays;
pub mod leave;
pub mod payroll;
pub mod positions;
pub mod reviews;
pub mod seed;
pub mod settings;
pub mod stats;
pub mod training;
pub mod users;
mod validation;

pub use platform_api::{ApiError, ApiResult};

use sea_orm::{ConnectionTrait, EntityTrait, PrimaryKeyTrait};
use serde::{Deserialize, Deserializer};
use validator::Validate;

/// Password hashing seam. The admin CLI plugs in argon2; tests use a stub.
pub trait PasswordHasher: Send + Sync {
    fn hash(&self, password: &str) -> ApiResult<String>;
    fn verify(&self, password: &str, hash: &str) -> ApiResult<bool>;
}

/// Distinguishes an absent field (`None`) from an explicit `null` (`Some(None)`).
pub(crate) fn nullable<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

pub(crate) fn validated<T: Validate>(payload: T) -> ApiResult<T> {
    payload.validate()?;
    Ok(payload)
}

pub(crate) async fn load<E, C>(db: &C, id: i32) -> ApiResult<E::Model>
where
    E: EntityTrait,
    E::PrimaryKey: PrimaryKeyTrait<ValueType = i32>,
    C: ConnectionTrait,
{
    E::find_by_id(id).one(db).await?.ok_or(ApiError::NotFound)
}


#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Deserialize)]
    struct Patch {
        #[serde(default, deserialize_with = "nullable")]
        manager_id: Option<Option<i32>>,
    }

    #[test]
    fn nullable_tells_absent_from_null() {
        let absent: Patch = serde_json::from_str("{}").unwrap();
        assert_eq!(absent.manager_id, None);

        let cleared: Patch = serde_json::from_str(r#"{"manager_id": null}"#).unwrap();
        assert_eq!(cleared.manager_id, Some(None));

        let set: Patch = serde_json::from_str(r#"{"manager_id": 7}"#).unwrap();
        assert_eq!(set.manager_id, Some(Some(7)));
    }
}

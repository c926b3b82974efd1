use anyhow::anyhow;
use argon2::Argon2;
use argon2::password_hash::{
    PasswordHash, PasswordHasher as _, PasswordVerifier, SaltString, rand_core::OsRng,
};
use products_hr::{ApiError, ApiResult, PasswordHasher};

/// Argon2id with the crate's default parameters, PHC string output.
#[derive(Clone, Copy, Debug, Default)]
pub struct Argon2Hasher;

impl PasswordHasher for Argon2Hasher {
    fn hash(&self, password: &str) -> ApiResult<String> {
        let salt = SaltString::generate(&mut OsRng);
        Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|err| ApiError::internal(anyhow!("hash error: {err}")))
    }

    fn verify(&self, password: &str, hash: &str) -> ApiResult<bool> {
        let parsed = PasswordHash::new(hash)
            .map_err(|err| ApiError::internal(anyhow!("stored hash unreadable: {err}")))?;
        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hashes_verify_and_differ_by_salt() {
        let hasher = Argon2Hasher;
        let first = hasher.hash("correct horse").unwrap();
        let second = hasher.hash("correct horse").unwrap();
        assert_ne!(first, second);
        assert!(first.starts_with("$argon2"));
        assert!(hasher.verify("correct horse", &first).unwrap());
        assert!(!hasher.verify("wrong horse", &first).unwrap());
    }

    #[test]
    fn garbage_hash_is_an_internal_error() {
        let err = Argon2Hasher.verify("pw", "not-a-phc-string").unwrap_err();
        assert_eq!(err.code(), "INTERNAL");
    }
}

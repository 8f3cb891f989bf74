//! Password value object - Argon2 hashing for passwords and other secrets.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};

use crate::config::{MAX_PASSWORD_LENGTH, MIN_PASSWORD_LENGTH};
use crate::errors::{AppError, AppResult};

/// Hashed secret value object.
///
/// Holds an Argon2 PHC string. Used for user passwords (policy checked by
/// [`Password::new`]) and for machine-generated refresh tokens
/// (unchecked, via [`Password::hash_secret`]).
#[derive(Clone)]
pub struct Password {
    hash: String,
}

// Don't expose hash in debug output
impl std::fmt::Debug for Password {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Password")
            .field("hash", &"[REDACTED]")
            .finish()
    }
}

impl Password {
    /// Hash a user-chosen password after checking the length policy.
    ///
    /// # Errors
    /// Returns a validation error on the `password` field if the password is
    /// shorter than [`MIN_PASSWORD_LENGTH`] or longer than [`MAX_PASSWORD_LENGTH`].
    pub fn new(plain_text: &str) -> AppResult<Self> {
        let length = plain_text.chars().count();
        if length < MIN_PASSWORD_LENGTH {
            return Err(AppError::validation(
                "password",
                format!("Password must be at least {} characters", MIN_PASSWORD_LENGTH),
            ));
        }
        if length > MAX_PASSWORD_LENGTH {
            return Err(AppError::validation(
                "password",
                format!("Password must be at most {} characters", MAX_PASSWORD_LENGTH),
            ));
        }

        Self::hash_secret(plain_text)
    }

    /// Hash an arbitrary secret without applying the password policy.
    pub fn hash_secret(secret: &str) -> AppResult<Self> {
        let hash = Self::hash(secret)?;
        Ok(Self { hash })
    }

    /// Create a Password from an existing hash (from database).
    pub fn from_hash(hash: String) -> Self {
        Self { hash }
    }

    /// Consume and return the hash string.
    pub fn into_string(self) -> String {
        self.hash
    }

    /// Verify a plain text secret against this hash.
    pub fn verify(&self, plain_text: &str) -> bool {
        Self::verify_hash(plain_text, &self.hash).unwrap_or(false)
    }

    fn hash(plain_text: &str) -> AppResult<String> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = Self::argon2()
            .hash_password(plain_text.as_bytes(), &salt)
            .map_err(|e| AppError::internal(format!("Password hash failed: {}", e)))?;
        Ok(hash.to_string())
    }

    fn verify_hash(plain_text: &str, hash: &str) -> AppResult<bool> {
        let parsed = PasswordHash::new(hash)
            .map_err(|e| AppError::internal(format!("Invalid hash format: {}", e)))?;
        Ok(Self::argon2()
            .verify_password(plain_text.as_bytes(), &parsed)
            .is_ok())
    }

    #[inline]
    fn argon2() -> Argon2<'static> {
        Argon2::default()
    }
}

impl From<Password> for String {
    fn from(password: Password) -> Self {
        password.hash
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_hash_and_verify() {
        let plain = "SecurePassword123!";
        let password = Password::new(plain).unwrap();

        assert!(password.verify(plain));
        assert!(!password.verify("WrongPassword123"));
    }

    #[test]
    fn test_password_from_hash() {
        let plain = "Pw1!";
        let password = Password::new(plain).unwrap();
        let hash = password.into_string();

        let restored = Password::from_hash(hash);
        assert!(restored.verify(plain));
    }

    #[test]
    fn test_same_password_different_salts() {
        let plain = "SamePassword123";
        let pass1 = Password::new(plain).unwrap();
        let pass2 = Password::new(plain).unwrap();

        assert!(pass1.verify(plain));
        assert!(pass2.verify(plain));
        assert_ne!(pass1.into_string(), pass2.into_string());
    }

    #[test]
    fn test_password_too_short() {
        match Password::new("abc") {
            Err(AppError::Validation(fields)) => assert_eq!(fields[0].field, "password"),
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_password_too_long() {
        let long = "x".repeat(MAX_PASSWORD_LENGTH + 1);
        assert!(Password::new(&long).is_err());
    }

    #[test]
    fn test_hash_secret_skips_policy() {
        let secret = Password::hash_secret("ab").unwrap();
        assert!(secret.verify("ab"));
    }

    #[test]
    fn test_malformed_hash_never_verifies() {
        let stored = Password::from_hash("not-a-phc-string".to_string());
        assert!(!stored.verify("anything"));
    }
}

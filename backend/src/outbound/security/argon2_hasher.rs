//! Argon2id implementation of the `PasswordHasher` port.
//!
//! Hashes are PHC strings, so the salt and cost parameters travel with the
//! hash and older hashes keep verifying after the defaults change.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{self, PasswordHash, SaltString};
use argon2::{Algorithm, Argon2, Params, PasswordHasher as _, PasswordVerifier as _, Version};

use crate::domain::ports::{PasswordHashError, PasswordHasher};

/// Argon2id hasher.
#[derive(Clone)]
pub struct Argon2PasswordHasher {
    params: Params,
}

impl Argon2PasswordHasher {
    /// Hasher using the crate's recommended Argon2id parameters.
    pub fn new() -> Self {
        Self {
            params: Params::default(),
        }
    }

    /// Hasher with explicit cost parameters.
    pub fn with_params(params: Params) -> Self {
        Self { params }
    }

    fn argon2(&self) -> Argon2<'static> {
        Argon2::new(Algorithm::Argon2id, Version::V0x13, self.params.clone())
    }
}

impl Default for Argon2PasswordHasher {
    fn default() -> Self {
        Self::new()
    }
}

impl PasswordHasher for Argon2PasswordHasher {
    fn hash(&self, password: &str) -> Result<String, PasswordHashError> {
        let salt = SaltString::generate(&mut OsRng);
        self.argon2()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|err| PasswordHashError::hashing(err.to_string()))
    }

    fn verify(&self, password: &str, stored: &str) -> Result<bool, PasswordHashError> {
        let parsed = PasswordHash::new(stored)
            .map_err(|err| PasswordHashError::malformed_hash(err.to_string()))?;
        match self.argon2().verify_password(password.as_bytes(), &parsed) {
            Ok(()) => Ok(true),
            Err(password_hash::Error::Password) => Ok(false),
            Err(err) => Err(PasswordHashError::hashing(err.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use rstest::{fixture, rstest};

    use super::*;
    use crate::test_support::fast_password_hasher;

    #[fixture]
    fn hasher() -> Argon2PasswordHasher {
        fast_password_hasher()
    }

    #[rstest]
    fn hashes_are_salted_phc_strings(hasher: Argon2PasswordHasher) {
        let first = hasher.hash("hunter2").expect("hash");
        let second = hasher.hash("hunter2").expect("hash");
        assert!(first.starts_with("$argon2id$"));
        assert_ne!(first, second);
    }

    #[rstest]
    #[case("hunter2", true)]
    #[case("hunter3", false)]
    #[case("", false)]
    fn verification_compares_against_the_stored_hash(
        hasher: Argon2PasswordHasher,
        #[case] candidate: &str,
        #[case] expected: bool,
    ) {
        let stored = hasher.hash("hunter2").expect("hash");
        assert_eq!(hasher.verify(candidate, &stored).expect("verify"), expected);
    }

    #[rstest]
    fn malformed_hashes_are_reported(hasher: Argon2PasswordHasher) {
        let err = hasher.verify("hunter2", "plaintext").expect_err("malformed");
        assert!(matches!(err, PasswordHashError::MalformedHash { .. }));
    }
}

//! One-way salted password hashing (Argon2id).

use argon2::{
    Algorithm, Argon2, Params, Version,
    password_hash::{
        PasswordHash, PasswordHasher as _, PasswordVerifier as _, SaltString, rand_core::OsRng,
    },
};

use guardpost_core::{AuthError, AuthResult};

/// Hash/verify capability used by the auth engine.
///
/// Implementations are CPU-bound; the engine calls them on the blocking pool.
pub trait PasswordHasher: Send + Sync {
    fn hash(&self, plaintext: &str) -> AuthResult<String>;

    /// `Ok(false)` on mismatch. `Err` only when the stored hash is unusable.
    fn verify(&self, hash: &str, plaintext: &str) -> AuthResult<bool>;
}

/// Argon2 cost parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Argon2Params {
    pub memory_kib: u32,
    pub iterations: u32,
    pub parallelism: u32,
}

impl Default for Argon2Params {
    /// Argon2id RFC 9106 second recommended option.
    fn default() -> Self {
        Self {
            memory_kib: 19456,
            iterations: 2,
            parallelism: 1,
        }
    }
}

impl Argon2Params {
    /// Cheap parameters for tests and local development.
    pub fn insecure_fast() -> Self {
        Self {
            memory_kib: 1024,
            iterations: 1,
            parallelism: 1,
        }
    }

    fn to_argon2(self) -> AuthResult<Argon2<'static>> {
        let params = Params::new(self.memory_kib, self.iterations, self.parallelism, None)
            .map_err(|e| AuthError::internal(format!("create argon2 params: {e}")))?;
        Ok(Argon2::new(Algorithm::Argon2id, Version::V0x13, params))
    }
}

/// Argon2id hasher producing PHC strings.
///
/// Verification always uses the parameters embedded in the stored hash, so
/// changing the cost only affects new hashes.
#[derive(Debug, Clone, Copy, Default)]
pub struct Argon2Hasher {
    params: Argon2Params,
}

impl Argon2Hasher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_params(params: Argon2Params) -> Self {
        Self { params }
    }
}

impl PasswordHasher for Argon2Hasher {
    fn hash(&self, plaintext: &str) -> AuthResult<String> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = self
            .params
            .to_argon2()?
            .hash_password(plaintext.as_bytes(), &salt)
            .map_err(|e| AuthError::internal(format!("hash password: {e}")))?;
        Ok(hash.to_string())
    }

    fn verify(&self, hash: &str, plaintext: &str) -> AuthResult<bool> {
        let parsed = PasswordHash::new(hash)
            .map_err(|e| AuthError::internal(format!("parse password hash: {e}")))?;
        Ok(Argon2::default()
            .verify_password(plaintext.as_bytes(), &parsed)
            .is_ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hasher() -> Argon2Hasher {
        Argon2Hasher::with_params(Argon2Params::insecure_fast())
    }

    #[test]
    fn verifies_matching_password_only() {
        let hasher = hasher();
        let hash = hasher.hash("Passw0rd!").unwrap();

        assert!(hash.starts_with("$argon2id$"));
        assert!(hasher.verify(&hash, "Passw0rd!").unwrap());
        assert!(!hasher.verify(&hash, "Passw0rd!x").unwrap());
    }

    #[test]
    fn same_password_gets_a_fresh_salt() {
        let hasher = hasher();
        let a = hasher.hash("same").unwrap();
        let b = hasher.hash("same").unwrap();
        assert_ne!(a, b);
        assert!(hasher.verify(&a, "same").unwrap());
        assert!(hasher.verify(&b, "same").unwrap());
    }

    #[test]
    fn verify_reads_cost_from_the_hash() {
        let hash = hasher().hash("pw").unwrap();
        assert!(Argon2Hasher::new().verify(&hash, "pw").unwrap());
    }

    #[test]
    fn corrupt_hash_is_an_internal_error() {
        let err = hasher().verify("not-a-phc-string", "pw").unwrap_err();
        assert!(matches!(err, AuthError::Internal(_)));
    }

    #[test]
    fn invalid_params_are_rejected() {
        let hasher = Argon2Hasher::with_params(Argon2Params {
            memory_kib: 1,
            iterations: 0,
            parallelism: 1,
        });
        assert!(hasher.hash("pw").is_err());
    }
}

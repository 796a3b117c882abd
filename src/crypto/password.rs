use crate::error::{AppError, Result};
use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2, ParamsBuilder,
};
use rand::{rngs::OsRng, RngCore};
use std::sync::LazyLock;
use zeroize::Zeroize;

/// The memory cost for Argon2 in MB.
const ARGON2_MEMORY_MB: u32 = 19;
/// The number of iterations for Argon2.
const ARGON2_ITERATIONS: u32 = 2;
/// The parallelism factor for Argon2.
const ARGON2_PARALLELISM: u32 = 1;
/// The size of the per-password salt in bytes.
const SALT_SIZE: usize = 16;

/// Hashes a password using Argon2id with a fresh random salt.
///
/// # Arguments
///
/// * `password` - The password to hash.
///
/// # Returns
///
/// A `Result` containing the PHC-formatted hash.
pub fn hash_password(password: &str) -> Result<String> {
    let mut password_bytes = password.as_bytes().to_vec();

    let mut salt_bytes = [0u8; SALT_SIZE];
    OsRng.fill_bytes(&mut salt_bytes);

    let salt = SaltString::encode_b64(&salt_bytes)
        .map_err(|e| AppError::Hashing(format!("Salt encoding error: {}", e)))?;

    let argon2 = Argon2::new(
        argon2::Algorithm::Argon2id,
        argon2::Version::V0x13,
        ParamsBuilder::new()
            .m_cost(ARGON2_MEMORY_MB * 1024)
            .t_cost(ARGON2_ITERATIONS)
            .p_cost(ARGON2_PARALLELISM)
            .build()
            .map_err(|e| AppError::Hashing(format!("Argon2 params: {}", e)))?,
    );

    let result = argon2
        .hash_password(&password_bytes, &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AppError::Hashing(format!("Argon2 hash error: {}", e)));

    password_bytes.zeroize();
    tracing::debug!("Password hashed successfully with Argon2");
    result
}

/// Verifies a password against a hash.
///
/// The algorithm and cost parameters are read from the hash itself. The final
/// digest comparison is constant-time. A hash that cannot be parsed never
/// verifies.
///
/// # Arguments
///
/// * `password` - The password to verify.
/// * `hash` - The hash to verify against.
///
/// # Returns
///
/// `true` if the password matches, `false` otherwise.
pub fn verify_password(password: &str, hash: &str) -> bool {
    let parsed_hash = match PasswordHash::new(hash) {
        Ok(parsed) => parsed,
        Err(e) => {
            tracing::warn!("Stored password hash could not be parsed: {}", e);
            return false;
        }
    };

    let mut password_bytes = password.as_bytes().to_vec();
    let result = Argon2::default()
        .verify_password(&password_bytes, &parsed_hash)
        .is_ok();

    password_bytes.zeroize();
    tracing::debug!("Password verification completed");
    result
}

/// Hash checked when the login is unknown, so a missing user costs the same
/// Argon2 work as a wrong password.
static DUMMY_HASH: LazyLock<Option<String>> =
    LazyLock::new(|| hash_password("stkraut-unknown-user").ok());

/// Runs a full verification against a fixed hash and discards the outcome.
pub fn verify_dummy(password: &str) {
    match DUMMY_HASH.as_deref() {
        Some(hash) => {
            verify_password(password, hash);
        }
        None => tracing::warn!("Dummy password hash unavailable"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_is_not_the_plaintext() {
        let hash = hash_password("s3cret!").unwrap();

        assert_ne!(hash, "s3cret!");
        assert!(hash.starts_with("$argon2id$"));
    }

    #[test]
    fn verifies_only_the_hashed_password() {
        let hash = hash_password("s3cret!").unwrap();

        assert!(verify_password("s3cret!", &hash));
        assert!(!verify_password("s3cret", &hash));
        assert!(!verify_password("wrong", &hash));
        assert!(!verify_password("", &hash));
    }

    #[test]
    fn same_password_hashes_differently() {
        let first = hash_password("hunter22").unwrap();
        let second = hash_password("hunter22").unwrap();

        assert_ne!(first, second);
        assert!(verify_password("hunter22", &first));
        assert!(verify_password("hunter22", &second));
    }

    #[test]
    fn unparsable_hash_never_verifies() {
        assert!(!verify_password("hunter22", "hunter22"));
        assert!(!verify_password("", ""));
    }

    #[test]
    fn dummy_hash_is_a_real_argon2_hash() {
        let hash = DUMMY_HASH.as_deref().unwrap();

        assert!(hash.starts_with("$argon2id$"));
        assert!(!verify_password("s3cret!", hash));
        verify_dummy("s3cret!");
    }
}

// ============================
// crates/backend-lib/src/auth/password.rs
// ============================
//! Password hashing and verification.
use rand::RngCore;
use scrypt::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Params, Scrypt,
};

/// scrypt CPU/memory cost as a power of two (2^10 iterations)
pub const SCRYPT_LOG_N: u8 = 10;

/// Salt size in bytes
const SALT_BYTES: usize = 16;

/// Hash a password using scrypt with a fresh random salt
pub fn hash_password(plain: &str) -> anyhow::Result<String> {
    let mut salt_bytes = [0u8; SALT_BYTES];
    rand::rng().fill_bytes(&mut salt_bytes);
    let salt = SaltString::encode_b64(&salt_bytes)?;

    let params = Params::new(SCRYPT_LOG_N, 8, 1, Params::RECOMMENDED_LEN)?;
    let hash = Scrypt
        .hash_password_customized(plain.as_bytes(), None, None, params, salt.as_salt())?
        .to_string();
    Ok(hash)
}

/// Verify a password against a hash
pub fn verify_password(hash: &str, plain: &str) -> bool {
    let parsed_hash = match PasswordHash::new(hash) {
        Ok(h) => h,
        Err(_) => return false,
    };
    Scrypt.verify_password(plain.as_bytes(), &parsed_hash).is_ok()
}

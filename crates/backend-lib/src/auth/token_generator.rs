// ============================
// crates/backend-lib/src/auth/token_generator.rs
// ============================
/** Secure random token generation
Password-reset links carry one of these tokens, so it must come from a
cryptographically secure generator. */
use rand::RngCore;

/// Default token size in bytes (20 bytes = 160 bits of entropy)
pub const DEFAULT_TOKEN_BYTES: usize = 20;

/** Generate a cryptographically secure random token
# Returns
A lower-case hex string of `2 * DEFAULT_TOKEN_BYTES` characters */
pub fn generate_secure_token() -> String {
    generate_secure_token_with_size(DEFAULT_TOKEN_BYTES)
}

/** Generate a cryptographically secure random token with specified size
# Arguments
* `bytes` - The size of the random token in bytes */
pub fn generate_secure_token_with_size(bytes: usize) -> String {
    let mut buffer = vec![0u8; bytes];
    rand::rng().fill_bytes(&mut buffer);
    hex::encode(buffer)
}

//! Credentials and bearer tokens.
//!
//! Passwords are stored as `salt_hex$hash_hex`, where the hash is BLAKE3 over
//! `salt || password` with domain separation.  Tokens are 32 random bytes,
//! hex-encoded; only their BLAKE3 digest is persisted, so a leaked database
//! does not leak usable tokens.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use rand::RngCore;
use uuid::Uuid;

use crate::api::AppState;
use crate::error::ApiError;

const PASSWORD_KDF_CONTEXT: &str = "rolodex 2024-06-01 password hash";
const SALT_SIZE: usize = 16;

/// Hash a password with a fresh random salt.
pub fn hash_password(password: &str) -> String {
    let mut salt = [0u8; SALT_SIZE];
    rand::rngs::OsRng.fill_bytes(&mut salt);

    let hash = salted_hash(&salt, password);
    format!("{}${}", hex::encode(salt), hash.to_hex())
}

/// Verify a password against a stored `salt_hex$hash_hex` credential.
///
/// Comparison is constant-time; malformed stored values simply fail.
pub fn verify_password(password: &str, stored: &str) -> bool {
    let Some((salt_hex, hash_hex)) = stored.split_once('$') else {
        return false;
    };
    let Ok(salt) = hex::decode(salt_hex) else {
        return false;
    };
    let Ok(expected) = hex::decode(hash_hex) else {
        return false;
    };

    let computed = salted_hash(&salt, password);

    use subtle::ConstantTimeEq;
    let computed_bytes: &[u8] = computed.as_bytes();
    expected.len() == computed_bytes.len()
        && computed_bytes.ct_eq(&expected).unwrap_u8() == 1
}

fn salted_hash(salt: &[u8], password: &str) -> blake3::Hash {
    let mut hasher = blake3::Hasher::new_derive_key(PASSWORD_KDF_CONTEXT);
    hasher.update(salt);
    hasher.update(password.as_bytes());
    hasher.finalize()
}

/// Generate a fresh bearer token (64 hex chars).
pub fn generate_token() -> String {
    let mut bytes = [0u8; 32];
    rand::rngs::OsRng.fill_bytes(&mut bytes);
    hex::encode(bytes)
}

/// Digest under which a token is persisted in the sessions table.
pub fn token_hash(token: &str) -> String {
    blake3::hash(token.as_bytes()).to_hex().to_string()
}

/// The authenticated caller, resolved from the `Authorization: Bearer`
/// header through the sessions table.
///
/// Handlers take `AuthUser` as an argument to require authentication; the
/// wrapped id is the ownership filter for every contact operation.
#[derive(Debug, Clone, Copy)]
pub struct AuthUser(pub Uuid);

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth = parts
            .headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .ok_or(ApiError::Unauthorized)?;

        let token = auth.strip_prefix("Bearer ").unwrap_or(auth);
        if token.is_empty() {
            return Err(ApiError::Unauthorized);
        }

        let db = state.db.lock().await;
        let user_id = db
            .find_session_user(&token_hash(token))
            .map_err(|_| ApiError::Unauthorized)?;

        Ok(AuthUser(user_id))
    }
}

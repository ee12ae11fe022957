/// Access Token Issuance and Verification
///
/// Tokens are HS256 JWTs signed with the shared secret. Each carries a
/// random session id (`jti`) that is also recorded in the session store;
/// verification of signature and expiry happens here, revocation is the
/// session store's call.

use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use rand::distributions::Alphanumeric;
use rand::{thread_rng, Rng};

use crate::auth::claims::Claims;
use crate::configuration::AuthSettings;
use crate::error::{AppError, AuthError};

const SESSION_ID_LENGTH: usize = 32;

/// Generate a random session id for a new token
///
/// 32 alphanumeric characters; by itself it carries no authority — only
/// the signed token embedding it does.
pub fn generate_session_id() -> String {
    thread_rng()
        .sample_iter(&Alphanumeric)
        .take(SESSION_ID_LENGTH)
        .map(char::from)
        .collect()
}

/// Sign the claims into an access token
///
/// # Errors
/// Returns error if token encoding fails
pub fn issue_access_token(claims: &Claims, config: &AuthSettings) -> Result<String, AppError> {
    encode(
        &Header::default(),
        claims,
        &EncodingKey::from_secret(config.secret.as_bytes()),
    )
    .map_err(|e| AppError::Internal(format!("Token generation failed: {}", e)))
}

/// Verify signature, expiry, and issuer of an access token
///
/// # Errors
/// - `AuthError::TokenExpired` past the embedded expiry
/// - `AuthError::TokenInvalid` on tamper, malformed input, or issuer mismatch
pub fn decode_access_token(token: &str, config: &AuthSettings) -> Result<Claims, AppError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_issuer(&[&config.issuer]);

    decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.secret.as_bytes()),
        &validation,
    )
    .map(|data| data.claims)
    .map_err(|e| {
        tracing::warn!("Token validation error: {}", e);
        match e.kind() {
            jsonwebtoken::errors::ErrorKind::ExpiredSignature => {
                AppError::Auth(AuthError::TokenExpired)
            }
            _ => AppError::Auth(AuthError::TokenInvalid),
        }
    })
}

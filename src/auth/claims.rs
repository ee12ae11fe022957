/// Access token claims
///
/// Payload of an issued token: the user's identity plus standard
/// JWT claims (RFC 7519). The `jti` claim doubles as the session id
/// under which the token is tracked in the session store.

use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject (the user's login)
    pub sub: String,
    /// User identifier (credential store row id)
    pub user_id: i64,
    /// Session id, keyed in the session store for revocation
    pub jti: String,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Issuer
    pub iss: String,
}

impl Claims {
    /// Create new claims for a user session
    ///
    /// # Arguments
    /// * `user_id` - Credential store row id
    /// * `login` - The user's login
    /// * `session_id` - Session id recorded in the session store
    /// * `expiry_seconds` - Token expiration in seconds from now
    /// * `issuer` - Issuer identifier
    pub fn new(
        user_id: i64,
        login: String,
        session_id: String,
        expiry_seconds: i64,
        issuer: String,
    ) -> Self {
        let now = chrono::Utc::now().timestamp();
        Self {
            sub: login,
            user_id,
            jti: session_id,
            exp: now + expiry_seconds,
            iat: now,
            iss: issuer,
        }
    }

    /// Check if the token has expired
    pub fn is_expired(&self) -> bool {
        let now = chrono::Utc::now().timestamp();
        self.exp < now
    }
}

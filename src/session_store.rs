/// Session Store
///
/// Redis-backed record of live sessions, keyed by the token's session id:
/// - `session:{session_id}` — JSON session record, TTL = token lifetime
/// - `user_sessions:{user_id}` — set of the user's live session ids
///
/// A token is valid only while its session record exists; logout deletes
/// the record and account deletion clears the whole set. Expiry is
/// enforced twice, by the key TTL and by the stored `expires_at`.

use chrono::{DateTime, Duration, Utc};
use redis::AsyncCommands;
use serde::{Deserialize, Serialize};

use crate::error::AppError;

const SESSION_KEY_PREFIX: &str = "session:";
const USER_SESSIONS_KEY_PREFIX: &str = "user_sessions:";

/// Stored value for one live session
#[derive(Debug, Serialize, Deserialize)]
pub struct SessionRecord {
    pub user_id: i64,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

fn session_key(session_id: &str) -> String {
    format!("{}{}", SESSION_KEY_PREFIX, session_id)
}

fn user_sessions_key(user_id: i64) -> String {
    format!("{}{}", USER_SESSIONS_KEY_PREFIX, user_id)
}

/// Record a freshly issued session
///
/// # Arguments
/// * `client` - Session store client
/// * `user_id` - User that owns the session
/// * `session_id` - The token's session id
/// * `ttl_seconds` - Session lifetime, matching the token expiry
///
/// # Errors
/// Returns error if the store operation fails
pub async fn store_session(
    client: &redis::Client,
    user_id: i64,
    session_id: &str,
    ttl_seconds: i64,
) -> Result<(), AppError> {
    let mut con = client.get_multiplexed_async_connection().await?;

    let now = Utc::now();
    let record = SessionRecord {
        user_id,
        created_at: now,
        expires_at: now + Duration::seconds(ttl_seconds),
    };
    let json = serde_json::to_string(&record)
        .map_err(|e| AppError::Internal(format!("Session serialization failed: {}", e)))?;

    con.set_ex::<_, _, ()>(&session_key(session_id), json, ttl_seconds as u64)
        .await?;

    // Track the session id so account deletion can revoke in one sweep;
    // keep the set alive at least as long as the session
    con.sadd::<_, _, ()>(&user_sessions_key(user_id), session_id)
        .await?;
    con.expire::<_, ()>(&user_sessions_key(user_id), ttl_seconds)
        .await?;

    Ok(())
}

/// Check whether a session is live (present and not past its expiry)
///
/// # Errors
/// Returns error if the store operation fails
pub async fn is_session_active(
    client: &redis::Client,
    session_id: &str,
) -> Result<bool, AppError> {
    let mut con = client.get_multiplexed_async_connection().await?;

    let json: Option<String> = con.get(&session_key(session_id)).await?;
    match json {
        None => Ok(false),
        Some(data) => {
            let record: SessionRecord = serde_json::from_str(&data)
                .map_err(|e| AppError::Internal(format!("Session deserialization failed: {}", e)))?;
            Ok(record.expires_at > Utc::now())
        }
    }
}

/// Revoke a single session
///
/// Returns true if a live record was removed, false if it was already
/// gone (revoked or expired).
///
/// # Errors
/// Returns error if the store operation fails
pub async fn revoke_session(
    client: &redis::Client,
    session_id: &str,
    user_id: i64,
) -> Result<bool, AppError> {
    let mut con = client.get_multiplexed_async_connection().await?;

    let deleted: i32 = con.del(&session_key(session_id)).await?;
    con.srem::<_, _, ()>(&user_sessions_key(user_id), session_id)
        .await?;

    Ok(deleted > 0)
}

/// Revoke every live session of a user
///
/// Used by account deletion so outstanding tokens stop verifying.
/// Returns the number of sessions removed.
///
/// # Errors
/// Returns error if the store operation fails
pub async fn revoke_user_sessions(client: &redis::Client, user_id: i64) -> Result<u64, AppError> {
    let mut con = client.get_multiplexed_async_connection().await?;

    let session_ids: Vec<String> = con.smembers(&user_sessions_key(user_id)).await?;

    let mut revoked = 0u64;
    for session_id in &session_ids {
        let deleted: i32 = con.del(&session_key(session_id)).await?;
        revoked += deleted as u64;
    }

    con.del::<_, ()>(&user_sessions_key(user_id)).await?;

    if revoked > 0 {
        tracing::info!(user_id = user_id, revoked = revoked, "User sessions revoked");
    }

    Ok(revoked)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_layout() {
        assert_eq!(session_key("abc123"), "session:abc123");
        assert_eq!(user_sessions_key(42), "user_sessions:42");
    }

    #[test]
    fn test_session_record_expiry_window() {
        let now = Utc::now();
        let record = SessionRecord {
            user_id: 1,
            created_at: now,
            expires_at: now + Duration::seconds(60),
        };

        assert!(record.expires_at > Utc::now());

        let stale = SessionRecord {
            user_id: 1,
            created_at: now - Duration::seconds(120),
            expires_at: now - Duration::seconds(60),
        };

        assert!(stale.expires_at < Utc::now());
    }
}

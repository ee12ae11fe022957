/// Account Routes
///
/// Handles user registration, login, logout, profile retrieval, and
/// account deletion.

use actix_web::{web, HttpResponse};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::auth::{
    generate_session_id, hash_password, issue_access_token, verify_password, Claims,
};
use crate::configuration::AuthSettings;
use crate::error::{AppError, AuthError, DatabaseError, ErrorContext};
use crate::session_store;
use crate::validators::{is_valid_login, is_valid_password};

/// Credential payload shared by register, login, and delete
#[derive(Deserialize)]
pub struct AuthRequest {
    pub login: String,
    pub password: String,
}

/// Response for a newly registered account
#[derive(Serialize)]
pub struct RegisterResponse {
    pub id: i64,
}

/// Response carrying a freshly issued access token
#[derive(Serialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: i64,
}

/// Public account fields; the password hash never leaves the store
#[derive(Serialize)]
pub struct ProfileResponse {
    pub id: i64,
    pub login: String,
    pub created_at: String,
    pub last_login: Option<String>,
}

#[derive(Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    fn new(message: &str) -> Self {
        Self {
            message: message.to_string(),
        }
    }
}

/// POST /register
///
/// Register a new account with login and password.
/// Returns the assigned user id on success.
///
/// # Errors
/// - 422: Validation errors (login/password shape)
/// - 409: Login already registered
/// - 500: Internal server error
pub async fn register(
    form: web::Json<AuthRequest>,
    pool: web::Data<PgPool>,
) -> Result<HttpResponse, AppError> {
    let context = ErrorContext::new("account_registration");

    let login = is_valid_login(&form.login)?;
    is_valid_password(&form.password)?;
    let password_hash = hash_password(&form.password)?;

    // Login uniqueness is enforced by the store; a violation surfaces as 409
    let user_id = sqlx::query_scalar::<_, i64>(
        r#"
        INSERT INTO users (login, password_hash, created_at)
        VALUES ($1, $2, $3)
        RETURNING id
        "#,
    )
    .bind(&login)
    .bind(&password_hash)
    .bind(Utc::now())
    .fetch_one(pool.get_ref())
    .await?;

    tracing::info!(
        request_id = %context.request_id,
        user_id = user_id,
        "Account registered successfully"
    );

    Ok(HttpResponse::Created().json(RegisterResponse { id: user_id }))
}

/// POST /login
///
/// Authenticate with login and password; issues a signed access token and
/// records its session for revocation tracking.
///
/// # Errors
/// - 404: Unknown login
/// - 401: Wrong password
/// - 500: Internal server error
pub async fn login(
    form: web::Json<AuthRequest>,
    pool: web::Data<PgPool>,
    redis_client: web::Data<redis::Client>,
    auth_config: web::Data<AuthSettings>,
) -> Result<HttpResponse, AppError> {
    let context = ErrorContext::new("account_login");

    let user = sqlx::query_as::<_, (i64, String, String)>(
        "SELECT id, login, password_hash FROM users WHERE login = $1",
    )
    .bind(&form.login)
    .fetch_optional(pool.get_ref())
    .await?
    .ok_or_else(|| AppError::Database(DatabaseError::NotFound("User not found".to_string())))?;

    let (user_id, user_login, password_hash) = user;

    let password_valid = verify_password(&form.password, &password_hash)?;
    if !password_valid {
        return Err(AppError::Auth(AuthError::InvalidCredentials));
    }

    sqlx::query("UPDATE users SET last_login = $1 WHERE id = $2")
        .bind(Utc::now())
        .bind(user_id)
        .execute(pool.get_ref())
        .await?;

    let session_id = generate_session_id();
    let claims = Claims::new(
        user_id,
        user_login,
        session_id.clone(),
        auth_config.token_expiry_seconds,
        auth_config.issuer.clone(),
    );
    let access_token = issue_access_token(&claims, auth_config.get_ref())?;

    session_store::store_session(
        redis_client.get_ref(),
        user_id,
        &session_id,
        auth_config.token_expiry_seconds,
    )
    .await?;

    tracing::info!(
        request_id = %context.request_id,
        user_id = user_id,
        "Login successful"
    );

    Ok(HttpResponse::Ok().json(TokenResponse {
        access_token,
        token_type: "bearer".to_string(),
        expires_in: auth_config.token_expiry_seconds,
    }))
}

/// POST /logout
///
/// Revoke the session of the presented token. The authentication
/// middleware has already verified signature, expiry, and revocation
/// status; a session that disappeared in between counts as revoked.
///
/// # Errors
/// - 401: Missing, invalid, expired, or already revoked token
/// - 500: Internal server error
pub async fn logout(
    claims: web::ReqData<Claims>,
    redis_client: web::Data<redis::Client>,
) -> Result<HttpResponse, AppError> {
    let context = ErrorContext::new("account_logout");

    let revoked =
        session_store::revoke_session(redis_client.get_ref(), &claims.jti, claims.user_id).await?;
    if !revoked {
        return Err(AppError::Auth(AuthError::TokenRevoked));
    }

    tracing::info!(
        request_id = %context.request_id,
        user_id = claims.user_id,
        "Logout successful"
    );

    Ok(HttpResponse::Ok().json(MessageResponse::new("Successfully logged out")))
}

/// GET /profile
///
/// Return the authenticated account's public fields.
/// **Requires a valid access token** in the Authorization header.
///
/// # Errors
/// - 401: Missing, invalid, expired, or revoked token (handled by middleware)
/// - 404: Account no longer exists
/// - 500: Internal server error
pub async fn profile(
    claims: web::ReqData<Claims>,
    pool: web::Data<PgPool>,
) -> Result<HttpResponse, AppError> {
    let user = sqlx::query_as::<_, (i64, String, DateTime<Utc>, Option<DateTime<Utc>>)>(
        "SELECT id, login, created_at, last_login FROM users WHERE id = $1",
    )
    .bind(claims.user_id)
    .fetch_one(pool.get_ref())
    .await?;

    Ok(HttpResponse::Ok().json(ProfileResponse {
        id: user.0,
        login: user.1,
        created_at: user.2.to_rfc3339(),
        last_login: user.3.map(|dt| dt.to_rfc3339()),
    }))
}

/// POST /delete
///
/// Delete an account after re-authenticating with login and password.
/// Every live session of the account is revoked so outstanding tokens
/// stop verifying.
///
/// # Errors
/// - 404: Unknown login
/// - 401: Wrong password
/// - 500: Internal server error
pub async fn delete_account(
    form: web::Json<AuthRequest>,
    pool: web::Data<PgPool>,
    redis_client: web::Data<redis::Client>,
) -> Result<HttpResponse, AppError> {
    let context = ErrorContext::new("account_deletion");

    let user = sqlx::query_as::<_, (i64, String)>(
        "SELECT id, password_hash FROM users WHERE login = $1",
    )
    .bind(&form.login)
    .fetch_optional(pool.get_ref())
    .await?
    .ok_or_else(|| AppError::Database(DatabaseError::NotFound("User not found".to_string())))?;

    let (user_id, password_hash) = user;

    let password_valid = verify_password(&form.password, &password_hash)?;
    if !password_valid {
        return Err(AppError::Auth(AuthError::InvalidCredentials));
    }

    session_store::revoke_user_sessions(redis_client.get_ref(), user_id).await?;

    sqlx::query("DELETE FROM users WHERE id = $1")
        .bind(user_id)
        .execute(pool.get_ref())
        .await?;

    tracing::info!(
        request_id = %context.request_id,
        user_id = user_id,
        "Account deleted"
    );

    Ok(HttpResponse::Ok().json(MessageResponse::new("User deleted successfully")))
}

/// Token Authentication Middleware
///
/// Guards protected routes: extracts the bearer token from the
/// Authorization header, verifies signature/expiry/issuer, consults the
/// session store for revocation, and injects the decoded claims into
/// request extensions for use by route handlers.

use actix_web::{
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    Error, HttpMessage, HttpResponse,
};
use futures::future::LocalBoxFuture;
use std::rc::Rc;

use crate::auth::decode_access_token;
use crate::configuration::AuthSettings;
use crate::error::{AppError, AuthError};
use crate::session_store;

pub struct AuthMiddleware {
    auth_config: AuthSettings,
    redis_client: redis::Client,
}

impl AuthMiddleware {
    /// Create new middleware instance
    pub fn new(auth_config: AuthSettings, redis_client: redis::Client) -> Self {
        Self {
            auth_config,
            redis_client,
        }
    }
}

impl<S, B> Transform<S, ServiceRequest> for AuthMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = AuthMiddlewareService<S>;
    type Future = std::future::Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        std::future::ready(Ok(AuthMiddlewareService {
            service: Rc::new(service),
            auth_config: self.auth_config.clone(),
            redis_client: self.redis_client.clone(),
        }))
    }
}

pub struct AuthMiddlewareService<S> {
    service: Rc<S>,
    auth_config: AuthSettings,
    redis_client: redis::Client,
}

fn unauthorized(message: &str, code: &str) -> Error {
    let response = HttpResponse::Unauthorized().json(serde_json::json!({
        "error": message,
        "code": code
    }));
    actix_web::error::InternalError::from_response("Unauthorized", response).into()
}

impl<S, B> Service<ServiceRequest> for AuthMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        // Extract Authorization header
        let auth_header = req
            .headers()
            .get("Authorization")
            .and_then(|h| h.to_str().ok())
            .and_then(|h| {
                if h.starts_with("Bearer ") {
                    Some(h[7..].to_string())
                } else {
                    None
                }
            });

        let auth_config = self.auth_config.clone();
        let redis_client = self.redis_client.clone();
        let service = self.service.clone();

        Box::pin(async move {
            let token = match auth_header {
                Some(token) => token,
                None => {
                    tracing::warn!("Missing or invalid Authorization header");
                    return Err(unauthorized(
                        "Missing or invalid authorization header",
                        "UNAUTHORIZED",
                    ));
                }
            };

            // Signature, expiry, issuer
            let claims = match decode_access_token(&token, &auth_config) {
                Ok(claims) => claims,
                Err(AppError::Auth(AuthError::TokenExpired)) => {
                    return Err(unauthorized("Token has expired", "TOKEN_EXPIRED"));
                }
                Err(_) => {
                    return Err(unauthorized("Invalid token", "TOKEN_INVALID"));
                }
            };

            // Revocation: the session record must still exist
            match session_store::is_session_active(&redis_client, &claims.jti).await {
                Ok(true) => {}
                Ok(false) => {
                    tracing::warn!(
                        user_id = claims.user_id,
                        "Attempt to use revoked or expired session"
                    );
                    return Err(unauthorized("Token has been revoked", "TOKEN_REVOKED"));
                }
                Err(e) => {
                    tracing::error!(error = %e, "Session store lookup failed");
                    let response = HttpResponse::InternalServerError().json(serde_json::json!({
                        "error": "Session store error occurred",
                        "code": "SESSION_STORE_ERROR"
                    }));
                    return Err(actix_web::error::InternalError::from_response(
                        "Session store error",
                        response,
                    )
                    .into());
                }
            }

            tracing::debug!(
                user_id = claims.user_id,
                login = %claims.sub,
                "Token validated successfully"
            );

            req.extensions_mut().insert(claims);
            service.call(req).await
        })
    }
}

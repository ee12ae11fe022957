/// Middleware module
///
/// Custom middleware guarding token-protected routes.

mod auth_middleware;

pub use auth_middleware::AuthMiddleware;

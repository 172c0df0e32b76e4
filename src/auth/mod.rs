/*!
 * # Authorization Module
 *
 * A single capability gate protects the `/api/v1/admin` subtree: callers must
 * present the server-held admin secret in the `x-admin-secret` header. There is
 * no session or token lifecycle; tenancy is carried explicitly per request.
 *
 * Password hashing for user accounts (argon2, PHC string format) also lives here.
 */

use argon2::password_hash::{
    rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString,
};
use argon2::Argon2;
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use tracing::warn;

use crate::config::AppConfig;
use crate::errors::ServiceError;

/// Header carrying the admin capability secret
pub const ADMIN_SECRET_HEADER: &str = "x-admin-secret";

/// Middleware gating admin routes on the configured admin secret.
///
/// With no secret configured every guarded request is a server misconfiguration
/// (500), whatever header the caller sends. With a secret configured, only an
/// exactly matching header passes; anything else is 401.
pub async fn admin_guard(
    State(config): State<AppConfig>,
    request: Request,
    next: Next,
) -> Result<Response, ServiceError> {
    if !config.has_admin_secret() {
        warn!("admin route requested but no admin secret is configured");
        return Err(ServiceError::Configuration(
            "admin secret is not configured".to_string(),
        ));
    }
    let secret = config.admin_secret.as_deref().unwrap_or_default();

    match request
        .headers()
        .get(ADMIN_SECRET_HEADER)
        .and_then(|v| v.to_str().ok())
    {
        Some(provided) if provided == secret => Ok(next.run(request).await),
        Some(_) => Err(ServiceError::Unauthorized(
            "invalid admin secret".to_string(),
        )),
        None => Err(ServiceError::Unauthorized(
            "missing admin secret".to_string(),
        )),
    }
}

/// Hash a password using Argon2id with a fresh random salt.
pub fn hash_password(password: &str) -> Result<String, ServiceError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| ServiceError::InternalError(format!("Failed to hash password: {}", e)))
}

/// Verify a password against a stored PHC hash string.
pub fn verify_password(password: &str, password_hash: &str) -> Result<bool, ServiceError> {
    let parsed = PasswordHash::new(password_hash)
        .map_err(|e| ServiceError::InternalError(format!("Invalid password hash: {}", e)))?;
    match Argon2::default().verify_password(password.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(ServiceError::InternalError(format!(
            "Password verification failed: {}",
            e
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{Request as HttpRequest, StatusCode},
        middleware,
        routing::get,
        Router,
    };
    use tower::ServiceExt;

    fn test_config(admin_secret: Option<&str>) -> AppConfig {
        let mut cfg = AppConfig::new(
            "sqlite::memory:".into(),
            "127.0.0.1".into(),
            0,
            "development".into(),
        );
        cfg.admin_secret = admin_secret.map(str::to_string);
        cfg
    }

    fn guarded_app(cfg: AppConfig) -> Router {
        Router::new()
            .route("/admin/ping", get(|| async { "pong" }))
            .route_layer(middleware::from_fn_with_state(cfg, admin_guard))
    }

    async fn hit(app: Router, secret_header: Option<&str>) -> StatusCode {
        let mut builder = HttpRequest::builder().uri("/admin/ping").method("GET");
        if let Some(secret) = secret_header {
            builder = builder.header(ADMIN_SECRET_HEADER, secret);
        }
        let response = app
            .oneshot(builder.body(Body::empty()).unwrap())
            .await
            .unwrap();
        response.status()
    }

    #[tokio::test]
    async fn unconfigured_secret_rejects_every_request_with_500() {
        let app = guarded_app(test_config(None));
        assert_eq!(
            hit(app.clone(), None).await,
            StatusCode::INTERNAL_SERVER_ERROR
        );
        // Guessing a value does not help when no secret is configured
        assert_eq!(
            hit(app, Some("any-guess")).await,
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[tokio::test]
    async fn blank_configured_secret_counts_as_unconfigured() {
        let app = guarded_app(test_config(Some("   ")));
        assert_eq!(
            hit(app, Some("   ")).await,
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[tokio::test]
    async fn matching_secret_is_allowed() {
        let app = guarded_app(test_config(Some("s3cret")));
        assert_eq!(hit(app, Some("s3cret")).await, StatusCode::OK);
    }

    #[tokio::test]
    async fn wrong_or_missing_secret_is_unauthorized() {
        let app = guarded_app(test_config(Some("s3cret")));
        assert_eq!(
            hit(app.clone(), Some("wrong")).await,
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(hit(app, None).await, StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn password_hash_roundtrip() {
        let hash = hash_password("hunter2-but-long").unwrap();
        assert!(hash.starts_with("$argon2"));
        assert!(verify_password("hunter2-but-long", &hash).unwrap());
        assert!(!verify_password("wrong-password", &hash).unwrap());
    }

    #[test]
    fn password_hashes_are_salted() {
        let first = hash_password("same-password").unwrap();
        let second = hash_password("same-password").unwrap();
        assert_ne!(first, second);
    }
}

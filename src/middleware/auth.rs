//! # Authentication Middleware
//!
//! This module contains the middleware guarding the three route groups:
//! user routes (JWT access token), admin routes (static admin token) and
//! webhook routes (shared secret header).

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{HeaderMap, header},
    middleware::Next,
    response::Response,
};
use secrecy::{ExposeSecret, SecretString};
use subtle::ConstantTimeEq;
use tracing::{debug, error, instrument, trace, warn};
use uuid::Uuid;

use crate::error::AppError;
use crate::models::AppState;
use crate::utils::constant::WEBHOOK_SECRET_HEADER;

/// Authenticated user information available to handlers
///
/// This struct is inserted into request extensions by [`auth_middleware`]
/// and can be extracted by route handlers that need user context.
#[derive(Debug, Clone)]
pub struct AuthUser {
    /// Unique identifier for the authenticated user
    pub user_id: Uuid,
}

fn bearer_token(headers: &HeaderMap) -> Result<&str, AppError> {
    let Some(auth_header) = headers
        .get(header::AUTHORIZATION)
        .and_then(|header| header.to_str().ok())
    else {
        warn!("Missing Authorization header");
        return Err(AppError::Unauthorized("Missing Authorization header"));
    };

    auth_header.strip_prefix("Bearer ").ok_or_else(|| {
        warn!("Invalid Authorization header format");
        AppError::Unauthorized("Invalid Authorization header")
    })
}

/// Compares in constant time with respect to the secret's contents.
fn matches_secret(candidate: &str, secret: &SecretString) -> bool {
    let equal: bool = candidate
        .as_bytes()
        .ct_eq(secret.expose_secret().as_bytes())
        .into();
    !candidate.is_empty() && equal
}

/// Validates the JWT access token and adds [`AuthUser`] to the request.
///
/// # Returns
///
/// - **Success**: Continues to next handler with user context
/// - **Failure**: `401 Unauthorized` for invalid/missing tokens
#[instrument(
    skip_all,
    fields(
        method = %req.method(),
        uri = %req.uri(),
        request_id = %uuid::Uuid::new_v4()
    )
)]
pub async fn auth_middleware(
    State(state): State<Arc<AppState>>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    trace!("Processing authentication middleware");

    let token = bearer_token(req.headers())?;

    match state.jwt_service.validate_access_token(token) {
        Ok(claims) => {
            let user_id = Uuid::try_parse(&claims.sub).map_err(|e| {
                error!(error = %e, "Failed to parse user ID from token claims");
                AppError::Unauthorized("Invalid token")
            })?;

            debug!(user_id = %user_id, "Authentication successful");
            req.extensions_mut().insert(AuthUser { user_id });
            Ok(next.run(req).await)
        }
        Err(e) => {
            warn!(error = %e, "Token validation failed");
            Err(AppError::Unauthorized("Invalid token"))
        }
    }
}

/// Lets the request through only with `Authorization: Bearer <ADMIN_TOKEN>`.
#[instrument(skip_all, fields(method = %req.method(), uri = %req.uri()))]
pub async fn admin_middleware(
    State(state): State<Arc<AppState>>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = bearer_token(req.headers())?;

    if !matches_secret(token, &state.admin_token) {
        warn!("Rejected admin request with wrong token");
        return Err(AppError::Unauthorized("Invalid admin token"));
    }

    Ok(next.run(req).await)
}

/// Lets the request through only with the shared webhook secret header.
#[instrument(skip_all, fields(method = %req.method(), uri = %req.uri()))]
pub async fn webhook_middleware(
    State(state): State<Arc<AppState>>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let provided = req
        .headers()
        .get(WEBHOOK_SECRET_HEADER)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();

    if !matches_secret(provided, &state.webhook_secret) {
        warn!("Rejected webhook call with wrong secret");
        return Err(AppError::Unauthorized("Invalid webhook secret"));
    }

    Ok(next.run(req).await)
}

#[cfg(test)]
mod tests {
    use axum::http::HeaderValue;

    use super::*;

    #[test]
    fn bearer_token_extraction() {
        let mut headers = HeaderMap::new();
        assert!(bearer_token(&headers).is_err());

        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Basic abc"));
        assert!(bearer_token(&headers).is_err());

        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer abc"));
        assert_eq!(bearer_token(&headers).unwrap(), "abc");
    }

    #[test]
    fn empty_secret_never_matches() {
        let empty = SecretString::from(String::new());
        assert!(!matches_secret("", &empty));

        let secret = SecretString::from("s3cret".to_string());
        assert!(matches_secret("s3cret", &secret));
        assert!(!matches_secret("other", &secret));
    }

    #[test]
    fn secret_prefixes_and_extensions_are_rejected() {
        let secret = SecretString::from("s3cret".to_string());

        assert!(!matches_secret("s3cre", &secret));
        assert!(!matches_secret("s3cret!", &secret));
        assert!(!matches_secret("S3CRET", &secret));
    }
}

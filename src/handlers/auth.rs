//! # Signup Handler
//!
//! Registers parents and nannies. New accounts start in `PENDING_PAYMENT`
//! and receive an access token for the user routes right away.

use std::sync::Arc;

use axum::{Json, extract::State, http::StatusCode};
use serde::{Deserialize, Serialize};
use tracing::{error, info, instrument};
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::models::{AppState, ProfileFields, User, UserRole};
use crate::repository::NewUser;

/// Request payload for user signup
#[derive(Debug, Deserialize, Validate)]
pub struct SignupRequest {
    #[validate(email)]
    pub email: String,
    pub role: UserRole,
    /// Optional profile created alongside the account, never complete
    #[validate(nested)]
    pub profile: Option<ProfileFields>,
}

/// Response for a successful signup
#[derive(Debug, Serialize, Deserialize)]
pub struct SignupResponse {
    pub user: User,
    pub access_token: String,
    pub expires_in: u64,
}

/// Creates a user account.
///
/// POST /api/auth/signup
///
/// # Returns
///
/// - `201 Created` with [`SignupResponse`]
/// - `400 Bad Request` - Invalid email or profile fields
/// - `409 Conflict` - Email already registered
/// - `500 Internal Server Error` - Database or token error
#[instrument(skip_all, fields(request_id = %uuid::Uuid::new_v4()))]
pub async fn signup(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<SignupRequest>,
) -> AppResult<(StatusCode, Json<SignupResponse>)> {
    payload.validate()?;

    let user = state
        .store
        .create_user(NewUser {
            email: payload.email,
            role: payload.role,
            profile: payload.profile,
        })
        .await?;

    let token = state
        .jwt_service
        .create_access_token(user.id)
        .map_err(|e| {
            error!(error = %e, "Failed to create access token");
            AppError::Internal
        })?;

    info!(user_id = %user.id, role = ?user.role, "User signed up");
    Ok((
        StatusCode::CREATED,
        Json(SignupResponse {
            user,
            access_token: token.access_token,
            expires_in: token.expires_in,
        }),
    ))
}

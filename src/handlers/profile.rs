//! # Self-Service Handlers
//!
//! Endpoints an authenticated user calls about their own account: reading
//! the account, editing the profile text and checking service access.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Extension, State},
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::middleware::AuthUser;
use crate::models::{AppState, ProfileFields, User};

/// Gets the authenticated user's account and profile.
///
/// GET /api/me
#[instrument(
    skip_all,
    fields(
        user_id = %user.user_id,
        request_id = %uuid::Uuid::new_v4()
    )
)]
pub async fn get_me(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> AppResult<Json<User>> {
    debug!("Processing account request");
    Ok(Json(state.gate.user(user.user_id).await?))
}

/// Creates or updates the authenticated user's profile text.
///
/// PUT /api/profile
///
/// Editing never changes the completeness flag; only admin approval sets it.
#[instrument(
    skip_all,
    fields(
        user_id = %user.user_id,
        request_id = %uuid::Uuid::new_v4()
    )
)]
pub async fn update_profile(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(fields): Json<ProfileFields>,
) -> AppResult<Json<User>> {
    fields.validate()?;

    if !state.store.upsert_profile(user.user_id, fields).await? {
        warn!("Profile owner no longer exists");
        return Err(AppError::NotFound("User not found"));
    }

    info!("Profile saved");
    Ok(Json(state.gate.user(user.user_id).await?))
}

/// Service-access answer for one user
#[derive(Debug, Serialize, Deserialize)]
pub struct AccessResponse {
    pub user_id: Uuid,
    pub can_access_services: bool,
}

/// Tells the authenticated user whether they may use platform features.
///
/// GET /api/access
#[instrument(
    skip_all,
    fields(
        user_id = %user.user_id,
        request_id = %uuid::Uuid::new_v4()
    )
)]
pub async fn get_access(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> AppResult<Json<AccessResponse>> {
    let can_access_services = state.gate.can_access_services(user.user_id).await?;
    debug!(can_access_services, "Access evaluated");

    Ok(Json(AccessResponse {
        user_id: user.user_id,
        can_access_services,
    }))
}

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
};
use serde::{Deserialize, Serialize};
use tracing::instrument;
use uuid::Uuid;

use crate::error::AppResult;
use crate::models::{AppState, BackgroundStatus, User};

/// Admin endpoint approving a user's profile
#[instrument(skip(state), fields(request_id = %uuid::Uuid::new_v4()))]
pub async fn approve_profile(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<Uuid>,
) -> AppResult<Json<User>> {
    Ok(Json(state.gate.approve_profile(user_id).await?))
}

/// Admin endpoint suspending an account
#[instrument(skip(state), fields(request_id = %uuid::Uuid::new_v4()))]
pub async fn suspend_user(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<Uuid>,
) -> AppResult<Json<User>> {
    Ok(Json(state.gate.suspend(user_id).await?))
}

/// Admin endpoint lifting a suspension
#[instrument(skip(state), fields(request_id = %uuid::Uuid::new_v4()))]
pub async fn reactivate_user(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<Uuid>,
) -> AppResult<Json<User>> {
    Ok(Json(state.gate.reactivate(user_id).await?))
}

/// Request payload for a background status override
#[derive(Debug, Serialize, Deserialize)]
pub struct BackgroundStatusRequest {
    pub status: BackgroundStatus,
}

/// Admin endpoint overriding the background-check result
#[instrument(skip(state), fields(request_id = %uuid::Uuid::new_v4()))]
pub async fn set_background_status(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<Uuid>,
    Json(payload): Json<BackgroundStatusRequest>,
) -> AppResult<Json<User>> {
    Ok(Json(
        state
            .gate
            .set_background_status(user_id, payload.status)
            .await?,
    ))
}

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
};
use tracing::instrument;
use uuid::Uuid;

use crate::error::AppResult;
use crate::handlers::AccessResponse;
use crate::models::{AppState, User};

/// Admin endpoint returning a user with its profile
#[instrument(skip(state), fields(request_id = %uuid::Uuid::new_v4()))]
pub async fn get_user_detail(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<Uuid>,
) -> AppResult<Json<User>> {
    Ok(Json(state.gate.user(user_id).await?))
}

/// Admin endpoint evaluating the service-access gate for a user
#[instrument(skip(state), fields(request_id = %uuid::Uuid::new_v4()))]
pub async fn get_user_access(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<Uuid>,
) -> AppResult<Json<AccessResponse>> {
    let can_access_services = state.gate.can_access_services(user_id).await?;
    Ok(Json(AccessResponse {
        user_id,
        can_access_services,
    }))
}

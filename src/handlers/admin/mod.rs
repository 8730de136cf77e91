//! # Admin Handlers
//!
//! Review and moderation endpoints, guarded by the admin token.

mod action;
mod view;

use std::sync::Arc;

use axum::{
    Router,
    middleware::from_fn_with_state,
    routing::{get, post, put},
};

use crate::middleware::admin_middleware;
use crate::models::AppState;
use action::{approve_profile, reactivate_user, set_background_status, suspend_user};
use view::{get_user_access, get_user_detail};

/// Create the admin router with admin-specific routes
pub fn admin_router(state: Arc<AppState>) -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/admin/users/{user_id}", get(get_user_detail))
        .route("/api/admin/users/{user_id}/access", get(get_user_access))
        .route("/api/admin/users/{user_id}/approve", post(approve_profile))
        .route("/api/admin/users/{user_id}/suspend", post(suspend_user))
        .route(
            "/api/admin/users/{user_id}/reactivate",
            post(reactivate_user),
        )
        .route(
            "/api/admin/users/{user_id}/background-status",
            put(set_background_status),
        )
        .route_layer(from_fn_with_state(state, admin_middleware))
}

//! # nannyhub - Nanny Marketplace Backend
//!
//! Accounts, profiles and the gate deciding whether a user may use
//! interactive platform features.
//!
//! ## Modules
//!
//! - [`config`] - Environment configuration
//! - [`handlers`] - HTTP request handlers for various endpoints
//! - [`middleware`] - Authentication for user, admin and webhook routes
//! - [`models`] - Users, profiles and shared application state
//! - [`repository`] - Storage port and its PostgreSQL / in-memory implementations
//! - [`services`] - Account gate and JWT services
//! - [`telemetry`] - Tracing subscriber setup
//! - [`utils`] - Utility functions and constants

pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod repository;
pub mod services;
pub mod telemetry;
pub mod utils;

use std::sync::Arc;

use axum::{
    Router,
    middleware::from_fn_with_state,
    routing::{get, post, put},
};
use secrecy::{ExposeSecret, SecretString};
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::handlers::{
    admin_router, background_check_webhook, get_access, get_me, health_check, payment_webhook,
    signup, update_profile,
};
use crate::middleware::{auth_middleware, webhook_middleware};
use crate::models::AppState;
use crate::repository::UserStore;
use crate::services::jwt::JwtService;

/// Builds the shared state from configuration and a store.
pub fn build_state(store: Arc<dyn UserStore>, config: &Config) -> Arc<AppState> {
    Arc::new(AppState::new(
        store,
        JwtService::from_secret(&config.jwt_secret),
        SecretString::from(config.admin_token.expose_secret().to_owned()),
        SecretString::from(config.webhook_secret.expose_secret().to_owned()),
    ))
}

/// Creates an Axum router with application routes and state.
pub fn app(state: Arc<AppState>) -> Router {
    let protected_routes = Router::new()
        .route("/api/me", get(get_me))
        .route("/api/profile", put(update_profile))
        .route("/api/access", get(get_access))
        .route_layer(from_fn_with_state(Arc::clone(&state), auth_middleware));

    let webhook_routes = Router::new()
        .route("/api/webhooks/payment", post(payment_webhook))
        .route(
            "/api/webhooks/background-check",
            post(background_check_webhook),
        )
        .route_layer(from_fn_with_state(Arc::clone(&state), webhook_middleware));

    let public_routes = Router::new()
        .route("/health-check", get(health_check))
        .route("/api/auth/signup", post(signup));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .merge(webhook_routes)
        .merge(admin_router(Arc::clone(&state)))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

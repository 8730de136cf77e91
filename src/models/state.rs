use std::sync::Arc;

use secrecy::SecretString;
use tracing::info;

use crate::repository::UserStore;
use crate::services::{AccountGate, jwt::JwtService};

/// Application state shared across requests. Needs to be thread-safe.
pub struct AppState {
    /// Storage for users and profiles.
    pub store: Arc<dyn UserStore>,
    /// Service-access gate over the same store.
    pub gate: AccountGate,
    /// JWT service for token generation and validation.
    pub jwt_service: JwtService,
    /// Bearer token expected on admin routes.
    pub admin_token: SecretString,
    /// Shared secret expected on webhook routes.
    pub webhook_secret: SecretString,
}

impl AppState {
    pub fn new(
        store: Arc<dyn UserStore>,
        jwt_service: JwtService,
        admin_token: SecretString,
        webhook_secret: SecretString,
    ) -> Self {
        info!("Initializing application state");

        Self {
            gate: AccountGate::new(Arc::clone(&store)),
            store,
            jwt_service,
            admin_token,
            webhook_secret,
        }
    }
}

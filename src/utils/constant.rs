//! # Application Constants
//!
//! This module defines configuration constants used throughout the nannyhub
//! backend.

use std::time::Duration;

/// Expiration time for JWT access tokens
pub const ACCESS_TOKEN_EXPIRY: Duration = Duration::from_secs(60 * 60);

/// Header carrying the shared secret on webhook calls
pub const WEBHOOK_SECRET_HEADER: &str = "x-webhook-secret";

/// Listen address used when `BIND_ADDR` is not set
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8090";

/// Pool size used when `DB_MAX_CONNECTIONS` is not set
pub const DEFAULT_DB_MAX_CONNECTIONS: u32 = 10;

/// How long to wait for a pooled connection before failing a request
pub const DB_ACQUIRE_TIMEOUT: Duration = Duration::from_secs(5);

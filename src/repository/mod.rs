//! # User Storage
//!
//! This module defines the storage port used by the account gate and the
//! signup/profile handlers. Every operation is an identifier-keyed point
//! lookup or update on the `users` and `profiles` tables.
//!
//! ## Implementations
//!
//! - [`PgUserStore`] - PostgreSQL implementation used in production
//! - [`InMemoryUserStore`] - Concurrent map implementation for tests and local runs

mod memory;
mod postgres;

pub use memory::InMemoryUserStore;
pub use postgres::PgUserStore;

use async_trait::async_trait;
use thiserror::Error;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::models::{AccountStatus, BackgroundStatus, ProfileFields, User, UserRole};

/// Errors raised by a [`UserStore`].
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("conflict: {0}")]
    Conflict(&'static str),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Data needed to register a user.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub role: UserRole,
    pub profile: Option<ProfileFields>,
}

/// Outcome of an account status update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusChange {
    Applied,
    /// The user exists but was not in the expected status.
    Rejected(AccountStatus),
    Missing,
}

#[async_trait]
pub trait UserStore: Send + Sync {
    /// Inserts a user in its initial state, plus an incomplete profile when
    /// fields are given. Fails with [`StoreError::Conflict`] on a taken email.
    async fn create_user(&self, new_user: NewUser) -> Result<User, StoreError>;

    /// Fetches a user with its profile.
    async fn find_user(&self, user_id: Uuid) -> Result<Option<User>, StoreError>;

    /// Writes `status`, optionally only when the current status is `expected`.
    async fn set_account_status(
        &self,
        user_id: Uuid,
        status: AccountStatus,
        expected: Option<AccountStatus>,
    ) -> Result<StatusChange, StoreError>;

    /// Overwrites the background status. Returns false if the user is missing.
    async fn set_background_status(
        &self,
        user_id: Uuid,
        status: BackgroundStatus,
    ) -> Result<bool, StoreError>;

    /// Marks the profile complete (creating it if needed) and records the
    /// approval time if none is recorded yet, atomically.
    /// Returns false if the user is missing.
    async fn approve_profile(
        &self,
        user_id: Uuid,
        approved_at: OffsetDateTime,
    ) -> Result<bool, StoreError>;

    /// Creates or updates the free-text profile fields without touching the
    /// completeness flag. Returns false if the user is missing.
    async fn upsert_profile(
        &self,
        user_id: Uuid,
        fields: ProfileFields,
    ) -> Result<bool, StoreError>;
}

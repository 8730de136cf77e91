//! # User Types
//!
//! This module defines the user record read by the account gate and the
//! enums that correspond to the PostgreSQL `account_status`,
//! `background_status` and `user_role` enum types.

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use super::Profile;

/// Billing state of an account.
///
/// # Status Flow
///
/// - `PendingPayment` - Signed up, signup payment not confirmed yet
/// - `Active` - Signup payment confirmed
/// - `Suspended` - Disabled by an administrator, can be reactivated
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type, Serialize, Deserialize)]
#[sqlx(type_name = "account_status", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AccountStatus {
    PendingPayment,
    Active,
    Suspended,
}

impl std::fmt::Display for AccountStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let status_str = match self {
            AccountStatus::PendingPayment => "PENDING_PAYMENT",
            AccountStatus::Active => "ACTIVE",
            AccountStatus::Suspended => "SUSPENDED",
        };
        write!(f, "{status_str}")
    }
}

/// Result of the external background/reference check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type, Serialize, Deserialize)]
#[sqlx(type_name = "background_status", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BackgroundStatus {
    Pending,
    Passed,
    Failed,
}

impl std::fmt::Display for BackgroundStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let status_str = match self {
            BackgroundStatus::Pending => "PENDING",
            BackgroundStatus::Passed => "PASSED",
            BackgroundStatus::Failed => "FAILED",
        };
        write!(f, "{status_str}")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type, Serialize, Deserialize)]
#[sqlx(type_name = "user_role", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserRole {
    Parent,
    Nanny,
}

/// A persisted user together with its optional profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub role: UserRole,
    pub account_status: AccountStatus,
    pub background_status: BackgroundStatus,
    /// Set once by an administrator, never cleared.
    #[serde(with = "time::serde::rfc3339::option")]
    pub approved_at: Option<OffsetDateTime>,
    pub profile: Option<Profile>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl User {
    /// Returns true if the user may use interactive platform features.
    ///
    /// All four conditions must hold at once: the account is active, the
    /// profile exists and is complete, the background check passed, and an
    /// administrator approved the user.
    #[inline]
    pub fn can_access_services(&self) -> bool {
        self.account_status == AccountStatus::Active
            && self.profile.as_ref().is_some_and(|p| p.is_complete)
            && self.background_status == BackgroundStatus::Passed
            && self.approved_at.is_some()
    }
}

//! # Account Gate
//!
//! This module decides whether a user may use interactive platform features
//! and owns the transitions feeding that decision.
//!
//! ## Gating Dimensions
//!
//! | Dimension | States | Transitioned by |
//! |---|---|---|
//! | account status | `PENDING_PAYMENT` → `ACTIVE` ⇄ `SUSPENDED` | payment webhook, admin |
//! | profile completeness | false → true | admin approval |
//! | background status | `PENDING` → `PASSED` / `FAILED` | background-check webhook, admin |
//! | approval timestamp | null → timestamp | admin approval |
//!
//! Access is never stored; [`AccountGate::can_access_services`] recomputes it
//! from a fresh read on every call.

use std::sync::Arc;

use time::OffsetDateTime;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::models::{AccountStatus, BackgroundStatus, User};
use crate::repository::{StatusChange, UserStore};

/// Service-access gate over a [`UserStore`].
#[derive(Clone)]
pub struct AccountGate {
    store: Arc<dyn UserStore>,
}

impl AccountGate {
    pub fn new(store: Arc<dyn UserStore>) -> Self {
        Self { store }
    }

    /// Loads the user or fails with [`AppError::NotFound`].
    pub async fn user(&self, user_id: Uuid) -> AppResult<User> {
        match self.store.find_user(user_id).await? {
            Some(user) => Ok(user),
            None => {
                warn!(%user_id, "User not found");
                Err(AppError::NotFound("User not found"))
            }
        }
    }

    /// Admin approval: completes the profile (creating it if absent) and
    /// records the approval time. Repeating it changes nothing; the first
    /// approval time is kept.
    #[instrument(skip(self))]
    pub async fn approve_profile(&self, user_id: Uuid) -> AppResult<User> {
        if !self
            .store
            .approve_profile(user_id, OffsetDateTime::now_utc())
            .await?
        {
            warn!("Cannot approve missing user");
            return Err(AppError::NotFound("User not found"));
        }

        let user = self.user(user_id).await?;
        info!(approved_at = ?user.approved_at, "Profile approved");
        Ok(user)
    }

    /// Activates the account after a confirmed signup payment.
    ///
    /// Applies to every prior status, including `SUSPENDED`.
    #[instrument(skip(self))]
    pub async fn activate_after_payment(&self, user_id: Uuid) -> AppResult<User> {
        let previous = self.user(user_id).await?.account_status;
        if previous == AccountStatus::Suspended {
            warn!("Payment confirmation reactivates a suspended account");
        }

        self.set_account_status(user_id, AccountStatus::Active, None)
            .await?;
        let user = self.user(user_id).await?;
        info!(%previous, "Account activated after payment");
        Ok(user)
    }

    /// Returns true iff the account is active, the profile is complete, the
    /// background check passed and an administrator approved the user.
    #[instrument(skip(self))]
    pub async fn can_access_services(&self, user_id: Uuid) -> AppResult<bool> {
        let user = self.user(user_id).await?;
        Ok(user.can_access_services())
    }

    /// Overwrites the background status. Approval and account status are left
    /// as they are.
    #[instrument(skip(self))]
    pub async fn set_background_status(
        &self,
        user_id: Uuid,
        status: BackgroundStatus,
    ) -> AppResult<User> {
        if !self.store.set_background_status(user_id, status).await? {
            warn!("Cannot set background status of missing user");
            return Err(AppError::NotFound("User not found"));
        }

        let user = self.user(user_id).await?;
        info!("Background status updated");
        Ok(user)
    }

    /// Admin suspension, from any status.
    #[instrument(skip(self))]
    pub async fn suspend(&self, user_id: Uuid) -> AppResult<User> {
        self.set_account_status(user_id, AccountStatus::Suspended, None)
            .await?;
        let user = self.user(user_id).await?;
        info!("Account suspended");
        Ok(user)
    }

    /// Admin reactivation. Only `SUSPENDED` accounts can be reactivated, so
    /// an unpaid account cannot be activated this way.
    #[instrument(skip(self))]
    pub async fn reactivate(&self, user_id: Uuid) -> AppResult<User> {
        self.set_account_status(
            user_id,
            AccountStatus::Active,
            Some(AccountStatus::Suspended),
        )
        .await?;
        let user = self.user(user_id).await?;
        info!("Account reactivated");
        Ok(user)
    }

    async fn set_account_status(
        &self,
        user_id: Uuid,
        status: AccountStatus,
        expected: Option<AccountStatus>,
    ) -> AppResult<()> {
        match self
            .store
            .set_account_status(user_id, status, expected)
            .await?
        {
            StatusChange::Applied => Ok(()),
            StatusChange::Rejected(current) => {
                warn!(%current, target = %status, "Account status transition rejected");
                Err(AppError::BadRequest("Account is not suspended"))
            }
            StatusChange::Missing => {
                warn!(%user_id, "User not found");
                Err(AppError::NotFound("User not found"))
            }
        }
    }
}

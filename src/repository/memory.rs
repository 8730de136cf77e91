use async_trait::async_trait;
use dashmap::{DashMap, mapref::entry::Entry};
use time::OffsetDateTime;
use tracing::{debug, instrument};
use uuid::Uuid;

use super::{NewUser, StatusChange, StoreError, UserStore};
use crate::models::{AccountStatus, BackgroundStatus, Profile, ProfileFields, User};

/// [`UserStore`] backed by concurrent maps.
///
/// Every mutation happens while holding the user's map entry, so the
/// two writes of an approval are applied together.
#[derive(Debug, Default)]
pub struct InMemoryUserStore {
    users: DashMap<Uuid, User>,
    /// email -> user id, enforces the unique email constraint
    emails: DashMap<String, Uuid>,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}

fn new_profile(user_id: Uuid, fields: ProfileFields, now: OffsetDateTime) -> Profile {
    Profile {
        id: Uuid::new_v4(),
        user_id,
        headline: fields.headline,
        bio: fields.bio,
        location: fields.location,
        is_complete: false,
        created_at: now,
        updated_at: now,
    }
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    #[instrument(skip_all, fields(email = %new_user.email))]
    async fn create_user(&self, new_user: NewUser) -> Result<User, StoreError> {
        let email = new_user.email.to_ascii_lowercase();
        let id = Uuid::new_v4();

        match self.emails.entry(email.clone()) {
            Entry::Occupied(_) => {
                debug!("Email already present");
                return Err(StoreError::Conflict("Email already registered"));
            }
            Entry::Vacant(slot) => {
                slot.insert(id);
            }
        }

        let now = OffsetDateTime::now_utc();
        let user = User {
            id,
            email,
            role: new_user.role,
            account_status: AccountStatus::PendingPayment,
            background_status: BackgroundStatus::Pending,
            approved_at: None,
            profile: new_user.profile.map(|fields| new_profile(id, fields, now)),
            created_at: now,
            updated_at: now,
        };
        self.users.insert(id, user.clone());

        Ok(user)
    }

    async fn find_user(&self, user_id: Uuid) -> Result<Option<User>, StoreError> {
        Ok(self.users.get(&user_id).map(|u| u.clone()))
    }

    async fn set_account_status(
        &self,
        user_id: Uuid,
        status: AccountStatus,
        expected: Option<AccountStatus>,
    ) -> Result<StatusChange, StoreError> {
        let Some(mut user) = self.users.get_mut(&user_id) else {
            return Ok(StatusChange::Missing);
        };

        if expected.is_some_and(|expected| user.account_status != expected) {
            return Ok(StatusChange::Rejected(user.account_status));
        }

        user.account_status = status;
        user.updated_at = OffsetDateTime::now_utc();
        Ok(StatusChange::Applied)
    }

    async fn set_background_status(
        &self,
        user_id: Uuid,
        status: BackgroundStatus,
    ) -> Result<bool, StoreError> {
        let Some(mut user) = self.users.get_mut(&user_id) else {
            return Ok(false);
        };

        user.background_status = status;
        user.updated_at = OffsetDateTime::now_utc();
        Ok(true)
    }

    async fn approve_profile(
        &self,
        user_id: Uuid,
        approved_at: OffsetDateTime,
    ) -> Result<bool, StoreError> {
        let Some(mut entry) = self.users.get_mut(&user_id) else {
            return Ok(false);
        };
        let user = entry.value_mut();

        let now = OffsetDateTime::now_utc();
        let profile = user
            .profile
            .get_or_insert_with(|| new_profile(user_id, ProfileFields::default(), now));
        if !profile.is_complete {
            profile.is_complete = true;
            profile.updated_at = now;
        }

        if user.approved_at.is_none() {
            user.approved_at = Some(approved_at);
            user.updated_at = now;
        }

        Ok(true)
    }

    async fn upsert_profile(
        &self,
        user_id: Uuid,
        fields: ProfileFields,
    ) -> Result<bool, StoreError> {
        let Some(mut entry) = self.users.get_mut(&user_id) else {
            return Ok(false);
        };
        let user = entry.value_mut();

        let now = OffsetDateTime::now_utc();
        match user.profile.as_mut() {
            Some(profile) => {
                profile.headline = fields.headline;
                profile.bio = fields.bio;
                profile.location = fields.location;
                profile.updated_at = now;
            }
            None => user.profile = Some(new_profile(user_id, fields, now)),
        }

        Ok(true)
    }
}

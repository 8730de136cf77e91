use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;
use validator::Validate;

/// A user's public profile. Each user owns at most one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub id: Uuid,
    pub user_id: Uuid,
    pub headline: Option<String>,
    pub bio: Option<String>,
    pub location: Option<String>,
    /// Only flipped to true by admin approval.
    pub is_complete: bool,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

/// Free-text profile fields a user may write themselves.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
pub struct ProfileFields {
    #[validate(length(max = 120))]
    pub headline: Option<String>,
    #[validate(length(max = 4000))]
    pub bio: Option<String>,
    #[validate(length(max = 120))]
    pub location: Option<String>,
}

use async_trait::async_trait;
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use tracing::{debug, instrument, warn};
use uuid::Uuid;

use super::{NewUser, StatusChange, StoreError, UserStore};
use crate::models::{AccountStatus, BackgroundStatus, Profile, ProfileFields, User, UserRole};

const SELECT_USER: &str = r#"
    SELECT
        u.id, u.email, u.role, u.account_status, u.background_status,
        u.approved_at, u.created_at, u.updated_at,
        p.id AS profile_id, p.headline, p.bio, p.location, p.is_complete,
        p.created_at AS profile_created_at, p.updated_at AS profile_updated_at
    FROM users u
    LEFT JOIN profiles p ON p.user_id = u.id
    WHERE u.id = $1
"#;

/// [`UserStore`] backed by PostgreSQL.
#[derive(Debug, Clone)]
pub struct PgUserStore {
    db_pool: PgPool,
}

impl PgUserStore {
    pub fn new(db_pool: PgPool) -> Self {
        Self { db_pool }
    }
}

#[derive(FromRow)]
struct UserRow {
    id: Uuid,
    email: String,
    role: UserRole,
    account_status: AccountStatus,
    background_status: BackgroundStatus,
    approved_at: Option<OffsetDateTime>,
    created_at: OffsetDateTime,
    updated_at: OffsetDateTime,
    profile_id: Option<Uuid>,
    headline: Option<String>,
    bio: Option<String>,
    location: Option<String>,
    is_complete: Option<bool>,
    profile_created_at: Option<OffsetDateTime>,
    profile_updated_at: Option<OffsetDateTime>,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        // LEFT JOIN: every profile column is null when there is no profile
        let profile = match (
            row.profile_id,
            row.is_complete,
            row.profile_created_at,
            row.profile_updated_at,
        ) {
            (Some(id), Some(is_complete), Some(created_at), Some(updated_at)) => Some(Profile {
                id,
                user_id: row.id,
                headline: row.headline,
                bio: row.bio,
                location: row.location,
                is_complete,
                created_at,
                updated_at,
            }),
            _ => None,
        };

        User {
            id: row.id,
            email: row.email,
            role: row.role,
            account_status: row.account_status,
            background_status: row.background_status,
            approved_at: row.approved_at,
            profile,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

fn is_unique_violation(e: &sqlx::Error) -> bool {
    e.as_database_error()
        .is_some_and(|db_err| db_err.is_unique_violation())
}

fn is_foreign_key_violation(e: &sqlx::Error) -> bool {
    e.as_database_error()
        .is_some_and(|db_err| db_err.is_foreign_key_violation())
}

#[async_trait]
impl UserStore for PgUserStore {
    #[instrument(skip_all, fields(email = %new_user.email))]
    async fn create_user(&self, new_user: NewUser) -> Result<User, StoreError> {
        let mut tx = self.db_pool.begin().await?;

        let user_id = sqlx::query_scalar::<_, Uuid>(
            r#"INSERT INTO users (email, role) VALUES ($1, $2) RETURNING id"#,
        )
        .bind(new_user.email.to_ascii_lowercase())
        .bind(new_user.role)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                debug!("Email already present");
                StoreError::Conflict("Email already registered")
            } else {
                StoreError::Database(e)
            }
        })?;

        if let Some(fields) = new_user.profile {
            sqlx::query(
                r#"INSERT INTO profiles (user_id, headline, bio, location) VALUES ($1, $2, $3, $4)"#,
            )
            .bind(user_id)
            .bind(fields.headline)
            .bind(fields.bio)
            .bind(fields.location)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        self.find_user(user_id).await?.ok_or_else(|| {
            warn!(%user_id, "User vanished right after creation");
            StoreError::Database(sqlx::Error::RowNotFound)
        })
    }

    async fn find_user(&self, user_id: Uuid) -> Result<Option<User>, StoreError> {
        let row = sqlx::query_as::<_, UserRow>(SELECT_USER)
            .bind(user_id)
            .fetch_optional(&self.db_pool)
            .await?;

        Ok(row.map(User::from))
    }

    async fn set_account_status(
        &self,
        user_id: Uuid,
        status: AccountStatus,
        expected: Option<AccountStatus>,
    ) -> Result<StatusChange, StoreError> {
        let updated = sqlx::query_scalar::<_, Uuid>(
            r#"
            UPDATE users SET account_status = $2, updated_at = NOW()
            WHERE id = $1 AND ($3::account_status IS NULL OR account_status = $3)
            RETURNING id
            "#,
        )
        .bind(user_id)
        .bind(status)
        .bind(expected)
        .fetch_optional(&self.db_pool)
        .await?;

        if updated.is_some() {
            return Ok(StatusChange::Applied);
        }

        let current = sqlx::query_scalar::<_, AccountStatus>(
            r#"SELECT account_status FROM users WHERE id = $1"#,
        )
        .bind(user_id)
        .fetch_optional(&self.db_pool)
        .await?;

        Ok(match current {
            Some(current) => StatusChange::Rejected(current),
            None => StatusChange::Missing,
        })
    }

    async fn set_background_status(
        &self,
        user_id: Uuid,
        status: BackgroundStatus,
    ) -> Result<bool, StoreError> {
        let result = sqlx::query(
            r#"UPDATE users SET background_status = $2, updated_at = NOW() WHERE id = $1"#,
        )
        .bind(user_id)
        .bind(status)
        .execute(&self.db_pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn approve_profile(
        &self,
        user_id: Uuid,
        approved_at: OffsetDateTime,
    ) -> Result<bool, StoreError> {
        // Dropping the transaction without commit rolls it back
        let mut tx = self.db_pool.begin().await?;

        let result = sqlx::query(
            r#"
            UPDATE users
            SET approved_at = COALESCE(approved_at, $2),
                updated_at = CASE WHEN approved_at IS NULL THEN NOW() ELSE updated_at END
            WHERE id = $1
            "#,
        )
        .bind(user_id)
        .bind(approved_at)
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() == 0 {
            return Ok(false);
        }

        sqlx::query(
            r#"
            INSERT INTO profiles (user_id, is_complete) VALUES ($1, TRUE)
            ON CONFLICT (user_id) DO UPDATE
            SET is_complete = TRUE,
                updated_at = CASE WHEN profiles.is_complete THEN profiles.updated_at ELSE NOW() END
            "#,
        )
        .bind(user_id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(true)
    }

    async fn upsert_profile(
        &self,
        user_id: Uuid,
        fields: ProfileFields,
    ) -> Result<bool, StoreError> {
        let result = sqlx::query(
            r#"
            INSERT INTO profiles (user_id, headline, bio, location) VALUES ($1, $2, $3, $4)
            ON CONFLICT (user_id) DO UPDATE
            SET headline = EXCLUDED.headline,
                bio = EXCLUDED.bio,
                location = EXCLUDED.location,
                updated_at = NOW()
            "#,
        )
        .bind(user_id)
        .bind(fields.headline)
        .bind(fields.bio)
        .bind(fields.location)
        .execute(&self.db_pool)
        .await;

        match result {
            Ok(_) => Ok(true),
            Err(e) if is_foreign_key_violation(&e) => Ok(false),
            Err(e) => Err(e.into()),
        }
    }
}

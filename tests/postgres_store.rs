mod common;

use nannyhub::models::{AccountStatus, BackgroundStatus, ProfileFields, User, UserRole};
use nannyhub::repository::{NewUser, PgUserStore, StatusChange, StoreError, UserStore};
use nannyhub::services::AccountGate;
use reqwest::StatusCode;
use serde_json::json;
use sqlx::PgPool;
use std::sync::Arc;
use time::OffsetDateTime;
use uuid::Uuid;

use common::spawn_app_with_pool;

fn nanny(email: &str) -> NewUser {
    NewUser {
        email: email.to_string(),
        role: UserRole::Nanny,
        profile: None,
    }
}

fn nanny_with_headline(email: &str, headline: &str) -> NewUser {
    NewUser {
        profile: Some(ProfileFields {
            headline: Some(headline.to_string()),
            ..Default::default()
        }),
        ..nanny(email)
    }
}

#[sqlx::test]
async fn create_and_find_user(db_pool: PgPool) {
    let store = PgUserStore::new(db_pool);

    let user = store
        .create_user(nanny_with_headline("Nanny@Example.com", "Bilingual"))
        .await
        .unwrap();

    assert_eq!(user.email, "nanny@example.com");
    assert_eq!(user.account_status, AccountStatus::PendingPayment);
    assert_eq!(user.background_status, BackgroundStatus::Pending);
    let profile = user.profile.unwrap();
    assert!(!profile.is_complete);
    assert_eq!(profile.headline.as_deref(), Some("Bilingual"));

    assert!(store.find_user(Uuid::new_v4()).await.unwrap().is_none());
}

#[sqlx::test]
async fn duplicate_email_conflicts(db_pool: PgPool) {
    let store = PgUserStore::new(db_pool);
    store.create_user(nanny("a@example.com")).await.unwrap();

    let err = store.create_user(nanny("A@example.com")).await.unwrap_err();
    assert!(matches!(err, StoreError::Conflict(_)));
}

#[sqlx::test]
async fn approval_upserts_profile_and_keeps_first_timestamp(db_pool: PgPool) {
    let store = PgUserStore::new(db_pool);
    let user = store.create_user(nanny("a@example.com")).await.unwrap();

    assert!(
        store
            .approve_profile(user.id, OffsetDateTime::now_utc())
            .await
            .unwrap()
    );
    let first = store.find_user(user.id).await.unwrap().unwrap();
    assert!(first.profile.as_ref().unwrap().is_complete);
    assert!(first.approved_at.is_some());

    assert!(
        store
            .approve_profile(user.id, OffsetDateTime::now_utc())
            .await
            .unwrap()
    );
    let second = store.find_user(user.id).await.unwrap().unwrap();
    assert_eq!(first, second);

    assert!(
        !store
            .approve_profile(Uuid::new_v4(), OffsetDateTime::now_utc())
            .await
            .unwrap()
    );
}

#[sqlx::test]
async fn approval_completes_existing_profile_in_place(db_pool: PgPool) {
    let store = PgUserStore::new(db_pool);
    let user = store
        .create_user(nanny_with_headline("a@example.com", "Night shifts"))
        .await
        .unwrap();
    let before = user.profile.unwrap();
    assert!(!before.is_complete);

    assert!(
        store
            .approve_profile(user.id, OffsetDateTime::now_utc())
            .await
            .unwrap()
    );

    let after = store
        .find_user(user.id)
        .await
        .unwrap()
        .unwrap()
        .profile
        .unwrap();
    assert_eq!(after.id, before.id);
    assert!(after.is_complete);
    assert_eq!(after.headline.as_deref(), Some("Night shifts"));
    assert_eq!(after.created_at, before.created_at);
}

#[sqlx::test]
async fn profile_edit_after_approval_stays_complete(db_pool: PgPool) {
    let store = PgUserStore::new(db_pool);
    let user = store.create_user(nanny("a@example.com")).await.unwrap();
    store
        .approve_profile(user.id, OffsetDateTime::now_utc())
        .await
        .unwrap();

    let fields = ProfileFields {
        headline: Some("Weekend sitter".to_string()),
        location: Some("Lyon".to_string()),
        ..Default::default()
    };
    assert!(store.upsert_profile(user.id, fields).await.unwrap());

    let user = store.find_user(user.id).await.unwrap().unwrap();
    let profile = user.profile.unwrap();
    assert!(profile.is_complete);
    assert_eq!(profile.headline.as_deref(), Some("Weekend sitter"));
    assert_eq!(profile.location.as_deref(), Some("Lyon"));
    assert!(user.approved_at.is_some());
}

#[sqlx::test]
async fn conditional_status_update(db_pool: PgPool) {
    let store = PgUserStore::new(db_pool);
    let user = store.create_user(nanny("a@example.com")).await.unwrap();

    let change = store
        .set_account_status(
            user.id,
            AccountStatus::Active,
            Some(AccountStatus::Suspended),
        )
        .await
        .unwrap();
    assert_eq!(
        change,
        StatusChange::Rejected(AccountStatus::PendingPayment)
    );

    let change = store
        .set_account_status(user.id, AccountStatus::Suspended, None)
        .await
        .unwrap();
    assert_eq!(change, StatusChange::Applied);

    let change = store
        .set_account_status(Uuid::new_v4(), AccountStatus::Active, None)
        .await
        .unwrap();
    assert_eq!(change, StatusChange::Missing);
}

#[sqlx::test]
async fn profile_upsert_for_missing_user_reports_missing(db_pool: PgPool) {
    let store = PgUserStore::new(db_pool);

    let saved = store
        .upsert_profile(Uuid::new_v4(), ProfileFields::default())
        .await
        .unwrap();
    assert!(!saved);
}

#[sqlx::test]
async fn gate_scenario_on_postgres(db_pool: PgPool) {
    let store = Arc::new(PgUserStore::new(db_pool));
    let user = store.create_user(nanny("a@example.com")).await.unwrap();
    let gate = AccountGate::new(store);

    assert!(!gate.can_access_services(user.id).await.unwrap());
    gate.activate_after_payment(user.id).await.unwrap();
    gate.set_background_status(user.id, BackgroundStatus::Passed)
        .await
        .unwrap();
    gate.approve_profile(user.id).await.unwrap();
    assert!(gate.can_access_services(user.id).await.unwrap());

    gate.set_background_status(user.id, BackgroundStatus::Failed)
        .await
        .unwrap();
    assert!(!gate.can_access_services(user.id).await.unwrap());
}

#[sqlx::test]
async fn onboarding_over_http_on_postgres(db_pool: PgPool) {
    let app = spawn_app_with_pool(db_pool).await;
    let signup = app.signup("nanny@example.com", "NANNY").await;
    let user_id = signup.user.id;
    assert!(!app.can_access(&signup.access_token).await);

    let response = app.payment_webhook(user_id, "succeeded").await;
    assert_eq!(response.status(), StatusCode::OK);
    let response = app
        .background_webhook(user_id, BackgroundStatus::Passed)
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let response = app.admin_post(user_id, "approve").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(app.can_access(&signup.access_token).await);

    let response = app
        .client
        .put(format!("{}/api/profile", app.address))
        .bearer_auth(&signup.access_token)
        .json(&json!({ "headline": "Infant care", "location": "Lyon" }))
        .send()
        .await
        .expect("Failed to update profile");
    assert_eq!(response.status(), StatusCode::OK);
    let user: User = response.json().await.unwrap();
    let profile = user.profile.as_ref().unwrap();
    assert!(profile.is_complete);
    assert_eq!(profile.headline.as_deref(), Some("Infant care"));
    assert!(app.can_access(&signup.access_token).await);

    let stored = app.store.find_user(user_id).await.unwrap().unwrap();
    assert_eq!(stored, user);
}

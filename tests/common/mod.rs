#![allow(dead_code)]

use std::sync::{Arc, Once};

use nannyhub::{
    handlers::SignupResponse,
    models::{AppState, BackgroundStatus, User},
    repository::{InMemoryUserStore, PgUserStore, UserStore},
    services::jwt::JwtService,
};
use reqwest::StatusCode;
use secrecy::SecretString;
use serde_json::{Value, json};
use sqlx::PgPool;
use tokio::net::TcpListener;
use uuid::Uuid;

pub const ADMIN_TOKEN: &str = "test-admin-token";
pub const WEBHOOK_SECRET: &str = "test-webhook-secret";
const JWT_SECRET: &str = "test-jwt-secret";

pub fn init_tracing_once() {
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter("nannyhub=debug")
            .with_test_writer()
            .init();
    });
}

/// A running application and the store behind it.
pub struct TestApp<S = InMemoryUserStore> {
    /// Format: `http://127.0.0.1:8492`
    pub address: String,
    pub store: Arc<S>,
    pub client: reqwest::Client,
}

/// Spawns the application on a random local port with an in-memory store.
pub async fn spawn_app() -> TestApp {
    spawn_with_store(Arc::new(InMemoryUserStore::new())).await
}

/// Spawns the application on a random local port backed by `db_pool`.
pub async fn spawn_app_with_pool(db_pool: PgPool) -> TestApp<PgUserStore> {
    spawn_with_store(Arc::new(PgUserStore::new(db_pool))).await
}

async fn spawn_with_store<S>(store: Arc<S>) -> TestApp<S>
where
    S: UserStore + 'static,
{
    init_tracing_once();

    let dyn_store: Arc<dyn UserStore> = store.clone();
    let state = Arc::new(AppState::new(
        dyn_store,
        JwtService::from_secret(&SecretString::from(JWT_SECRET.to_string())),
        SecretString::from(ADMIN_TOKEN.to_string()),
        SecretString::from(WEBHOOK_SECRET.to_string()),
    ));

    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind random port at localhost");
    let port = listener.local_addr().unwrap().port();

    tokio::spawn(async move {
        axum::serve(listener, nannyhub::app(state)).await.unwrap();
    });

    let address = format!("http://127.0.0.1:{port}");

    // Wait for server to be ready
    let client = reqwest::Client::new();
    for _ in 0..10 {
        if client
            .get(format!("{address}/health-check"))
            .send()
            .await
            .is_ok()
        {
            break;
        }
        tokio::time::sleep(std::time::Duration::from_millis(100)).await;
    }

    TestApp {
        address,
        store,
        client,
    }
}

impl<S> TestApp<S> {
    pub async fn signup(&self, email: &str, role: &str) -> SignupResponse {
        let response = self
            .client
            .post(format!("{}/api/auth/signup", self.address))
            .json(&json!({ "email": email, "role": role }))
            .send()
            .await
            .expect("Failed to send signup");
        assert_eq!(response.status(), StatusCode::CREATED);

        response
            .json()
            .await
            .expect("Failed to parse signup response")
    }

    pub async fn admin_post(&self, user_id: Uuid, action: &str) -> reqwest::Response {
        self.client
            .post(format!(
                "{}/api/admin/users/{user_id}/{action}",
                self.address
            ))
            .bearer_auth(ADMIN_TOKEN)
            .send()
            .await
            .expect("Failed to send admin request")
    }

    pub async fn admin_set_background(
        &self,
        user_id: Uuid,
        status: BackgroundStatus,
    ) -> reqwest::Response {
        self.client
            .put(format!(
                "{}/api/admin/users/{user_id}/background-status",
                self.address
            ))
            .bearer_auth(ADMIN_TOKEN)
            .json(&json!({ "status": status }))
            .send()
            .await
            .expect("Failed to send background status")
    }

    pub async fn payment_webhook(&self, user_id: Uuid, outcome: &str) -> reqwest::Response {
        self.client
            .post(format!("{}/api/webhooks/payment", self.address))
            .header("X-Webhook-Secret", WEBHOOK_SECRET)
            .json(&json!({
                "user_id": user_id,
                "outcome": outcome,
                "reference": "pi_test_123"
            }))
            .send()
            .await
            .expect("Failed to send payment webhook")
    }

    pub async fn background_webhook(
        &self,
        user_id: Uuid,
        status: BackgroundStatus,
    ) -> reqwest::Response {
        self.client
            .post(format!("{}/api/webhooks/background-check", self.address))
            .header("X-Webhook-Secret", WEBHOOK_SECRET)
            .json(&json!({ "user_id": user_id, "status": status }))
            .send()
            .await
            .expect("Failed to send background-check webhook")
    }

    /// Asks the gate through the user-facing route.
    pub async fn can_access(&self, access_token: &str) -> bool {
        let response = self
            .client
            .get(format!("{}/api/access", self.address))
            .bearer_auth(access_token)
            .send()
            .await
            .expect("Failed to query access");
        assert_eq!(response.status(), StatusCode::OK);

        let body: Value = response.json().await.expect("Failed to parse response");
        body["can_access_services"]
            .as_bool()
            .expect("Missing can_access_services")
    }

    pub async fn me(&self, access_token: &str) -> User {
        let response = self
            .client
            .get(format!("{}/api/me", self.address))
            .bearer_auth(access_token)
            .send()
            .await
            .expect("Failed to fetch account");
        assert_eq!(response.status(), StatusCode::OK);

        response.json().await.expect("Failed to parse user")
    }
}

//! # Webhook Handlers
//!
//! Callbacks from external collaborators: the payment provider confirming
//! signup payments and the background-check provider reporting results.
//! Both are authenticated by the shared webhook secret.

use std::sync::Arc;

use axum::{Json, extract::State, http::StatusCode};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};
use uuid::Uuid;

use crate::error::AppResult;
use crate::models::{AppState, BackgroundStatus, User};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentOutcome {
    Succeeded,
    Failed,
    Refunded,
}

/// Signup payment notification
#[derive(Debug, Serialize, Deserialize)]
pub struct PaymentEvent {
    pub user_id: Uuid,
    pub outcome: PaymentOutcome,
    /// Provider-side reference, only logged
    pub reference: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct WebhookAck {
    pub processed: bool,
    pub user: Option<User>,
}

/// Activates the account when the signup payment succeeded.
///
/// POST /api/webhooks/payment
///
/// # Returns
///
/// - `200 OK` - Payment succeeded, account activated
/// - `202 Accepted` - Other outcomes, acknowledged without state change
/// - `404 Not Found` - Unknown user
#[instrument(
    skip_all,
    fields(
        user_id = %event.user_id,
        outcome = ?event.outcome,
        reference = ?event.reference,
        request_id = %uuid::Uuid::new_v4()
    )
)]
pub async fn payment_webhook(
    State(state): State<Arc<AppState>>,
    Json(event): Json<PaymentEvent>,
) -> AppResult<(StatusCode, Json<WebhookAck>)> {
    if event.outcome != PaymentOutcome::Succeeded {
        info!("Payment event does not activate the account");
        return Ok((
            StatusCode::ACCEPTED,
            Json(WebhookAck {
                processed: false,
                user: None,
            }),
        ));
    }

    let user = state.gate.activate_after_payment(event.user_id).await?;
    Ok((
        StatusCode::OK,
        Json(WebhookAck {
            processed: true,
            user: Some(user),
        }),
    ))
}

/// Background-check result notification
#[derive(Debug, Serialize, Deserialize)]
pub struct BackgroundCheckEvent {
    pub user_id: Uuid,
    pub status: BackgroundStatus,
}

/// Records a background-check result.
///
/// POST /api/webhooks/background-check
#[instrument(
    skip_all,
    fields(
        user_id = %event.user_id,
        status = %event.status,
        request_id = %uuid::Uuid::new_v4()
    )
)]
pub async fn background_check_webhook(
    State(state): State<Arc<AppState>>,
    Json(event): Json<BackgroundCheckEvent>,
) -> AppResult<Json<WebhookAck>> {
    let user = state
        .gate
        .set_background_status(event.user_id, event.status)
        .await?;

    Ok(Json(WebhookAck {
        processed: true,
        user: Some(user),
    }))
}

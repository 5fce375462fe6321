// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Webhook routes for identity-provider user events.

use crate::error::{AppError, Result};
use crate::models::NewUser;
use crate::services::WebhookVerifier;
use crate::AppState;
use axum::{
    body::Bytes,
    extract::{Path, State},
    http::HeaderMap,
    routing::post,
    Json, Router,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// The only provider whose events are handled.
const SUPPORTED_PROVIDER: &str = "clerk";

/// Webhook routes.
pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/api/webhook/{provider}", post(handle_event))
}

/// User event payload.
#[derive(Deserialize, Debug)]
struct WebhookEvent {
    #[serde(rename = "type")]
    event_type: String,
    data: UserData,
}

#[derive(Deserialize, Debug, Default)]
#[serde(default)]
struct UserData {
    id: String,
    email_addresses: Vec<EmailAddress>,
    username: Option<String>,
    first_name: Option<String>,
    last_name: Option<String>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(default)]
struct EmailAddress {
    email_address: String,
}

impl UserData {
    fn primary_email(&self) -> String {
        self.email_addresses
            .iter()
            .map(|e| e.email_address.as_str())
            .find(|e| !e.is_empty())
            .unwrap_or_default()
            .to_string()
    }

    /// Username, else "first last", else nothing.
    fn display_name(&self) -> Option<String> {
        self.username.clone().filter(|u| !u.is_empty()).or_else(|| {
            let full = format!(
                "{} {}",
                self.first_name.as_deref().unwrap_or_default(),
                self.last_name.as_deref().unwrap_or_default()
            );
            let full = full.trim();
            (!full.is_empty()).then(|| full.to_string())
        })
    }
}

#[derive(Serialize)]
pub struct WebhookAck {
    pub success: bool,
}

fn header<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|h| h.to_str().ok())
}

/// Handle incoming webhook events (POST).
///
/// The signature covers the raw body, so it is checked before parsing.
async fn handle_event(
    State(state): State<Arc<AppState>>,
    Path(provider): Path<String>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<WebhookAck>> {
    if provider != SUPPORTED_PROVIDER {
        return Err(AppError::NotFound(format!("Unknown webhook provider {}", provider)));
    }

    let (Some(msg_id), Some(timestamp), Some(signature)) = (
        header(&headers, "svix-id"),
        header(&headers, "svix-timestamp"),
        header(&headers, "svix-signature"),
    ) else {
        return Err(AppError::BadRequest("Missing svix headers".to_string()));
    };

    let Some(secret) = state.config.auth.webhook_secret.as_deref() else {
        tracing::warn!("Webhook received but AUTH_WEBHOOK_SECRET is not configured");
        return Err(AppError::BadRequest("Webhook verification failed".to_string()));
    };

    WebhookVerifier::new(secret)
        .and_then(|v| v.verify(msg_id, timestamp, signature, &body, Utc::now().timestamp()))
        .map_err(|e| {
            tracing::warn!(error = %e, msg_id, "Security Alert: Webhook signature verification failed");
            AppError::BadRequest("Webhook verification failed".to_string())
        })?;

    let event: WebhookEvent = serde_json::from_slice(&body)
        .map_err(|e| AppError::BadRequest(format!("Invalid webhook payload: {}", e)))?;

    match event.event_type.as_str() {
        "user.created" => {
            let data = event.data;
            if state.store.get_user_by_auth_subject(&data.id).await?.is_some() {
                tracing::info!(subject = %data.id, "User already exists");
                return Ok(Json(WebhookAck { success: true }));
            }

            let user = state
                .store
                .create_user(NewUser::provision(
                    &data.id,
                    data.primary_email(),
                    data.display_name(),
                ))
                .await?;
            tracing::info!(subject = %data.id, user_id = %user.id, "User created from webhook");
        }
        "user.updated" => {
            let data = event.data;
            if state.store.get_user_by_auth_subject(&data.id).await?.is_none() {
                tracing::info!(subject = %data.id, "User not found for update");
                return Err(AppError::NotFound("User not found".to_string()));
            }
            tracing::info!(subject = %data.id, "User updated");
        }
        other => {
            tracing::info!(event_type = other, "Unhandled webhook event");
        }
    }

    Ok(Json(WebhookAck { success: true }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_name_fallbacks() {
        let named = UserData {
            username: Some("ada".to_string()),
            first_name: Some("Ada".to_string()),
            ..Default::default()
        };
        assert_eq!(named.display_name().as_deref(), Some("ada"));

        let full = UserData {
            first_name: Some("Ada".to_string()),
            last_name: Some("Lovelace".to_string()),
            ..Default::default()
        };
        assert_eq!(full.display_name().as_deref(), Some("Ada Lovelace"));

        assert_eq!(UserData::default().display_name(), None);
    }

    #[test]
    fn test_primary_email_skips_blank_entries() {
        let data: UserData = serde_json::from_value(serde_json::json!({
            "id": "user_1",
            "email_addresses": [{ "email_address": "" }, { "email_address": "a@example.com" }]
        }))
        .unwrap();
        assert_eq!(data.primary_email(), "a@example.com");
    }
}

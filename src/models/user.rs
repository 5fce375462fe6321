// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! User model for storage and API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Credits granted to every newly provisioned user.
pub const DEFAULT_CREDITS: i32 = 100;

/// User record bound to an identity-provider subject.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    /// Internal ID (`user_<millis>_<suffix>`)
    pub id: String,
    /// Subject issued by the identity provider
    pub auth_subject: String,
    /// Primary email address (may be empty if not shared)
    pub email: String,
    pub username: Option<String>,
    /// Remaining analysis credits, never negative
    pub credits: i32,
    pub created_at: DateTime<Utc>,
}

/// Fields needed to provision a user.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub id: String,
    pub auth_subject: String,
    pub email: String,
    pub username: Option<String>,
    pub credits: i32,
}

impl NewUser {
    /// New user with a freshly generated internal ID and default credits.
    pub fn provision(auth_subject: &str, email: String, username: Option<String>) -> Self {
        Self {
            id: generate_user_id(),
            auth_subject: auth_subject.to_string(),
            email,
            username: username.filter(|name| !name.trim().is_empty()),
            credits: DEFAULT_CREDITS,
        }
    }
}

/// Generate an internal user ID: `user_<millis>_<9 base36 chars>`.
pub fn generate_user_id() -> String {
    format!(
        "user_{}_{}",
        Utc::now().timestamp_millis(),
        crate::services::agent::random_base36(9)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provision_defaults() {
        let user = NewUser::provision("user_2abc", "a@example.com".to_string(), Some("  ".to_string()));
        assert_eq!(user.auth_subject, "user_2abc");
        assert_eq!(user.credits, DEFAULT_CREDITS);
        assert!(user.username.is_none());
        assert!(user.id.starts_with("user_"));
    }

    #[test]
    fn test_generated_ids_differ() {
        assert_ne!(generate_user_id(), generate_user_id());
    }
}

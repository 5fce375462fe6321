// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Database layer.
//!
//! Handlers talk to a [`Store`]; which implementation backs it is decided once
//! at startup by [`connect_store`]. Postgres is used when `DATABASE_URL` looks
//! real, otherwise a process-local in-memory store keeps the app usable.

pub mod memory;
pub mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

use crate::config::Config;
use crate::error::AppError;
use crate::models::{DailyIdea, NewDailyIdea, NewPost, NewUser, Post, User};
use async_trait::async_trait;
use std::sync::Arc;

/// Persistence operations used by the route handlers.
#[async_trait]
pub trait Store: Send + Sync {
    /// Insert a user. Returns the existing row if the auth subject is already known.
    async fn create_user(&self, user: NewUser) -> Result<User, AppError>;

    async fn get_user_by_auth_subject(&self, auth_subject: &str) -> Result<Option<User>, AppError>;

    async fn get_user_by_id(&self, id: &str) -> Result<Option<User>, AppError>;

    /// Overwrite the credit balance. `None` if the user does not exist.
    async fn update_user_credits(&self, id: &str, credits: i32) -> Result<Option<User>, AppError>;

    /// Atomically take one credit. `None` if the user is unknown or has none left.
    async fn deduct_credit(&self, id: &str) -> Result<Option<User>, AppError>;

    async fn save_post(&self, post: NewPost) -> Result<Post, AppError>;

    /// A user's posts, newest first.
    async fn get_user_posts(&self, user_id: &str, limit: i64) -> Result<Vec<Post>, AppError>;

    /// Feed ideas, newest first.
    async fn get_daily_ideas(&self, limit: i64) -> Result<Vec<DailyIdea>, AppError>;

    async fn create_daily_idea(&self, idea: NewDailyIdea) -> Result<DailyIdea, AppError>;

    /// Round-trip check used by the health endpoint.
    async fn check_connection(&self) -> bool;

    /// Short backend name for logs and health output.
    fn backend(&self) -> &'static str;
}

/// Pick the store for this process.
pub fn connect_store(config: &Config) -> Result<Arc<dyn Store>, AppError> {
    match config.database_url.as_deref() {
        Some(url) => {
            let store = PgStore::connect_lazy(url)?;
            tracing::info!("Using Postgres store");
            Ok(Arc::new(store))
        }
        None => {
            tracing::warn!("DATABASE_URL not configured; using in-memory store (data is not persisted)");
            Ok(Arc::new(MemoryStore::new()))
        }
    }
}

// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Process-local store used when no database is configured.
//!
//! Nothing survives a restart. IDs are `mock_<millis>_<seq>`.

use super::Store;
use crate::error::AppError;
use crate::models::{DailyIdea, NewDailyIdea, NewPost, NewUser, Post, User};
use async_trait::async_trait;
use chrono::Utc;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::sync::atomic::{AtomicU64, Ordering};

#[derive(Default)]
pub struct MemoryStore {
    /// Users keyed by internal ID
    users: DashMap<String, User>,
    /// auth_subject -> internal ID
    subjects: DashMap<String, String>,
    /// Keyed by insertion sequence so newest-first is a reverse key sort
    posts: DashMap<u64, Post>,
    ideas: DashMap<u64, DailyIdea>,
    seq: AtomicU64,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn next_seq(&self) -> u64 {
        self.seq.fetch_add(1, Ordering::Relaxed)
    }

    fn mock_id(seq: u64) -> String {
        format!("mock_{}_{}", Utc::now().timestamp_millis(), seq)
    }
}

/// Newest-first values from a sequence-keyed map.
fn newest_first<T: Clone>(map: &DashMap<u64, T>, keep: impl Fn(&T) -> bool, limit: i64) -> Vec<T> {
    let mut entries: Vec<(u64, T)> = map
        .iter()
        .filter(|entry| keep(entry.value()))
        .map(|entry| (*entry.key(), entry.value().clone()))
        .collect();
    entries.sort_by(|a, b| b.0.cmp(&a.0));
    entries
        .into_iter()
        .take(limit.max(0) as usize)
        .map(|(_, value)| value)
        .collect()
}

#[async_trait]
impl Store for MemoryStore {
    async fn create_user(&self, user: NewUser) -> Result<User, AppError> {
        match self.subjects.entry(user.auth_subject.clone()) {
            Entry::Occupied(existing) => self
                .users
                .get(existing.get())
                .map(|u| u.clone())
                .ok_or_else(|| AppError::Database("user index out of sync".to_string())),
            Entry::Vacant(slot) => {
                let created = User {
                    id: user.id,
                    auth_subject: user.auth_subject,
                    email: user.email,
                    username: user.username,
                    credits: user.credits,
                    created_at: Utc::now(),
                };
                self.users.insert(created.id.clone(), created.clone());
                slot.insert(created.id.clone());
                Ok(created)
            }
        }
    }

    async fn get_user_by_auth_subject(&self, auth_subject: &str) -> Result<Option<User>, AppError> {
        Ok(self
            .subjects
            .get(auth_subject)
            .and_then(|id| self.users.get(id.value()).map(|u| u.clone())))
    }

    async fn get_user_by_id(&self, id: &str) -> Result<Option<User>, AppError> {
        Ok(self.users.get(id).map(|u| u.clone()))
    }

    async fn update_user_credits(&self, id: &str, credits: i32) -> Result<Option<User>, AppError> {
        Ok(self.users.get_mut(id).map(|mut user| {
            user.credits = credits;
            user.clone()
        }))
    }

    async fn deduct_credit(&self, id: &str) -> Result<Option<User>, AppError> {
        // The entry guard holds the shard lock, so check-and-decrement is atomic.
        Ok(self.users.get_mut(id).and_then(|mut user| {
            if user.credits >= 1 {
                user.credits -= 1;
                Some(user.clone())
            } else {
                None
            }
        }))
    }

    async fn save_post(&self, post: NewPost) -> Result<Post, AppError> {
        let seq = self.next_seq();
        let saved = post.into_post(Self::mock_id(seq), Utc::now());
        self.posts.insert(seq, saved.clone());
        Ok(saved)
    }

    async fn get_user_posts(&self, user_id: &str, limit: i64) -> Result<Vec<Post>, AppError> {
        Ok(newest_first(&self.posts, |p| p.user_id == user_id, limit))
    }

    async fn get_daily_ideas(&self, limit: i64) -> Result<Vec<DailyIdea>, AppError> {
        Ok(newest_first(&self.ideas, |_| true, limit))
    }

    async fn create_daily_idea(&self, idea: NewDailyIdea) -> Result<DailyIdea, AppError> {
        let seq = self.next_seq();
        let created = DailyIdea {
            id: Self::mock_id(seq),
            content: idea.content,
            author_name: idea.author_name,
            category: idea.category,
            created_at: Utc::now(),
            time_ago: None,
        };
        self.ideas.insert(seq, created.clone());
        Ok(created)
    }

    async fn check_connection(&self) -> bool {
        true
    }

    fn backend(&self) -> &'static str {
        "memory"
    }
}

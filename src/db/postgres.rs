// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Postgres-backed store.
//!
//! Each operation is a single parameterized statement. UUID keys are read
//! back as text so the models stay backend-agnostic.

use super::Store;
use crate::error::AppError;
use crate::models::{DailyIdea, NewDailyIdea, NewPost, NewUser, Post, Suggestion, User};
use async_trait::async_trait;
use sqlx::postgres::{PgPool, PgPoolOptions, PgRow};
use sqlx::types::Json;
use sqlx::Row;
use std::time::Duration;

const MAX_CONNECTIONS: u32 = 10;
const ACQUIRE_TIMEOUT: Duration = Duration::from_secs(5);

const USER_COLUMNS: &str = "id, auth_subject, email, username, credits, created_at";
const POST_COLUMNS: &str = "id::text AS id, user_id, content, virality_score, hook_score, \
     clarity_score, breadth_score, tension_score, reply_score, target_age, target_profession, \
     target_interests, target_sentiment, controversiality, suggestions, created_at";
const IDEA_COLUMNS: &str = "id::text AS id, content, author_name, category, created_at";

/// Schema, applied by [`PgStore::create_tables`].
const SCHEMA: [&str; 4] = [
    r#"
    CREATE TABLE IF NOT EXISTS users (
        id TEXT PRIMARY KEY,
        auth_subject TEXT UNIQUE NOT NULL,
        email TEXT NOT NULL,
        username TEXT,
        credits INTEGER NOT NULL DEFAULT 100 CHECK (credits >= 0),
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS posts (
        id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
        user_id TEXT REFERENCES users(id),
        content TEXT NOT NULL,
        virality_score INTEGER,
        hook_score INTEGER,
        clarity_score INTEGER,
        breadth_score INTEGER,
        tension_score INTEGER,
        reply_score INTEGER,
        target_age TEXT,
        target_profession TEXT,
        target_interests JSONB,
        target_sentiment TEXT,
        controversiality TEXT,
        suggestions JSONB,
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS daily_ideas (
        id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
        content TEXT NOT NULL,
        author_name TEXT NOT NULL DEFAULT 'Community Trend',
        category TEXT,
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
    )
    "#,
    "CREATE INDEX IF NOT EXISTS posts_user_created_idx ON posts (user_id, created_at DESC)",
];

#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    /// Build a pool without connecting; the first query opens a connection.
    pub fn connect_lazy(url: &str) -> Result<Self, AppError> {
        let pool = PgPoolOptions::new()
            .max_connections(MAX_CONNECTIONS)
            .acquire_timeout(ACQUIRE_TIMEOUT)
            .connect_lazy(url)?;
        Ok(Self { pool })
    }

    /// Connect eagerly, failing if the server is unreachable.
    pub async fn connect(url: &str) -> Result<Self, AppError> {
        let pool = PgPoolOptions::new()
            .max_connections(MAX_CONNECTIONS)
            .acquire_timeout(ACQUIRE_TIMEOUT)
            .connect(url)
            .await?;
        Ok(Self { pool })
    }

    /// Create all tables if they do not exist.
    pub async fn create_tables(&self) -> Result<(), AppError> {
        for statement in SCHEMA {
            sqlx::query(statement).execute(&self.pool).await?;
        }
        tracing::info!("Database tables created");
        Ok(())
    }
}

fn post_from_row(row: &PgRow) -> Result<Post, sqlx::Error> {
    let interests: Option<Json<Vec<String>>> = row.try_get("target_interests")?;
    let suggestions: Option<Json<Vec<Suggestion>>> = row.try_get("suggestions")?;
    Ok(Post {
        id: row.try_get("id")?,
        user_id: row.try_get("user_id")?,
        content: row.try_get("content")?,
        virality_score: row.try_get("virality_score")?,
        hook_score: row.try_get("hook_score")?,
        clarity_score: row.try_get("clarity_score")?,
        breadth_score: row.try_get("breadth_score")?,
        tension_score: row.try_get("tension_score")?,
        reply_score: row.try_get("reply_score")?,
        target_age: row.try_get("target_age")?,
        target_profession: row.try_get("target_profession")?,
        target_interests: interests.map(|Json(v)| v),
        target_sentiment: row.try_get("target_sentiment")?,
        controversiality: row.try_get("controversiality")?,
        suggestions: suggestions.map(|Json(v)| v),
        created_at: row.try_get("created_at")?,
    })
}

fn idea_from_row(row: &PgRow) -> Result<DailyIdea, sqlx::Error> {
    Ok(DailyIdea {
        id: row.try_get("id")?,
        content: row.try_get("content")?,
        author_name: row.try_get("author_name")?,
        category: row.try_get("category")?,
        created_at: row.try_get("created_at")?,
        time_ago: None,
    })
}

#[async_trait]
impl Store for PgStore {
    async fn create_user(&self, user: NewUser) -> Result<User, AppError> {
        // The no-op update makes RETURNING yield the existing row on conflict.
        let sql = format!(
            "INSERT INTO users (id, auth_subject, email, username, credits) \
             VALUES ($1, $2, $3, $4, $5) \
             ON CONFLICT (auth_subject) DO UPDATE SET auth_subject = EXCLUDED.auth_subject \
             RETURNING {USER_COLUMNS}"
        );
        Ok(sqlx::query_as::<_, User>(&sql)
            .bind(&user.id)
            .bind(&user.auth_subject)
            .bind(&user.email)
            .bind(&user.username)
            .bind(user.credits)
            .fetch_one(&self.pool)
            .await?)
    }

    async fn get_user_by_auth_subject(&self, auth_subject: &str) -> Result<Option<User>, AppError> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE auth_subject = $1");
        Ok(sqlx::query_as::<_, User>(&sql)
            .bind(auth_subject)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn get_user_by_id(&self, id: &str) -> Result<Option<User>, AppError> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1");
        Ok(sqlx::query_as::<_, User>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn update_user_credits(&self, id: &str, credits: i32) -> Result<Option<User>, AppError> {
        let sql = format!("UPDATE users SET credits = $2 WHERE id = $1 RETURNING {USER_COLUMNS}");
        Ok(sqlx::query_as::<_, User>(&sql)
            .bind(id)
            .bind(credits)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn deduct_credit(&self, id: &str) -> Result<Option<User>, AppError> {
        let sql = format!(
            "UPDATE users SET credits = credits - 1 \
             WHERE id = $1 AND credits >= 1 \
             RETURNING {USER_COLUMNS}"
        );
        Ok(sqlx::query_as::<_, User>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn save_post(&self, post: NewPost) -> Result<Post, AppError> {
        let sql = format!(
            "INSERT INTO posts (user_id, content, virality_score, hook_score, clarity_score, \
             breadth_score, tension_score, reply_score, target_age, target_profession, \
             target_interests, target_sentiment, controversiality, suggestions) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14) \
             RETURNING {POST_COLUMNS}"
        );
        let analysis = &post.analysis;
        let scores = analysis.scores;
        let target = &analysis.target_group;

        let row = sqlx::query(&sql)
            .bind(&post.user_id)
            .bind(&post.content)
            .bind(i32::from(scores.virality))
            .bind(i32::from(scores.hook))
            .bind(i32::from(scores.clarity))
            .bind(i32::from(scores.breadth))
            .bind(i32::from(scores.tension))
            .bind(i32::from(scores.reply))
            .bind(&target.age)
            .bind(&target.profession)
            .bind(Json(&target.interests))
            .bind(&target.sentiment)
            .bind(analysis.controversiality.as_str())
            .bind(Json(&analysis.suggestions))
            .fetch_one(&self.pool)
            .await?;

        Ok(post_from_row(&row)?)
    }

    async fn get_user_posts(&self, user_id: &str, limit: i64) -> Result<Vec<Post>, AppError> {
        let sql = format!(
            "SELECT {POST_COLUMNS} FROM posts WHERE user_id = $1 \
             ORDER BY created_at DESC LIMIT $2"
        );
        let rows = sqlx::query(&sql)
            .bind(user_id)
            .bind(limit)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows
            .iter()
            .map(post_from_row)
            .collect::<Result<Vec<_>, _>>()?)
    }

    async fn get_daily_ideas(&self, limit: i64) -> Result<Vec<DailyIdea>, AppError> {
        let sql = format!("SELECT {IDEA_COLUMNS} FROM daily_ideas ORDER BY created_at DESC LIMIT $1");
        let rows = sqlx::query(&sql).bind(limit).fetch_all(&self.pool).await?;

        Ok(rows
            .iter()
            .map(idea_from_row)
            .collect::<Result<Vec<_>, _>>()?)
    }

    async fn create_daily_idea(&self, idea: NewDailyIdea) -> Result<DailyIdea, AppError> {
        let sql = format!(
            "INSERT INTO daily_ideas (content, author_name, category) \
             VALUES ($1, $2, $3) RETURNING {IDEA_COLUMNS}"
        );
        let row = sqlx::query(&sql)
            .bind(&idea.content)
            .bind(&idea.author_name)
            .bind(&idea.category)
            .fetch_one(&self.pool)
            .await?;

        Ok(idea_from_row(&row)?)
    }

    async fn check_connection(&self) -> bool {
        match sqlx::query("SELECT 1").execute(&self.pool).await {
            Ok(_) => true,
            Err(e) => {
                tracing::error!(error = %e, "Database connection check failed");
                false
            }
        }
    }

    fn backend(&self) -> &'static str {
        "postgres"
    }
}

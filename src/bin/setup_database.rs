// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Create the database tables.
//!
//! Usage: `DATABASE_URL=postgres://... cargo run --bin setup-database`

use anyhow::{bail, Context};
use post2x::config::Config;
use post2x::db::{PgStore, Store};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive("info".parse()?),
        )
        .init();

    let config = Config::from_env()?;
    let Some(url) = config.database_url.as_deref() else {
        bail!("DATABASE_URL is missing or still contains placeholder values");
    };

    let store = PgStore::connect(url)
        .await
        .context("Failed to connect to database")?;
    if !store.check_connection().await {
        bail!("Database connection check failed");
    }
    tracing::info!("Database connection OK");

    store
        .create_tables()
        .await
        .context("Failed to create tables")?;
    tracing::info!("Database setup complete");
    Ok(())
}

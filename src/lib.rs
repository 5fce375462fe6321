// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Post2x: virality analysis for social media drafts
//!
//! This crate provides the backend API that scores drafts through hosted
//! inference agents, charges per-user credits, and serves a feed of
//! trending post ideas.

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod time_utils;

use config::Config;
use db::Store;
use services::AgentClient;
use std::sync::Arc;

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub store: Arc<dyn Store>,
    pub agent: AgentClient,
}

impl AppState {
    pub fn new(config: Config, store: Arc<dyn Store>) -> Self {
        let agent = AgentClient::new(config.agent.clone());
        Self {
            config,
            store,
            agent,
        }
    }
}

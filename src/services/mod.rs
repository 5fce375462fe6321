// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - business logic layer.

pub mod agent;
pub mod normalize;
pub mod signature;

pub use agent::AgentClient;
pub use normalize::normalize_analysis;
pub use signature::{SignatureError, WebhookVerifier};

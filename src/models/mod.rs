// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Data models for the application.

pub mod analysis;
pub mod generation;
pub mod idea;
pub mod post;
pub mod user;

pub use analysis::{AnalysisResult, ContentScores, Controversiality, Suggestion, SuggestionType, TargetGroup};
pub use generation::{GenerationResult, RankingResult};
pub use idea::{DailyIdea, NewDailyIdea};
pub use post::{NewPost, Post};
pub use user::{NewUser, User};

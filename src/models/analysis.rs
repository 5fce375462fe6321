// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Content analysis result returned by the analyzer agent.

use rand::Rng;
use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Maximum number of suggestions in a result.
pub const MAX_SUGGESTIONS: usize = 5;

/// Fully populated analysis of one piece of content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct AnalysisResult {
    pub scores: ContentScores,
    pub target_group: TargetGroup,
    pub controversiality: Controversiality,
    pub suggestions: Vec<Suggestion>,
}

/// Six scores, each in 0..=100.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct ContentScores {
    pub virality: u8,
    pub hook: u8,
    pub clarity: u8,
    pub breadth: u8,
    pub tension: u8,
    pub reply: u8,
}

/// Score field names, in response order.
pub const SCORE_FIELDS: [&str; 6] = ["virality", "hook", "clarity", "breadth", "tension", "reply"];

impl ContentScores {
    /// Build from values ordered as [`SCORE_FIELDS`].
    pub fn from_array(values: [u8; 6]) -> Self {
        let [virality, hook, clarity, breadth, tension, reply] = values;
        Self {
            virality,
            hook,
            clarity,
            breadth,
            tension,
            reply,
        }
    }

    pub fn to_array(self) -> [u8; 6] {
        [
            self.virality,
            self.hook,
            self.clarity,
            self.breadth,
            self.tension,
            self.reply,
        ]
    }
}

/// Guessed audience for the content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct TargetGroup {
    pub age: String,
    pub profession: String,
    pub interests: Vec<String>,
    pub sentiment: String,
}

/// Expected reaction breadth versus safety.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub enum Controversiality {
    #[default]
    #[serde(rename = "Safe & Broad")]
    SafeBroad,
    #[serde(rename = "Niche & Safe")]
    NicheSafe,
    #[serde(rename = "Spicy & Broad")]
    SpicyBroad,
    #[serde(rename = "Niche & Spicy")]
    NicheSpicy,
}

impl Controversiality {
    pub const ALL: [Controversiality; 4] = [
        Controversiality::SafeBroad,
        Controversiality::NicheSafe,
        Controversiality::SpicyBroad,
        Controversiality::NicheSpicy,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Controversiality::SafeBroad => "Safe & Broad",
            Controversiality::NicheSafe => "Niche & Safe",
            Controversiality::SpicyBroad => "Spicy & Broad",
            Controversiality::NicheSpicy => "Niche & Spicy",
        }
    }

    /// Exact match against the four labels.
    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.as_str() == label)
    }
}

/// One proposed edit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct Suggestion {
    pub id: u32,
    pub text: String,
    /// Estimated score change, e.g. "+3-7"
    pub impact: String,
    #[serde(rename = "type")]
    pub kind: SuggestionType,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub enum SuggestionType {
    Hook,
    Context,
    Tension,
    Clarity,
    Engagement,
}

impl SuggestionType {
    /// Order used when a type has to be assigned by list position.
    pub const SEQUENCE: [SuggestionType; 5] = [
        SuggestionType::Hook,
        SuggestionType::Context,
        SuggestionType::Tension,
        SuggestionType::Clarity,
        SuggestionType::Engagement,
    ];

    pub fn for_position(index: usize) -> Self {
        Self::SEQUENCE
            .get(index)
            .copied()
            .unwrap_or(SuggestionType::Engagement)
    }

    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim().to_ascii_lowercase().as_str() {
            "hook" => Some(SuggestionType::Hook),
            "context" => Some(SuggestionType::Context),
            "tension" => Some(SuggestionType::Tension),
            "clarity" => Some(SuggestionType::Clarity),
            "engagement" => Some(SuggestionType::Engagement),
            _ => None,
        }
    }
}

impl AnalysisResult {
    /// Fixed result used when nothing usable came back.
    pub fn mock() -> Self {
        Self {
            scores: ContentScores {
                virality: 49,
                hook: 29,
                clarity: 75,
                breadth: 68,
                tension: 42,
                reply: 46,
            },
            target_group: TargetGroup {
                age: "25-34".to_string(),
                profession: "Tech Professional".to_string(),
                interests: vec![
                    "Technology".to_string(),
                    "Productivity".to_string(),
                    "Career Growth".to_string(),
                ],
                sentiment: "Optimistic".to_string(),
            },
            controversiality: Controversiality::SafeBroad,
            suggestions: mock_suggestions(),
        }
    }

    /// The fixed mock with scores re-rolled, used after a failed agent call.
    pub fn randomized_mock<R: Rng>(rng: &mut R) -> Self {
        Self {
            scores: ContentScores {
                virality: rng.random_range(30..70),
                hook: rng.random_range(20..70),
                clarity: rng.random_range(60..90),
                breadth: rng.random_range(40..80),
                tension: rng.random_range(20..80),
                reply: rng.random_range(25..75),
            },
            ..Self::mock()
        }
    }
}

/// Stock suggestions substituted when none could be extracted.
pub fn mock_suggestions() -> Vec<Suggestion> {
    [
        (
            "Add a compelling hook at the beginning to grab attention immediately. Start with a question or bold statement.",
            "+3-7",
            SuggestionType::Hook,
        ),
        (
            "Include more specific examples or data points to increase credibility and engagement.",
            "+4-6",
            SuggestionType::Context,
        ),
        (
            "Create more tension by presenting a problem or challenge that needs solving.",
            "+3-5",
            SuggestionType::Tension,
        ),
        (
            "Make your language more conversational and relatable to your target audience.",
            "+2-4",
            SuggestionType::Clarity,
        ),
        (
            "End with a clear call-to-action or question to encourage replies and engagement.",
            "+5-8",
            SuggestionType::Engagement,
        ),
    ]
    .into_iter()
    .enumerate()
    .map(|(i, (text, impact, kind))| Suggestion {
        id: i as u32 + 1,
        text: text.to_string(),
        impact: impact.to_string(),
        kind,
    })
    .collect()
}

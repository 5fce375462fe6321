// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Best-effort extraction of an [`AnalysisResult`] from free-form agent output.
//!
//! The analyzer agent answers in prose that may or may not embed a JSON
//! object. Each field is looked up in the prose first, then in the embedded
//! JSON, then defaulted, so the result is always fully populated.

use crate::models::analysis::{
    mock_suggestions, ContentScores, Controversiality, Suggestion, SuggestionType, TargetGroup,
    MAX_SUGGESTIONS, SCORE_FIELDS,
};
use crate::models::AnalysisResult;
use rand::Rng;
use regex::Regex;
use serde_json::{Map, Value};
use std::num::IntErrorKind;
use std::sync::LazyLock;

const DEFAULT_AGE: &str = "25-34";
const DEFAULT_PROFESSION: &str = "Tech Professional";
const DEFAULT_SENTIMENT: &str = "Neutral";
const DEFAULT_INTERESTS: [&str; 3] = ["Technology", "Social Media", "Content Creation"];
const MAX_INTERESTS: usize = 5;

static SCORE_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    SCORE_FIELDS
        .iter()
        .map(|field| {
            Regex::new(&format!(r"(?i){}[:\s]+(\d+)", field)).expect("score pattern is valid")
        })
        .collect()
});

static AGE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)age[:\s]+([0-9-]+)").expect("age pattern is valid"));

static PROFESSION_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)profession[:\s]+([^,\n]+)").expect("profession pattern is valid")
});

// Numbered ("1." with or without a following space) or bulleted ("-", "•",
// "*") list items, one per line.
static LIST_ITEM_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^[ \t]*(?:\d+\.[ \t]*|[-•*][ \t]+)(\S[^\n]*)$")
        .expect("list pattern is valid")
});

/// Normalize an agent response envelope into a complete analysis.
///
/// Never fails: an envelope that is not a JSON object yields
/// [`AnalysisResult::mock`].
pub fn normalize_analysis<R: Rng>(envelope: &Value, rng: &mut R) -> AnalysisResult {
    let Some(fields) = envelope.as_object() else {
        tracing::warn!("Agent response is not a JSON object; using mock analysis");
        return AnalysisResult::mock();
    };

    let text = response_text(fields);
    let parsed = embedded_json(&text).unwrap_or_default();

    let scores = extract_scores(&text, &parsed, rng);
    let target_group = extract_target_group(&text, &parsed);
    let controversiality = parsed
        .get("controversiality")
        .and_then(Value::as_str)
        .and_then(Controversiality::from_label)
        .unwrap_or_default();

    let mut suggestions = extract_list_suggestions(&text, rng);
    if suggestions.is_empty() {
        suggestions = json_suggestions(&parsed, rng);
    }
    if suggestions.is_empty() {
        suggestions = mock_suggestions();
    }

    AnalysisResult {
        scores,
        target_group,
        controversiality,
        suggestions,
    }
}

/// The agent puts its answer in `response`, sometimes in `message`.
fn response_text(fields: &Map<String, Value>) -> String {
    ["response", "message"]
        .iter()
        .filter_map(|key| fields.get(*key))
        .find_map(|value| match value {
            Value::String(s) if !s.is_empty() => Some(s.clone()),
            Value::Object(_) => Some(value.to_string()),
            _ => None,
        })
        .unwrap_or_default()
}

/// Parse the span from the first `{` to the last `}` as a JSON object.
fn embedded_json(text: &str) -> Option<Map<String, Value>> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    if start > end {
        return None;
    }

    match serde_json::from_str::<Value>(&text[start..=end]) {
        Ok(Value::Object(map)) => Some(map),
        Ok(_) => None,
        Err(e) => {
            tracing::warn!(error = %e, "Could not parse JSON from agent response, using text analysis");
            None
        }
    }
}

fn extract_scores<R: Rng>(
    text: &str,
    parsed: &Map<String, Value>,
    rng: &mut R,
) -> ContentScores {
    let json_scores = parsed.get("scores").and_then(Value::as_object);
    let mut values = [0u8; 6];

    for (i, field) in SCORE_FIELDS.iter().enumerate() {
        let from_text = SCORE_PATTERNS[i]
            .captures(text)
            .and_then(|caps| caps.get(1))
            .and_then(|m| parse_saturating(m.as_str()));
        let from_json = || json_scores.and_then(|s| s.get(*field)).and_then(json_score);

        values[i] = match from_text.or_else(from_json) {
            Some(score) => score.min(100) as u8,
            None => rng.random_range(40..80),
        };
    }

    ContentScores::from_array(values)
}

/// Accept integer or float scores, as well as numeric strings.
fn json_score(value: &Value) -> Option<u64> {
    match value {
        Value::Number(n) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| *f >= 0.0).map(|f| f.round() as u64)),
        Value::String(s) => parse_saturating(s.trim()),
        _ => None,
    }
}

/// Parse a digit string, treating values too large for `u64` as `u64::MAX`.
fn parse_saturating(digits: &str) -> Option<u64> {
    match digits.parse::<u64>() {
        Ok(n) => Some(n),
        Err(e) if *e.kind() == IntErrorKind::PosOverflow => Some(u64::MAX),
        Err(_) => None,
    }
}

fn extract_target_group(text: &str, parsed: &Map<String, Value>) -> TargetGroup {
    let json_group = parsed
        .get("targetGroup")
        .or_else(|| parsed.get("target_group"))
        .and_then(Value::as_object);
    let json_str = |key: &str| {
        json_group
            .and_then(|g| g.get(key))
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    };

    let age = AGE_PATTERN
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .or_else(|| json_str("age"))
        .unwrap_or_else(|| DEFAULT_AGE.to_string());

    let profession = PROFESSION_PATTERN
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string())
        .filter(|s| !s.is_empty())
        .or_else(|| json_str("profession"))
        .unwrap_or_else(|| DEFAULT_PROFESSION.to_string());

    let interests: Vec<String> = json_group
        .and_then(|g| g.get("interests"))
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .take(MAX_INTERESTS)
                .collect()
        })
        .filter(|items: &Vec<String>| !items.is_empty())
        .unwrap_or_else(|| DEFAULT_INTERESTS.iter().map(|s| s.to_string()).collect());

    TargetGroup {
        age,
        profession,
        interests,
        sentiment: json_str("sentiment").unwrap_or_else(|| DEFAULT_SENTIMENT.to_string()),
    }
}

/// Synthesized impact range, e.g. "+4-7".
fn impact_range<R: Rng>(rng: &mut R) -> String {
    format!(
        "+{}-{}",
        rng.random_range(2..=7u8),
        rng.random_range(5..=8u8)
    )
}

/// Take up to five list items from the prose. Types are assigned by position.
fn extract_list_suggestions<R: Rng>(text: &str, rng: &mut R) -> Vec<Suggestion> {
    LIST_ITEM_PATTERN
        .captures_iter(text)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str().trim())
        .filter(|line| !line.is_empty())
        .take(MAX_SUGGESTIONS)
        .enumerate()
        .map(|(index, line)| Suggestion {
            id: index as u32 + 1,
            text: line.to_string(),
            impact: impact_range(rng),
            kind: SuggestionType::for_position(index),
        })
        .collect()
}

/// Suggestions carried in the embedded JSON, when the prose had no list.
fn json_suggestions<R: Rng>(parsed: &Map<String, Value>, rng: &mut R) -> Vec<Suggestion> {
    let Some(items) = parsed.get("suggestions").and_then(Value::as_array) else {
        return Vec::new();
    };

    items
        .iter()
        .filter_map(|item| match item {
            Value::String(text) => Some((text.as_str(), None, None)),
            Value::Object(obj) => obj.get("text").and_then(Value::as_str).map(|text| {
                (
                    text,
                    obj.get("type").and_then(Value::as_str),
                    obj.get("impact").and_then(Value::as_str),
                )
            }),
            _ => None,
        })
        .filter(|(text, _, _)| !text.trim().is_empty())
        .take(MAX_SUGGESTIONS)
        .enumerate()
        .map(|(index, (text, kind, impact))| Suggestion {
            id: index as u32 + 1,
            text: text.trim().to_string(),
            impact: impact
                .map(str::to_string)
                .unwrap_or_else(|| impact_range(rng)),
            kind: kind
                .and_then(SuggestionType::from_label)
                .unwrap_or_else(|| SuggestionType::for_position(index)),
        })
        .collect()
}

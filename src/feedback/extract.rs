//! Turning a raw remote response body into a validated [`FeedbackEnvelope`].
//!
//! Three steps, each independently testable: pull the generated text out of
//! the body, recover a JSON value from that text, then check its shape.

use std::sync::OnceLock;

use regex::Regex;
use serde_json::Value;

use super::types::{FeedbackEnvelope, FeedbackSource, Recommendation};
use crate::error::FeedbackError;

/// Used when the remote payload carries no usable follow-up question.
pub const DEFAULT_FOLLOW_UP: &str =
    "Como te sentes em relação a estas sugestões? Alguma faz particular sentido para ti?";

pub type ExtractionStrategy = fn(&[u8]) -> Option<String>;

/// Tried in order; the first one returning text wins.
pub const STRATEGIES: &[(&str, ExtractionStrategy)] = &[
    ("chat_completion", chat_completion),
    ("flat_field", flat_field),
    ("raw_payload", raw_payload),
];

pub fn extract_content(body: &[u8]) -> Option<String> {
    STRATEGIES.iter().find_map(|(name, strategy)| {
        let content = strategy(body)?;
        tracing::debug!(strategy = *name, chars = content.len(), "feedback: content extracted");
        Some(content)
    })
}

fn non_blank(s: &str) -> Option<String> {
    let trimmed = s.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// `choices[0].message.content`, else `choices[0].text`.
pub fn chat_completion(body: &[u8]) -> Option<String> {
    let value: Value = serde_json::from_slice(body).ok()?;
    let choice = value.get("choices")?.get(0)?;
    choice
        .pointer("/message/content")
        .and_then(Value::as_str)
        .or_else(|| choice.get("text").and_then(Value::as_str))
        .and_then(non_blank)
}

/// Top-level `content`, `text` or `output`.
pub fn flat_field(body: &[u8]) -> Option<String> {
    let value: Value = serde_json::from_slice(body).ok()?;
    ["content", "text", "output"]
        .iter()
        .find_map(|key| match value.get(key)? {
            Value::String(s) => non_blank(s),
            Value::Null => None,
            other => Some(other.to_string()),
        })
}

/// The body itself, as text.
pub fn raw_payload(body: &[u8]) -> Option<String> {
    non_blank(&String::from_utf8_lossy(body))
}

/// Which recovery step produced the JSON value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Recovery {
    Direct,
    BraceSpan,
    FenceStripped,
}

fn brace_patterns() -> &'static [Regex] {
    static RE: OnceLock<Vec<Regex>> = OnceLock::new();
    RE.get_or_init(|| {
        [
            // three levels of nesting, one child per level
            r"\{[^{}]*\{[^{}]*\{[^{}]*\}[^{}]*\}[^{}]*\}",
            // first opening brace to last closing brace
            r"(?s)\{.*\}",
            // flat object
            r"\{[^}]+\}",
        ]
        .iter()
        .filter_map(|p| Regex::new(p).ok())
        .collect()
    })
}

/// Recover a JSON value from generated text; the first step that parses wins.
pub fn recover_json(content: &str) -> Option<(Value, Recovery)> {
    if let Ok(value) = serde_json::from_str::<Value>(content.trim()) {
        return Some((value, Recovery::Direct));
    }

    for pattern in brace_patterns() {
        let best = pattern
            .find_iter(content)
            .filter_map(|m| {
                serde_json::from_str::<Value>(m.as_str())
                    .ok()
                    .map(|v| (m.len(), v))
            })
            .max_by_key(|(len, _)| *len);
        if let Some((_, value)) = best {
            return Some((value, Recovery::BraceSpan));
        }
    }

    let stripped = content.replace("```json", "").replace("```", "");
    serde_json::from_str::<Value>(stripped.trim())
        .ok()
        .map(|value| (value, Recovery::FenceStripped))
}

/// Check the recovered value's shape and build the remote envelope.
///
/// Malformed recommendation items are dropped and a missing follow-up is
/// defaulted; either repair, or a non-direct recovery, marks the result
/// `remote_degraded`.
pub fn validate(value: Value, recovery: Recovery) -> Result<FeedbackEnvelope, FeedbackError> {
    let Value::Object(mut map) = value else {
        return Err(FeedbackError::Schema("payload is not a JSON object".into()));
    };

    let items = match map.remove("recommendations") {
        Some(Value::Array(items)) if !items.is_empty() => items,
        Some(Value::Array(_)) => {
            return Err(FeedbackError::Schema("`recommendations` is empty".into()));
        }
        Some(_) => {
            return Err(FeedbackError::Schema("`recommendations` is not an array".into()));
        }
        None => {
            let keys: Vec<&str> = map.keys().map(String::as_str).collect();
            return Err(FeedbackError::Schema(format!(
                "`recommendations` missing (keys: {})",
                keys.join(", ")
            )));
        }
    };

    let total = items.len();
    let recommendations: Vec<Recommendation> = items
        .into_iter()
        .filter_map(|item| serde_json::from_value::<Recommendation>(item).ok())
        .filter(|rec| !rec.text.trim().is_empty())
        .collect();
    if recommendations.is_empty() {
        return Err(FeedbackError::Schema(
            "no recommendation item has a valid shape".into(),
        ));
    }
    let dropped = total - recommendations.len();

    let follow_up = map
        .get("follow_up_prompt")
        .and_then(Value::as_str)
        .and_then(non_blank);
    let repaired = dropped > 0 || follow_up.is_none() || recovery != Recovery::Direct;
    if repaired {
        tracing::info!(
            dropped,
            recovery = ?recovery,
            follow_up_defaulted = follow_up.is_none(),
            "feedback: remote payload repaired"
        );
    }

    let source = if repaired {
        FeedbackSource::RemoteDegraded
    } else {
        FeedbackSource::Remote
    };
    Ok(FeedbackEnvelope::new(
        recommendations,
        follow_up.unwrap_or_else(|| DEFAULT_FOLLOW_UP.to_string()),
        source,
    ))
}

/// Full pipeline over one response body.
pub fn parse_body(body: &[u8]) -> Result<FeedbackEnvelope, FeedbackError> {
    let content = extract_content(body).ok_or(FeedbackError::EmptyContent)?;
    let (value, recovery) = recover_json(&content).ok_or(FeedbackError::Parse)?;
    validate(value, recovery)
}

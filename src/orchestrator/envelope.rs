use serde::{Deserialize, Serialize};

use super::stage::Stage;
use crate::affect::AffectScore;
use crate::calendar::CalendarEvent;
use crate::feedback::{FeedbackEnvelope, FeedbackSource, Recommendation, RecommendationKind};
use crate::intent::IntentResult;
use crate::schedule::Schedule;

const BLANK_FOLLOW_UP: &str = "Please provide some input.";
const BLANK_NOTES: &str = "No input provided";
const ERROR_TEXT: &str = "Ocorreu um erro. Por favor, tenta novamente.";
const ERROR_WHY: &str = "Erro temporário do sistema";
const ERROR_FOLLOW_UP: &str = "Desculpa pelo inconveniente. Podes tentar novamente?";

/// Everything produced for one request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseEnvelope {
    pub request_id: String,
    pub success: bool,
    pub emotion: AffectScore,
    pub schedule: Schedule,
    pub events: Vec<CalendarEvent>,
    #[serde(default)]
    pub calendar_suggestions: Vec<String>,
    pub message: FeedbackEnvelope,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub intent: Option<IntentResult>,
    #[serde(default)]
    pub risk_detected: bool,
    #[serde(default)]
    pub degraded_stages: Vec<Stage>,
}

impl ResponseEnvelope {
    fn minimal(request_id: String, notes: String, message: FeedbackEnvelope) -> Self {
        Self {
            request_id,
            success: false,
            emotion: AffectScore::neutral(),
            schedule: Schedule {
                notes: Some(notes),
                ..Schedule::default()
            },
            events: Vec::new(),
            calendar_suggestions: Vec::new(),
            message,
            intent: None,
            risk_detected: false,
            degraded_stages: Vec::new(),
        }
    }

    /// Empty or whitespace-only input.
    pub fn blank(request_id: impl Into<String>) -> Self {
        Self::minimal(
            request_id.into(),
            BLANK_NOTES.into(),
            FeedbackEnvelope::new(Vec::new(), BLANK_FOLLOW_UP, FeedbackSource::System),
        )
    }

    /// Unexpected fault while running the pipeline.
    pub fn error(request_id: impl Into<String>, reason: &str) -> Self {
        Self::minimal(
            request_id.into(),
            format!("Error: {reason}"),
            FeedbackEnvelope::new(
                vec![Recommendation::new(
                    RecommendationKind::Immediate,
                    ERROR_TEXT,
                    ERROR_WHY,
                )],
                ERROR_FOLLOW_UP,
                FeedbackSource::System,
            ),
        )
    }

    pub fn is_degraded(&self) -> bool {
        !self.degraded_stages.is_empty()
    }
}

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Hard cap on recommendations in any envelope.
pub const MAX_RECOMMENDATIONS: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum RecommendationKind {
    Immediate,
    ShortTerm,
    Professional,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recommendation {
    #[serde(rename = "type")]
    pub kind: RecommendationKind,
    pub text: String,
    pub why: String,
}

impl Recommendation {
    pub fn new(kind: RecommendationKind, text: impl Into<String>, why: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
            why: why.into(),
        }
    }
}

/// Where a [`FeedbackEnvelope`] came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum FeedbackSource {
    /// Remote payload accepted as sent.
    Remote,
    /// Remote payload accepted after repair.
    RemoteDegraded,
    Heuristic,
    /// Produced by the pipeline itself (blank input, internal fault).
    System,
}

impl FeedbackSource {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Remote => "remote",
            Self::RemoteDegraded => "remote_degraded",
            Self::Heuristic => "heuristic",
            Self::System => "system",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedbackEnvelope {
    pub recommendations: Vec<Recommendation>,
    pub follow_up_prompt: String,
    pub source: FeedbackSource,
}

impl FeedbackEnvelope {
    /// Builds an envelope, keeping at most three recommendations.
    pub fn new(
        mut recommendations: Vec<Recommendation>,
        follow_up_prompt: impl Into<String>,
        source: FeedbackSource,
    ) -> Self {
        recommendations.truncate(MAX_RECOMMENDATIONS);
        Self {
            recommendations,
            follow_up_prompt: follow_up_prompt.into(),
            source,
        }
    }

    pub fn is_remote(&self) -> bool {
        matches!(
            self.source,
            FeedbackSource::Remote | FeedbackSource::RemoteDegraded
        )
    }
}

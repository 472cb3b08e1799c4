use std::sync::{Arc, OnceLock};

use serde::{Deserialize, Serialize};

use super::traits::AffectScorer;
use super::types::{AffectScore, DOMINANT_UNKNOWN, Evidence};
use crate::error::AffectError;

const STRESS_LABELS: &[&str] = &[
    "anger",
    "sadness",
    "fear",
    "annoyance",
    "disapproval",
    "disappointment",
    "nervousness",
];

const VALENCE_LABELS: &[&str] = &["joy", "love", "approval", "admiration", "optimism", "excitement"];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelScore {
    pub label: String,
    #[serde(default)]
    pub score: f64,
}

/// A text classifier emitting emotion labels with scores.
pub trait LabelModel: Send + Sync {
    fn name(&self) -> &str;

    fn predict(&self, text: &str) -> anyhow::Result<Vec<LabelScore>>;
}

/// Builds the model on first use; an `Err` is remembered as the final state.
pub type ModelLoader = Box<dyn Fn() -> Result<Arc<dyn LabelModel>, String> + Send + Sync>;

/// Scorer backed by a lazily loaded [`LabelModel`].
///
/// The loader runs at most once, even when several threads score
/// concurrently; every caller sees the same loaded or failed state.
pub struct ExternalScorer {
    loader: ModelLoader,
    model: OnceLock<Result<Arc<dyn LabelModel>, String>>,
}

impl ExternalScorer {
    pub fn new(loader: ModelLoader) -> Self {
        Self {
            loader,
            model: OnceLock::new(),
        }
    }

    /// Wrap an already constructed model.
    pub fn from_model(model: Arc<dyn LabelModel>) -> Self {
        let scorer = Self::new(Box::new(|| Err("model supplied directly".into())));
        let _ = scorer.model.set(Ok(model));
        scorer
    }

    fn model(&self) -> Result<&Arc<dyn LabelModel>, AffectError> {
        self.model
            .get_or_init(|| {
                let loaded = (self.loader)();
                match &loaded {
                    Ok(model) => tracing::info!(model = model.name(), "affect: label model loaded"),
                    Err(reason) => tracing::warn!(reason = %reason, "affect: label model unavailable"),
                }
                loaded
            })
            .as_ref()
            .map_err(|reason| AffectError::ScorerUnavailable {
                scorer: "external".into(),
                reason: reason.clone(),
            })
    }
}

impl AffectScorer for ExternalScorer {
    fn name(&self) -> &str {
        "external"
    }

    fn score(&self, text: &str) -> Result<AffectScore, AffectError> {
        let model = self.model()?;
        let labels = model
            .predict(text)
            .map_err(|e| AffectError::ScorerUnavailable {
                scorer: model.name().to_string(),
                reason: e.to_string(),
            })?;
        Ok(score_from_labels(&labels))
    }
}

/// Sum stress and valence label scores; the top label becomes dominant.
pub fn score_from_labels(labels: &[LabelScore]) -> AffectScore {
    let sum_of = |set: &[&str]| -> f64 {
        labels
            .iter()
            .filter(|l| set.contains(&l.label.to_lowercase().as_str()))
            .map(|l| l.score)
            .sum()
    };

    let dominant = labels
        .iter()
        .filter(|l| !l.label.is_empty())
        .max_by(|a, b| a.score.total_cmp(&b.score))
        .map_or_else(|| DOMINANT_UNKNOWN.to_string(), |l| l.label.clone());

    AffectScore {
        stress_score: sum_of(STRESS_LABELS).min(1.0),
        valence: sum_of(VALENCE_LABELS).min(1.0),
        dominant,
        evidence: labels
            .iter()
            .map(|l| Evidence::Label {
                label: l.label.clone(),
                score: l.score,
            })
            .collect(),
    }
}

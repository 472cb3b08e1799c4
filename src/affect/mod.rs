//! Stress/valence estimation.
//!
//! The heuristic scorer is always available. An optional external scorer is
//! consulted first; its result is used only when the input is long enough,
//! the call succeeds, and its stress reaches the sensitivity floor.

pub mod external;
pub mod heuristic;
pub mod http_model;
pub mod traits;
pub mod types;

pub use external::{ExternalScorer, LabelModel, LabelScore};
pub use heuristic::HeuristicScorer;
pub use http_model::HttpLabelModel;
pub use traits::AffectScorer;
pub use types::{AffectScore, DOMINANT_UNKNOWN, Evidence, clamp_unit};

use crate::config::AffectConfig;
use crate::error::AffectError;

pub struct AffectClassifier {
    heuristic: HeuristicScorer,
    external: Option<Box<dyn AffectScorer>>,
    min_text_len: usize,
    sensitivity_floor: f64,
}

impl AffectClassifier {
    /// Heuristic only, default constants.
    pub fn heuristic() -> Self {
        Self::from_config(&AffectConfig::default())
    }

    pub fn from_config(config: &AffectConfig) -> Self {
        let external: Option<Box<dyn AffectScorer>> = if config.use_external {
            Some(Box::new(ExternalScorer::new(HttpLabelModel::loader(config))))
        } else {
            None
        };

        Self {
            heuristic: HeuristicScorer::new(config.weights.clone()),
            external,
            min_text_len: config.min_text_len,
            sensitivity_floor: config.sensitivity_floor,
        }
    }

    /// Replace the external scorer.
    pub fn with_external(mut self, scorer: Box<dyn AffectScorer>) -> Self {
        self.external = Some(scorer);
        self
    }

    pub fn has_external(&self) -> bool {
        self.external.is_some()
    }

    /// Never fails; scores are clamped to `[0, 1]`.
    pub fn classify(&self, text: &str) -> AffectScore {
        let score = match self.external.as_deref() {
            Some(scorer) => match self.consult(scorer, text) {
                Ok(score) => score,
                Err(err) => {
                    tracing::info!(error = %err, "affect: falling back to heuristic scorer");
                    self.heuristic.score_text(text)
                }
            },
            None => self.heuristic.score_text(text),
        };
        score.clamped()
    }

    fn consult(&self, scorer: &dyn AffectScorer, text: &str) -> Result<AffectScore, AffectError> {
        if text.trim().chars().count() <= self.min_text_len {
            return Err(AffectError::InputTooShort {
                min_len: self.min_text_len,
            });
        }

        let score = scorer.score(text)?;
        if score.stress_score.is_nan() || score.stress_score < self.sensitivity_floor {
            return Err(AffectError::BelowSensitivityFloor {
                scorer: scorer.name().to_string(),
                stress: score.stress_score,
                floor: self.sensitivity_floor,
            });
        }
        Ok(score)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct StubScorer {
        result: Result<(f64, f64, &'static str), &'static str>,
        calls: Arc<AtomicUsize>,
    }

    impl AffectScorer for StubScorer {
        fn name(&self) -> &str {
            "stub"
        }

        fn score(&self, _text: &str) -> Result<AffectScore, AffectError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match self.result {
                Ok((stress, valence, dominant)) => Ok(AffectScore {
                    stress_score: stress,
                    valence,
                    dominant: dominant.into(),
                    evidence: Vec::new(),
                }),
                Err(reason) => Err(AffectError::ScorerUnavailable {
                    scorer: "stub".into(),
                    reason: reason.into(),
                }),
            }
        }
    }

    fn with_stub(
        result: Result<(f64, f64, &'static str), &'static str>,
    ) -> (AffectClassifier, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let classifier = AffectClassifier::heuristic().with_external(Box::new(StubScorer {
            result,
            calls: Arc::clone(&calls),
        }));
        (classifier, calls)
    }

    #[test]
    fn heuristic_only_by_default() {
        let classifier = AffectClassifier::heuristic();
        assert!(!classifier.has_external());
        let score = classifier.classify("estou muito stressado, tenho muitos exames");
        assert_eq!(score.dominant, "alto_stress");
    }

    #[test]
    fn external_result_used_when_confident() {
        let (classifier, calls) = with_stub(Ok((0.8, 0.1, "fear")));
        let score = classifier.classify("tenho medo do exame");
        assert_eq!(score.dominant, "fear");
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn short_input_skips_external() {
        let (classifier, calls) = with_stub(Ok((0.8, 0.1, "fear")));
        let score = classifier.classify("  medo ");
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert_ne!(score.dominant, "fear");
    }

    #[test]
    fn low_external_stress_defers_to_heuristic() {
        let (classifier, _) = with_stub(Ok((0.1, 0.0, "neutral")));
        let score = classifier.classify("estou muito stressado, tenho muitos exames");
        assert_eq!(score.dominant, "alto_stress");
    }

    #[test]
    fn nan_external_stress_defers_to_heuristic() {
        let (classifier, _) = with_stub(Ok((f64::NAN, 0.0, "fear")));
        let score = classifier.classify("um dia normal no trabalho");
        assert_ne!(score.dominant, "fear");
        assert!((0.0..=1.0).contains(&score.stress_score));
    }

    #[test]
    fn external_failure_defers_to_heuristic() {
        let (classifier, _) = with_stub(Err("connection refused"));
        let score = classifier.classify("estou feliz hoje");
        assert_eq!(score.dominant, "felicidade");
    }

    #[test]
    fn out_of_range_external_scores_are_clamped() {
        let (classifier, _) = with_stub(Ok((3.5, -1.0, "anger")));
        let score = classifier.classify("estou furioso com tudo");
        assert!((score.stress_score - 1.0).abs() < f64::EPSILON);
        assert!(score.valence.abs() < f64::EPSILON);
    }

    #[test]
    fn enabled_external_without_endpoint_still_classifies() {
        let config = AffectConfig {
            use_external: true,
            ..AffectConfig::default()
        };
        let classifier = AffectClassifier::from_config(&config);
        assert!(classifier.has_external());
        let score = classifier.classify("estou exausto e sem esperança");
        assert!(score.stress_score > 0.7);
    }
}

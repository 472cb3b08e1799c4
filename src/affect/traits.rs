use super::types::AffectScore;
use crate::error::AffectError;

/// A source of stress/valence estimates.
///
/// Implementations may fail; the classifier decides what a failure means.
pub trait AffectScorer: Send + Sync {
    fn name(&self) -> &str;

    fn score(&self, text: &str) -> Result<AffectScore, AffectError>;
}

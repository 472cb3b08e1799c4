use serde::{Deserialize, Serialize};

pub const DOMINANT_UNKNOWN: &str = "unknown";

/// Why a score came out the way it did.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Evidence {
    StressTerm { term: String, weight: u32 },
    PositiveTerm { term: String },
    Phrase { pattern: String },
    Label { label: String, score: f64 },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AffectScore {
    pub stress_score: f64,
    pub valence: f64,
    pub dominant: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub evidence: Vec<Evidence>,
}

impl AffectScore {
    /// Zero scores and an `unknown` label.
    pub fn neutral() -> Self {
        Self {
            stress_score: 0.0,
            valence: 0.0,
            dominant: DOMINANT_UNKNOWN.to_string(),
            evidence: Vec::new(),
        }
    }

    /// Scores forced into `[0, 1]` and a non-empty dominant label.
    pub fn clamped(mut self) -> Self {
        self.stress_score = clamp_unit(self.stress_score);
        self.valence = clamp_unit(self.valence);
        if self.dominant.trim().is_empty() {
            self.dominant = DOMINANT_UNKNOWN.to_string();
        }
        self
    }
}

impl Default for AffectScore {
    fn default() -> Self {
        Self::neutral()
    }
}

/// Clamp to `[0, 1]`; NaN becomes 0.
pub fn clamp_unit(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}

pub(crate) fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10_f64.powi(decimals);
    (value * factor).round() / factor
}

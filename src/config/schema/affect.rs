use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::feedback::secs_or;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AffectConfig {
    /// Consult the external label model before the heuristic scorer.
    #[serde(default)]
    pub use_external: bool,
    /// Hosted text-classification endpoint for the external label model.
    #[serde(default)]
    pub external_endpoint: Option<String>,
    #[serde(default)]
    pub external_token: Option<String>,
    #[serde(default = "default_external_timeout_secs")]
    pub external_timeout_secs: f64,
    /// The external scorer only sees inputs longer than this (trimmed chars).
    #[serde(default = "default_min_text_len")]
    pub min_text_len: usize,
    /// External stress below this floor defers to the heuristic scorer.
    #[serde(default = "default_sensitivity_floor")]
    pub sensitivity_floor: f64,
    #[serde(default)]
    pub weights: HeuristicWeights,
}

fn default_external_timeout_secs() -> f64 {
    10.0
}

fn default_min_text_len() -> usize {
    5
}

fn default_sensitivity_floor() -> f64 {
    0.3
}

impl Default for AffectConfig {
    fn default() -> Self {
        Self {
            use_external: false,
            external_endpoint: None,
            external_token: None,
            external_timeout_secs: default_external_timeout_secs(),
            min_text_len: default_min_text_len(),
            sensitivity_floor: default_sensitivity_floor(),
            weights: HeuristicWeights::default(),
        }
    }
}

impl AffectConfig {
    pub fn external_timeout(&self) -> Duration {
        secs_or(self.external_timeout_secs, default_external_timeout_secs())
    }
}

/// Flat bonus applied once the weighted stress count reaches `min_count`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BonusTier {
    pub min_count: u32,
    pub bonus: f64,
}

/// Constants of the heuristic stress/valence formula.
///
/// Empirically tuned; every value can be overridden from `[affect.weights]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeuristicWeights {
    pub strong_phrase_weight: u32,
    pub exhaustion_weight: u32,
    pub moderate_weight: u32,
    pub default_weight: u32,
    pub stress_base: f64,
    pub stress_increment: f64,
    /// Checked in order; the first tier whose `min_count` is reached applies.
    pub bonus_tiers: Vec<BonusTier>,
    /// Minimum stress when a high-intensity phrase matches.
    pub phrase_floor: f64,
    pub valence_base: f64,
    pub valence_increment: f64,
    pub valence_cap: f64,
    pub high_stress_band: f64,
    pub stress_band: f64,
}

impl Default for HeuristicWeights {
    fn default() -> Self {
        Self {
            strong_phrase_weight: 4,
            exhaustion_weight: 3,
            moderate_weight: 2,
            default_weight: 1,
            stress_base: 0.5,
            stress_increment: 0.15,
            bonus_tiers: vec![
                BonusTier {
                    min_count: 6,
                    bonus: 0.3,
                },
                BonusTier {
                    min_count: 4,
                    bonus: 0.2,
                },
                BonusTier {
                    min_count: 2,
                    bonus: 0.1,
                },
            ],
            phrase_floor: 0.7,
            valence_base: 0.3,
            valence_increment: 0.1,
            valence_cap: 0.9,
            high_stress_band: 0.7,
            stress_band: 0.4,
        }
    }
}

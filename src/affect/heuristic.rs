use std::sync::OnceLock;

use regex::Regex;

use super::traits::AffectScorer;
use super::types::{AffectScore, Evidence, round_to};
use crate::config::HeuristicWeights;
use crate::error::AffectError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tier {
    Strong,
    Exhaustion,
    Moderate,
    Default,
}

/// Substring keywords; every distinct entry found counts once.
const STRESS_TERMS: &[(&str, Tier)] = &[
    // general
    ("stress", Tier::Default),
    ("stressado", Tier::Default),
    ("estressado", Tier::Default),
    ("estressada", Tier::Default),
    ("tensão", Tier::Default),
    ("tenso", Tier::Default),
    ("tensa", Tier::Default),
    // anxiety
    ("ansios", Tier::Default),
    ("ansiedade", Tier::Moderate),
    ("ansioso", Tier::Default),
    ("ansiosa", Tier::Default),
    ("nervos", Tier::Default),
    ("nervoso", Tier::Default),
    ("nervosa", Tier::Default),
    ("nervousness", Tier::Moderate),
    ("preocupad", Tier::Default),
    ("preocupado", Tier::Default),
    ("preocupada", Tier::Default),
    ("angustia", Tier::Default),
    ("angústia", Tier::Moderate),
    ("angustiado", Tier::Default),
    ("angustiada", Tier::Default),
    // fear and panic
    ("medo", Tier::Default),
    ("tem medo", Tier::Default),
    ("assustado", Tier::Default),
    ("assustada", Tier::Default),
    ("pânico", Tier::Moderate),
    ("ataque de pânico", Tier::Strong),
    ("aterrorizado", Tier::Default),
    // overload
    ("sobrecarreg", Tier::Default),
    ("sobrecarregado", Tier::Exhaustion),
    ("sobrecarregada", Tier::Exhaustion),
    ("pressão", Tier::Default),
    ("deadline", Tier::Default),
    ("prazo", Tier::Default),
    ("prazos", Tier::Default),
    ("exame", Tier::Default),
    ("teste", Tier::Default),
    ("prova", Tier::Default),
    ("exaust", Tier::Default),
    ("exausto", Tier::Exhaustion),
    ("exausta", Tier::Exhaustion),
    ("esgotado", Tier::Exhaustion),
    ("esgotada", Tier::Exhaustion),
    ("faculdade", Tier::Default),
    ("universidade", Tier::Default),
    // physical symptoms
    ("não consigo dormir", Tier::Default),
    ("insônia", Tier::Default),
    ("insonia", Tier::Default),
    ("coração acelerado", Tier::Default),
    ("suor frio", Tier::Default),
    ("não consigo respirar", Tier::Default),
    ("falta de ar", Tier::Default),
    ("tremor", Tier::Default),
    ("tremores", Tier::Default),
    ("cansado", Tier::Default),
    ("cansada", Tier::Default),
    // despair
    ("desesperado", Tier::Strong),
    ("desesperada", Tier::Strong),
    ("sem esperança", Tier::Default),
    ("não aguento mais", Tier::Strong),
    ("no limite", Tier::Strong),
    ("fatigado", Tier::Default),
    ("fatigada", Tier::Default),
    ("esgotamento", Tier::Default),
    // irritation
    ("irritado", Tier::Default),
    ("irritada", Tier::Default),
    ("zangado", Tier::Default),
    ("zangada", Tier::Default),
    ("raiva", Tier::Default),
    ("furioso", Tier::Default),
    ("furiosa", Tier::Default),
    // overwhelm
    ("não dou conta", Tier::Default),
    ("muito para fazer", Tier::Default),
    ("muitas tarefas", Tier::Default),
    ("muito trabalho", Tier::Default),
    ("muita pressão", Tier::Default),
    ("muitos exames", Tier::Default),
    ("muitos trabalhos", Tier::Default),
];

const POSITIVE_TERMS: &[&str] = &[
    "feliz",
    "alegre",
    "bom",
    "boa",
    "satisfeito",
    "satisfeita",
    "alegria",
    "joy",
    "happy",
    "love",
    "content",
    "contente",
    "bem",
    "optimista",
    "otimista",
    "grato",
    "grata",
    "sorridente",
    "sorriso",
    "entusiasmado",
    "entusiasmada",
    "animado",
    "animada",
    "felicidade",
    "prazer",
    "diversão",
    "brincar",
];

/// Any match lifts stress to at least `phrase_floor`.
const HIGH_INTENSITY_PHRASES: &[&str] = &[
    r"estou\s+muito\s+stressado",
    r"muitos\s+exames",
    r"muitos\s+trabalhos",
    r"sinto.me\s+sobrecarregado",
    r"sinto.me\s+sobrecarregada",
    r"sinto.me\s+cansado",
    r"sinto.me\s+cansada",
    r"não\s+aguento\s+mais",
    r"estou\s+no\s+limite",
    r"ataque\s+de\s+pânico",
    r"não\s+consigo\s+respirar",
    r"coração\s+acelerado",
    r"vou\s+ter\s+um\s+ataque",
    r"não\s+vejo\s+solução",
    r"estou\s+desesperado",
    r"estou\s+desesperada",
];

fn high_intensity_phrases() -> &'static [Regex] {
    static RE: OnceLock<Vec<Regex>> = OnceLock::new();
    RE.get_or_init(|| {
        HIGH_INTENSITY_PHRASES
            .iter()
            .filter_map(|p| Regex::new(p).ok())
            .collect()
    })
}

/// Keyword-weighted scorer. Always available, never fails.
#[derive(Debug, Clone, Default)]
pub struct HeuristicScorer {
    weights: HeuristicWeights,
}

impl HeuristicScorer {
    pub fn new(weights: HeuristicWeights) -> Self {
        Self { weights }
    }

    fn tier_weight(&self, tier: Tier) -> u32 {
        match tier {
            Tier::Strong => self.weights.strong_phrase_weight,
            Tier::Exhaustion => self.weights.exhaustion_weight,
            Tier::Moderate => self.weights.moderate_weight,
            Tier::Default => self.weights.default_weight,
        }
    }

    pub fn score_text(&self, text: &str) -> AffectScore {
        let w = &self.weights;
        let lower = text.to_lowercase();
        let mut evidence = Vec::new();

        let mut stress_count: u32 = 0;
        for (term, tier) in STRESS_TERMS {
            if lower.contains(term) {
                let weight = self.tier_weight(*tier);
                stress_count = stress_count.saturating_add(weight);
                evidence.push(Evidence::StressTerm {
                    term: (*term).to_string(),
                    weight,
                });
            }
        }

        let mut valence_count: u32 = 0;
        for term in POSITIVE_TERMS {
            if lower.contains(term) {
                valence_count += 1;
                evidence.push(Evidence::PositiveTerm {
                    term: (*term).to_string(),
                });
            }
        }

        let mut stress = 0.0;
        if stress_count > 0 {
            stress = (w.stress_base + f64::from(stress_count) * w.stress_increment).min(1.0);
            if let Some(tier) = w.bonus_tiers.iter().find(|t| stress_count >= t.min_count) {
                stress = (stress + tier.bonus).min(1.0);
            }
        }

        if let Some(phrase) = high_intensity_phrases().iter().find(|re| re.is_match(&lower)) {
            stress = f64::max(stress, w.phrase_floor);
            evidence.push(Evidence::Phrase {
                pattern: phrase.as_str().to_string(),
            });
        }

        let valence = if valence_count > 0 {
            (w.valence_base + f64::from(valence_count) * w.valence_increment).min(w.valence_cap)
        } else {
            0.0
        };

        let dominant = if stress > w.high_stress_band {
            "alto_stress"
        } else if stress > w.stress_band {
            "stress"
        } else if stress > valence {
            "stress_leve"
        } else if valence > stress {
            "felicidade"
        } else {
            "neutro"
        };

        tracing::debug!(
            stress = stress,
            valence = valence,
            stress_count = stress_count,
            valence_count = valence_count,
            dominant = dominant,
            "affect: heuristic score"
        );

        AffectScore {
            stress_score: round_to(stress, 2),
            valence: round_to(valence, 2),
            dominant: dominant.to_string(),
            evidence,
        }
    }
}

impl AffectScorer for HeuristicScorer {
    fn name(&self) -> &str {
        "heuristic"
    }

    fn score(&self, text: &str) -> Result<AffectScore, AffectError> {
        Ok(self.score_text(text))
    }
}

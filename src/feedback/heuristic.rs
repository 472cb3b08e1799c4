//! Deterministic recommendations keyed by affect bands.

use super::extract::DEFAULT_FOLLOW_UP;
use super::types::{FeedbackEnvelope, FeedbackSource, Recommendation, RecommendationKind};
use crate::affect::AffectScore;
use crate::intent::contains_any;

const CRISIS_STRESS: f64 = 0.8;
const ELEVATED_STRESS: f64 = 0.6;
const MODERATE_STRESS: f64 = 0.4;
const LOW_MOOD_VALENCE: f64 = 0.3;
const TRANSITION_STRESS: f64 = 0.5;

const CRISIS_LABELS: &[&str] = &["ansiedade", "panic"];
const COMMITMENT_WORDS: &[&str] = &["reunião", "aula", "evento", "compromisso"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AffectBand {
    Crisis,
    Elevated,
    Moderate,
    LowMood,
    Positive,
}

pub fn band_for(affect: &AffectScore) -> AffectBand {
    let dominant = affect.dominant.to_lowercase();
    if affect.stress_score > CRISIS_STRESS || contains_any(&dominant, CRISIS_LABELS) {
        AffectBand::Crisis
    } else if affect.stress_score > ELEVATED_STRESS {
        AffectBand::Elevated
    } else if affect.stress_score > MODERATE_STRESS {
        AffectBand::Moderate
    } else if affect.valence < LOW_MOOD_VALENCE {
        AffectBand::LowMood
    } else {
        AffectBand::Positive
    }
}

type Triple = [(&'static str, &'static str); 3];

fn triple(band: AffectBand) -> Triple {
    match band {
        AffectBand::Crisis => [
            (
                "TÉCNICA 5-4-3-2-1: Identifica 5 coisas que vês, 4 que tocas, 3 que ouves, 2 que cheiras, 1 que gostas",
                "Grounding sensorial reduz sintomas de ansiedade aguda",
            ),
            (
                "POMODORO: 25min estudo + 5min pausa ativa - 4 ciclos + pausa longa",
                "Intervalos regulares melhoram foco e reduzem exaustão mental",
            ),
            (
                "Procura apoio psicológico universitário ou linha de crise local",
                "Apoio imediato previne escalada de crise emocional",
            ),
        ],
        AffectBand::Elevated => [
            (
                "RESPIRAÇÃO 4-7-8: Inspira 4s, segura 7s, expira 8s (3 repetições)",
                "Respiração diafragmática ativa sistema parassimpático",
            ),
            (
                "Priorização por urgência e blocos de estudo",
                "Reduz sobrecarga decisória",
            ),
            (
                "Marca consulta no Gabinete de Apoio ao Estudante",
                "Intervenção precoce ajuda",
            ),
        ],
        AffectBand::Moderate => [
            (
                "PAUSA ATIVA: 5min a caminhar ou alongar",
                "Reduz tensão e aumenta circulação",
            ),
            (
                "Planeamento semanal com blocos de 2h",
                "Estrutura reduz incerteza",
            ),
            (
                "Diário emocional: regista emoções e gatilhos",
                "Auto-monitorização desenvolve inteligência emocional",
            ),
        ],
        AffectBand::LowMood => [
            (
                "MÚSICA + MOVIMENTO: 1 música que gostes + movimento breve",
                "Melhora humor e aumenta energia",
            ),
            (
                "Exposição à luz natural 15min/dia",
                "Regula ritmo circadiano e humor",
            ),
            (
                "Conecta com alguém de confiança",
                "Apoio social protege bem-estar",
            ),
        ],
        AffectBand::Positive => [
            (
                "Aproveita estado de flow para tarefas que exigem foco",
                "Estados positivos potenciam performance",
            ),
            (
                "Técnica Feynman para consolidar conhecimento",
                "Aumenta retenção através da explicação ativa",
            ),
            (
                "Explora workshops e iniciativas de desenvolvimento pessoal",
                "Engajamento em atividades promove bem-estar",
            ),
        ],
    }
}

fn transition_block() -> Recommendation {
    Recommendation::new(
        RecommendationKind::ShortTerm,
        "BLOCO DE TRANSIÇÃO: 15min entre compromissos para recuperação",
        "Previne acumulação de fadiga decisória",
    )
}

fn mentions_commitments(suggestions: &[String]) -> bool {
    let context = suggestions.join(" ").to_lowercase();
    contains_any(&context, COMMITMENT_WORDS)
}

/// Three recommendations for the affect band.
///
/// When the calendar suggestions mention commitments and stress is above 0.5,
/// the transition block takes the short-term slot. It is deliberately not
/// appended: as a fourth item the three-item cap would always drop it.
pub fn heuristic_feedback(affect: &AffectScore, suggestions: &[String]) -> FeedbackEnvelope {
    let band = band_for(affect);
    let kinds = [
        RecommendationKind::Immediate,
        RecommendationKind::ShortTerm,
        RecommendationKind::Professional,
    ];
    let mut recommendations: Vec<Recommendation> = kinds
        .into_iter()
        .zip(triple(band))
        .map(|(kind, (text, why))| Recommendation::new(kind, text, why))
        .collect();

    if affect.stress_score > TRANSITION_STRESS
        && mentions_commitments(suggestions)
        && let Some(slot) = recommendations
            .iter_mut()
            .find(|r| r.kind == RecommendationKind::ShortTerm)
    {
        *slot = transition_block();
    }

    tracing::debug!(band = ?band, "feedback: heuristic recommendations");
    FeedbackEnvelope::new(recommendations, DEFAULT_FOLLOW_UP, FeedbackSource::Heuristic)
}

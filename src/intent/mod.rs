//! Slot extraction from free-form user text.
//!
//! Deterministic keyword and pattern checks only; extraction never fails.

pub mod risk;

use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

pub use risk::check_risk;

/// Confidence reported by the keyword extractor.
pub const KEYWORD_CONFIDENCE: f64 = 0.85;

/// Most tasks handed to the scheduler for one request.
pub const MAX_DERIVED_TASKS: usize = 4;

const WORK_KEYWORDS: &[&str] = &["estudar", "tarefa", "trabalho", "projeto"];
const DEADLINE_KEYWORDS: &[&str] = &["prazo", "deadline"];

/// Checked in order; the first keyword found names the emotion.
const EMOTION_KEYWORDS: &[(&str, &str)] = &[
    ("stress", "stress"),
    ("stressado", "stress"),
    ("ansioso", "ansiedade"),
    ("ansiosa", "ansiedade"),
    ("cansado", "cansaço"),
    ("exausto", "exaustão"),
    ("triste", "tristeza"),
    ("feliz", "felicidade"),
];

const WORK_TASK: &str = "referência a estudo/trabalho";
const DEADLINE_TASK: &str = "tem prazos";

const STUDY_TASK_KEYWORDS: &[&str] = &["estudar", "estudo", "revisar", "ler", "aprender"];
const PROJECT_TASK_KEYWORDS: &[&str] = &["projeto", "trabalho", "assignment", "tarefa"];
const EXERCISE_TASK_KEYWORDS: &[&str] = &["exercício", "correr", "ginásio", "yoga", "desporto"];
const DEFAULT_TASKS: &[&str] = &["Estudo", "Revisão", "Exercícios", "Planeamento"];

fn re_sleep_hours() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(\d+)\s*(h|horas)").expect("sleep-hours pattern is valid"))
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntentSlots {
    pub sleep_hours: Option<u32>,
    pub tasks: Vec<String>,
    pub deadline: Option<bool>,
    pub explicit_emotion: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntentResult {
    pub raw_text: String,
    pub slots: IntentSlots,
    pub confidence: f64,
    /// Input was empty or whitespace only.
    pub no_input: bool,
}

impl IntentResult {
    fn empty(raw_text: &str) -> Self {
        Self {
            raw_text: raw_text.to_string(),
            slots: IntentSlots::default(),
            confidence: 0.0,
            no_input: true,
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct IntentExtractor;

impl IntentExtractor {
    pub fn new() -> Self {
        Self
    }

    pub fn extract(&self, text: &str) -> IntentResult {
        if text.trim().is_empty() {
            tracing::debug!("intent: empty input");
            return IntentResult::empty(text);
        }

        let lower = text.to_lowercase();
        let mut slots = IntentSlots::default();

        if let Some(caps) = re_sleep_hours().captures(&lower) {
            slots.sleep_hours = caps.get(1).and_then(|m| m.as_str().parse().ok());
        }

        if contains_any(&lower, WORK_KEYWORDS) {
            slots.tasks.push(WORK_TASK.to_string());
        }

        if contains_any(&lower, DEADLINE_KEYWORDS) {
            slots.deadline = Some(true);
            slots.tasks.push(DEADLINE_TASK.to_string());
        }

        slots.explicit_emotion = EMOTION_KEYWORDS
            .iter()
            .find(|(keyword, _)| lower.contains(keyword))
            .map(|(_, emotion)| (*emotion).to_string());

        IntentResult {
            raw_text: text.to_string(),
            slots,
            confidence: KEYWORD_CONFIDENCE,
            no_input: false,
        }
    }
}

/// Task list for the scheduler: slot tasks, then keyword categories, else defaults.
pub fn derive_tasks(intent: &IntentResult) -> Vec<String> {
    let lower = intent.raw_text.to_lowercase();
    let mut tasks: Vec<String> = intent
        .slots
        .tasks
        .iter()
        .filter(|t| !t.is_empty())
        .cloned()
        .collect();

    for (keywords, task) in [
        (STUDY_TASK_KEYWORDS, "Estudo/Revisão"),
        (PROJECT_TASK_KEYWORDS, "Trabalho de Projeto"),
        (EXERCISE_TASK_KEYWORDS, "Exercício Físico"),
    ] {
        if contains_any(&lower, keywords) {
            tasks.push(task.to_string());
        }
    }

    if tasks.is_empty() {
        tasks = DEFAULT_TASKS.iter().map(|t| (*t).to_string()).collect();
    }
    tasks.truncate(MAX_DERIVED_TASKS);
    tasks
}

pub(crate) fn contains_any(haystack: &str, needles: &[&str]) -> bool {
    needles.iter().any(|n| haystack.contains(n))
}

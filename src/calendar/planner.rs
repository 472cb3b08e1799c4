//! Calendar-aware planning advice.

use chrono::{DateTime, Duration, NaiveTime, TimeZone, Utc};

use super::types::{CalendarEvent, DailyLoad, EventKind, LoadLevel, StressPrediction};
use crate::affect::types::round_to;
use crate::intent::contains_any;

const ACADEMIC_KEYWORDS: &[&str] = &[
    "aula", "lecture", "study", "estudo", "exam", "exame", "project", "projeto",
];
const EXERCISE_KEYWORDS: &[&str] = &["exercise", "exercício", "gym", "yoga", "run", "correr"];
const PERSONAL_KEYWORDS: &[&str] = &["break", "pausa", "lunch", "almoço", "dinner", "jantar"];

const MEDIUM_LOAD_STRESS: f64 = 0.3;
const HEAVY_LOAD_STRESS: f64 = 0.6;
const ACADEMIC_LOAD_STRESS: f64 = 0.2;
const ACADEMIC_EVENT_LIMIT: usize = 3;

const MIN_FREE_SLOT_MINUTES: i64 = 30;
const MAX_FREE_SLOTS_SUGGESTED: usize = 2;

fn day_start() -> NaiveTime {
    NaiveTime::from_hms_opt(9, 0, 0).unwrap_or(NaiveTime::MIN)
}

fn day_end() -> NaiveTime {
    NaiveTime::from_hms_opt(18, 0, 0).unwrap_or(NaiveTime::MIN)
}

pub fn analyze_daily_load(events: &[CalendarEvent]) -> DailyLoad {
    let count = events.len();
    let total_hours: f64 = events.iter().map(CalendarEvent::duration_hours).sum();

    let level = if count <= 2 || total_hours <= 2.0 {
        LoadLevel::Light
    } else if count <= 5 || total_hours <= 6.0 {
        LoadLevel::Medium
    } else {
        LoadLevel::Heavy
    };

    DailyLoad {
        events: count,
        total_hours: round_to(total_hours, 2),
        level,
    }
}

pub fn classify_event(subject: &str) -> EventKind {
    let lower = subject.to_lowercase();
    if contains_any(&lower, ACADEMIC_KEYWORDS) {
        EventKind::Academic
    } else if contains_any(&lower, EXERCISE_KEYWORDS) {
        EventKind::Exercise
    } else if contains_any(&lower, PERSONAL_KEYWORDS) {
        EventKind::Personal
    } else {
        EventKind::Other
    }
}

pub fn predict_stress(stress: f64, load: &DailyLoad, kinds: &[EventKind]) -> StressPrediction {
    let mut workload = match load.level {
        LoadLevel::Light => 0.0,
        LoadLevel::Medium => MEDIUM_LOAD_STRESS,
        LoadLevel::Heavy => HEAVY_LOAD_STRESS,
    };
    let academic = kinds.iter().filter(|k| **k == EventKind::Academic).count();
    if academic > ACADEMIC_EVENT_LIMIT {
        workload += ACADEMIC_LOAD_STRESS;
    }

    StressPrediction {
        predicted_stress: (stress + workload).min(1.0),
        emotional_stress: stress,
        workload_stress: workload,
        academic_events: academic,
    }
}

/// Gaps of at least half an hour inside 09:00-18:00 of the first event day.
pub fn find_free_slots(events: &[CalendarEvent]) -> Vec<String> {
    let mut timed: Vec<(DateTime<Utc>, DateTime<Utc>)> = events
        .iter()
        .filter(|e| e.is_timed())
        .filter_map(|e| Some((e.start?, e.end?)))
        .filter(|(start, end)| end > start)
        .collect();

    let whole_day = format!("{}-{}", day_start().format("%H:%M"), day_end().format("%H:%M"));
    if timed.is_empty() {
        return vec![whole_day];
    }
    timed.sort_by_key(|(start, _)| *start);

    let day = timed[0].0.date_naive();
    let window_start = Utc.from_utc_datetime(&day.and_time(day_start()));
    let window_end = Utc.from_utc_datetime(&day.and_time(day_end()));
    let min_gap = Duration::minutes(MIN_FREE_SLOT_MINUTES);

    let mut slots = Vec::new();
    let mut cursor = window_start;
    for (start, end) in timed {
        if end <= window_start || start >= window_end {
            continue;
        }
        let busy_from = start.max(window_start);
        if busy_from - cursor >= min_gap {
            slots.push(format_slot(cursor, busy_from));
        }
        cursor = cursor.max(end.min(window_end));
    }
    if window_end - cursor >= min_gap {
        slots.push(format_slot(cursor, window_end));
    }
    slots
}

fn format_slot(from: DateTime<Utc>, to: DateTime<Utc>) -> String {
    format!("{}-{}", from.format("%H:%M"), to.format("%H:%M"))
}

/// Stress-banded advice, then load advice, then up to two free slots.
pub fn suggest_plan(stress: f64, events: &[CalendarEvent]) -> Vec<String> {
    let load = analyze_daily_load(events);
    let kinds: Vec<EventKind> = events.iter().map(|e| classify_event(&e.subject)).collect();
    let prediction = predict_stress(stress, &load, &kinds);
    tracing::debug!(
        level = %load.level,
        events = load.events,
        predicted_stress = prediction.predicted_stress,
        academic = prediction.academic_events,
        "calendar: load analysed"
    );

    let mut suggestions: Vec<String> = if stress > 0.7 {
        vec![
            "Prioridade: Fazer pausas de 5-10min a cada 45min de estudo".into(),
            "Exercício de respiração 4-7-8: 4s inspirar, 7s segurar, 8s expirar".into(),
            "Beber água regularmente e evitar cafeína em excesso".into(),
        ]
    } else if stress > 0.4 {
        vec![
            "Fazer pausas curtas: 5min a cada 50min de estudo".into(),
            "Caminhar 10min ao ar livre durante as pausas".into(),
            "Ouvir música relaxante durante as pausas".into(),
        ]
    } else {
        vec![
            "Manter blocos de foco de 90min com 15min de descanso".into(),
            "Revisão rápida do plano do dia a cada manhã".into(),
        ]
    };

    match load.level {
        LoadLevel::Heavy => {
            suggestions.push(format!(
                "Carga pesada: {} eventos - considerar priorização",
                load.events
            ));
            suggestions.push("Usar técnica Pomodoro: 25min foco, 5min pausa".into());
        }
        LoadLevel::Medium => suggestions.push(format!(
            "Carga moderada: {} eventos - manter organização",
            load.events
        )),
        LoadLevel::Light => {}
    }

    let free = find_free_slots(events);
    if !free.is_empty() {
        let shown: Vec<&str> = free
            .iter()
            .take(MAX_FREE_SLOTS_SUGGESTED)
            .map(String::as_str)
            .collect();
        suggestions.push(format!("Slots livres disponíveis: {}", shown.join(", ")));
    }

    suggestions
}

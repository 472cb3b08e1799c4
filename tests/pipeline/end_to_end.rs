use std::sync::Arc;

use breathu::calendar::{CalendarEvent, StaticCalendar};
use breathu::config::Config;
use breathu::feedback::{FeedbackSource, RecommendationKind};
use breathu::observability::CountingObserver;
use breathu::orchestrator::{Orchestrator, Stage};
use breathu::storage::{InteractionStore, SqliteInteractionStore};
use chrono::{Duration, Utc};
use tempfile::TempDir;

fn offline_config(tmp: &TempDir) -> Config {
    let mut config = Config {
        data_dir: tmp.path().to_path_buf(),
        config_path: tmp.path().join("config.toml"),
        ..Config::default()
    };
    config.feedback.api_key = None;
    config
}

fn event(subject: &str, hours_from_now: i64) -> CalendarEvent {
    let start = Utc::now() + Duration::hours(hours_from_now);
    CalendarEvent {
        subject: subject.into(),
        start: Some(start),
        end: Some(start + Duration::hours(2)),
        location: String::new(),
        is_all_day: false,
    }
}

#[test]
fn stressed_student_gets_a_reduced_plan_and_three_recommendations() {
    let tmp = TempDir::new().unwrap();
    let orchestrator = Orchestrator::from_config(&offline_config(&tmp));

    let envelope = orchestrator.handle_text(
        "Estou exausto e ansioso, tenho um exame de matemática amanhã e não consigo dormir",
    );

    assert!(envelope.success);
    assert!(envelope.emotion.stress_score > 0.6);
    assert!(envelope.schedule.slots.len() <= envelope.schedule.available_slots);
    assert_eq!(envelope.message.source, FeedbackSource::Heuristic);
    assert_eq!(envelope.message.recommendations.len(), 3);
    assert_eq!(
        envelope.message.recommendations[2].kind,
        RecommendationKind::Professional
    );
    assert!(!envelope.calendar_suggestions.is_empty());
    assert!(envelope.degraded_stages.is_empty());
}

#[test]
fn whitespace_input_short_circuits() {
    let tmp = TempDir::new().unwrap();
    let orchestrator = Orchestrator::from_config(&offline_config(&tmp));

    let envelope = orchestrator.handle_text("   \n\t ");
    assert!(!envelope.success);
    assert!(envelope.message.recommendations.is_empty());
    assert_eq!(envelope.message.follow_up_prompt, "Please provide some input.");
}

#[test]
fn calendar_events_from_file_feed_the_response() {
    let tmp = TempDir::new().unwrap();
    let events: Vec<CalendarEvent> = (1..=7).map(|i| event(&format!("Aula {i}"), i)).collect();
    let events_file = tmp.path().join("events.json");
    std::fs::write(&events_file, serde_json::to_string(&events).unwrap()).unwrap();

    let mut config = offline_config(&tmp);
    config.calendar.events_file = Some(events_file);
    let orchestrator = Orchestrator::from_config(&config);

    let envelope = orchestrator.handle_text("Hoje tenho muitas aulas e estou cansado");
    assert!(envelope.success);
    assert_eq!(envelope.events.len(), config.calendar.max_events);
    assert_eq!(envelope.events[0].subject, "Aula 1");
    assert!(envelope.degraded_stages.is_empty());
}

#[test]
fn unreadable_calendar_degrades_without_failing() {
    let tmp = TempDir::new().unwrap();
    let mut config = offline_config(&tmp);
    config.calendar.events_file = Some(tmp.path().join("missing.json"));
    let orchestrator = Orchestrator::from_config(&config);

    let envelope = orchestrator.handle_text("Tenho uma reunião e estou nervoso");
    assert!(envelope.success);
    assert!(envelope.events.is_empty());
    assert!(envelope.degraded_stages.contains(&Stage::Calendar));
    assert_eq!(envelope.message.recommendations.len(), 3);
}

#[test]
fn observer_counts_requests_and_risk() {
    let tmp = TempDir::new().unwrap();
    let observer = Arc::new(CountingObserver::new());
    let orchestrator = Orchestrator::from_config(&offline_config(&tmp))
        .with_calendar(Box::new(StaticCalendar::from_events(vec![event("Exame", 3)])))
        .with_observer(observer.clone());

    orchestrator.handle_text("Estou bem hoje");
    let risky = orchestrator.handle_text("Às vezes penso em suicídio");
    assert!(risky.risk_detected);

    let counts = observer.snapshot();
    assert_eq!(counts.requests, 2);
    assert_eq!(counts.risks, 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn recorded_interactions_are_listed_newest_first() {
    let tmp = TempDir::new().unwrap();
    let db = tmp.path().join("history.db");
    let store = Arc::new(SqliteInteractionStore::new(&db));
    let orchestrator = Orchestrator::from_config(&offline_config(&tmp)).with_store(store.clone());

    let first = orchestrator.handle_text("Primeiro dia de aulas");
    orchestrator.record_interaction("Primeiro dia de aulas", &first, None);
    let second = orchestrator.handle_text("Segundo dia, mais cansado");
    orchestrator.record_interaction("Segundo dia, mais cansado", &second, Some(5));

    let records = store.recent(10).await.unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].text, "Segundo dia, mais cansado");
    assert_eq!(records[0].rating, Some(5));
    assert_eq!(records[1].recommendations, first.message.recommendations);
}

#[test]
fn many_exams_reads_as_high_stress() {
    let tmp = TempDir::new().unwrap();
    let orchestrator = Orchestrator::from_config(&offline_config(&tmp));

    let envelope = orchestrator.handle_text("estou muito stressado, tenho muitos exames");
    assert!(envelope.success);
    assert!(envelope.emotion.stress_score >= 0.7);
    assert_eq!(envelope.emotion.dominant, "alto_stress");
    assert!(!envelope.message.recommendations.is_empty());
}

#[test]
fn oversized_calendar_window_still_succeeds() {
    let tmp = TempDir::new().unwrap();
    let events_file = tmp.path().join("events.json");
    std::fs::write(
        &events_file,
        serde_json::to_string(&vec![event("Exame", 5)]).unwrap(),
    )
    .unwrap();

    let mut config = offline_config(&tmp);
    config.calendar.events_file = Some(events_file);
    config.calendar.window_days = u32::MAX;
    assert!(config.validate().is_err());

    let envelope = Orchestrator::from_config(&config).handle_text("Tenho um exame");
    assert!(envelope.success);
    assert_eq!(envelope.events.len(), 1);
    assert!(envelope.degraded_stages.is_empty());
}

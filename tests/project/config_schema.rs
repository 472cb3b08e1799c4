use breathu::config::Config;

#[test]
fn empty_config_deserializes_with_defaults() {
    let parsed: Config = toml::from_str("").expect("empty config should deserialize");

    assert!(parsed.feedback.api_key.is_none());
    assert_eq!(parsed.feedback.max_retries, 3);
    assert_eq!(parsed.calendar.window_days, 3);
    assert_eq!(parsed.calendar.max_events, 5);
    assert!(!parsed.storage.enabled);
    assert_eq!(parsed.observability.backend, "log");
    assert!(parsed.validate().is_ok());
}

#[test]
fn partial_sections_keep_remaining_defaults() {
    let toml = r#"
[feedback]
model = "some/model"

[schedule]
high_stress_slots = 1

[storage]
enabled = true
db_path = "/tmp/breathu-history.db"
"#;

    let parsed: Config = toml::from_str(toml).expect("partial config should deserialize");

    assert_eq!(parsed.feedback.model, "some/model");
    assert!((parsed.feedback.temperature - 0.7).abs() < f64::EPSILON);
    assert_eq!(parsed.schedule.high_stress_slots, 1);
    assert_eq!(parsed.schedule.relaxed_slots, 4);
    assert_eq!(
        parsed.interactions_db_path().to_str(),
        Some("/tmp/breathu-history.db")
    );
}

#[test]
fn saved_config_reloads_from_disk() {
    let tmp = tempfile::tempdir().unwrap();
    let mut config = Config {
        data_dir: tmp.path().to_path_buf(),
        config_path: tmp.path().join("config.toml"),
        ..Config::default()
    };
    config.calendar.window_days = 7;
    config.save().unwrap();

    let loaded = Config::load_from(&config.config_path).unwrap();
    assert_eq!(loaded.calendar.window_days, 7);
    assert_eq!(loaded.data_dir, tmp.path());
}

#[test]
fn redacted_toml_hides_secrets() {
    let mut config = Config::default();
    config.feedback.api_key = Some("sk-very-secret".into());
    let shown = config.redacted_toml().unwrap();
    assert!(!shown.contains("sk-very-secret"));
    assert!(shown.contains("***"));
}

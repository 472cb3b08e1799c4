use crate::config::schema::{
    AffectConfig, CalendarConfig, FeedbackConfig, MAX_ATTEMPTS, MAX_WINDOW_DAYS,
    ObservabilityConfig, ScheduleConfig, StorageConfig,
};
use crate::error::ConfigError;
use directories::UserDirs;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

// ── Top-level config ──────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Data directory - computed from home, not serialized
    #[serde(skip)]
    pub data_dir: PathBuf,
    /// Path to config.toml - computed from home, not serialized
    #[serde(skip)]
    pub config_path: PathBuf,

    #[serde(default)]
    pub feedback: FeedbackConfig,

    #[serde(default)]
    pub affect: AffectConfig,

    #[serde(default)]
    pub schedule: ScheduleConfig,

    #[serde(default)]
    pub calendar: CalendarConfig,

    #[serde(default)]
    pub storage: StorageConfig,

    #[serde(default)]
    pub observability: ObservabilityConfig,
}

impl Default for Config {
    fn default() -> Self {
        let home =
            UserDirs::new().map_or_else(|| PathBuf::from("."), |u| u.home_dir().to_path_buf());
        let breathu_dir = home.join(".breathu");

        Self {
            data_dir: breathu_dir.clone(),
            config_path: breathu_dir.join("config.toml"),
            feedback: FeedbackConfig::default(),
            affect: AffectConfig::default(),
            schedule: ScheduleConfig::default(),
            calendar: CalendarConfig::default(),
            storage: StorageConfig::default(),
            observability: ObservabilityConfig::default(),
        }
    }
}

impl Config {
    /// Interaction log location, honouring an explicit `[storage] db_path`.
    pub fn interactions_db_path(&self) -> PathBuf {
        self.storage
            .db_path
            .clone()
            .unwrap_or_else(|| self.data_dir.join("interactions.db"))
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let fb = &self.feedback;
        if !(1..=MAX_ATTEMPTS).contains(&fb.max_retries) {
            return Err(ConfigError::Validation(format!(
                "feedback.max_retries must be within [1, {MAX_ATTEMPTS}]"
            )));
        }
        if !fb.request_timeout_secs.is_finite() || fb.request_timeout_secs <= 0.0 {
            return Err(ConfigError::Validation(
                "feedback.request_timeout_secs must be a positive number".into(),
            ));
        }
        if !fb.backoff_base_secs.is_finite() || fb.backoff_base_secs < 0.0 {
            return Err(ConfigError::Validation(
                "feedback.backoff_base_secs must be >= 0".into(),
            ));
        }
        if !(0.0..=2.0).contains(&fb.temperature) {
            return Err(ConfigError::Validation(
                "feedback.temperature must be within [0, 2]".into(),
            ));
        }

        let affect = &self.affect;
        if !(0.0..=1.0).contains(&affect.sensitivity_floor) {
            return Err(ConfigError::Validation(
                "affect.sensitivity_floor must be within [0, 1]".into(),
            ));
        }
        if affect.use_external && affect.external_endpoint.is_none() {
            return Err(ConfigError::Validation(
                "affect.use_external requires affect.external_endpoint".into(),
            ));
        }

        if self.calendar.window_days > MAX_WINDOW_DAYS {
            return Err(ConfigError::Validation(format!(
                "calendar.window_days must not exceed {MAX_WINDOW_DAYS}"
            )));
        }

        let sched = &self.schedule;
        if sched.moderate_stress > sched.high_stress {
            return Err(ConfigError::Validation(
                "schedule.moderate_stress must not exceed schedule.high_stress".into(),
            ));
        }
        if sched.high_stress_slots == 0 || sched.moderate_slots == 0 || sched.relaxed_slots == 0
        {
            return Err(ConfigError::Validation(
                "schedule slot counts must be >= 1".into(),
            ));
        }

        match self.observability.backend.as_str() {
            "none" | "noop" | "log" | "counting" => Ok(()),
            other => Err(ConfigError::Validation(format!(
                "observability.backend '{other}' is not supported (use \"log\", \"counting\" or \"none\")"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_has_reasonable_values() {
        let config = Config::default();

        assert!(config.feedback.api_key.is_none());
        assert_eq!(config.feedback.max_retries, 3);
        assert!(!config.affect.use_external);
        assert_eq!(config.schedule.high_stress_slots, 2);
        assert_eq!(config.calendar.window_days, 3);
        assert!(!config.storage.enabled);
        assert!(config.config_path.ends_with("config.toml"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn interactions_db_defaults_under_data_dir() {
        let config = Config {
            data_dir: PathBuf::from("/tmp/breathu-test"),
            ..Config::default()
        };
        assert_eq!(
            config.interactions_db_path(),
            PathBuf::from("/tmp/breathu-test/interactions.db")
        );
    }

    #[test]
    fn validate_rejects_zero_attempts() {
        let mut config = Config::default();
        config.feedback.max_retries = 0;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("max_retries"));
    }

    #[test]
    fn validate_rejects_unbounded_attempts_and_window() {
        let mut config = Config::default();
        config.feedback.max_retries = MAX_ATTEMPTS;
        assert!(config.validate().is_ok());
        config.feedback.max_retries = u32::MAX;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("max_retries"));

        let mut config = Config::default();
        config.calendar.window_days = MAX_WINDOW_DAYS;
        assert!(config.validate().is_ok());
        config.calendar.window_days = u32::MAX;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("window_days"));
    }

    #[test]
    fn validate_rejects_inverted_stress_bands() {
        let mut config = Config::default();
        config.schedule.moderate_stress = 0.9;
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_external_scorer_without_endpoint() {
        let mut config = Config::default();
        config.affect.use_external = true;
        assert!(config.validate().is_err());
        config.affect.external_endpoint = Some("http://localhost:9/classify".into());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn validate_rejects_unknown_observer_backend() {
        let mut config = Config::default();
        config.observability.backend = "prometheus".into();
        assert!(config.validate().is_err());
    }

    #[test]
    fn config_toml_round_trip_preserves_serialized_fields() {
        let mut config = Config::default();
        config.feedback.api_key = Some("sk-test".into());
        config.feedback.model = "some/model".into();
        config.calendar.window_days = 7;
        config.storage.enabled = true;

        let serialized = toml::to_string(&config).unwrap();
        let deserialized: Config = toml::from_str(&serialized).unwrap();

        assert_eq!(deserialized.feedback.api_key, config.feedback.api_key);
        assert_eq!(deserialized.feedback.model, "some/model");
        assert_eq!(deserialized.calendar.window_days, 7);
        assert!(deserialized.storage.enabled);
        assert_eq!(deserialized.data_dir, PathBuf::new());
        assert_eq!(deserialized.config_path, PathBuf::new());
    }

    #[test]
    fn empty_toml_yields_defaults() {
        let parsed: Config = toml::from_str("").unwrap();
        assert_eq!(parsed.feedback.max_retries, 3);
        assert_eq!(parsed.observability.backend, "log");
    }
}

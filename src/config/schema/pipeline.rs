use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScheduleConfig {
    /// Stress strictly above this gets `high_stress_slots`.
    pub high_stress: f64,
    /// Stress strictly above this (and not high) gets `moderate_slots`.
    pub moderate_stress: f64,
    pub high_stress_slots: usize,
    pub moderate_slots: usize,
    pub relaxed_slots: usize,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            high_stress: 0.7,
            moderate_stress: 0.4,
            high_stress_slots: 2,
            moderate_slots: 3,
            relaxed_slots: 4,
        }
    }
}

/// Upper bound for `window_days`.
pub const MAX_WINDOW_DAYS: u32 = 365;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CalendarConfig {
    /// How many days ahead to fetch events.
    pub window_days: u32,
    /// Events kept in the response envelope.
    pub max_events: usize,
    /// JSON array of events served by the static calendar adapter.
    pub events_file: Option<PathBuf>,
}

impl Default for CalendarConfig {
    fn default() -> Self {
        Self {
            window_days: 3,
            max_events: 5,
            events_file: None,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub enabled: bool,
    /// Defaults to `<data_dir>/interactions.db`.
    pub db_path: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// "none" | "log" | "counting"
    pub backend: String,
    /// "error" | "warn" | "info" | "debug" | "trace"
    pub log_level: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            backend: "log".into(),
            log_level: "info".into(),
        }
    }
}

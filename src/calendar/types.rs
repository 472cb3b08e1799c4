use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarEvent {
    #[serde(default = "default_subject")]
    pub subject: String,
    #[serde(default)]
    pub start: Option<DateTime<Utc>>,
    #[serde(default)]
    pub end: Option<DateTime<Utc>>,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub is_all_day: bool,
}

fn default_subject() -> String {
    "No Subject".into()
}

impl CalendarEvent {
    /// Hours between start and end; zero when either is missing or inverted.
    pub fn duration_hours(&self) -> f64 {
        match (self.start, self.end) {
            (Some(start), Some(end)) if end > start => {
                #[allow(clippy::cast_precision_loss)]
                let secs = (end - start).num_seconds() as f64;
                secs / 3600.0
            }
            _ => 0.0,
        }
    }

    /// Both ends known and not an all-day entry.
    pub fn is_timed(&self) -> bool {
        !self.is_all_day && self.start.is_some() && self.end.is_some()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum EventKind {
    Academic,
    Exercise,
    Personal,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum LoadLevel {
    Light,
    Medium,
    Heavy,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyLoad {
    pub events: usize,
    pub total_hours: f64,
    pub level: LoadLevel,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StressPrediction {
    pub predicted_stress: f64,
    pub emotional_stress: f64,
    pub workload_stress: f64,
    pub academic_events: usize,
}

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Duration, Utc};

use super::CalendarSource;
use super::types::CalendarEvent;
use crate::error::CalendarError;

enum Origin {
    File(PathBuf),
    Memory(Vec<CalendarEvent>),
}

/// Events from a JSON array file (or memory), filtered to the lookahead window.
pub struct StaticCalendar {
    origin: Origin,
    now: Option<DateTime<Utc>>,
}

impl StaticCalendar {
    pub fn from_file(path: impl Into<PathBuf>) -> Self {
        Self {
            origin: Origin::File(path.into()),
            now: None,
        }
    }

    pub fn from_events(events: Vec<CalendarEvent>) -> Self {
        Self {
            origin: Origin::Memory(events),
            now: None,
        }
    }

    /// Fix the reference time instead of the wall clock.
    pub fn at(mut self, now: DateTime<Utc>) -> Self {
        self.now = Some(now);
        self
    }

    fn unavailable(reason: impl Into<String>) -> CalendarError {
        CalendarError::Unavailable {
            source_name: "static".into(),
            reason: reason.into(),
        }
    }

    fn read_file(path: &Path) -> Result<Vec<CalendarEvent>, CalendarError> {
        let raw = fs::read_to_string(path)
            .map_err(|e| Self::unavailable(format!("{}: {e}", path.display())))?;
        serde_json::from_str(&raw)
            .map_err(|e| Self::unavailable(format!("{}: invalid events JSON: {e}", path.display())))
    }
}

impl CalendarSource for StaticCalendar {
    fn name(&self) -> &str {
        "static"
    }

    fn upcoming_events(&self, window_days: u32) -> Result<Vec<CalendarEvent>, CalendarError> {
        let events = match &self.origin {
            Origin::File(path) => Self::read_file(path)?,
            Origin::Memory(events) => events.clone(),
        };

        let now = self.now.unwrap_or_else(Utc::now);
        let horizon = Duration::try_days(i64::from(window_days))
            .and_then(|window| now.checked_add_signed(window))
            .unwrap_or(DateTime::<Utc>::MAX_UTC);
        let mut upcoming: Vec<CalendarEvent> = events
            .into_iter()
            .filter(|e| match e.start {
                Some(start) => start >= now && start <= horizon,
                None => true,
            })
            .collect();
        upcoming.sort_by_key(|e| e.start);
        Ok(upcoming)
    }
}

//! Read-only calendar collaborators and planning advice.

pub mod cached;
pub mod planner;
pub mod static_source;
pub mod types;

pub use cached::CachedCalendar;
pub use static_source::StaticCalendar;
pub use types::{CalendarEvent, DailyLoad, EventKind, LoadLevel, StressPrediction};

use crate::affect::AffectScore;
use crate::error::CalendarError;

/// Upcoming events plus plan suggestions for a given affect estimate.
pub trait CalendarSource: Send + Sync {
    fn name(&self) -> &str;

    fn upcoming_events(&self, window_days: u32) -> Result<Vec<CalendarEvent>, CalendarError>;

    fn suggest_plan(
        &self,
        affect: &AffectScore,
        events: &[CalendarEvent],
    ) -> Result<Vec<String>, CalendarError> {
        Ok(planner::suggest_plan(affect.stress_score, events))
    }
}

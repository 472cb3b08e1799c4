use std::sync::{Mutex, PoisonError};

use super::CalendarSource;
use super::types::CalendarEvent;
use crate::affect::AffectScore;
use crate::error::CalendarError;

/// Serves the last successful event list when the inner source fails.
pub struct CachedCalendar<S> {
    inner: S,
    last_good: Mutex<Option<Vec<CalendarEvent>>>,
}

impl<S: CalendarSource> CachedCalendar<S> {
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            last_good: Mutex::new(None),
        }
    }
}

impl<S: CalendarSource> CalendarSource for CachedCalendar<S> {
    fn name(&self) -> &str {
        self.inner.name()
    }

    fn upcoming_events(&self, window_days: u32) -> Result<Vec<CalendarEvent>, CalendarError> {
        match self.inner.upcoming_events(window_days) {
            Ok(events) => {
                *self.last_good.lock().unwrap_or_else(PoisonError::into_inner) =
                    Some(events.clone());
                Ok(events)
            }
            Err(err) => {
                let cached = self
                    .last_good
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner)
                    .clone();
                match cached {
                    Some(events) => {
                        tracing::warn!(
                            source = self.inner.name(),
                            error = %err,
                            cached = events.len(),
                            "calendar: source failed, serving cached events"
                        );
                        Ok(events)
                    }
                    None => Err(err),
                }
            }
        }
    }

    fn suggest_plan(
        &self,
        affect: &AffectScore,
        events: &[CalendarEvent],
    ) -> Result<Vec<String>, CalendarError> {
        self.inner.suggest_plan(affect, events)
    }
}

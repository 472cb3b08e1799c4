use std::fmt;

use serde::{Deserialize, Serialize};
use strum::{Display, IntoStaticStr};

use crate::observability::{Observer, ObserverEvent};

/// Pipeline stages that can fall back to a default.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, IntoStaticStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Stage {
    Transcription,
    Calendar,
    Schedule,
    Suggestions,
    Feedback,
}

/// Value of `result`, or `fallback()` plus the failure reason.
pub fn degrade<T, E: fmt::Display>(
    result: Result<T, E>,
    fallback: impl FnOnce() -> T,
) -> (T, Option<String>) {
    match result {
        Ok(value) => (value, None),
        Err(err) => (fallback(), Some(err.to_string())),
    }
}

/// Degraded stages of one request.
pub(crate) struct StageLog<'a> {
    observer: &'a dyn Observer,
    degraded: Vec<Stage>,
}

impl<'a> StageLog<'a> {
    pub(crate) fn new(observer: &'a dyn Observer) -> Self {
        Self {
            observer,
            degraded: Vec::new(),
        }
    }

    pub(crate) fn settle<T, E: fmt::Display>(
        &mut self,
        stage: Stage,
        result: Result<T, E>,
        fallback: impl FnOnce() -> T,
    ) -> T {
        let (value, failure) = degrade(result, fallback);
        if let Some(reason) = failure {
            self.mark(stage, reason);
        }
        value
    }

    pub(crate) fn mark(&mut self, stage: Stage, reason: String) {
        tracing::warn!(stage = %stage, reason = reason.as_str(), "pipeline: stage degraded");
        self.observer.record_event(&ObserverEvent::StageDegraded {
            stage: stage.into(),
            reason,
        });
        if !self.degraded.contains(&stage) {
            self.degraded.push(stage);
        }
    }

    pub(crate) fn into_stages(self) -> Vec<Stage> {
        self.degraded
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::observability::CountingObserver;

    #[test]
    fn degrade_passes_through_ok() {
        let (value, failure) = degrade(Ok::<_, String>(3), || 0);
        assert_eq!(value, 3);
        assert!(failure.is_none());
    }

    #[test]
    fn degrade_substitutes_fallback() {
        let (value, failure) = degrade(Err::<Vec<u8>, _>("calendar offline"), Vec::new);
        assert!(value.is_empty());
        assert_eq!(failure.as_deref(), Some("calendar offline"));
    }

    #[test]
    fn stage_log_records_each_stage_once() {
        let observer = CountingObserver::new();
        let mut log = StageLog::new(&observer);
        let events: Vec<u8> = log.settle(Stage::Calendar, Err::<Vec<u8>, _>("down"), Vec::new);
        assert!(events.is_empty());
        log.mark(Stage::Calendar, "still down".into());
        log.settle(Stage::Schedule, Ok::<_, String>(()), || ());

        assert_eq!(log.into_stages(), vec![Stage::Calendar]);
        assert_eq!(observer.snapshot().degraded, 2);
    }

    #[test]
    fn stage_names_are_snake_case() {
        let name: &'static str = Stage::Suggestions.into();
        assert_eq!(name, "suggestions");
        assert_eq!(serde_json::to_value(Stage::Feedback).unwrap(), "feedback");
    }
}

//! One request through every stage, in order.
//!
//! Each stage failure is replaced by a default and recorded in
//! `degraded_stages`; only blank input and an unexpected fault produce an
//! unsuccessful envelope.

pub mod envelope;
pub mod stage;

pub use envelope::ResponseEnvelope;
pub use stage::{Stage, degrade};

use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::time::{Duration, Instant};

use uuid::Uuid;

use crate::affect::types::round_to;
use crate::affect::{AffectClassifier, AffectScore, AffectScorer};
use crate::calendar::{CachedCalendar, CalendarEvent, CalendarSource, StaticCalendar, planner};
use crate::config::Config;
use crate::error::CalendarError;
use crate::feedback::FeedbackSynthesizer;
use crate::intent::{IntentExtractor, check_risk, derive_tasks};
use crate::media::{NoTranscriber, Transcriber, audio_mime};
use crate::observability::{Observer, ObserverEvent, ObserverMetric, create_observer};
use crate::runtime::bridge::run_blocking;
use crate::schedule::{Schedule, ScheduleAllocator};
use crate::storage::{InteractionRecord, InteractionStore, SqliteInteractionStore};
use stage::StageLog;

/// Longest a caller waits for an interaction to be written.
const RECORD_WAIT: Duration = Duration::from_secs(5);

pub struct Orchestrator {
    intent: IntentExtractor,
    affect: AffectClassifier,
    allocator: ScheduleAllocator,
    feedback: FeedbackSynthesizer,
    calendar: Option<Box<dyn CalendarSource>>,
    transcriber: Box<dyn Transcriber>,
    store: Option<Arc<dyn InteractionStore>>,
    observer: Arc<dyn Observer>,
    window_days: u32,
    max_events: usize,
}

impl Orchestrator {
    pub fn from_config(config: &Config) -> Self {
        let calendar: Option<Box<dyn CalendarSource>> =
            config.calendar.events_file.as_ref().map(|path| {
                Box::new(CachedCalendar::new(StaticCalendar::from_file(path.clone())))
                    as Box<dyn CalendarSource>
            });
        let store: Option<Arc<dyn InteractionStore>> = config.storage.enabled.then(|| {
            Arc::new(SqliteInteractionStore::new(config.interactions_db_path()))
                as Arc<dyn InteractionStore>
        });

        Self {
            intent: IntentExtractor::new(),
            affect: AffectClassifier::from_config(&config.affect),
            allocator: ScheduleAllocator::new(config.schedule.clone()),
            feedback: FeedbackSynthesizer::from_config(&config.feedback),
            calendar,
            transcriber: Box::new(NoTranscriber),
            store,
            observer: Arc::from(create_observer(&config.observability)),
            window_days: config.calendar.window_days,
            max_events: config.calendar.max_events,
        }
    }

    pub fn with_calendar(mut self, calendar: Box<dyn CalendarSource>) -> Self {
        self.calendar = Some(calendar);
        self
    }

    pub fn with_store(mut self, store: Arc<dyn InteractionStore>) -> Self {
        self.store = Some(store);
        self
    }

    pub fn with_transcriber(mut self, transcriber: Box<dyn Transcriber>) -> Self {
        self.transcriber = transcriber;
        self
    }

    pub fn with_external_scorer(mut self, scorer: Box<dyn AffectScorer>) -> Self {
        self.affect = self.affect.with_external(scorer);
        self
    }

    pub fn with_observer(mut self, observer: Arc<dyn Observer>) -> Self {
        self.observer = observer;
        self
    }

    pub fn observer(&self) -> &dyn Observer {
        self.observer.as_ref()
    }

    /// Run the whole pipeline for `text`. Never panics, never fails.
    pub fn handle_text(&self, text: &str) -> ResponseEnvelope {
        let request_id = Uuid::new_v4().to_string();
        let started = Instant::now();
        self.observer.record_event(&ObserverEvent::RequestStart {
            request_id: request_id.clone(),
            input_chars: text.chars().count(),
        });

        let outcome = panic::catch_unwind(AssertUnwindSafe(|| self.run_pipeline(&request_id, text)));
        let envelope = outcome.unwrap_or_else(|payload| {
            let reason = panic_reason(payload.as_ref());
            tracing::error!(
                request_id = request_id.as_str(),
                reason = reason.as_str(),
                "pipeline: unexpected fault"
            );
            ResponseEnvelope::error(request_id.clone(), &reason)
        });

        let duration = started.elapsed();
        self.observer.record_event(&ObserverEvent::RequestEnd {
            duration,
            success: envelope.success,
        });
        self.observer
            .record_metric(&ObserverMetric::RequestLatency(duration));
        envelope
    }

    /// Transcribe `audio`, then [`Self::handle_text`].
    pub fn handle_audio(&self, audio: &[u8]) -> ResponseEnvelope {
        if audio_mime(audio, None).is_none() {
            tracing::warn!(bytes = audio.len(), "pipeline: input is not recognised audio");
            let mut log = StageLog::new(self.observer.as_ref());
            log.mark(Stage::Transcription, "input is not recognised audio".into());
            let mut envelope = ResponseEnvelope::blank(Uuid::new_v4().to_string());
            envelope.degraded_stages = log.into_stages();
            return envelope;
        }

        let transcript = panic::catch_unwind(AssertUnwindSafe(|| {
            self.transcriber.transcribe(audio)
        }))
        .unwrap_or_else(|payload| {
            tracing::warn!(
                transcriber = self.transcriber.name(),
                reason = panic_reason(payload.as_ref()).as_str(),
                "pipeline: transcription failed"
            );
            String::new()
        });

        tracing::debug!(
            transcriber = self.transcriber.name(),
            chars = transcript.chars().count(),
            "pipeline: audio transcribed"
        );
        self.handle_text(&transcript)
    }

    /// Save the interaction if a store is configured.
    ///
    /// Failures are logged, never returned.
    pub fn record_interaction(&self, text: &str, envelope: &ResponseEnvelope, rating: Option<u8>) {
        let Some(store) = self.store.clone() else {
            return;
        };
        let record = InteractionRecord::new(
            text,
            envelope.emotion.clone(),
            envelope.message.recommendations.clone(),
            rating,
        );
        let id = record.id.clone();

        let save = async move { store.save_interaction(&record).await };
        match run_blocking(save, RECORD_WAIT) {
            Ok(Ok(())) => tracing::debug!(id = id.as_str(), "pipeline: interaction recorded"),
            Ok(Err(err)) => tracing::warn!(error = %err, "pipeline: could not record interaction"),
            Err(err) => tracing::warn!(error = %err, "pipeline: could not record interaction"),
        }
    }

    fn run_pipeline(&self, request_id: &str, text: &str) -> ResponseEnvelope {
        let intent = self.intent.extract(text);
        if intent.no_input {
            return ResponseEnvelope::blank(request_id);
        }

        let risk_detected = check_risk(&intent.raw_text);
        if risk_detected {
            tracing::warn!(request_id, "pipeline: risk keywords detected");
            self.observer.record_event(&ObserverEvent::RiskDetected {
                request_id: request_id.to_string(),
            });
        }

        let mut stages = StageLog::new(self.observer.as_ref());

        let emotion = self.affect.classify(&intent.raw_text);
        self.observer
            .record_metric(&ObserverMetric::StressLevel(emotion.stress_score));

        let mut events = stages.settle(
            Stage::Calendar,
            guarded(|| self.fetch_events()),
            Vec::new,
        );

        let tasks = derive_tasks(&intent);
        let budget = self.allocator.slots_for(emotion.stress_score);
        let schedule = stages.settle(
            Stage::Schedule,
            guarded(|| self.allocator.plan(&tasks, emotion.stress_score)),
            || Schedule::fallback(&tasks, budget),
        );

        let suggestions = stages.settle(
            Stage::Suggestions,
            guarded(|| self.suggest(&emotion, &events)),
            Vec::new,
        );

        let synthesis = self.feedback.synthesize_detailed(&emotion, &suggestions);
        if let Some(reason) = synthesis.failure {
            stages.mark(Stage::Feedback, reason);
        }
        self.observer.record_event(&ObserverEvent::FeedbackResolved {
            source: synthesis.envelope.source.as_str(),
            attempts: synthesis.attempts,
        });
        self.observer
            .record_metric(&ObserverMetric::RemoteAttempts(synthesis.attempts));

        events.truncate(self.max_events);
        let degraded_stages = stages.into_stages();
        tracing::info!(
            request_id,
            stress = emotion.stress_score,
            dominant = emotion.dominant.as_str(),
            slots = schedule.slots.len(),
            source = synthesis.envelope.source.as_str(),
            degraded = degraded_stages.len(),
            "pipeline: request complete"
        );

        ResponseEnvelope {
            request_id: request_id.to_string(),
            success: true,
            emotion: rounded(emotion),
            schedule,
            events,
            calendar_suggestions: suggestions,
            message: synthesis.envelope,
            intent: Some(intent),
            risk_detected,
            degraded_stages,
        }
    }

    fn fetch_events(&self) -> Result<Vec<CalendarEvent>, CalendarError> {
        match &self.calendar {
            Some(calendar) => calendar.upcoming_events(self.window_days),
            None => Ok(Vec::new()),
        }
    }

    fn suggest(
        &self,
        emotion: &AffectScore,
        events: &[CalendarEvent],
    ) -> Result<Vec<String>, CalendarError> {
        match &self.calendar {
            Some(calendar) => calendar.suggest_plan(emotion, events),
            None => Ok(planner::suggest_plan(emotion.stress_score, events)),
        }
    }
}

fn rounded(mut emotion: AffectScore) -> AffectScore {
    emotion.stress_score = round_to(emotion.stress_score, 3);
    emotion.valence = round_to(emotion.valence, 3);
    emotion
}

/// Run one collaborator call; a panic becomes that stage's failure.
fn guarded<T, E: fmt::Display>(call: impl FnOnce() -> Result<T, E>) -> Result<T, String> {
    match panic::catch_unwind(AssertUnwindSafe(call)) {
        Ok(result) => result.map_err(|e| e.to_string()),
        Err(payload) => Err(format!("panicked: {}", panic_reason(payload.as_ref()))),
    }
}

fn panic_reason(payload: &(dyn std::any::Any + Send)) -> String {
    payload
        .downcast_ref::<&str>()
        .map(ToString::to_string)
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown panic".to_string())
}

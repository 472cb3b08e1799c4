use std::time::Duration;

/// Events the observer can record
#[derive(Debug, Clone)]
pub enum ObserverEvent {
    RequestStart {
        request_id: String,
        input_chars: usize,
    },
    /// A stage failed and its fallback value was used.
    StageDegraded {
        stage: &'static str,
        reason: String,
    },
    FeedbackResolved {
        source: &'static str,
        attempts: u32,
    },
    RiskDetected {
        request_id: String,
    },
    RequestEnd {
        duration: Duration,
        success: bool,
    },
}

/// Numeric metrics
#[derive(Debug, Clone)]
pub enum ObserverMetric {
    RequestLatency(Duration),
    RemoteAttempts(u32),
    StressLevel(f64),
}

/// Sink for pipeline events and metrics
pub trait Observer: Send + Sync {
    /// Record a discrete event
    fn record_event(&self, event: &ObserverEvent);

    /// Record a numeric metric
    fn record_metric(&self, metric: &ObserverMetric);

    /// Flush any buffered data (no-op for most backends)
    fn flush(&self) {}

    /// Human-readable name of this observer
    fn name(&self) -> &str;
}

use super::traits::{Observer, ObserverEvent, ObserverMetric};
use tracing::{info, warn};

/// Observer that writes events through `tracing`
pub struct LogObserver;

impl LogObserver {
    pub fn new() -> Self {
        Self
    }
}

impl Observer for LogObserver {
    fn record_event(&self, event: &ObserverEvent) {
        match event {
            ObserverEvent::RequestStart {
                request_id,
                input_chars,
            } => {
                info!(request_id = %request_id, input_chars = input_chars, "request.start");
            }
            ObserverEvent::StageDegraded { stage, reason } => {
                warn!(stage = %stage, reason = %reason, "stage.degraded");
            }
            ObserverEvent::FeedbackResolved { source, attempts } => {
                info!(source = %source, attempts = attempts, "feedback.resolved");
            }
            ObserverEvent::RiskDetected { request_id } => {
                warn!(request_id = %request_id, "safety.risk_detected");
            }
            ObserverEvent::RequestEnd { duration, success } => {
                let ms = u64::try_from(duration.as_millis()).unwrap_or(u64::MAX);
                info!(duration_ms = ms, success = success, "request.end");
            }
        }
    }

    fn record_metric(&self, metric: &ObserverMetric) {
        match metric {
            ObserverMetric::RequestLatency(d) => {
                let ms = u64::try_from(d.as_millis()).unwrap_or(u64::MAX);
                info!(latency_ms = ms, "metric.request_latency");
            }
            ObserverMetric::RemoteAttempts(n) => {
                info!(attempts = n, "metric.remote_attempts");
            }
            ObserverMetric::StressLevel(s) => {
                info!(stress = s, "metric.stress_level");
            }
        }
    }

    fn name(&self) -> &str {
        "log"
    }
}

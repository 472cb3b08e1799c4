use super::traits::{Observer, ObserverEvent, ObserverMetric};
use std::sync::atomic::{AtomicU64, Ordering};

/// In-process counters, reported through tracing on flush.
pub struct CountingObserver {
    request_count: AtomicU64,
    degraded_count: AtomicU64,
    failure_count: AtomicU64,
    risk_count: AtomicU64,
}

/// Point-in-time copy of [`CountingObserver`] counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CountSnapshot {
    pub requests: u64,
    pub degraded: u64,
    pub failures: u64,
    pub risks: u64,
}

impl CountingObserver {
    #[must_use]
    pub fn new() -> Self {
        Self {
            request_count: AtomicU64::new(0),
            degraded_count: AtomicU64::new(0),
            failure_count: AtomicU64::new(0),
            risk_count: AtomicU64::new(0),
        }
    }

    pub fn snapshot(&self) -> CountSnapshot {
        CountSnapshot {
            requests: self.request_count.load(Ordering::Relaxed),
            degraded: self.degraded_count.load(Ordering::Relaxed),
            failures: self.failure_count.load(Ordering::Relaxed),
            risks: self.risk_count.load(Ordering::Relaxed),
        }
    }
}

impl Default for CountingObserver {
    fn default() -> Self {
        Self::new()
    }
}

impl Observer for CountingObserver {
    fn record_event(&self, event: &ObserverEvent) {
        match event {
            ObserverEvent::RequestStart { .. } => {
                self.request_count.fetch_add(1, Ordering::Relaxed);
            }
            ObserverEvent::StageDegraded { .. } => {
                self.degraded_count.fetch_add(1, Ordering::Relaxed);
            }
            ObserverEvent::RequestEnd { success: false, .. } => {
                self.failure_count.fetch_add(1, Ordering::Relaxed);
            }
            ObserverEvent::RiskDetected { .. } => {
                self.risk_count.fetch_add(1, Ordering::Relaxed);
            }
            ObserverEvent::FeedbackResolved { .. } | ObserverEvent::RequestEnd { .. } => {}
        }
    }

    fn record_metric(&self, _metric: &ObserverMetric) {}

    fn flush(&self) {
        let snap = self.snapshot();
        tracing::debug!(
            requests_total = snap.requests,
            degraded_total = snap.degraded,
            failures_total = snap.failures,
            risks_total = snap.risks,
            "observer.counting.flush"
        );
    }

    fn name(&self) -> &str {
        "counting"
    }
}

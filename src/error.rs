use std::time::Duration;

use thiserror::Error;

// ─── Top-level error hierarchy ───────────────────────────────────────────────

/// Structured error hierarchy for `BreathU`.
///
/// Every variant is non-fatal to a request: each is caught at the component
/// boundary where it originates and turned into a default or a fallback
/// computation. Adapters and the binary keep using `anyhow::Result` for ad-hoc
/// context chains.
#[derive(Debug, Error)]
pub enum BreathuError {
    // ── Config ───────────────────────────────────────────────────────────
    #[error("config: {0}")]
    Config(#[from] ConfigError),

    // ── Remote feedback ─────────────────────────────────────────────────
    #[error("feedback: {0}")]
    Feedback(#[from] FeedbackError),

    // ── Affect scoring ──────────────────────────────────────────────────
    #[error("affect: {0}")]
    Affect(#[from] AffectError),

    // ── Calendar collaborator ───────────────────────────────────────────
    #[error("calendar: {0}")]
    Calendar(#[from] CalendarError),

    // ── Scheduling ──────────────────────────────────────────────────────
    #[error("schedule: {0}")]
    Schedule(#[from] ScheduleError),

    // ── Interaction log ─────────────────────────────────────────────────
    #[error("storage: {0}")]
    Storage(#[from] StorageError),

    // ── Sync/async bridging ─────────────────────────────────────────────
    #[error("bridge: {0}")]
    Bridge(#[from] BridgeError),

    // ── Generic fallthrough (wraps anyhow for interop) ──────────────────
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

// ─── Config errors ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load config: {0}")]
    Load(String),

    #[error("validation failed: {0}")]
    Validation(String),

    #[error("io: {0}")]
    Io(#[from] std::io::Error),
}

// ─── Remote feedback errors ─────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum FeedbackError {
    #[error("remote feedback is not configured (no API token)")]
    Unconfigured,

    #[error("transport failed: {0}")]
    Transport(String),

    #[error("attempt timed out after {0:?}")]
    Timeout(Duration),

    #[error("credentials rejected (HTTP {status})")]
    Auth { status: u16 },

    #[error("rate limited (HTTP 429)")]
    RateLimited,

    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("no content could be extracted from the response")]
    EmptyContent,

    #[error("response did not contain recoverable JSON")]
    Parse,

    #[error("response JSON has the wrong shape: {0}")]
    Schema(String),

    #[error("retry budget of {0:?} exhausted")]
    BudgetExhausted(Duration),

    #[error("bridge: {0}")]
    Bridge(#[from] BridgeError),
}

// ─── Affect errors ──────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum AffectError {
    #[error("scorer {scorer} unavailable: {reason}")]
    ScorerUnavailable { scorer: String, reason: String },

    #[error("input shorter than {min_len} characters")]
    InputTooShort { min_len: usize },

    #[error("scorer {scorer} stress {stress:.2} below sensitivity floor {floor:.2}")]
    BelowSensitivityFloor {
        scorer: String,
        stress: f64,
        floor: f64,
    },
}

// ─── Calendar errors ────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum CalendarError {
    #[error("calendar {source_name} unavailable: {reason}")]
    Unavailable { source_name: String, reason: String },

    #[error("planning failed: {0}")]
    Planning(String),
}

// ─── Schedule errors ────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ScheduleError {
    #[error("stress level {0} is not a finite number")]
    InvalidStress(f64),
}

// ─── Storage errors ─────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("sqlx: {0}")]
    Sqlx(#[from] sqlx::Error),

    #[error("serialize: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("io: {0}")]
    Io(#[from] std::io::Error),
}

// ─── Bridge errors ──────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum BridgeError {
    #[error("could not start a runtime: {0}")]
    Runtime(String),

    #[error("bounded wait of {0:?} expired")]
    WaitExpired(Duration),

    #[error("driver thread ended without a result")]
    Disconnected,
}

// ─── Convenience re-exports ─────────────────────────────────────────────────

/// Shorthand result type for the crate.
pub type Result<T> = std::result::Result<T, BreathuError>;

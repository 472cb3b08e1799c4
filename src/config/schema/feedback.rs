use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Upper bound for `max_retries`.
pub const MAX_ATTEMPTS: u32 = 10;

/// Remote feedback service (any OpenAI-compatible chat completions endpoint).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedbackConfig {
    /// Bearer token. Absent means the remote path is never attempted.
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_temperature")]
    pub temperature: f64,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    /// Per-attempt request timeout.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: f64,
    /// Total attempts, including the first one.
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    /// Delay before attempt `n + 1` is `backoff_base_secs * 2^(n - 1)`.
    #[serde(default = "default_backoff_base_secs")]
    pub backoff_base_secs: f64,
    /// Extra wait granted to a caller blocked on a busy driver.
    #[serde(default = "default_bridge_grace_secs")]
    pub bridge_grace_secs: f64,
}

fn default_base_url() -> String {
    "https://openrouter.ai/api/v1".into()
}

fn default_model() -> String {
    "alibaba/tongyi-deepresearch-30b-a3b:free".into()
}

fn default_temperature() -> f64 {
    0.7
}

fn default_max_tokens() -> u32 {
    800
}

fn default_request_timeout_secs() -> f64 {
    30.0
}

fn default_max_retries() -> u32 {
    3
}

fn default_backoff_base_secs() -> f64 {
    1.0
}

fn default_bridge_grace_secs() -> f64 {
    10.0
}

impl Default for FeedbackConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_base_url(),
            model: default_model(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            request_timeout_secs: default_request_timeout_secs(),
            max_retries: default_max_retries(),
            backoff_base_secs: default_backoff_base_secs(),
            bridge_grace_secs: default_bridge_grace_secs(),
        }
    }
}

impl FeedbackConfig {
    pub fn request_timeout(&self) -> Duration {
        secs_or(self.request_timeout_secs, default_request_timeout_secs())
    }

    pub fn backoff_base(&self) -> Duration {
        secs_or(self.backoff_base_secs, default_backoff_base_secs())
    }

    pub fn bridge_grace(&self) -> Duration {
        secs_or(self.bridge_grace_secs, default_bridge_grace_secs())
    }

    /// Token present and non-blank.
    pub fn has_api_key(&self) -> bool {
        self.api_key.as_deref().is_some_and(|k| !k.trim().is_empty())
    }
}

pub(crate) fn secs_or(value: f64, fallback: f64) -> Duration {
    Duration::try_from_secs_f64(value)
        .or_else(|_| Duration::try_from_secs_f64(fallback))
        .unwrap_or_default()
}

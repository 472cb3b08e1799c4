//! Coaching recommendations from a remote chat model, with a deterministic
//! heuristic fallback.
//!
//! The remote path runs only when an API token is configured. It is retried
//! with exponential backoff under a fixed worst-case budget; any terminal
//! failure, including a bridge failure, yields heuristic recommendations.

pub mod extract;
pub mod heuristic;
pub mod prompt;
pub mod retry;
pub mod types;

pub use extract::{DEFAULT_FOLLOW_UP, Recovery, extract_content, recover_json, validate};
pub use heuristic::{AffectBand, band_for, heuristic_feedback};
pub use retry::{RetryOutcome, RetryPolicy};
pub use types::{
    FeedbackEnvelope, FeedbackSource, MAX_RECOMMENDATIONS, Recommendation, RecommendationKind,
};

use std::time::Duration;

use crate::affect::AffectScore;
use crate::config::FeedbackConfig;
use crate::error::FeedbackError;
use crate::net::{ChatClient, ChatRequest};
use crate::runtime::bridge::run_blocking;

/// Envelope plus how it was obtained.
#[derive(Debug, Clone)]
pub struct Synthesis {
    pub envelope: FeedbackEnvelope,
    /// Remote attempts started; 0 when the remote path was skipped.
    pub attempts: u32,
    /// Last remote error when the heuristic was used after trying remote.
    pub failure: Option<String>,
}

pub struct FeedbackSynthesizer {
    config: FeedbackConfig,
    client: ChatClient,
    policy: RetryPolicy,
}

impl FeedbackSynthesizer {
    pub fn from_config(config: &FeedbackConfig) -> Self {
        let client = ChatClient::new(
            &config.base_url,
            config.api_key.as_deref(),
            config.request_timeout(),
        );
        let policy = RetryPolicy::from_config(config);

        if client.has_credentials() {
            tracing::info!(
                model = config.model.as_str(),
                max_retries = policy.max_retries,
                "feedback: remote generation enabled"
            );
        } else {
            tracing::warn!("feedback: no API key configured, using heuristic recommendations");
        }

        Self {
            config: config.clone(),
            client,
            policy,
        }
    }

    pub fn remote_enabled(&self) -> bool {
        self.client.has_credentials()
    }

    pub fn policy(&self) -> RetryPolicy {
        self.policy
    }

    /// How long a blocked caller waits for the remote path.
    pub fn bridge_wait(&self) -> Duration {
        self.policy
            .worst_case_latency()
            .saturating_add(self.config.bridge_grace())
    }

    /// Blocking; never fails.
    pub fn synthesize(&self, affect: &AffectScore, suggestions: &[String]) -> FeedbackEnvelope {
        self.synthesize_detailed(affect, suggestions).envelope
    }

    pub fn synthesize_detailed(&self, affect: &AffectScore, suggestions: &[String]) -> Synthesis {
        if !self.remote_enabled() {
            return fallback(affect, suggestions, 0, None);
        }

        let request = prompt::build_request(&self.config, affect, suggestions);
        let client = self.client.clone();
        let policy = self.policy;
        let remote = async move { remote_feedback(&client, &request, policy).await };

        match run_blocking(remote, self.bridge_wait()) {
            Ok(outcome) => resolve(outcome, affect, suggestions),
            Err(err) => {
                let err = FeedbackError::from(err);
                tracing::warn!(error = %err, "feedback: bridge failed, using heuristic");
                fallback(affect, suggestions, 0, Some(err.to_string()))
            }
        }
    }

    /// Same as [`Self::synthesize_detailed`] for callers already on a runtime.
    pub async fn synthesize_async(&self, affect: &AffectScore, suggestions: &[String]) -> Synthesis {
        if !self.remote_enabled() {
            return fallback(affect, suggestions, 0, None);
        }

        let request = prompt::build_request(&self.config, affect, suggestions);
        let outcome = remote_feedback(&self.client, &request, self.policy).await;
        resolve(outcome, affect, suggestions)
    }
}

async fn remote_feedback(
    client: &ChatClient,
    request: &ChatRequest,
    policy: RetryPolicy,
) -> RetryOutcome<FeedbackEnvelope> {
    policy
        .run(move |attempt| async move {
            tracing::debug!(attempt, url = client.chat_url(), "feedback: remote attempt");
            let body = client.post_raw(request).await?;
            extract::parse_body(&body)
        })
        .await
}

fn resolve(
    outcome: RetryOutcome<FeedbackEnvelope>,
    affect: &AffectScore,
    suggestions: &[String],
) -> Synthesis {
    match outcome.result {
        Ok(envelope) => {
            tracing::info!(
                source = envelope.source.as_str(),
                attempts = outcome.attempts,
                recommendations = envelope.recommendations.len(),
                "feedback: remote recommendations accepted"
            );
            Synthesis {
                envelope,
                attempts: outcome.attempts,
                failure: None,
            }
        }
        Err(err) => {
            tracing::warn!(
                attempts = outcome.attempts,
                error = %err,
                "feedback: remote attempts exhausted, using heuristic"
            );
            fallback(affect, suggestions, outcome.attempts, Some(err.to_string()))
        }
    }
}

fn fallback(
    affect: &AffectScore,
    suggestions: &[String],
    attempts: u32,
    failure: Option<String>,
) -> Synthesis {
    Synthesis {
        envelope: heuristic_feedback(affect, suggestions),
        attempts,
        failure,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn stressed() -> AffectScore {
        AffectScore {
            stress_score: 0.9,
            valence: 0.1,
            dominant: "alto_stress".into(),
            evidence: Vec::new(),
        }
    }

    fn config(base_url: &str, api_key: Option<&str>) -> FeedbackConfig {
        FeedbackConfig {
            api_key: api_key.map(str::to_string),
            base_url: base_url.to_string(),
            request_timeout_secs: 2.0,
            backoff_base_secs: 0.01,
            bridge_grace_secs: 1.0,
            ..FeedbackConfig::default()
        }
    }

    fn completion(content: &str) -> serde_json::Value {
        json!({"choices": [{"message": {"role": "assistant", "content": content}}]})
    }

    const GOOD: &str = r#"{"recommendations":[{"type":"immediate","text":"Respira","why":"Acalma"},{"type":"short_term","text":"Planeia","why":"Ordem"}],"follow_up_prompt":"Como estás?"}"#;

    #[test]
    fn bridge_wait_covers_worst_case_plus_grace() {
        let synth = FeedbackSynthesizer::from_config(&FeedbackConfig::default());
        assert_eq!(synth.bridge_wait(), Duration::from_secs(93 + 10));
    }

    #[test]
    fn without_token_the_heuristic_is_used() {
        let synth = FeedbackSynthesizer::from_config(&config("http://127.0.0.1:9", None));
        assert!(!synth.remote_enabled());
        let out = synth.synthesize_detailed(&stressed(), &[]);
        assert_eq!(out.envelope.source, FeedbackSource::Heuristic);
        assert_eq!(out.attempts, 0);
        assert!(out.failure.is_none());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn without_token_no_request_is_sent() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(completion(GOOD)))
            .expect(0)
            .mount(&server)
            .await;

        let synth = FeedbackSynthesizer::from_config(&config(&server.uri(), None));
        let env = synth.synthesize(&stressed(), &[]);
        assert_eq!(env.source, FeedbackSource::Heuristic);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn clean_remote_payload_is_used() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(completion(GOOD)))
            .expect(1)
            .mount(&server)
            .await;

        let synth = FeedbackSynthesizer::from_config(&config(&server.uri(), Some("sk-test")));
        let out = synth.synthesize_detailed(&stressed(), &["Dia cheio".into()]);
        assert_eq!(out.envelope.source, FeedbackSource::Remote);
        assert_eq!(out.envelope.recommendations.len(), 2);
        assert_eq!(out.attempts, 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn server_error_then_success_retries() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500))
            .up_to_n_times(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(completion(GOOD)))
            .mount(&server)
            .await;

        let synth = FeedbackSynthesizer::from_config(&config(&server.uri(), Some("sk-test")));
        let out = synth.synthesize_detailed(&stressed(), &[]);
        assert_eq!(out.envelope.source, FeedbackSource::Remote);
        assert_eq!(out.attempts, 2);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn rejected_credentials_fall_back_after_all_attempts() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(401))
            .expect(3)
            .mount(&server)
            .await;

        let synth = FeedbackSynthesizer::from_config(&config(&server.uri(), Some("sk-bad")));
        let out = synth.synthesize_detailed(&stressed(), &[]);
        assert_eq!(out.envelope.source, FeedbackSource::Heuristic);
        assert_eq!(out.attempts, 3);
        assert!(out.failure.unwrap().contains("401"));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn slow_remote_times_out_into_heuristic() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(completion(GOOD))
                    .set_delay(Duration::from_secs(5)),
            )
            .mount(&server)
            .await;

        let mut cfg = config(&server.uri(), Some("sk-test"));
        cfg.request_timeout_secs = 0.2;
        cfg.max_retries = 1;
        let synth = FeedbackSynthesizer::from_config(&cfg);
        let out = synth.synthesize_detailed(&stressed(), &[]);
        assert_eq!(out.envelope.source, FeedbackSource::Heuristic);
    }

    #[tokio::test]
    async fn async_variant_matches_blocking_behaviour() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(completion(&format!(
                "```json\n{GOOD}\n```"
            ))))
            .mount(&server)
            .await;

        let synth = FeedbackSynthesizer::from_config(&config(&server.uri(), Some("sk-test")));
        let out = synth.synthesize_async(&stressed(), &[]).await;
        assert_eq!(out.envelope.source, FeedbackSource::RemoteDegraded);
    }
}

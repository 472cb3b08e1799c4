//! Minimal client for OpenAI-compatible `/chat/completions` endpoints.
//!
//! Returns the raw response body; interpreting it is the caller's job.

use std::time::Duration;

use reqwest::{Client, StatusCode};
use serde::Serialize;

use super::http_client::build_client;
use super::scrub::sanitize_error_body;
use crate::error::FeedbackError;

#[derive(Debug, Clone, Serialize)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub temperature: f64,
    pub max_tokens: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChatMessage {
    pub role: &'static str,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system",
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user",
            content: content.into(),
        }
    }
}

/// Cheap to clone; clones share the underlying connection settings.
#[derive(Debug, Clone)]
pub struct ChatClient {
    /// Pre-computed `"Bearer <key>"` header value.
    cached_auth_header: Option<String>,
    /// Pre-computed chat completions URL.
    cached_chat_url: String,
    request_timeout: Duration,
    client: Client,
}

impl ChatClient {
    pub fn new(base_url: &str, api_key: Option<&str>, request_timeout: Duration) -> Self {
        let base_url = base_url.trim_end_matches('/');
        let cached_chat_url = if base_url.ends_with("chat/completions") {
            base_url.to_string()
        } else {
            format!("{base_url}/chat/completions")
        };

        Self {
            cached_auth_header: api_key
                .map(str::trim)
                .filter(|k| !k.is_empty())
                .map(|k| format!("Bearer {k}")),
            cached_chat_url,
            request_timeout,
            client: build_client(request_timeout),
        }
    }

    pub fn chat_url(&self) -> &str {
        &self.cached_chat_url
    }

    pub fn has_credentials(&self) -> bool {
        self.cached_auth_header.is_some()
    }

    /// POST the request and return the body of a 2xx response.
    pub async fn post_raw(&self, request: &ChatRequest) -> Result<Vec<u8>, FeedbackError> {
        let Some(auth) = &self.cached_auth_header else {
            return Err(FeedbackError::Unconfigured);
        };

        let response = self
            .client
            .post(&self.cached_chat_url)
            .header("Authorization", auth)
            .json(request)
            .send()
            .await
            .map_err(|e| self.transport_error(&e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(match status {
                StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => FeedbackError::Auth {
                    status: status.as_u16(),
                },
                StatusCode::TOO_MANY_REQUESTS => FeedbackError::RateLimited,
                _ => {
                    let body = response
                        .text()
                        .await
                        .unwrap_or_else(|_| "<failed to read error body>".to_string());
                    FeedbackError::Status {
                        status: status.as_u16(),
                        body: sanitize_error_body(&body),
                    }
                }
            });
        }

        response
            .bytes()
            .await
            .map(|b| b.to_vec())
            .map_err(|e| self.transport_error(&e))
    }

    fn transport_error(&self, err: &reqwest::Error) -> FeedbackError {
        if err.is_timeout() {
            FeedbackError::Timeout(self.request_timeout)
        } else {
            FeedbackError::Transport(sanitize_error_body(&err.to_string()))
        }
    }
}

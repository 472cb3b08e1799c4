use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, bail};
use reqwest::Client;
use serde_json::Value;

use super::external::{LabelModel, LabelScore, ModelLoader};
use crate::config::AffectConfig;
use crate::net::{build_client, sanitize_error_body};
use crate::runtime::bridge::run_blocking;

/// Hosted text-classification endpoint (`POST {"inputs": text}`).
pub struct HttpLabelModel {
    endpoint: String,
    /// Pre-computed `"Bearer <token>"` header value.
    cached_auth_header: Option<String>,
    timeout: Duration,
    client: Client,
}

impl HttpLabelModel {
    pub fn new(endpoint: &str, token: Option<&str>, timeout: Duration) -> Self {
        Self {
            endpoint: endpoint.to_string(),
            cached_auth_header: token
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .map(|t| format!("Bearer {t}")),
            timeout,
            client: build_client(timeout),
        }
    }

    /// Loader for [`super::ExternalScorer`]; a missing endpoint fails for good.
    pub fn loader(config: &AffectConfig) -> ModelLoader {
        let endpoint = config.external_endpoint.clone();
        let token = config.external_token.clone();
        let timeout = config.external_timeout();
        Box::new(move || {
            let endpoint = endpoint
                .as_deref()
                .map(str::trim)
                .filter(|e| !e.is_empty())
                .ok_or_else(|| "affect.external_endpoint is not set".to_string())?;
            Ok(Arc::new(Self::new(endpoint, token.as_deref(), timeout)) as Arc<dyn LabelModel>)
        })
    }

    async fn request(
        client: Client,
        endpoint: String,
        auth: Option<String>,
        text: String,
    ) -> anyhow::Result<Vec<LabelScore>> {
        let mut req = client
            .post(&endpoint)
            .json(&serde_json::json!({ "inputs": text }));
        if let Some(auth) = auth {
            req = req.header("Authorization", auth);
        }

        let response = req.send().await.context("label model request failed")?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            bail!("label model HTTP {status}: {}", sanitize_error_body(&body));
        }

        let payload: Value = response
            .json()
            .await
            .context("label model response is not JSON")?;
        flatten_labels(&payload)
    }
}

impl LabelModel for HttpLabelModel {
    fn name(&self) -> &str {
        "http"
    }

    fn predict(&self, text: &str) -> anyhow::Result<Vec<LabelScore>> {
        let fut = Self::request(
            self.client.clone(),
            self.endpoint.clone(),
            self.cached_auth_header.clone(),
            text.to_string(),
        );
        run_blocking(fut, self.timeout)?
    }
}

/// Accept `[{label, score}]` and nested `[[{label, score}]]` payloads.
pub fn flatten_labels(payload: &Value) -> anyhow::Result<Vec<LabelScore>> {
    fn collect(value: &Value, out: &mut Vec<LabelScore>) -> anyhow::Result<()> {
        match value {
            Value::Array(items) => {
                for item in items {
                    collect(item, out)?;
                }
                Ok(())
            }
            Value::Object(_) => {
                let label: LabelScore = serde_json::from_value(value.clone())
                    .context("label entry is missing `label`")?;
                out.push(label);
                Ok(())
            }
            other => bail!("unexpected label payload element: {other}"),
        }
    }

    let mut out = Vec::new();
    collect(payload, &mut out)?;
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_json, header, method};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn flattens_nested_payload() {
        let payload = serde_json::json!([[
            {"label": "fear", "score": 0.6},
            {"label": "joy", "score": 0.1}
        ]]);
        let labels = flatten_labels(&payload).unwrap();
        assert_eq!(labels.len(), 2);
        assert_eq!(labels[0].label, "fear");
    }

    #[test]
    fn rejects_scalar_payload() {
        assert!(flatten_labels(&serde_json::json!({"error": "loading"})).is_err());
        assert!(flatten_labels(&serde_json::json!("oops")).is_err());
    }

    #[test]
    fn loader_without_endpoint_fails() {
        let loader = HttpLabelModel::loader(&AffectConfig::default());
        let err = loader().err().unwrap();
        assert!(err.contains("external_endpoint"));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn predicts_from_hosted_endpoint() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(header("Authorization", "Bearer hf_token"))
            .and(body_json(serde_json::json!({"inputs": "tenho medo"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
                {"label": "fear", "score": 0.8}
            ])))
            .expect(1)
            .mount(&server)
            .await;

        let model = HttpLabelModel::new(&server.uri(), Some("hf_token"), Duration::from_secs(5));
        let labels = model.predict("tenho medo").unwrap();
        assert_eq!(labels, vec![LabelScore {
            label: "fear".into(),
            score: 0.8
        }]);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn http_error_is_reported() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(503).set_body_string("model loading"))
            .mount(&server)
            .await;

        let model = HttpLabelModel::new(&server.uri(), None, Duration::from_secs(5));
        let err = model.predict("texto").unwrap_err();
        assert!(err.to_string().contains("503"));
    }
}

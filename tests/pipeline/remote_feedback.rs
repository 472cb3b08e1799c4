use breathu::config::Config;
use breathu::feedback::FeedbackSource;
use breathu::orchestrator::{Orchestrator, Stage};
use serde_json::json;
use tempfile::TempDir;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const PAYLOAD: &str = r#"{"recommendations":[{"type":"immediate","text":"Respira 4-7-8","why":"Acalma o corpo"},{"type":"short_term","text":"Divide o estudo em blocos","why":"Reduz a sobrecarga"},{"type":"professional","text":"Fala com o gabinete de apoio","why":"Apoio especializado"}],"follow_up_prompt":"Qual destas queres experimentar primeiro?"}"#;

const TEXT: &str = "Estou stressado com o projeto e tenho uma reunião amanhã";

fn completion(content: &str) -> serde_json::Value {
    json!({
        "id": "chatcmpl-1",
        "choices": [{"index": 0, "message": {"role": "assistant", "content": content}}]
    })
}

fn remote_config(tmp: &TempDir, base_url: &str, api_key: Option<&str>) -> Config {
    let mut config = Config {
        data_dir: tmp.path().to_path_buf(),
        config_path: tmp.path().join("config.toml"),
        ..Config::default()
    };
    config.feedback.base_url = base_url.to_string();
    config.feedback.api_key = api_key.map(str::to_string);
    config.feedback.request_timeout_secs = 2.0;
    config.feedback.backoff_base_secs = 0.01;
    config.feedback.bridge_grace_secs = 1.0;
    config
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn clean_remote_payload_is_passed_through() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(header("authorization", "Bearer sk-test"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion(PAYLOAD)))
        .expect(1)
        .mount(&server)
        .await;

    let tmp = TempDir::new().unwrap();
    let orchestrator =
        Orchestrator::from_config(&remote_config(&tmp, &server.uri(), Some("sk-test")));
    let envelope = orchestrator.handle_text(TEXT);

    assert!(envelope.success);
    assert_eq!(envelope.message.source, FeedbackSource::Remote);
    assert_eq!(envelope.message.recommendations[0].text, "Respira 4-7-8");
    assert_eq!(
        envelope.message.follow_up_prompt,
        "Qual destas queres experimentar primeiro?"
    );
    assert!(envelope.degraded_stages.is_empty());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn fenced_payload_is_recovered_as_degraded_remote() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion(&format!(
            "Claro! Aqui tens:\n```json\n{PAYLOAD}\n```"
        ))))
        .mount(&server)
        .await;

    let tmp = TempDir::new().unwrap();
    let orchestrator =
        Orchestrator::from_config(&remote_config(&tmp, &server.uri(), Some("sk-test")));
    let envelope = orchestrator.handle_text(TEXT);

    assert_eq!(envelope.message.source, FeedbackSource::RemoteDegraded);
    assert_eq!(envelope.message.recommendations.len(), 3);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn transient_failures_are_retried() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(2)
        .expect(2)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion(PAYLOAD)))
        .expect(1)
        .mount(&server)
        .await;

    let tmp = TempDir::new().unwrap();
    let orchestrator =
        Orchestrator::from_config(&remote_config(&tmp, &server.uri(), Some("sk-test")));
    let envelope = orchestrator.handle_text(TEXT);

    assert_eq!(envelope.message.source, FeedbackSource::Remote);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn missing_token_never_contacts_the_service() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion(PAYLOAD)))
        .expect(0)
        .mount(&server)
        .await;

    let tmp = TempDir::new().unwrap();
    let orchestrator = Orchestrator::from_config(&remote_config(&tmp, &server.uri(), None));
    let envelope = orchestrator.handle_text(TEXT);

    assert_eq!(envelope.message.source, FeedbackSource::Heuristic);
    assert!(envelope.degraded_stages.is_empty());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn wrong_shape_falls_back_and_marks_feedback_degraded() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(completion(r#"{"answer": "sem recomendações"}"#)),
        )
        .expect(3)
        .mount(&server)
        .await;

    let tmp = TempDir::new().unwrap();
    let orchestrator =
        Orchestrator::from_config(&remote_config(&tmp, &server.uri(), Some("sk-test")));
    let envelope = orchestrator.handle_text(TEXT);

    assert!(envelope.success);
    assert_eq!(envelope.message.source, FeedbackSource::Heuristic);
    assert_eq!(envelope.message.recommendations.len(), 3);
    assert!(envelope.degraded_stages.contains(&Stage::Feedback));
}

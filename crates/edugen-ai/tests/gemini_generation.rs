//! Generator against a mocked Gemini endpoint

use async_trait::async_trait;
use edugen_ai::{
    CredentialError, CredentialProvider, GeminiConfig, GenerationError, Generator,
    StaticCredentials, TransportError,
};
use edugen_schema::lesson_plan_schema;
use serde_json::json;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const GENERATE_PATH: &str = "/v1beta/models/gemini-3-pro-preview:generateContent";

fn reply_with(text: &str) -> serde_json::Value {
    json!({
        "candidates": [{
            "content": { "role": "model", "parts": [{ "text": text }] },
            "finishReason": "STOP"
        }]
    })
}

fn generator_for(server: &MockServer, credentials: Arc<dyn CredentialProvider>) -> Generator {
    let config = GeminiConfig::new(&server.uri()).unwrap();
    Generator::gemini(config, credentials)
}

struct CountingCredentials {
    selections: AtomicUsize,
}

#[async_trait]
impl CredentialProvider for CountingCredentials {
    async fn has_credential(&self) -> bool {
        true
    }

    async fn request_credential(&self) -> Result<(), CredentialError> {
        self.selections.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn api_key(&self) -> Option<String> {
        Some("stale-key".to_string())
    }
}

#[tokio::test]
async fn test_plain_prompt_round_trip() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .and(header("x-goog-api-key", "test-key"))
        .and(body_partial_json(json!({
            "contents": [{ "role": "user", "parts": [{ "text": "Greet the teacher" }] }],
            "generationConfig": { "temperature": 0.7, "topP": 0.95 }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(reply_with("Hello teacher")))
        .expect(1)
        .mount(&server)
        .await;

    let generator = generator_for(
        &server,
        Arc::new(StaticCredentials::new(Some("test-key".to_string()))),
    );
    let text = generator.generate("Greet the teacher", None).await.unwrap();
    assert_eq!(text, "Hello teacher");
}

#[tokio::test]
async fn test_schema_prompt_requests_json_and_strips_fence() {
    let server = MockServer::start().await;
    let fenced = "```json\n{\"objectives\":[\"a\"],\"activities\":[\"b\"],\"teachingMethod\":\"c\",\"assessment\":\"d\"}\n```";

    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .and(body_partial_json(json!({
            "generationConfig": {
                "responseMimeType": "application/json",
                "responseSchema": { "type": "OBJECT" }
            }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(reply_with(fenced)))
        .expect(1)
        .mount(&server)
        .await;

    let generator = generator_for(
        &server,
        Arc::new(StaticCredentials::new(Some("test-key".to_string()))),
    );
    let text = generator
        .generate("Plan a lesson", Some(lesson_plan_schema()))
        .await
        .unwrap();
    assert_eq!(
        text,
        r#"{"objectives":["a"],"activities":["b"],"teachingMethod":"c","assessment":"d"}"#
    );
}

#[tokio::test]
async fn test_empty_candidates_with_schema_yield_empty_object() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "candidates": [] })))
        .mount(&server)
        .await;

    let generator = generator_for(
        &server,
        Arc::new(StaticCredentials::new(Some("test-key".to_string()))),
    );
    let text = generator
        .generate("Plan a lesson", Some(lesson_plan_schema()))
        .await
        .unwrap();
    assert_eq!(text, "{}");
}

#[tokio::test]
async fn test_not_found_reopens_selection_once() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "error": {
                "code": 404,
                "message": "Requested entity was not found.",
                "status": "NOT_FOUND"
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let credentials = Arc::new(CountingCredentials {
        selections: AtomicUsize::new(0),
    });
    let generator = generator_for(&server, credentials.clone());

    let err = generator.generate("Hi", None).await.unwrap_err();
    assert!(err.is_entity_not_found());
    assert_eq!(credentials.selections.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_server_error_is_raised_without_selection() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(ResponseTemplate::new(503).set_body_json(json!({
            "error": { "code": 503, "message": "The model is overloaded.", "status": "UNAVAILABLE" }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let credentials = Arc::new(CountingCredentials {
        selections: AtomicUsize::new(0),
    });
    let generator = generator_for(&server, credentials.clone());

    let err = generator.generate("Hi", None).await.unwrap_err();
    match err {
        GenerationError::Transport(TransportError::Service { status, message }) => {
            assert_eq!(status, 503);
            assert_eq!(message, "The model is overloaded.");
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(credentials.selections.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_undecodable_body_is_transport_failure() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>proxy</html>"))
        .mount(&server)
        .await;

    let generator = generator_for(
        &server,
        Arc::new(StaticCredentials::new(Some("test-key".to_string()))),
    );
    let err = generator.generate("Hi", None).await.unwrap_err();
    assert!(matches!(
        err,
        GenerationError::Transport(TransportError::Decode(_))
    ));
}

#[tokio::test]
async fn test_missing_static_key_aborts_before_request() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(reply_with("unused")))
        .expect(0)
        .mount(&server)
        .await;

    let generator = generator_for(&server, Arc::new(StaticCredentials::default()));
    let err = generator.generate("Hi", None).await.unwrap_err();
    assert!(matches!(err, GenerationError::CredentialSelection(_)));
}

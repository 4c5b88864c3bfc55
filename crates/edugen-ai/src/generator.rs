//! Generation orchestrator

use crate::config::GeminiConfig;
use crate::credentials::CredentialProvider;
use crate::error::GenerationError;
use crate::sanitize::clean_json_response;
use crate::transport::{GeminiTransport, ModelRequest, ModelTransport};
use edugen_schema::SchemaDescriptor;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use tracing::{debug, error, warn};

/// Issues every model request on behalf of the tool workflows.
///
/// Holds no mutable state; each call runs the full credential check,
/// request and sanitization sequence independently.
#[derive(Clone)]
pub struct Generator {
    transport: Arc<dyn ModelTransport>,
    credentials: Arc<dyn CredentialProvider>,
}

impl Generator {
    pub fn new(
        transport: Arc<dyn ModelTransport>,
        credentials: Arc<dyn CredentialProvider>,
    ) -> Self {
        Self {
            transport,
            credentials,
        }
    }

    /// Generator backed by the Gemini REST transport.
    pub fn gemini(config: GeminiConfig, credentials: Arc<dyn CredentialProvider>) -> Self {
        let transport = Arc::new(GeminiTransport::new(config, credentials.clone()));
        Self::new(transport, credentials)
    }

    /// Send `prompt` to the model.
    ///
    /// Without a schema the reply text is returned as-is (empty if the
    /// model produced none). With a schema the model is asked for JSON and
    /// the reply is sanitized, so the result is never empty.
    ///
    /// If the service reports the key as not found, the credential
    /// selection flow is reopened once before the error is returned. The
    /// request itself is not retried.
    pub async fn generate(
        &self,
        prompt: &str,
        schema: Option<&SchemaDescriptor>,
    ) -> Result<String, GenerationError> {
        if prompt.trim().is_empty() {
            return Err(GenerationError::EmptyPrompt);
        }

        self.ensure_credential().await?;

        let request = ModelRequest::new(prompt, schema);
        debug!(
            "Requesting generation ({} prompt chars, schema: {})",
            prompt.len(),
            schema.is_some()
        );

        match self.transport.send(&request).await {
            Ok(text) => Ok(match schema {
                Some(_) => clean_json_response(text.as_deref()),
                None => text.unwrap_or_default(),
            }),
            Err(e) => {
                error!("Model request failed: {}", e);
                if e.is_entity_not_found() {
                    warn!("Model service rejected the selected key, reopening key selection");
                    if let Err(recovery) = self.credentials.request_credential().await {
                        warn!("Key selection after rejection failed: {}", recovery);
                    }
                }
                Err(e.into())
            }
        }
    }

    /// Generate with `schema`, then parse, validate and deserialize the reply.
    pub async fn generate_structured<T: DeserializeOwned>(
        &self,
        prompt: &str,
        schema: &SchemaDescriptor,
    ) -> Result<T, GenerationError> {
        let text = self.generate(prompt, Some(schema)).await?;
        parse_structured(&text, schema)
    }

    async fn ensure_credential(&self) -> Result<(), GenerationError> {
        if !self.credentials.has_credential().await {
            warn!("No API key selected, opening key selection");
            self.credentials.request_credential().await?;
        }
        Ok(())
    }
}

/// Parse sanitized reply text, check it against `schema`, and deserialize.
pub fn parse_structured<T: DeserializeOwned>(
    text: &str,
    schema: &SchemaDescriptor,
) -> Result<T, GenerationError> {
    let value: serde_json::Value = serde_json::from_str(text)?;
    schema
        .validate(&value)
        .map_err(GenerationError::SchemaMismatch)?;
    Ok(serde_json::from_value(value)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::credentials::CredentialError;
    use crate::error::TransportError;
    use async_trait::async_trait;
    use edugen_schema::{attendance_insight_schema, lesson_plan_schema};
    use serde::Deserialize;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::sync::Mutex;

    /// Ordered record of collaborator calls.
    type Journal = Arc<Mutex<Vec<&'static str>>>;

    enum Reply {
        Text(Option<&'static str>),
        NotFound,
        Service,
    }

    struct FakeTransport {
        reply: Reply,
        journal: Journal,
        seen_json: AtomicBool,
    }

    #[async_trait]
    impl ModelTransport for FakeTransport {
        async fn send(&self, request: &ModelRequest<'_>) -> Result<Option<String>, TransportError> {
            self.journal.lock().unwrap().push("send");
            self.seen_json.store(request.wants_json(), Ordering::SeqCst);
            match self.reply {
                Reply::Text(text) => Ok(text.map(str::to_string)),
                Reply::NotFound => Err(TransportError::EntityNotFound {
                    message: "Requested entity was not found.".to_string(),
                }),
                Reply::Service => Err(TransportError::Service {
                    status: 500,
                    message: "internal".to_string(),
                }),
            }
        }
    }

    struct FakeCredentials {
        has_key: bool,
        selection_fails: bool,
        selections: AtomicUsize,
        journal: Journal,
    }

    #[async_trait]
    impl CredentialProvider for FakeCredentials {
        async fn has_credential(&self) -> bool {
            self.has_key
        }

        async fn request_credential(&self) -> Result<(), CredentialError> {
            self.journal.lock().unwrap().push("select");
            self.selections.fetch_add(1, Ordering::SeqCst);
            if self.selection_fails {
                Err(CredentialError("dismissed".to_string()))
            } else {
                Ok(())
            }
        }

        fn api_key(&self) -> Option<String> {
            self.has_key.then(|| "key".to_string())
        }
    }

    struct Harness {
        generator: Generator,
        transport: Arc<FakeTransport>,
        credentials: Arc<FakeCredentials>,
        journal: Journal,
    }

    fn harness(reply: Reply, has_key: bool, selection_fails: bool) -> Harness {
        let journal: Journal = Arc::default();
        let transport = Arc::new(FakeTransport {
            reply,
            journal: journal.clone(),
            seen_json: AtomicBool::new(false),
        });
        let credentials = Arc::new(FakeCredentials {
            has_key,
            selection_fails,
            selections: AtomicUsize::new(0),
            journal: journal.clone(),
        });
        Harness {
            generator: Generator::new(transport.clone(), credentials.clone()),
            transport,
            credentials,
            journal,
        }
    }

    fn calls(journal: &Journal) -> Vec<&'static str> {
        journal.lock().unwrap().clone()
    }

    #[tokio::test]
    async fn test_raw_text_returned_unchanged() {
        let h = harness(Reply::Text(Some("Hello teacher")), true, false);
        let text = h.generator.generate("Greet me", None).await.unwrap();
        assert_eq!(text, "Hello teacher");
        assert!(!h.transport.seen_json.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn test_raw_text_is_not_sanitized() {
        let h = harness(Reply::Text(Some("```json\n{}\n```\n")), true, false);
        let text = h.generator.generate("Show a fence", None).await.unwrap();
        assert_eq!(text, "```json\n{}\n```\n");
    }

    #[tokio::test]
    async fn test_absent_raw_text_is_empty_string() {
        let h = harness(Reply::Text(None), true, false);
        assert_eq!(h.generator.generate("Anything", None).await.unwrap(), "");
    }

    #[tokio::test]
    async fn test_schema_reply_is_sanitized() {
        let reply = "```json\n{\"objectives\":[\"a\"],\"activities\":[\"b\"],\"teachingMethod\":\"c\",\"assessment\":\"d\"}\n```";
        let h = harness(Reply::Text(Some(reply)), true, false);
        let text = h
            .generator
            .generate("Plan", Some(lesson_plan_schema()))
            .await
            .unwrap();
        assert_eq!(
            text,
            r#"{"objectives":["a"],"activities":["b"],"teachingMethod":"c","assessment":"d"}"#
        );
        assert!(h.transport.seen_json.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn test_absent_schema_reply_is_empty_object() {
        let h = harness(Reply::Text(None), true, false);
        let text = h
            .generator
            .generate("Insights", Some(attendance_insight_schema()))
            .await
            .unwrap();
        assert_eq!(text, "{}");
    }

    #[tokio::test]
    async fn test_empty_prompt_rejected_before_side_effects() {
        let h = harness(Reply::Text(Some("x")), false, false);
        let err = h.generator.generate("  \n", None).await.unwrap_err();
        assert!(matches!(err, GenerationError::EmptyPrompt));
        assert!(calls(&h.journal).is_empty());
    }

    #[tokio::test]
    async fn test_selected_key_skips_selection() {
        let h = harness(Reply::Text(Some("ok")), true, false);
        h.generator.generate("Hi", None).await.unwrap();
        assert_eq!(calls(&h.journal), vec!["send"]);
    }

    #[tokio::test]
    async fn test_missing_key_selects_once_then_sends() {
        let h = harness(Reply::Text(Some("ok")), false, false);
        let text = h.generator.generate("Hi", None).await.unwrap();
        assert_eq!(text, "ok");
        assert_eq!(calls(&h.journal), vec!["select", "send"]);
        assert_eq!(h.credentials.selections.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_failed_selection_aborts_call() {
        let h = harness(Reply::Text(Some("ok")), false, true);
        let err = h.generator.generate("Hi", None).await.unwrap_err();
        assert!(matches!(err, GenerationError::CredentialSelection(_)));
        assert_eq!(calls(&h.journal), vec!["select"]);
    }

    #[tokio::test]
    async fn test_entity_not_found_reopens_selection_and_raises() {
        let h = harness(Reply::NotFound, false, false);
        let err = h.generator.generate("Hi", None).await.unwrap_err();
        assert!(err.is_entity_not_found());
        assert_eq!(calls(&h.journal), vec!["select", "send", "select"]);
        assert_eq!(h.credentials.selections.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_failed_recovery_still_raises_original_error() {
        let h = harness(Reply::NotFound, true, true);
        let err = h.generator.generate("Hi", None).await.unwrap_err();
        assert!(err.is_entity_not_found());
        assert_eq!(calls(&h.journal), vec!["send", "select"]);
    }

    #[tokio::test]
    async fn test_other_errors_do_not_touch_selection() {
        let h = harness(Reply::Service, true, false);
        let err = h.generator.generate("Hi", None).await.unwrap_err();
        assert!(matches!(
            err,
            GenerationError::Transport(TransportError::Service { status: 500, .. })
        ));
        assert_eq!(calls(&h.journal), vec!["send"]);
        assert_eq!(h.credentials.selections.load(Ordering::SeqCst), 0);
    }

    #[derive(Debug, Deserialize)]
    #[serde(rename_all = "camelCase")]
    struct Plan {
        objectives: Vec<String>,
        teaching_method: String,
    }

    #[tokio::test]
    async fn test_generate_structured() {
        let reply = "```json\n{\"objectives\":[\"a\"],\"activities\":[],\"teachingMethod\":\"c\",\"assessment\":\"d\"}\n```";
        let h = harness(Reply::Text(Some(reply)), true, false);
        let plan: Plan = h
            .generator
            .generate_structured("Plan", lesson_plan_schema())
            .await
            .unwrap();
        assert_eq!(plan.objectives, vec!["a"]);
        assert_eq!(plan.teaching_method, "c");
    }

    #[test]
    fn test_parse_structured_rejects_shape_mismatch() {
        let err = parse_structured::<Plan>("{}", lesson_plan_schema()).unwrap_err();
        assert!(err.is_malformed_output());
        match err {
            GenerationError::SchemaMismatch(violations) => assert_eq!(violations.len(), 4),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_parse_structured_rejects_invalid_json() {
        let err = parse_structured::<Plan>("Sure! Here is", lesson_plan_schema()).unwrap_err();
        assert!(matches!(err, GenerationError::InvalidJson(_)));
    }
}

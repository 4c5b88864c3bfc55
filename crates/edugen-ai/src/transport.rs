//! Model transport: the network seam of the generator

use crate::config::GeminiConfig;
use crate::credentials::CredentialProvider;
use crate::error::TransportError;
use async_trait::async_trait;
use edugen_schema::SchemaDescriptor;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info};

/// Pinned model version.
pub const MODEL: &str = "gemini-3-pro-preview";

/// Sampling used for every generation call.
pub const SAMPLING: SamplingConfig = SamplingConfig {
    temperature: 0.7,
    top_p: 0.95,
};

/// Upstream wording for a key or resource the service does not know.
const ENTITY_NOT_FOUND_MESSAGE: &str = "Requested entity was not found";

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SamplingConfig {
    pub temperature: f64,
    pub top_p: f64,
}

/// One generation call as handed to a transport.
#[derive(Debug, Clone)]
pub struct ModelRequest<'a> {
    pub model: &'a str,
    pub prompt: &'a str,
    pub sampling: SamplingConfig,
    /// When set, the reply must be JSON conforming to this schema.
    pub response_schema: Option<&'a SchemaDescriptor>,
}

impl<'a> ModelRequest<'a> {
    pub fn new(prompt: &'a str, response_schema: Option<&'a SchemaDescriptor>) -> Self {
        Self {
            model: MODEL,
            prompt,
            sampling: SAMPLING,
            response_schema,
        }
    }

    pub fn wants_json(&self) -> bool {
        self.response_schema.is_some()
    }
}

/// Sends a request to the model service and returns its reply text.
///
/// `Ok(None)` means the service answered but produced no text.
/// Implementations map provider failures onto `TransportError`.
#[async_trait]
pub trait ModelTransport: Send + Sync {
    async fn send(&self, request: &ModelRequest<'_>) -> Result<Option<String>, TransportError>;
}

/// Transport for the Gemini `generateContent` REST endpoint.
pub struct GeminiTransport {
    config: GeminiConfig,
    credentials: Arc<dyn CredentialProvider>,
    client: reqwest::Client,
}

impl GeminiTransport {
    pub fn new(config: GeminiConfig, credentials: Arc<dyn CredentialProvider>) -> Self {
        Self {
            config,
            credentials,
            client: reqwest::Client::new(),
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    contents: Vec<RequestContent<'a>>,
    generation_config: WireGenerationConfig<'a>,
}

#[derive(Serialize)]
struct RequestContent<'a> {
    role: &'static str,
    parts: Vec<RequestPart<'a>>,
}

#[derive(Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct WireGenerationConfig<'a> {
    temperature: f64,
    top_p: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_mime_type: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_schema: Option<&'a SchemaDescriptor>,
}

impl<'a> From<&ModelRequest<'a>> for GenerateContentRequest<'a> {
    fn from(request: &ModelRequest<'a>) -> Self {
        Self {
            contents: vec![RequestContent {
                role: "user",
                parts: vec![RequestPart {
                    text: request.prompt,
                }],
            }],
            generation_config: WireGenerationConfig {
                temperature: request.sampling.temperature,
                top_p: request.sampling.top_p,
                response_mime_type: request.wants_json().then_some("application/json"),
                response_schema: request.response_schema,
            },
        }
    }
}

#[derive(Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: Option<String>,
}

impl GenerateContentResponse {
    /// Concatenated text parts of the first candidate.
    fn text(self) -> Option<String> {
        let parts = self.candidates.into_iter().next()?.content?.parts;
        let texts: Vec<String> = parts.into_iter().filter_map(|p| p.text).collect();
        if texts.is_empty() {
            None
        } else {
            Some(texts.concat())
        }
    }
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: String,
    #[serde(default)]
    status: String,
}

/// Map a non-success HTTP reply onto the transport error taxonomy.
pub(crate) fn classify_failure(status: u16, body: &str) -> TransportError {
    let (message, upstream_status) = match serde_json::from_str::<ErrorEnvelope>(body) {
        Ok(envelope) => (envelope.error.message, envelope.error.status),
        Err(_) => (body.trim().to_string(), String::new()),
    };

    if status == 404 || upstream_status == "NOT_FOUND" || message.contains(ENTITY_NOT_FOUND_MESSAGE)
    {
        TransportError::EntityNotFound { message }
    } else {
        TransportError::Service { status, message }
    }
}

#[async_trait]
impl ModelTransport for GeminiTransport {
    async fn send(&self, request: &ModelRequest<'_>) -> Result<Option<String>, TransportError> {
        let url = self.config.generate_url(request.model);
        let body = GenerateContentRequest::from(request);

        debug!(
            "Calling Gemini API at {} with model: {} (json: {})",
            url,
            request.model,
            request.wants_json()
        );

        let mut builder = self
            .client
            .post(&url)
            .header("Content-Type", "application/json")
            .json(&body);
        if let Some(api_key) = self.credentials.api_key() {
            builder = builder.header("x-goog-api-key", api_key);
        }

        let response = builder.send().await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await?;
            return Err(classify_failure(status, &body));
        }

        let body = response.text().await?;
        let response: GenerateContentResponse =
            serde_json::from_str(&body).map_err(|e| TransportError::Decode(e.to_string()))?;

        info!("Received response from Gemini");
        Ok(response.text())
    }
}

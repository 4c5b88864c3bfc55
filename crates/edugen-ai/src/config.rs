//! Model service configuration from environment variables.

use anyhow::{Context, Result};
use std::fmt;
use url::Url;

pub const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com";

#[derive(Clone)]
pub struct GeminiConfig {
    /// Root of the Gemini REST API; overridable for proxies and tests.
    pub api_base: Url,
    /// Key configured up front. None leaves selection to the credential flow.
    pub api_key: Option<String>,
}

impl GeminiConfig {
    pub fn new(api_base: &str) -> Result<Self> {
        Ok(Self {
            api_base: Url::parse(api_base)
                .with_context(|| format!("Invalid model API base URL: {}", api_base))?,
            api_key: None,
        })
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn from_env() -> Result<Self> {
        let api_base =
            std::env::var("GEMINI_API_BASE").unwrap_or_else(|_| DEFAULT_API_BASE.to_string());
        let api_key = std::env::var("GEMINI_API_KEY")
            .or_else(|_| std::env::var("API_KEY"))
            .ok()
            .filter(|k| !k.trim().is_empty());

        Ok(Self {
            api_base: Url::parse(&api_base).context("Invalid GEMINI_API_BASE")?,
            api_key,
        })
    }

    /// Full `generateContent` URL for a model.
    pub fn generate_url(&self, model: &str) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.api_base.as_str().trim_end_matches('/'),
            model
        )
    }
}

impl fmt::Debug for GeminiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeminiConfig")
            .field("api_base", &self.api_base.as_str())
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

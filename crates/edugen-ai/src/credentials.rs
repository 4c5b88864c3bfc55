//! Credential provider abstraction
//!
//! The API key is owned by the host environment. The generator only asks
//! whether one is selected and, when it is not, awaits the host's
//! interactive selection flow.

use async_trait::async_trait;
use thiserror::Error;
use tracing::warn;

/// Failure of the host's credential-selection flow.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct CredentialError(pub String);

#[async_trait]
pub trait CredentialProvider: Send + Sync {
    /// Whether a usable API key is currently selected.
    async fn has_credential(&self) -> bool;

    /// Run the selection flow and wait for it to finish.
    async fn request_credential(&self) -> Result<(), CredentialError>;

    /// The currently selected key, if any.
    fn api_key(&self) -> Option<String>;
}

/// A fixed key with no interactive selection flow.
#[derive(Clone, Default)]
pub struct StaticCredentials {
    api_key: Option<String>,
}

impl StaticCredentials {
    pub fn new(api_key: Option<String>) -> Self {
        Self { api_key }
    }
}

#[async_trait]
impl CredentialProvider for StaticCredentials {
    async fn has_credential(&self) -> bool {
        self.api_key.is_some()
    }

    async fn request_credential(&self) -> Result<(), CredentialError> {
        warn!("No interactive credential selection available");
        Err(CredentialError(
            "No API key selected. Set GEMINI_API_KEY or API_KEY".to_string(),
        ))
    }

    fn api_key(&self) -> Option<String> {
        self.api_key.clone()
    }
}

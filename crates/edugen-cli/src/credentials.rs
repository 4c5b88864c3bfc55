//! Terminal-backed credential selection

use async_trait::async_trait;
use dialoguer::Password;
use edugen_ai::{CredentialError, CredentialProvider};
use std::sync::{PoisonError, RwLock};
use tracing::info;

/// Holds the configured key and, when interactive, asks for one on the
/// terminal. A key entered at the prompt is kept for the rest of the process.
pub struct TerminalCredentials {
    api_key: RwLock<Option<String>>,
    interactive: bool,
}

impl TerminalCredentials {
    pub fn new(api_key: Option<String>, interactive: bool) -> Self {
        Self {
            api_key: RwLock::new(api_key),
            interactive,
        }
    }

    fn store(&self, key: String) {
        *self.api_key.write().unwrap_or_else(PoisonError::into_inner) = Some(key);
    }
}

#[async_trait]
impl CredentialProvider for TerminalCredentials {
    async fn has_credential(&self) -> bool {
        self.api_key().is_some()
    }

    async fn request_credential(&self) -> Result<(), CredentialError> {
        if !self.interactive {
            return Err(CredentialError(
                "No API key selected and interactive selection is disabled. Set GEMINI_API_KEY"
                    .to_string(),
            ));
        }

        let entered = tokio::task::spawn_blocking(|| {
            Password::new()
                .with_prompt("Gemini API key")
                .interact()
        })
        .await
        .map_err(|e| CredentialError(format!("key prompt aborted: {}", e)))?
        .map_err(|e| CredentialError(format!("could not read key: {}", e)))?;

        let key = entered.trim();
        if key.is_empty() {
            return Err(CredentialError("No API key entered".to_string()));
        }

        self.store(key.to_string());
        info!("API key selected");
        Ok(())
    }

    fn api_key(&self) -> Option<String> {
        self.api_key
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

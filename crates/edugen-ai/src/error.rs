//! Typed errors for generation.

use crate::credentials::CredentialError;
use edugen_schema::SchemaViolation;
use thiserror::Error;

/// Failures from the model transport, classified by the adapter.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The service does not recognize the referenced key or resource.
    #[error("requested entity was not found: {message}")]
    EntityNotFound { message: String },

    #[error("model service error ({status}): {message}")]
    Service { status: u16, message: String },

    #[error("request to model service failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("could not decode model service response: {0}")]
    Decode(String),
}

impl TransportError {
    pub fn is_entity_not_found(&self) -> bool {
        matches!(self, TransportError::EntityNotFound { .. })
    }
}

#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("prompt cannot be empty")]
    EmptyPrompt,

    #[error("credential selection failed: {0}")]
    CredentialSelection(#[from] CredentialError),

    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error("model output is not valid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("model output does not match the schema ({} violations)", .0.len())]
    SchemaMismatch(Vec<SchemaViolation>),
}

impl GenerationError {
    /// The reply reached the caller but could not be used.
    pub fn is_malformed_output(&self) -> bool {
        matches!(
            self,
            GenerationError::InvalidJson(_) | GenerationError::SchemaMismatch(_)
        )
    }

    pub fn is_entity_not_found(&self) -> bool {
        matches!(self, GenerationError::Transport(e) if e.is_entity_not_found())
    }
}

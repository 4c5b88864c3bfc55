//! Edugen AI - generation orchestration for teaching artifacts
//!
//! This crate provides:
//! - The `Generator`, the single choke point for model requests
//! - Credential provider abstraction for the host's key-selection flow
//! - A Gemini REST transport with typed error classification
//! - Sanitization of fenced JSON replies

pub mod config;
pub mod credentials;
pub mod error;
pub mod generator;
pub mod sanitize;
pub mod transport;

pub use config::GeminiConfig;
pub use credentials::{CredentialError, CredentialProvider, StaticCredentials};
pub use error::{GenerationError, TransportError};
pub use generator::{parse_structured, Generator};
pub use sanitize::clean_json_response;
pub use transport::{GeminiTransport, ModelRequest, ModelTransport, SamplingConfig, MODEL, SAMPLING};

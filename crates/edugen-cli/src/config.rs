//! CLI configuration from environment variables.

use anyhow::{Context, Result};
use edugen_ai::GeminiConfig;

#[derive(Debug, Clone)]
pub struct CliConfig {
    pub gemini: GeminiConfig,
    /// Ask for a key on the terminal when none is configured.
    pub interactive: bool,
}

impl CliConfig {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            gemini: GeminiConfig::from_env()?,
            interactive: parse_flag(
                std::env::var("EDUGEN_INTERACTIVE").ok().as_deref(),
                true,
            )
            .context("Invalid EDUGEN_INTERACTIVE")?,
        })
    }
}

fn parse_flag(value: Option<&str>, default: bool) -> Result<bool> {
    match value.map(|v| v.trim().to_ascii_lowercase()) {
        None => Ok(default),
        Some(v) => match v.as_str() {
            "" => Ok(default),
            "1" | "true" | "yes" | "on" => Ok(true),
            "0" | "false" | "no" | "off" => Ok(false),
            other => anyhow::bail!("expected a boolean, got '{}'", other),
        },
    }
}

use edugen_ai::GenerationError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ToolError {
    #[error("{0} cannot be empty")]
    MissingField(&'static str),

    #[error("total marks must be greater than zero")]
    InvalidTotalMarks,

    #[error("unknown {kind} '{value}'")]
    UnknownOption { kind: &'static str, value: String },

    #[error(transparent)]
    Generation(#[from] GenerationError),
}

pub(crate) fn require(value: &str, field: &'static str) -> Result<(), ToolError> {
    if value.trim().is_empty() {
        Err(ToolError::MissingField(field))
    } else {
        Ok(())
    }
}

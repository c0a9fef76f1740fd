use std::fmt;
use thiserror::Error;

/// Which prompt operation failed to produce a usable JSON object.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeStage {
    Generate,
    Modify,
}

impl fmt::Display for DecodeStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecodeStage::Generate => write!(f, "Failed to generate a valid JSON prompt"),
            DecodeStage::Modify => write!(f, "Failed to modify the JSON prompt"),
        }
    }
}

#[derive(Debug, Error)]
pub enum PromptError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("{0}")]
    ValidationError(String),

    /// Transport failure. The underlying error text is surfaced verbatim.
    #[error("{0}")]
    RequestError(String),

    /// Surfaced verbatim to the user.
    #[error("{0}")]
    ServiceError(String),

    #[error("Response error: {0}")]
    ResponseError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// The raw parse failure is logged where it happens and never carried here.
    #[error("{0}")]
    DecodeError(DecodeStage),
}

impl PromptError {
    pub fn is_config(&self) -> bool {
        matches!(self, PromptError::ConfigError(_))
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, PromptError::ValidationError(_))
    }

    pub fn is_decode(&self) -> bool {
        matches!(self, PromptError::DecodeError(_))
    }
}

pub type Result<T> = std::result::Result<T, PromptError>;

use thiserror::Error;
use uuid::Uuid;

use crate::config::ConfigError;
use crate::core::validation::ValidationErrors;

pub type CoreResult<T> = Result<T, CoreError>;

/// Error type shared by services, the dataset loader and the CLI.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("Validation failed: {0}")]
    Validation(ValidationErrors),
    #[error("Interval not found: {0}")]
    IntervalNotFound(Uuid),
    #[error("Subject not found: {0}")]
    SubjectNotFound(Uuid),
    #[error("Invalid operation: {0}")]
    InvalidOperation(String),
    #[error("Outstanding balance for `{payer}` changed (expected version {expected}, found {actual})")]
    StaleBalance {
        payer: String,
        expected: u64,
        actual: u64,
    },
}

impl From<ValidationErrors> for CoreError {
    fn from(errors: ValidationErrors) -> Self {
        CoreError::Validation(errors)
    }
}

impl CoreError {
    /// The validation issues carried by this error, if any.
    pub fn validation(&self) -> Option<&ValidationErrors> {
        match self {
            CoreError::Validation(errors) => Some(errors),
            _ => None,
        }
    }
}

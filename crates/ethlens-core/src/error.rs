//! Centralized error types for ethlens.

use thiserror::Error;

/// Main error type for ethlens operations.
#[derive(Error, Debug)]
pub enum EthlensError {
    #[error("Address not found: {0}")]
    AddressNotFound(String),

    #[error("Node id not found: {0}")]
    NodeNotFound(u32),

    #[error("Address '{address}' appears in the transactions but not in the node table")]
    UnknownAddress { address: String },

    #[error("Length mismatch: {left_name} has {left} entries, {right_name} has {right}")]
    LengthMismatch {
        left_name: &'static str,
        left: usize,
        right_name: &'static str,
        right: usize,
    },

    #[error("Duplicate address: {0}")]
    DuplicateAddress(String),

    #[error("Address '{address}' belongs to de-anonymization groups {first} and {second}")]
    PairConflict {
        address: String,
        first: usize,
        second: usize,
    },

    #[error("Unsupported {option}: '{value}'")]
    Unsupported { option: &'static str, value: String },

    #[error("Degenerate vector: {0}")]
    DegenerateVector(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Template error: {0}")]
    Template(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Result type for ethlens operations.
pub type EthlensResult<T> = Result<T, EthlensError>;

impl EthlensError {
    /// Create a validation error.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::ValidationError(msg.into())
    }

    /// Create an unsupported-option error.
    pub fn unsupported(option: &'static str, value: impl ToString) -> Self {
        Self::Unsupported {
            option,
            value: value.to_string(),
        }
    }

    /// Whether the error reports a missing entity rather than bad input.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::AddressNotFound(_) | Self::NodeNotFound(_))
    }

    /// Whether the error was caused by the caller's request.
    pub fn is_invalid_request(&self) -> bool {
        matches!(
            self,
            Self::Unsupported { .. } | Self::ValidationError(_) | Self::DegenerateVector(_)
        )
    }
}

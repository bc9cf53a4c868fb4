//! Error types for the Movies API

use thiserror::Error;

/// Result type alias using the Movies API Error
pub type Result<T> = std::result::Result<T, Error>;

/// Movies API error types
#[derive(Error, Debug)]
pub enum Error {
    /// Request body is not a JSON object
    #[error("Malformed request body: {0}")]
    Parse(String),

    /// Required key absent from the request body
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    /// Key present but its value cannot be used
    #[error("Invalid value for field {field}: {reason}")]
    InvalidField { field: &'static str, reason: String },

    /// Required configuration missing or unusable
    #[error("Configuration error: {0}")]
    Config(String),

    /// DynamoDB error
    #[error("Database error: {0}")]
    Database(String),

    /// JSON Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// DynamoDB serialization error
    #[error("DynamoDB serialization error: {0}")]
    DynamoSerialization(String),
}

impl Error {
    /// Returns the stable error code used in log records
    pub fn code(&self) -> &'static str {
        match self {
            Error::Parse(_) => "parse_error",
            Error::MissingField(_) => "missing_field",
            Error::InvalidField { .. } => "invalid_field",
            Error::Config(_) => "config_error",
            Error::Database(_) => "database_error",
            Error::Serialization(_) => "serialization_error",
            Error::DynamoSerialization(_) => "serialization_error",
        }
    }

    pub(crate) fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Error::InvalidField {
            field,
            reason: reason.into(),
        }
    }
}

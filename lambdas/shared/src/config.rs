//! Process configuration, read once at cold start

use std::str::FromStr;

use crate::errors::{Error, Result};

/// DynamoDB table name (required)
pub const TABLE_NAME_ENV: &str = "TABLE_NAME";
/// Endpoint override, e.g. `http://localhost:8000` for DynamoDB Local
pub const DYNAMODB_ENDPOINT_ENV: &str = "DYNAMODB_ENDPOINT";
/// `text` (default) or `json`
pub const LOG_FORMAT_ENV: &str = "LOG_FORMAT";

/// Output format of the tracing subscriber
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

impl FromStr for LogFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "text" => Ok(LogFormat::Text),
            "json" => Ok(LogFormat::Json),
            other => Err(Error::Config(format!("unknown {} {:?}", LOG_FORMAT_ENV, other))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub table_name: String,
    pub dynamodb_endpoint: Option<String>,
    pub log_format: LogFormat,
}

impl Config {
    /// Load configuration from the process environment
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup (for testing)
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let table_name = lookup(TABLE_NAME_ENV)
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| Error::Config(format!("{} is not set", TABLE_NAME_ENV)))?;

        let dynamodb_endpoint = lookup(DYNAMODB_ENDPOINT_ENV).filter(|v| !v.trim().is_empty());

        let log_format = match lookup(LOG_FORMAT_ENV) {
            Some(v) => v.parse()?,
            None => LogFormat::default(),
        };

        Ok(Self {
            table_name,
            dynamodb_endpoint,
            log_format,
        })
    }

    /// Create with explicit table name (for testing)
    pub fn with_table_name(table_name: impl Into<String>) -> Self {
        Self {
            table_name: table_name.into(),
            dynamodb_endpoint: None,
            log_format: LogFormat::default(),
        }
    }
}

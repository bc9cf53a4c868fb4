//! Movies API Core Library
//!
//! Shared functionality for the Movies API Lambda functions including:
//! - Domain models and request body parsing
//! - DynamoDB operations
//! - Security event logging
//! - Configuration and logging setup
//! - Error types

pub mod config;
pub mod dynamo;
pub mod errors;
pub mod logging;
pub mod models;
pub mod security;

pub use config::{Config, LogFormat};
pub use dynamo::{DynamoClient, MovieStore};
pub use errors::{Error, Result};
pub use models::*;
pub use security::{Invocation, RequestDetails, SecurityEvent, SecurityEventType, SecurityLog, TracingSecurityLog, WriteDetails};

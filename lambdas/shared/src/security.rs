//! Security event records
//!
//! Every invocation emits an `api_request` record when it starts and a
//! `dynamodb_write` record once the item is stored. Records are single-line
//! JSON documents so they can be queried from CloudWatch Logs Insights.

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use tracing::{info, warn};

use crate::errors::Result;
use crate::logging::SECURITY_TARGET;

/// Operation tag recorded for table writes
pub const PUT_ITEM_OPERATION: &str = "put_item";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SecurityEventType {
    ApiRequest,
    DynamodbWrite,
}

impl SecurityEventType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SecurityEventType::ApiRequest => "api_request",
            SecurityEventType::DynamodbWrite => "dynamodb_write",
        }
    }
}

/// Identifies the Lambda invocation a record belongs to
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Invocation {
    pub request_id: String,
    pub function_name: String,
    /// X-Ray trace header of the invocation, when tracing is active
    pub xray_trace_id: Option<String>,
}

/// Details of an `api_request` record
///
/// Absent values serialize as `null`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RequestDetails {
    pub http_method: Option<String>,
    pub path: Option<String>,
    pub source_ip: Option<String>,
    pub user_agent: Option<String>,
}

/// Details of a `dynamodb_write` record
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WriteDetails<'a> {
    pub table: &'a str,
    pub item_id: &'a str,
    pub operation: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_data: Option<bool>,
}

impl<'a> WriteDetails<'a> {
    pub fn put_item(table: &'a str, item_id: &'a str) -> Self {
        Self {
            table,
            item_id,
            operation: PUT_ITEM_OPERATION,
            default_data: None,
        }
    }

    /// Mark the write as using the built-in default movie
    pub fn with_default_data(mut self) -> Self {
        self.default_data = Some(true);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SecurityEvent {
    pub timestamp: DateTime<Utc>,
    pub event_type: SecurityEventType,
    pub request_id: String,
    pub function_name: String,
    pub details: Value,
}

impl SecurityEvent {
    pub fn new<D: Serialize>(event_type: SecurityEventType, invocation: &Invocation, details: &D) -> Result<Self> {
        Ok(Self {
            timestamp: Utc::now(),
            event_type,
            request_id: invocation.request_id.clone(),
            function_name: invocation.function_name.clone(),
            details: serde_json::to_value(details)?,
        })
    }

    pub fn to_json_line(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Sink for security events
pub trait SecurityLog: Send + Sync {
    fn record(&self, event: &SecurityEvent);
}

/// Writes each event as one `info` line on the security target
///
/// `logging::subscriber` prints these lines verbatim.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSecurityLog;

impl SecurityLog for TracingSecurityLog {
    fn record(&self, event: &SecurityEvent) {
        match event.to_json_line() {
            Ok(line) => info!(target: SECURITY_TARGET, "{}", line),
            Err(e) => warn!(event_type = event.event_type.as_str(), error = %e, "Failed to encode security event"),
        }
    }
}

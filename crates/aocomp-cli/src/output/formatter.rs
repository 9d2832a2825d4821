//! Output formatter trait for CLI results.

use anyhow::Result;
use aocomp_core::LogRecord;
use serde::Serialize;

/// Receives the log stream of one command and its final summary.
pub trait OutputFormatter {
    /// Handles one record as soon as the worker produced it.
    fn record(&mut self, record: &LogRecord);

    /// Called once when the command is done.
    fn finish(&mut self, summary: &RunSummary) -> Result<()>;

    /// Reports an error that prevented the command from running.
    fn format_error(&mut self, error: &anyhow::Error);
}

/// What a command reports once it is done.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    /// Command name (`compress`, `decompress`, `inspect`).
    #[serde(skip)]
    pub operation: &'static str,
    /// Whether the command succeeded.
    #[serde(skip)]
    pub success: bool,
    /// Files processed, for compress and decompress.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<u64>,
    /// Final message.
    pub message: String,
    /// Archive written or directory extracted into.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
    /// Wall-clock time of the operation.
    pub duration_ms: u128,
    /// Structured command-specific data.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl RunSummary {
    pub fn new(operation: &'static str, success: bool, message: impl Into<String>) -> Self {
        Self {
            operation,
            success,
            count: None,
            message: message.into(),
            target: None,
            duration_ms: 0,
            details: None,
        }
    }
}

/// Generic JSON output structure
#[derive(Debug, Serialize)]
pub struct JsonOutput<T> {
    pub operation: String,
    pub status: Status,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Success,
    Error,
}

impl<T: Serialize> JsonOutput<T> {
    pub fn success(operation: impl Into<String>, data: T) -> Self {
        Self {
            operation: operation.into(),
            status: Status::Success,
            data: Some(data),
            error: None,
        }
    }

    pub fn failure(operation: impl Into<String>, data: T, error: impl Into<String>) -> Self {
        Self {
            operation: operation.into(),
            status: Status::Error,
            data: Some(data),
            error: Some(error.into()),
        }
    }

    pub fn error(operation: impl Into<String>, error: impl Into<String>) -> JsonOutput<()> {
        JsonOutput {
            operation: operation.into(),
            status: Status::Error,
            data: None,
            error: Some(error.into()),
        }
    }
}

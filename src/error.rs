// Error types for configuration loading and multi-process seed collection

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::process::ExitStatus;
use thiserror::Error;

/// Configuration error type
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid value: {0}")]
    InvalidValue(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ConfigError {
    /// Convert error to detailed error report
    pub fn to_error_report(&self, context: Option<HashMap<String, String>>) -> ErrorReport {
        let (error_code, suggestion) = match self {
            ConfigError::InvalidValue(_) => (
                "CONFIG_INVALID_VALUE",
                "Check the configuration value against the allowed values",
            ),
            ConfigError::Io(_) => (
                "CONFIG_IO_ERROR",
                "Check file permissions and ensure the configuration file exists",
            ),
            ConfigError::Json(_) => (
                "CONFIG_JSON_ERROR",
                "Validate the JSON syntax in the configuration file",
            ),
        };

        ErrorReport::new(error_code, self.to_string(), suggestion, context)
    }
}

/// Failure while fanning seed draws out to worker processes
#[derive(Debug, Error)]
pub enum WorkerError {
    #[error("Failed to spawn worker {worker}: {source}")]
    Spawn {
        worker: usize,
        #[source]
        source: std::io::Error,
    },

    #[error("Worker {worker} exited with {status}")]
    Failed { worker: usize, status: ExitStatus },

    #[error("Worker {worker} produced invalid seed line: {line:?}")]
    BadOutput { worker: usize, line: String },
}

impl WorkerError {
    /// Convert error to detailed error report
    pub fn to_error_report(&self) -> ErrorReport {
        let (error_code, suggestion, worker) = match self {
            WorkerError::Spawn { worker, .. } => (
                "WORKER_SPAWN_FAILED",
                "Ensure the executable is accessible and the process limit is not reached",
                worker,
            ),
            WorkerError::Failed { worker, .. } => (
                "WORKER_FAILED",
                "Inspect the worker's stderr output for the cause",
                worker,
            ),
            WorkerError::BadOutput { worker, .. } => (
                "WORKER_BAD_OUTPUT",
                "Ensure workers run the same simcore version as the parent",
                worker,
            ),
        };

        let mut context = HashMap::new();
        context.insert("worker".to_string(), worker.to_string());
        ErrorReport::new(error_code, self.to_string(), suggestion, Some(context))
    }
}

/// Detailed error report structure
///
/// Suitable for logging and machine-readable CLI output.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorReport {
    /// Error code (e.g., "CONFIG_INVALID_VALUE")
    pub error_code: String,

    /// Human-readable error message
    pub error_message: String,

    /// Timestamp when the error occurred
    pub timestamp: DateTime<Utc>,

    /// Additional context information
    pub context: HashMap<String, String>,

    /// Suggestion for resolving the error
    pub suggestion: String,
}

impl ErrorReport {
    fn new(
        error_code: &str,
        error_message: String,
        suggestion: &str,
        context: Option<HashMap<String, String>>,
    ) -> Self {
        let mut context = context.unwrap_or_default();
        context.insert("platform".to_string(), std::env::consts::OS.to_string());
        context.insert("pid".to_string(), std::process::id().to_string());

        Self {
            error_code: error_code.to_string(),
            error_message,
            timestamp: Utc::now(),
            context,
            suggestion: suggestion.to_string(),
        }
    }

    /// Convert error report to JSON string
    pub fn to_json(&self) -> std::result::Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Create error report from JSON string
    pub fn from_json(json: &str) -> std::result::Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_report() {
        let error = ConfigError::InvalidValue("log.level: loud".to_string());
        let report = error.to_error_report(None);

        assert_eq!(report.error_code, "CONFIG_INVALID_VALUE");
        assert!(report.error_message.contains("loud"));
        assert!(report.context.contains_key("platform"));
    }

    #[test]
    fn test_error_report_with_context() {
        let mut context = HashMap::new();
        context.insert("path".to_string(), "/tmp/config.json".to_string());

        let error = ConfigError::InvalidValue("log.format: xml".to_string());
        let report = error.to_error_report(Some(context));

        assert_eq!(report.context.get("path").unwrap(), "/tmp/config.json");
        assert_eq!(
            report.context.get("pid").unwrap(),
            &std::process::id().to_string()
        );
    }

    #[test]
    fn test_error_report_json_roundtrip() {
        let error = WorkerError::BadOutput {
            worker: 3,
            line: "abc".to_string(),
        };
        let report = error.to_error_report();

        let json = report.to_json().unwrap();
        assert!(json.contains("WORKER_BAD_OUTPUT"));
        assert!(json.contains("errorCode"));

        let parsed = ErrorReport::from_json(&json).unwrap();
        assert_eq!(parsed.error_code, report.error_code);
        assert_eq!(parsed.context.get("worker").unwrap(), "3");
    }

    #[test]
    fn test_worker_error_messages() {
        let error = WorkerError::Spawn {
            worker: 1,
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "missing"),
        };
        assert_eq!(error.to_string(), "Failed to spawn worker 1: missing");

        let error = WorkerError::BadOutput {
            worker: 0,
            line: "x".to_string(),
        };
        assert_eq!(error.to_string(), "Worker 0 produced invalid seed line: \"x\"");
    }
}

use std::result::Result as StdResult;

use thiserror::Error;

use crate::domain::SubjectId;

/// Error type that captures monitor configuration, input, and storage failures.
#[derive(Debug, Error)]
pub enum MonitorError {
    #[error("Invalid configuration: {0}")]
    ConfigurationInvalid(String),
    #[error("Unknown category: {0}")]
    UnknownCategory(String),
    #[error("Invalid expense: {0}")]
    InvalidExpense(String),
    #[error("Storage error: {0}")]
    Storage(String),
    #[error("Monitoring session for `{0}` is closed")]
    SessionClosed(SubjectId),
    #[error("Runtime unavailable: {0}")]
    Runtime(String),
}

pub type MonitorResult<T> = StdResult<T, MonitorError>;

impl From<std::io::Error> for MonitorError {
    fn from(err: std::io::Error) -> Self {
        MonitorError::Storage(err.to_string())
    }
}

impl From<serde_json::Error> for MonitorError {
    fn from(err: serde_json::Error) -> Self {
        MonitorError::Storage(err.to_string())
    }
}

/// Failure reported by a notification store for a single alert.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DeliveryError {
    #[error("Notification store unreachable: {0}")]
    Unreachable(String),
    #[error("Notification store rejected the write: {0}")]
    Rejected(String),
}

impl From<std::io::Error> for DeliveryError {
    fn from(err: std::io::Error) -> Self {
        DeliveryError::Unreachable(err.to_string())
    }
}

impl From<serde_json::Error> for DeliveryError {
    fn from(err: serde_json::Error) -> Self {
        DeliveryError::Rejected(err.to_string())
    }
}

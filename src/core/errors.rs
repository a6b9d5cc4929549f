use std::result::Result as StdResult;

use thiserror::Error;

use crate::domain::SubscriptionIssue;
use crate::notification::NotificationError;

use super::scheduler::SchedulerError;

/// Unified error type for core/domain/storage layers.
#[derive(Error, Debug)]
pub enum SubtrackError {
    #[error("Subscription not found: {0}")]
    SubscriptionNotFound(String),
    #[error("Invalid subscription: {0}")]
    InvalidSubscription(#[from] SubscriptionIssue),
    #[error("Persistence error: {0}")]
    StorageError(String),
    #[error("Configuration error: {0}")]
    ConfigError(String),
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Reminder pass failed: {0}")]
    Reminders(#[from] SchedulerError),
}

pub type Result<T> = StdResult<T, SubtrackError>;

/// User-facing CLI error wrapper.
#[derive(Error, Debug)]
pub enum CliError {
    #[error(transparent)]
    Core(#[from] SubtrackError),
    #[error("Invalid input: {0}")]
    Input(String),
    #[error("Command failed: {0}")]
    Command(String),
}

impl From<std::io::Error> for SubtrackError {
    fn from(err: std::io::Error) -> Self {
        SubtrackError::StorageError(err.to_string())
    }
}

impl From<serde_json::Error> for SubtrackError {
    fn from(err: serde_json::Error) -> Self {
        SubtrackError::StorageError(err.to_string())
    }
}

impl From<NotificationError> for SubtrackError {
    fn from(source: NotificationError) -> Self {
        SubtrackError::Reminders(SchedulerError::HostScheduling {
            operation: "read the reminder queue".into(),
            source,
        })
    }
}

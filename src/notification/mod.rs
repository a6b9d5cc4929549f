//! Host notification facility abstraction and its implementations.

pub mod json_queue;
pub mod memory;

use thiserror::Error;

use crate::domain::{ReminderHandle, ReminderRequest, ScheduledReminder};

pub use json_queue::JsonReminderQueue;
pub use memory::{CallLog, MemoryNotifier};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PermissionStatus {
    Granted,
    Denied,
}

impl PermissionStatus {
    pub fn is_granted(self) -> bool {
        matches!(self, PermissionStatus::Granted)
    }
}

impl From<bool> for PermissionStatus {
    fn from(granted: bool) -> Self {
        if granted {
            PermissionStatus::Granted
        } else {
            PermissionStatus::Denied
        }
    }
}

/// Failures reported by the notification host.
#[derive(Debug, Error)]
pub enum NotificationError {
    #[error("host rejected request: {0}")]
    Rejected(String),
    #[error("notification host unavailable: {0}")]
    Unavailable(String),
    #[error("reminder queue IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("reminder queue is corrupt: {0}")]
    Serde(#[from] serde_json::Error),
}

/// Local notification capability of the host platform.
///
/// Implementations treat a `day_of_month` beyond a month's length as that
/// month's last day.
pub trait NotificationPort: Send + Sync {
    /// Asks for permission to deliver notifications. May block on a user prompt
    /// the first time; later calls report the settled state.
    fn request_permission(&self) -> Result<PermissionStatus, NotificationError>;

    /// Cancels every reminder owned by the application. A no-op when nothing is
    /// scheduled.
    fn cancel_all_scheduled(&self) -> Result<(), NotificationError>;

    /// Registers a reminder repeating monthly with no end date.
    fn schedule_recurring_monthly(
        &self,
        request: ReminderRequest,
    ) -> Result<ReminderHandle, NotificationError>;

    /// Reminders currently queued on the host.
    fn pending(&self) -> Result<Vec<ScheduledReminder>, NotificationError>;
}

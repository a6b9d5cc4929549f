use std::{
    fs,
    path::{Path, PathBuf},
};

use chrono::{NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::{time::next_fire_after, utils::write_atomic};
use crate::domain::{ReminderHandle, ReminderRequest, ScheduledReminder};

use super::{NotificationError, NotificationPort, PermissionStatus};

#[derive(Debug, Default, Serialize, Deserialize)]
struct QueueFile {
    #[serde(default)]
    reminders: Vec<ScheduledReminder>,
}

/// File-backed stand-in for the platform alarm queue, used by the CLI.
///
/// Permission is fixed at construction from the user's notification setting.
#[derive(Debug, Clone)]
pub struct JsonReminderQueue {
    path: PathBuf,
    permission: PermissionStatus,
}

impl JsonReminderQueue {
    pub fn new(path: impl Into<PathBuf>, permission: PermissionStatus) -> Self {
        Self {
            path: path.into(),
            permission,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Upcoming fire instants after `now`, soonest first.
    pub fn upcoming(
        &self,
        now: NaiveDateTime,
    ) -> Result<Vec<(NaiveDateTime, ScheduledReminder)>, NotificationError> {
        let mut upcoming: Vec<_> = self
            .read()?
            .reminders
            .into_iter()
            .filter_map(|reminder| next_fire_after(&reminder.rule, now).map(|at| (at, reminder)))
            .collect();
        upcoming.sort_by(|a, b| a.0.cmp(&b.0));
        Ok(upcoming)
    }

    fn read(&self) -> Result<QueueFile, NotificationError> {
        if !self.path.exists() {
            return Ok(QueueFile::default());
        }
        let data = fs::read_to_string(&self.path)?;
        if data.trim().is_empty() {
            return Ok(QueueFile::default());
        }
        Ok(serde_json::from_str(&data)?)
    }

    fn write(&self, queue: &QueueFile) -> Result<(), NotificationError> {
        let json = serde_json::to_string_pretty(queue)?;
        write_atomic(&self.path, &json)?;
        Ok(())
    }
}

impl NotificationPort for JsonReminderQueue {
    fn request_permission(&self) -> Result<PermissionStatus, NotificationError> {
        Ok(self.permission)
    }

    fn cancel_all_scheduled(&self) -> Result<(), NotificationError> {
        if !self.path.exists() {
            return Ok(());
        }
        self.write(&QueueFile::default())
    }

    fn schedule_recurring_monthly(
        &self,
        request: ReminderRequest,
    ) -> Result<ReminderHandle, NotificationError> {
        if self.permission != PermissionStatus::Granted {
            return Err(NotificationError::Rejected(
                "notifications are disabled".into(),
            ));
        }
        let mut queue = self.read()?;
        let handle = ReminderHandle::generate();
        debug!(handle = %handle, day = request.rule.day_of_month, "queueing reminder");
        queue.reminders.push(ScheduledReminder::from_request(
            handle.clone(),
            request,
            Utc::now(),
        ));
        self.write(&queue)?;
        Ok(handle)
    }

    fn pending(&self) -> Result<Vec<ScheduledReminder>, NotificationError> {
        Ok(self.read()?.reminders)
    }
}

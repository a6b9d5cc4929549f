use std::sync::{Mutex, MutexGuard};

use chrono::Utc;

use crate::domain::{ReminderHandle, ReminderRequest, ScheduledReminder};

use super::{NotificationError, NotificationPort, PermissionStatus};

/// Number of calls received per port operation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CallLog {
    pub permission_requests: usize,
    pub cancels: usize,
    pub schedules: usize,
}

#[derive(Debug, Default)]
struct State {
    permission: Option<PermissionStatus>,
    reminders: Vec<ScheduledReminder>,
    calls: CallLog,
    fail_schedule_at: Option<usize>,
    fail_cancel: bool,
}

/// In-process notification host. Records every call and can be told to refuse
/// permission or fail a specific registration.
#[derive(Debug)]
pub struct MemoryNotifier {
    state: Mutex<State>,
}

impl Default for MemoryNotifier {
    fn default() -> Self {
        Self::new(PermissionStatus::Granted)
    }
}

impl MemoryNotifier {
    pub fn new(permission: PermissionStatus) -> Self {
        Self {
            state: Mutex::new(State {
                permission: Some(permission),
                ..State::default()
            }),
        }
    }

    pub fn denied() -> Self {
        Self::new(PermissionStatus::Denied)
    }

    pub fn set_permission(&self, permission: PermissionStatus) {
        self.lock().permission = Some(permission);
    }

    /// Fails the `nth` schedule call (1-based, counted from creation).
    pub fn fail_schedule_at(&self, nth: usize) {
        self.lock().fail_schedule_at = Some(nth);
    }

    pub fn fail_cancel(&self, fail: bool) {
        self.lock().fail_cancel = fail;
    }

    pub fn calls(&self) -> CallLog {
        self.lock().calls
    }

    pub fn reminders(&self) -> Vec<ScheduledReminder> {
        self.lock().reminders.clone()
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        // Poisoning is ignored; recorded calls stay readable.
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl NotificationPort for MemoryNotifier {
    fn request_permission(&self) -> Result<PermissionStatus, NotificationError> {
        let mut state = self.lock();
        state.calls.permission_requests += 1;
        Ok(state.permission.unwrap_or(PermissionStatus::Denied))
    }

    fn cancel_all_scheduled(&self) -> Result<(), NotificationError> {
        let mut state = self.lock();
        state.calls.cancels += 1;
        if state.fail_cancel {
            return Err(NotificationError::Rejected("cancel refused".into()));
        }
        state.reminders.clear();
        Ok(())
    }

    fn schedule_recurring_monthly(
        &self,
        request: ReminderRequest,
    ) -> Result<ReminderHandle, NotificationError> {
        let mut state = self.lock();
        state.calls.schedules += 1;
        if state.fail_schedule_at == Some(state.calls.schedules) {
            return Err(NotificationError::Rejected(format!(
                "trigger for `{}` refused",
                request.title
            )));
        }
        let handle = ReminderHandle::generate();
        state.reminders.push(ScheduledReminder::from_request(
            handle.clone(),
            request,
            Utc::now(),
        ));
        Ok(handle)
    }

    fn pending(&self) -> Result<Vec<ScheduledReminder>, NotificationError> {
        Ok(self.lock().reminders.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ReminderLocale, ReminderRule, Subscription};

    fn request(name: &str, day: u32) -> ReminderRequest {
        let sub = Subscription::new(name, 1000, day, "Card");
        ReminderRequest::for_subscription(
            &sub,
            ReminderRule::for_billing_day(day),
            ReminderLocale::Korean,
        )
    }

    #[test]
    fn records_calls_and_reminders() {
        let notifier = MemoryNotifier::default();
        notifier.schedule_recurring_monthly(request("A", 3)).unwrap();
        notifier.schedule_recurring_monthly(request("B", 4)).unwrap();
        assert_eq!(notifier.pending().unwrap().len(), 2);
        notifier.cancel_all_scheduled().unwrap();
        assert!(notifier.pending().unwrap().is_empty());
        assert_eq!(
            notifier.calls(),
            CallLog {
                permission_requests: 0,
                cancels: 1,
                schedules: 2,
            }
        );
    }

    #[test]
    fn injected_failure_hits_requested_call_only() {
        let notifier = MemoryNotifier::default();
        notifier.fail_schedule_at(2);
        assert!(notifier.schedule_recurring_monthly(request("A", 3)).is_ok());
        assert!(notifier.schedule_recurring_monthly(request("B", 3)).is_err());
        assert!(notifier.schedule_recurring_monthly(request("C", 3)).is_ok());
        assert_eq!(notifier.reminders().len(), 2);
    }

    #[test]
    fn permission_can_be_revoked() {
        let notifier = MemoryNotifier::default();
        assert_eq!(
            notifier.request_permission().unwrap(),
            PermissionStatus::Granted
        );
        notifier.set_permission(PermissionStatus::Denied);
        assert_eq!(
            notifier.request_permission().unwrap(),
            PermissionStatus::Denied
        );
    }
}

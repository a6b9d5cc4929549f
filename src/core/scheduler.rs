//! Payment reminder scheduling.
//!
//! Every pass cancels all reminders owned by the app and registers one monthly
//! reminder per subscription. There is no diffing against the previous pass,
//! so the reminder set after a pass always mirrors the list it was given.

use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::domain::{
    Displayable, ReminderHandle, ReminderLocale, ReminderRequest, ReminderRule, Subscription,
    SubscriptionIssue, REMINDER_HOUR, REMINDER_MINUTE,
};
use crate::notification::{NotificationError, NotificationPort};

#[derive(Debug, Error)]
pub enum SchedulerError {
    #[error("subscription `{label}` cannot be scheduled: {issue}")]
    InvalidSubscription {
        label: String,
        #[source]
        issue: SubscriptionIssue,
    },
    #[error("notification host failed to {operation}: {source}")]
    HostScheduling {
        operation: String,
        #[source]
        source: NotificationError,
    },
    #[error("invalid reminder time {hour:02}:{minute:02}")]
    InvalidFireTime { hour: u32, minute: u32 },
}

/// Result of a full reminder pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PassOutcome {
    /// Permission was refused; existing reminders were left untouched.
    PermissionDenied,
    /// All reminders were replaced by the listed registrations.
    Scheduled { handles: Vec<ReminderHandle> },
}

impl PassOutcome {
    pub fn scheduled_count(&self) -> usize {
        match self {
            PassOutcome::PermissionDenied => 0,
            PassOutcome::Scheduled { handles } => handles.len(),
        }
    }

    pub fn is_denied(&self) -> bool {
        matches!(self, PassOutcome::PermissionDenied)
    }
}

/// Keeps the host's reminder queue in step with the subscription list.
#[derive(Clone)]
pub struct ReminderScheduler {
    port: Arc<dyn NotificationPort>,
    locale: ReminderLocale,
    hour: u32,
    minute: u32,
}

impl ReminderScheduler {
    pub fn new(port: Arc<dyn NotificationPort>) -> Self {
        Self {
            port,
            locale: ReminderLocale::default(),
            hour: REMINDER_HOUR,
            minute: REMINDER_MINUTE,
        }
    }

    pub fn with_locale(mut self, locale: ReminderLocale) -> Self {
        self.locale = locale;
        self
    }

    /// Overrides the 09:00 default fire time.
    pub fn with_fire_time(mut self, hour: u32, minute: u32) -> Result<Self, SchedulerError> {
        if hour > 23 || minute > 59 {
            return Err(SchedulerError::InvalidFireTime { hour, minute });
        }
        self.hour = hour;
        self.minute = minute;
        Ok(self)
    }

    pub fn request_permission(&self) -> Result<bool, SchedulerError> {
        let status = self
            .port
            .request_permission()
            .map_err(|source| SchedulerError::HostScheduling {
                operation: "request permission".into(),
                source,
            })?;
        Ok(status.is_granted())
    }

    pub fn cancel_all(&self) -> Result<(), SchedulerError> {
        self.port
            .cancel_all_scheduled()
            .map_err(|source| SchedulerError::HostScheduling {
                operation: "cancel scheduled reminders".into(),
                source,
            })
    }

    /// The reminder that `register` would hand to the host.
    pub fn reminder_for(
        &self,
        subscription: &Subscription,
    ) -> Result<ReminderRequest, SchedulerError> {
        subscription
            .validate_schedulable()
            .map_err(|issue| SchedulerError::InvalidSubscription {
                label: subscription.display_label(),
                issue,
            })?;
        let rule = ReminderRule::at(subscription.billing_day, self.hour, self.minute);
        Ok(ReminderRequest::for_subscription(
            subscription,
            rule,
            self.locale,
        ))
    }

    /// Registers the monthly reminder for a single subscription.
    pub fn register(&self, subscription: &Subscription) -> Result<ReminderHandle, SchedulerError> {
        let request = self.reminder_for(subscription)?;
        let day = request.rule.day_of_month;
        let handle = self
            .port
            .schedule_recurring_monthly(request)
            .map_err(|source| SchedulerError::HostScheduling {
                operation: format!("schedule `{}`", subscription.name),
                source,
            })?;
        debug!(
            subscription = %subscription.name,
            day,
            handle = %handle,
            "reminder registered"
        );
        Ok(handle)
    }

    /// Runs a full reminder pass for `subscriptions`.
    ///
    /// A refused permission skips the pass without cancelling anything. Invalid
    /// records reject the pass before the queue is touched. A host failure after
    /// cancellation aborts the pass and leaves the queue partially rebuilt.
    pub fn schedule_all(
        &self,
        subscriptions: &[Subscription],
    ) -> Result<PassOutcome, SchedulerError> {
        if !self.request_permission()? {
            warn!("notification permission denied; reminders left unchanged");
            return Ok(PassOutcome::PermissionDenied);
        }

        let requests = subscriptions
            .iter()
            .map(|subscription| self.reminder_for(subscription))
            .collect::<Result<Vec<_>, _>>()?;

        self.cancel_all()?;

        let mut handles = Vec::with_capacity(subscriptions.len());
        for (subscription, request) in subscriptions.iter().zip(requests) {
            match self.port.schedule_recurring_monthly(request) {
                Ok(handle) => handles.push(handle),
                Err(source) => {
                    warn!(
                        subscription = %subscription.name,
                        registered = handles.len(),
                        total = subscriptions.len(),
                        error = %source,
                        "reminder pass aborted"
                    );
                    return Err(SchedulerError::HostScheduling {
                        operation: format!("schedule `{}`", subscription.name),
                        source,
                    });
                }
            }
        }

        info!(count = handles.len(), "reminder pass complete");
        Ok(PassOutcome::Scheduled { handles })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notification::{CallLog, MemoryNotifier, PermissionStatus};

    fn scheduler() -> (Arc<MemoryNotifier>, ReminderScheduler) {
        let notifier = Arc::new(MemoryNotifier::default());
        let scheduler = ReminderScheduler::new(notifier.clone());
        (notifier, scheduler)
    }

    fn netflix() -> Subscription {
        Subscription::new("Netflix", 17000, 15, "Card").with_id("1")
    }

    fn gym() -> Subscription {
        Subscription::new("Gym", 50000, 31, "Cash").with_id("2")
    }

    #[test]
    fn empty_pass_clears_previous_reminders() {
        let (notifier, scheduler) = scheduler();
        scheduler.schedule_all(&[netflix(), gym()]).unwrap();
        assert_eq!(notifier.reminders().len(), 2);

        let outcome = scheduler.schedule_all(&[]).unwrap();
        assert_eq!(outcome, PassOutcome::Scheduled { handles: vec![] });
        assert!(notifier.reminders().is_empty());
        assert_eq!(notifier.calls().cancels, 2);
    }

    #[test]
    fn repeated_pass_does_not_duplicate() {
        let (notifier, scheduler) = scheduler();
        scheduler.schedule_all(&[netflix()]).unwrap();
        scheduler.schedule_all(&[netflix()]).unwrap();

        let reminders = notifier.reminders();
        assert_eq!(reminders.len(), 1);
        assert_eq!(reminders[0].subscription_id(), Some("1"));
    }

    #[test]
    fn first_of_month_reminder_fires_on_day_one() {
        let (notifier, scheduler) = scheduler();
        let sub = Subscription::new("Cloud", 2900, 1, "Card");
        scheduler.schedule_all(&[sub]).unwrap();
        assert_eq!(notifier.reminders()[0].rule.day_of_month, 1);
    }

    #[test]
    fn reminders_fire_at_nine_the_day_before() {
        let (notifier, scheduler) = scheduler();
        scheduler.schedule_all(&[gym()]).unwrap();
        let reminder = &notifier.reminders()[0];
        assert_eq!(
            reminder.rule,
            ReminderRule {
                day_of_month: 30,
                hour: 9,
                minute: 0,
            }
        );
        assert_eq!(reminder.body, "Gym 결제가 내일(31일) 예정입니다.");
    }

    #[test]
    fn denied_permission_makes_no_host_calls() {
        let notifier = Arc::new(MemoryNotifier::denied());
        let scheduler = ReminderScheduler::new(notifier.clone());

        let outcome = scheduler.schedule_all(&[netflix()]).unwrap();
        assert!(outcome.is_denied());
        assert_eq!(
            notifier.calls(),
            CallLog {
                permission_requests: 1,
                cancels: 0,
                schedules: 0,
            }
        );
    }

    #[test]
    fn denied_permission_keeps_existing_reminders() {
        let (notifier, scheduler) = scheduler();
        scheduler.schedule_all(&[netflix(), gym()]).unwrap();
        notifier.set_permission(PermissionStatus::Denied);

        scheduler.schedule_all(&[]).unwrap();
        assert_eq!(notifier.reminders().len(), 2);
    }

    #[test]
    fn host_failure_aborts_pass() {
        let (notifier, scheduler) = scheduler();
        notifier.fail_schedule_at(2);

        let music = Subscription::new("Music", 10900, 7, "Card");
        let err = scheduler
            .schedule_all(&[netflix(), gym(), music])
            .expect_err("second registration fails");
        assert!(matches!(
            err,
            SchedulerError::HostScheduling { ref operation, .. } if operation.contains("Gym")
        ));
        assert_eq!(notifier.calls().schedules, 2);
        assert_eq!(notifier.reminders().len(), 1);
    }

    #[test]
    fn cancel_failure_surfaces_error() {
        let (notifier, scheduler) = scheduler();
        notifier.fail_cancel(true);
        let err = scheduler.schedule_all(&[netflix()]).unwrap_err();
        assert!(err.to_string().contains("cancel"));
        assert_eq!(notifier.calls().schedules, 0);
    }

    #[test]
    fn invalid_record_rejects_pass_before_cancelling() {
        let (notifier, scheduler) = scheduler();
        scheduler.schedule_all(&[netflix()]).unwrap();

        let broken = Subscription::new("", 1000, 10, "Card");
        let err = scheduler.schedule_all(&[gym(), broken]).unwrap_err();
        assert!(matches!(
            err,
            SchedulerError::InvalidSubscription {
                issue: SubscriptionIssue::EmptyName,
                ..
            }
        ));
        assert_eq!(notifier.calls().cancels, 1);
        assert_eq!(notifier.reminders().len(), 1);
    }

    #[test]
    fn cancel_all_is_idempotent() {
        let (notifier, scheduler) = scheduler();
        scheduler.cancel_all().unwrap();
        scheduler.cancel_all().unwrap();
        assert!(notifier.reminders().is_empty());
    }

    #[test]
    fn custom_fire_time_is_validated() {
        let (_, scheduler) = scheduler();
        assert!(matches!(
            scheduler.clone().with_fire_time(24, 0),
            Err(SchedulerError::InvalidFireTime { hour: 24, minute: 0 })
        ));
        let scheduler = scheduler.with_fire_time(20, 30).unwrap();
        let request = scheduler.reminder_for(&netflix()).unwrap();
        assert_eq!((request.rule.hour, request.rule.minute), (20, 30));
    }

    #[test]
    fn english_locale_changes_copy() {
        let (notifier, scheduler) = scheduler();
        let scheduler = scheduler.with_locale(ReminderLocale::English);
        scheduler.register(&netflix()).unwrap();
        assert_eq!(notifier.reminders()[0].title, "Netflix payment reminder");
    }
}

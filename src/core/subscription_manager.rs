use tracing::info;

use crate::domain::{Displayable, Subscription, SubscriptionId};
use crate::storage::SubscriptionStore;

use super::errors::{Result, SubtrackError};
use super::scheduler::{PassOutcome, ReminderScheduler};

/// Outcome of a persisted change followed by a reminder pass.
#[derive(Debug, Clone)]
pub struct ChangeReport {
    pub subscription: Subscription,
    pub reminders: PassOutcome,
}

/// Facade that persists subscription changes and rebuilds reminders after each
/// one. A failed reminder pass is reported after the change has been stored.
pub struct SubscriptionManager {
    store: Box<dyn SubscriptionStore>,
    scheduler: ReminderScheduler,
}

impl SubscriptionManager {
    pub fn new(store: Box<dyn SubscriptionStore>, scheduler: ReminderScheduler) -> Self {
        Self { store, scheduler }
    }

    pub fn store(&self) -> &dyn SubscriptionStore {
        self.store.as_ref()
    }

    pub fn subscriptions(&self) -> Result<Vec<Subscription>> {
        self.store.list()
    }

    /// Rebuilds reminders from the stored list; used on initial load.
    pub fn sync_reminders(&self) -> Result<PassOutcome> {
        let subscriptions = self.store.list()?;
        let outcome = self.scheduler.schedule_all(&subscriptions)?;
        Ok(outcome)
    }

    pub fn add(&self, subscription: Subscription) -> Result<ChangeReport> {
        let stored = self.store.add(subscription)?;
        let reminders = self.sync_reminders()?;
        Ok(ChangeReport {
            subscription: stored,
            reminders,
        })
    }

    pub fn delete(&self, id: &SubscriptionId) -> Result<ChangeReport> {
        let existing = self
            .store
            .list()?
            .into_iter()
            .find(|sub| sub.id.as_ref() == Some(id))
            .ok_or_else(|| SubtrackError::SubscriptionNotFound(id.to_string()))?;
        self.store.delete(id)?;
        info!(id = %id, name = %existing.name, "rebuilding reminders after delete");
        let reminders = self.sync_reminders()?;
        Ok(ChangeReport {
            subscription: existing,
            reminders,
        })
    }

    /// Removes records field-equal to `target` and rebuilds reminders. Records
    /// persisted without an id can only be reached this way.
    pub fn delete_matching(&self, target: &Subscription) -> Result<ChangeReport> {
        let removed = self.store.delete_matching(target)?;
        if removed == 0 {
            return Err(SubtrackError::SubscriptionNotFound(target.display_label()));
        }
        info!(name = %target.name, removed, "rebuilding reminders after delete by value");
        let reminders = self.sync_reminders()?;
        Ok(ChangeReport {
            subscription: target.clone(),
            reminders,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::notification::{MemoryNotifier, NotificationPort, PermissionStatus};
    use crate::storage::JsonSubscriptionStore;
    use tempfile::TempDir;

    fn manager(temp: &TempDir, notifier: Arc<MemoryNotifier>) -> SubscriptionManager {
        let store = JsonSubscriptionStore::new(Some(temp.path().to_path_buf())).unwrap();
        SubscriptionManager::new(Box::new(store), ReminderScheduler::new(notifier))
    }

    #[test]
    fn add_and_delete_keep_reminders_in_step() {
        let temp = TempDir::new().unwrap();
        let notifier = Arc::new(MemoryNotifier::default());
        let manager = manager(&temp, notifier.clone());

        let first = manager
            .add(Subscription::new("Netflix", 17000, 15, "Card"))
            .unwrap();
        manager
            .add(Subscription::new("Gym", 50000, 31, "Cash"))
            .unwrap();
        assert_eq!(notifier.pending().unwrap().len(), 2);

        let id = first.subscription.id.clone().unwrap();
        let report = manager.delete(&id).unwrap();
        assert_eq!(report.subscription.name, "Netflix");
        assert_eq!(report.reminders.scheduled_count(), 1);
        let pending = notifier.pending().unwrap();
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].subscription_name(), Some("Gym"));
    }

    #[test]
    fn delete_unknown_id_fails_without_pass() {
        let temp = TempDir::new().unwrap();
        let notifier = Arc::new(MemoryNotifier::default());
        let manager = manager(&temp, notifier.clone());

        let err = manager.delete(&SubscriptionId::new("missing")).unwrap_err();
        assert!(matches!(err, SubtrackError::SubscriptionNotFound(_)));
        assert_eq!(notifier.calls().cancels, 0);
    }

    #[test]
    fn delete_matching_reaches_records_without_id() {
        let temp = TempDir::new().unwrap();
        let notifier = Arc::new(MemoryNotifier::default());
        let manager = manager(&temp, notifier.clone());
        std::fs::write(
            temp.path().join("subscriptions.json"),
            r#"{"subscriptions":[
                {"name":"Gym","price":50000,"date":5,"paymentMethod":"Cash"},
                {"name":"Cloud","price":2900,"date":1,"paymentMethod":"Card"}
            ]}"#,
        )
        .unwrap();
        manager.sync_reminders().unwrap();
        assert_eq!(notifier.pending().unwrap().len(), 2);

        let gym = Subscription::new("Gym", 50000, 5, "Cash");
        let report = manager.delete_matching(&gym).unwrap();
        assert_eq!(report.subscription.name, "Gym");
        assert_eq!(report.reminders.scheduled_count(), 1);
        let pending = notifier.pending().unwrap();
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].subscription_name(), Some("Cloud"));
        assert_eq!(manager.subscriptions().unwrap().len(), 1);

        let cancels = notifier.calls().cancels;
        let err = manager.delete_matching(&gym).unwrap_err();
        assert!(matches!(err, SubtrackError::SubscriptionNotFound(ref label) if label == "Gym"));
        assert_eq!(notifier.calls().cancels, cancels);
    }

    #[test]
    fn denied_permission_still_persists_changes() {
        let temp = TempDir::new().unwrap();
        let notifier = Arc::new(MemoryNotifier::new(PermissionStatus::Denied));
        let manager = manager(&temp, notifier.clone());

        let report = manager
            .add(Subscription::new("Music", 10900, 7, "Card"))
            .unwrap();
        assert!(report.reminders.is_denied());
        assert_eq!(manager.subscriptions().unwrap().len(), 1);
        assert!(notifier.pending().unwrap().is_empty());
    }

    #[test]
    fn host_failure_surfaces_after_store() {
        let temp = TempDir::new().unwrap();
        let notifier = Arc::new(MemoryNotifier::default());
        notifier.fail_schedule_at(1);
        let manager = manager(&temp, notifier);

        let err = manager
            .add(Subscription::new("Music", 10900, 7, "Card"))
            .unwrap_err();
        assert!(matches!(err, SubtrackError::Reminders(_)));
        assert_eq!(manager.subscriptions().unwrap().len(), 1);
    }
}

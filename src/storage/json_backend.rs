use std::{
    fs,
    path::{Path, PathBuf},
    sync::Arc,
};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::core::{
    errors::{Result, SubtrackError},
    time::{Clock, SystemClock},
    utils::{app_data_dir, ensure_dir, subscriptions_file_in, write_atomic},
};
use crate::domain::{Subscription, SubscriptionId};

use super::SubscriptionStore;

#[derive(Debug, Default, Serialize, Deserialize)]
struct SubscriptionFile {
    #[serde(default)]
    subscriptions: Vec<Subscription>,
}

/// Stores subscriptions in a single `subscriptions.json` document shaped
/// `{ "subscriptions": [...] }`.
#[derive(Clone)]
pub struct JsonSubscriptionStore {
    path: PathBuf,
    clock: Arc<dyn Clock>,
}

impl JsonSubscriptionStore {
    pub fn new(root: Option<PathBuf>) -> Result<Self> {
        let root = root.unwrap_or_else(app_data_dir);
        ensure_dir(&root)?;
        Ok(Self {
            path: subscriptions_file_in(&root),
            clock: Arc::new(SystemClock),
        })
    }

    /// Uses `clock` for creation timestamps and generated ids.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read(&self) -> Result<SubscriptionFile> {
        if !self.path.exists() {
            return Ok(SubscriptionFile::default());
        }
        let data = fs::read_to_string(&self.path)?;
        if data.trim().is_empty() {
            return Ok(SubscriptionFile::default());
        }
        serde_json::from_str(&data).map_err(|err| {
            SubtrackError::StorageError(format!(
                "failed to parse `{}`: {}",
                self.path.display(),
                err
            ))
        })
    }

    fn write(&self, file: &SubscriptionFile) -> Result<()> {
        let json = serde_json::to_string_pretty(file)?;
        write_atomic(&self.path, &json)?;
        Ok(())
    }

    fn next_id(&self, existing: &[Subscription], created_at: DateTime<Utc>) -> SubscriptionId {
        let taken = |candidate: &str| {
            existing
                .iter()
                .any(|sub| sub.id.as_ref().map(SubscriptionId::as_str) == Some(candidate))
        };
        let mut millis = created_at.timestamp_millis();
        while taken(&millis.to_string()) {
            millis += 1;
        }
        SubscriptionId::new(millis.to_string())
    }

    fn now_utc(&self) -> DateTime<Utc> {
        self.clock.now().and_utc()
    }
}

impl SubscriptionStore for JsonSubscriptionStore {
    fn list(&self) -> Result<Vec<Subscription>> {
        Ok(self.read()?.subscriptions)
    }

    fn add(&self, mut subscription: Subscription) -> Result<Subscription> {
        subscription.name = subscription.name.trim().to_string();
        subscription.payment_method = subscription.payment_method.trim().to_string();
        subscription.validate()?;

        let mut file = self.read()?;
        let created_at = self.now_utc();
        subscription.id = Some(self.next_id(&file.subscriptions, created_at));
        subscription.created_at = Some(created_at);
        file.subscriptions.push(subscription.clone());
        self.write(&file)?;
        info!(
            id = %subscription.id.as_ref().map(SubscriptionId::as_str).unwrap_or_default(),
            name = %subscription.name,
            "subscription added"
        );
        Ok(subscription)
    }

    fn delete(&self, id: &SubscriptionId) -> Result<bool> {
        let mut file = self.read()?;
        let before = file.subscriptions.len();
        file.subscriptions.retain(|sub| sub.id.as_ref() != Some(id));
        let removed = file.subscriptions.len() != before;
        if removed {
            self.write(&file)?;
            info!(id = %id, "subscription deleted");
        } else {
            debug!(id = %id, "delete matched no subscription");
        }
        Ok(removed)
    }

    fn delete_matching(&self, target: &Subscription) -> Result<usize> {
        let mut file = self.read()?;
        let before = file.subscriptions.len();
        file.subscriptions.retain(|sub| !sub.same_record(target));
        let removed = before - file.subscriptions.len();
        if removed > 0 {
            self.write(&file)?;
            info!(name = %target.name, removed, "subscriptions deleted by value");
        }
        Ok(removed)
    }
}

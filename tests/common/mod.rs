#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use subtrack::{
    config::ConfigManager,
    core::{FixedClock, ReminderScheduler, SubscriptionManager},
    notification::MemoryNotifier,
    storage::JsonSubscriptionStore,
};
use tempfile::TempDir;

/// Holds TempDir guards so temporary folders live for the duration of the test run.
static TEST_DIRS: Lazy<Mutex<Vec<TempDir>>> = Lazy::new(|| Mutex::new(Vec::new()));

pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid calendar date")
}

/// A fresh directory that outlives the calling test.
pub fn temp_base() -> PathBuf {
    let temp = TempDir::new().expect("create temp dir");
    let base = temp.path().to_path_buf();
    TEST_DIRS.lock().expect("lock temp dir registry").push(temp);
    base
}

pub struct TestEnv {
    pub base: PathBuf,
    pub manager: SubscriptionManager,
    pub notifier: Arc<MemoryNotifier>,
    pub config_manager: ConfigManager,
}

/// Manager over an isolated JSON store with an in-memory notification host,
/// pinned to `today`.
pub fn setup_test_env(today: NaiveDate) -> TestEnv {
    let base = temp_base();
    let notifier = Arc::new(MemoryNotifier::default());
    let store = JsonSubscriptionStore::new(Some(base.clone()))
        .expect("create json store")
        .with_clock(Arc::new(FixedClock::on(today)));
    let manager = SubscriptionManager::new(
        Box::new(store),
        ReminderScheduler::new(notifier.clone()),
    );
    let config_manager =
        ConfigManager::with_base_dir(base.clone()).expect("create config manager for temp dir");

    TestEnv {
        base,
        manager,
        notifier,
        config_manager,
    }
}

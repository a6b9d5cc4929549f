use dirs::home_dir;
use std::{
    env, fs, io,
    path::{Path, PathBuf},
};

const DEFAULT_DIR_NAME: &str = ".subtrack";
const HOME_ENV: &str = "SUBTRACK_HOME";
const SUBSCRIPTIONS_FILE: &str = "subscriptions.json";
const REMINDERS_FILE: &str = "reminders.json";
const CONFIG_FILE: &str = "config.json";

/// Returns the application-specific data directory, defaulting to `~/.subtrack`.
pub fn app_data_dir() -> PathBuf {
    if let Some(custom) = env::var_os(HOME_ENV) {
        return PathBuf::from(custom);
    }
    home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(DEFAULT_DIR_NAME)
}

/// Subscription records file inside `base`.
pub fn subscriptions_file_in(base: &Path) -> PathBuf {
    base.join(SUBSCRIPTIONS_FILE)
}

/// Pending reminder queue inside `base`.
pub fn reminders_file_in(base: &Path) -> PathBuf {
    base.join(REMINDERS_FILE)
}

/// Configuration file inside `base`.
pub fn config_file_in(base: &Path) -> PathBuf {
    base.join(CONFIG_FILE)
}

pub fn ensure_dir(path: &Path) -> io::Result<()> {
    if !path.exists() {
        fs::create_dir_all(path)?;
    }
    Ok(())
}

/// Writes `data` next to `path` and renames it into place.
pub fn write_atomic(path: &Path, data: &str) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        ensure_dir(parent)?;
    }
    let tmp = path.with_extension("tmp");
    fs::write(&tmp, data)?;
    fs::rename(tmp, path)
}

use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::core::{
    errors::{Result, SubtrackError},
    utils::{app_data_dir, config_file_in, ensure_dir, write_atomic},
};
use crate::domain::{ReminderLocale, REMINDER_HOUR, REMINDER_MINUTE};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub locale: String,
    pub currency: String,
    pub notifications_enabled: bool,
    pub reminder_hour: u32,
    pub reminder_minute: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            locale: "ko-KR".into(),
            currency: "KRW".into(),
            notifications_enabled: true,
            reminder_hour: REMINDER_HOUR,
            reminder_minute: REMINDER_MINUTE,
        }
    }
}

impl Config {
    pub fn reminder_locale(&self) -> ReminderLocale {
        ReminderLocale::from_tag(&self.locale)
    }

    fn validate(&self) -> Result<()> {
        if self.reminder_hour > 23 || self.reminder_minute > 59 {
            return Err(SubtrackError::ConfigError(format!(
                "reminder time {:02}:{:02} is not a valid time of day",
                self.reminder_hour, self.reminder_minute
            )));
        }
        Ok(())
    }
}

pub struct ConfigManager {
    path: PathBuf,
}

impl ConfigManager {
    pub fn new() -> Result<Self> {
        Self::with_base_dir(app_data_dir())
    }

    pub fn with_base_dir(base: PathBuf) -> Result<Self> {
        ensure_dir(&base)?;
        Ok(Self {
            path: config_file_in(&base),
        })
    }

    /// Loads the stored configuration, falling back to defaults when absent.
    /// Missing fields take their default values.
    pub fn load(&self) -> Result<Config> {
        if !self.path.exists() {
            return Ok(Config::default());
        }
        let data = fs::read_to_string(&self.path)?;
        let config: Config = serde_json::from_str(&data)
            .map_err(|err| SubtrackError::ConfigError(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn save(&self, config: &Config) -> Result<()> {
        config.validate()?;
        let json = serde_json::to_string_pretty(config)?;
        write_atomic(&self.path, &json)?;
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

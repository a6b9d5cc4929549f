use std::{collections::BTreeMap, fmt};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::subscription::Subscription;

/// Local hour at which payment reminders fire.
pub const REMINDER_HOUR: u32 = 9;
/// Local minute at which payment reminders fire.
pub const REMINDER_MINUTE: u32 = 0;

pub const META_SUBSCRIPTION_ID: &str = "subscription_id";
pub const META_NAME: &str = "name";
pub const META_BILLING_DAY: &str = "billing_day";
pub const META_PRICE: &str = "price";
pub const META_PAYMENT_METHOD: &str = "payment_method";

pub type ReminderMetadata = BTreeMap<String, String>;

/// Monthly fire rule for a payment reminder. Reminders always repeat monthly
/// with no end date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReminderRule {
    pub day_of_month: u32,
    pub hour: u32,
    pub minute: u32,
}

impl ReminderRule {
    /// Rule firing at 09:00 the day before `billing_day`.
    pub fn for_billing_day(billing_day: u32) -> Self {
        Self::at(billing_day, REMINDER_HOUR, REMINDER_MINUTE)
    }

    /// Rule firing at `hour:minute` the day before `billing_day`, floored at day 1.
    pub fn at(billing_day: u32, hour: u32, minute: u32) -> Self {
        Self {
            day_of_month: billing_day.saturating_sub(1).max(1),
            hour,
            minute,
        }
    }

    pub fn label(&self) -> String {
        format!(
            "monthly on day {} at {:02}:{:02}",
            self.day_of_month, self.hour, self.minute
        )
    }
}

/// Handle returned by the notification host for a registered reminder.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReminderHandle(String);

impl ReminderHandle {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn generate() -> Self {
        Self(Uuid::new_v4().simple().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ReminderHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Language used for reminder titles and bodies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReminderLocale {
    #[default]
    Korean,
    English,
}

impl ReminderLocale {
    /// Maps a BCP-47 style tag to a supported locale, falling back to Korean.
    pub fn from_tag(tag: &str) -> Self {
        let lower = tag.trim().to_ascii_lowercase();
        if lower.starts_with("en") {
            ReminderLocale::English
        } else {
            ReminderLocale::Korean
        }
    }

    pub fn title(&self, subscription: &Subscription) -> String {
        match self {
            ReminderLocale::Korean => format!("{} 결제일 알림", subscription.name),
            ReminderLocale::English => format!("{} payment reminder", subscription.name),
        }
    }

    pub fn body(&self, subscription: &Subscription) -> String {
        match self {
            ReminderLocale::Korean => format!(
                "{} 결제가 내일({}일) 예정입니다.",
                subscription.name, subscription.billing_day
            ),
            ReminderLocale::English => format!(
                "{} is due tomorrow (day {}).",
                subscription.name, subscription.billing_day
            ),
        }
    }
}

/// Everything the host needs to register one recurring reminder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReminderRequest {
    pub rule: ReminderRule,
    pub title: String,
    pub body: String,
    #[serde(default)]
    pub metadata: ReminderMetadata,
}

impl ReminderRequest {
    /// Builds the request for `subscription`, embedding enough metadata that the
    /// notification renders without going back to storage.
    pub fn for_subscription(
        subscription: &Subscription,
        rule: ReminderRule,
        locale: ReminderLocale,
    ) -> Self {
        let mut metadata = ReminderMetadata::new();
        if let Some(id) = &subscription.id {
            metadata.insert(META_SUBSCRIPTION_ID.into(), id.to_string());
        }
        metadata.insert(META_NAME.into(), subscription.name.clone());
        metadata.insert(
            META_BILLING_DAY.into(),
            subscription.billing_day.to_string(),
        );
        metadata.insert(META_PRICE.into(), subscription.price.to_string());
        metadata.insert(
            META_PAYMENT_METHOD.into(),
            subscription.payment_method.clone(),
        );
        Self {
            rule,
            title: locale.title(subscription),
            body: locale.body(subscription),
            metadata,
        }
    }
}

/// A reminder as tracked by the notification host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduledReminder {
    pub handle: ReminderHandle,
    pub rule: ReminderRule,
    pub title: String,
    pub body: String,
    #[serde(default)]
    pub metadata: ReminderMetadata,
    pub created_at: DateTime<Utc>,
}

impl ScheduledReminder {
    pub fn from_request(
        handle: ReminderHandle,
        request: ReminderRequest,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            handle,
            rule: request.rule,
            title: request.title,
            body: request.body,
            metadata: request.metadata,
            created_at,
        }
    }

    pub fn subscription_name(&self) -> Option<&str> {
        self.metadata.get(META_NAME).map(String::as_str)
    }

    pub fn subscription_id(&self) -> Option<&str> {
        self.metadata.get(META_SUBSCRIPTION_ID).map(String::as_str)
    }
}

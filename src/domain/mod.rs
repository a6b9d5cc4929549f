//! Subscription and reminder models shared by the core, storage, and CLI layers.

pub mod common;
pub mod reminder;
pub mod subscription;

pub use common::Displayable;
pub use reminder::{
    ReminderHandle, ReminderLocale, ReminderMetadata, ReminderRequest, ReminderRule,
    ScheduledReminder, REMINDER_HOUR, REMINDER_MINUTE,
};
pub use subscription::{
    Subscription, SubscriptionId, SubscriptionIssue, MAX_BILLING_DAY, MIN_BILLING_DAY,
};

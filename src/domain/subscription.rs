use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::common::Displayable;

pub const MIN_BILLING_DAY: u32 = 1;
pub const MAX_BILLING_DAY: u32 = 31;

/// Opaque identifier assigned by the persistence layer.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SubscriptionId(String);

impl SubscriptionId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SubscriptionId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for SubscriptionId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Reasons a subscription record is rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubscriptionIssue {
    #[error("name must not be empty")]
    EmptyName,
    #[error("payment method must not be empty")]
    EmptyPaymentMethod,
    #[error("price must be greater than zero")]
    ZeroPrice,
    #[error("billing day {0} is outside 1..=31")]
    BillingDayOutOfRange(u32),
}

/// A recurring paid service tracked by the user.
///
/// The on-disk field names follow the mobile app's `subscriptions.json`
/// layout, where the billing day is stored as `date`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subscription {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<SubscriptionId>,
    pub name: String,
    pub price: u64,
    #[serde(rename = "date", alias = "billingDay")]
    pub billing_day: u32,
    pub payment_method: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl Subscription {
    pub fn new(
        name: impl Into<String>,
        price: u64,
        billing_day: u32,
        payment_method: impl Into<String>,
    ) -> Self {
        Self {
            id: None,
            name: name.into(),
            price,
            billing_day,
            payment_method: payment_method.into(),
            created_at: None,
        }
    }

    pub fn with_id(mut self, id: impl Into<SubscriptionId>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Checks the fields a reminder needs: a name and a billing day in range.
    pub fn validate_schedulable(&self) -> Result<(), SubscriptionIssue> {
        if self.name.trim().is_empty() {
            return Err(SubscriptionIssue::EmptyName);
        }
        if !(MIN_BILLING_DAY..=MAX_BILLING_DAY).contains(&self.billing_day) {
            return Err(SubscriptionIssue::BillingDayOutOfRange(self.billing_day));
        }
        Ok(())
    }

    /// Full record validation applied before persisting.
    pub fn validate(&self) -> Result<(), SubscriptionIssue> {
        self.validate_schedulable()?;
        if self.price == 0 {
            return Err(SubscriptionIssue::ZeroPrice);
        }
        if self.payment_method.trim().is_empty() {
            return Err(SubscriptionIssue::EmptyPaymentMethod);
        }
        Ok(())
    }

    /// Field-wise equality ignoring identity and timestamps. Records persisted
    /// without an id are deleted by this comparison.
    pub fn same_record(&self, other: &Subscription) -> bool {
        self.name == other.name
            && self.price == other.price
            && self.billing_day == other.billing_day
            && self.payment_method == other.payment_method
    }
}

impl Displayable for Subscription {
    fn display_label(&self) -> String {
        match &self.id {
            Some(id) => format!("{} ({})", self.name, id),
            None => self.name.clone(),
        }
    }
}

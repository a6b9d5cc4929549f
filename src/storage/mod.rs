pub mod json_backend;

use crate::core::errors::Result;
use crate::domain::{Subscription, SubscriptionId};

/// Abstraction over persistence backends holding the user's subscriptions.
pub trait SubscriptionStore: Send + Sync {
    /// All stored subscriptions in insertion order.
    fn list(&self) -> Result<Vec<Subscription>>;

    /// Validates and stores `subscription`, returning the record as persisted
    /// (with its assigned id and creation time).
    fn add(&self, subscription: Subscription) -> Result<Subscription>;

    /// Removes the record with `id`. Returns whether anything was removed.
    fn delete(&self, id: &SubscriptionId) -> Result<bool>;

    /// Removes records field-equal to `target`, for entries persisted without an id.
    fn delete_matching(&self, target: &Subscription) -> Result<usize>;
}

pub use json_backend::JsonSubscriptionStore;

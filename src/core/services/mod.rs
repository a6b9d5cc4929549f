pub mod summary_service;

pub use summary_service::{SortOrder, SpendSummary, SubscriptionOverview, SummaryService};

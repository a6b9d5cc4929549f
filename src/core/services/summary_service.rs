use std::str::FromStr;

use chrono::{Datelike, NaiveDate};

use crate::core::time::{clamp_day, next_payment_date, PaymentDate};
use crate::domain::Subscription;

/// Aggregate spend figures shown on the home screen.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SpendSummary {
    pub monthly_total: u64,
    pub remaining_this_month: u64,
    pub count: usize,
}

/// One row of the subscription overview.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubscriptionOverview<'a> {
    pub subscription: &'a Subscription,
    pub next_payment: PaymentDate,
}

/// Orderings offered by the subscription list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    Name,
    DateAsc,
    DateDesc,
    PriceAsc,
    PriceDesc,
    PaymentMethod,
}

impl SortOrder {
    pub const KEYWORDS: [&'static str; 6] = [
        "name",
        "date-asc",
        "date-desc",
        "price-asc",
        "price-desc",
        "payment-method",
    ];
}

impl FromStr for SortOrder {
    type Err = String;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        match input.trim().to_ascii_lowercase().as_str() {
            "name" | "default" => Ok(SortOrder::Name),
            "date-asc" | "date" => Ok(SortOrder::DateAsc),
            "date-desc" => Ok(SortOrder::DateDesc),
            "price-asc" | "price" => Ok(SortOrder::PriceAsc),
            "price-desc" => Ok(SortOrder::PriceDesc),
            "payment-method" | "method" => Ok(SortOrder::PaymentMethod),
            other => Err(format!(
                "unknown sort `{}` (expected one of: {})",
                other,
                SortOrder::KEYWORDS.join(", ")
            )),
        }
    }
}

pub struct SummaryService;

impl SummaryService {
    /// Totals for `subscriptions` as of `today`. A subscription counts toward
    /// the remaining amount when its clamped billing day in the current month
    /// is still ahead of today.
    pub fn summarize(subscriptions: &[Subscription], today: NaiveDate) -> SpendSummary {
        let mut summary = SpendSummary {
            count: subscriptions.len(),
            ..SpendSummary::default()
        };
        for sub in subscriptions {
            summary.monthly_total = summary.monthly_total.saturating_add(sub.price);
            let due = clamp_day(today.year(), today.month(), sub.billing_day);
            if due > today.day() {
                summary.remaining_this_month =
                    summary.remaining_this_month.saturating_add(sub.price);
            }
        }
        summary
    }

    /// Pairs each subscription with its next payment date in the requested order.
    /// Ties keep their stored order.
    pub fn overview(
        subscriptions: &[Subscription],
        today: NaiveDate,
        order: SortOrder,
    ) -> Vec<SubscriptionOverview<'_>> {
        let mut rows: Vec<_> = subscriptions
            .iter()
            .map(|subscription| SubscriptionOverview {
                subscription,
                next_payment: next_payment_date(today, subscription.billing_day),
            })
            .collect();
        rows.sort_by(|a, b| {
            let (a, b) = (a.subscription, b.subscription);
            match order {
                SortOrder::Name => a.name.cmp(&b.name),
                SortOrder::DateAsc => a.billing_day.cmp(&b.billing_day),
                SortOrder::DateDesc => b.billing_day.cmp(&a.billing_day),
                SortOrder::PriceAsc => a.price.cmp(&b.price),
                SortOrder::PriceDesc => b.price.cmp(&a.price),
                SortOrder::PaymentMethod => a.payment_method.cmp(&b.payment_method),
            }
        });
        rows
    }
}

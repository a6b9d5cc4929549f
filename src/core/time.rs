//! Calendar arithmetic for billing days and reminder fire times.

use std::fmt;

use chrono::{Datelike, Duration, Local, NaiveDate, NaiveDateTime, NaiveTime};

use crate::domain::{ReminderRule, MAX_BILLING_DAY, MIN_BILLING_DAY};

/// Clock abstracts access to the current local time so services remain
/// deterministic in tests.
pub trait Clock: Send + Sync {
    /// Returns the current local wall-clock time.
    fn now(&self) -> NaiveDateTime;

    /// Returns the current local date. Defaults to `now().date()`.
    fn today(&self) -> NaiveDate {
        self.now().date()
    }
}

/// Device clock backed by the local timezone.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

/// Clock frozen at a single instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDateTime);

impl FixedClock {
    /// Clock pinned to midnight of `date`.
    pub fn on(date: NaiveDate) -> Self {
        Self(date.and_time(NaiveTime::MIN))
    }
}

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        self.0
    }
}

/// Month and day of the next payment. The year is deliberately absent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct PaymentDate {
    pub month: u32,
    pub day: u32,
}

impl fmt::Display for PaymentDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}-{:02}", self.month, self.day)
    }
}

/// Next payment `(month, day)` for a subscription billed on `billing_day`.
///
/// When today's day-of-month is already past the billing day the month after
/// next is targeted, otherwise the following month. A target past December
/// wraps to January. The day is clamped to the target month's length in
/// today's year.
///
/// `billing_day` must lie in `1..=31`; other values are a caller error and the
/// result is unspecified.
pub fn next_payment_date(today: NaiveDate, billing_day: u32) -> PaymentDate {
    debug_assert!(
        (MIN_BILLING_DAY..=MAX_BILLING_DAY).contains(&billing_day),
        "billing day {billing_day} outside 1..=31"
    );
    let mut month = if today.day() > billing_day {
        today.month() + 2
    } else {
        today.month() + 1
    };
    if month > 12 {
        month = 1;
    }
    let day = billing_day.min(days_in_month(today.year(), month));
    PaymentDate { month, day }
}

/// Day of `billing_day` inside the given month, clamped to its last day.
pub fn clamp_day(year: i32, month: u32, day: u32) -> u32 {
    day.min(days_in_month(year, month))
}

pub fn days_in_month(year: i32, month: u32) -> u32 {
    let next_month = if month == 12 { 1 } else { month + 1 };
    let next_year = if month == 12 { year + 1 } else { year };
    NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .map(|first_next| (first_next - Duration::days(1)).day())
        .unwrap_or(28)
}

/// First instant strictly after `now` at which `rule` fires, clamping the
/// rule's day to shorter months.
pub fn next_fire_after(rule: &ReminderRule, now: NaiveDateTime) -> Option<NaiveDateTime> {
    let time = NaiveTime::from_hms_opt(rule.hour, rule.minute, 0)?;
    let mut year = now.year();
    let mut month = now.month();
    // Two candidates suffice: this month's occurrence or the next month's.
    for _ in 0..2 {
        let day = clamp_day(year, month, rule.day_of_month);
        let candidate = NaiveDate::from_ymd_opt(year, month, day)?.and_time(time);
        if candidate > now {
            return Some(candidate);
        }
        if month == 12 {
            month = 1;
            year += 1;
        } else {
            month += 1;
        }
    }
    None
}

//! Display formatting for prices and dates in the configured locale.

use chrono::NaiveDateTime;

use crate::core::time::PaymentDate;
use crate::domain::ReminderLocale;

const MONTH_ABBREVIATIONS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Groups `amount` in thousands and attaches the currency.
/// KRW uses the won sign as a suffix; other codes follow the number.
pub fn format_price(amount: u64, currency: &str) -> String {
    let grouped = group_thousands(amount);
    let code = currency.trim().to_ascii_uppercase();
    match code.as_str() {
        "KRW" => format!("{grouped}원"),
        "" => grouped,
        _ => format!("{grouped} {code}"),
    }
}

fn group_thousands(amount: u64) -> String {
    let digits = amount.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (idx, ch) in digits.chars().enumerate() {
        if idx > 0 && (digits.len() - idx) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

pub fn format_payment_date(date: PaymentDate, locale: ReminderLocale) -> String {
    match locale {
        ReminderLocale::Korean => format!("{}월 {}일", date.month, date.day),
        ReminderLocale::English => {
            let month = date
                .month
                .checked_sub(1)
                .and_then(|idx| MONTH_ABBREVIATIONS.get(idx as usize))
                .copied()
                .unwrap_or("???");
            format!("{month} {}", date.day)
        }
    }
}

pub fn format_fire_time(at: NaiveDateTime) -> String {
    at.format("%Y-%m-%d %H:%M").to_string()
}

/// Parses a whole-number price, tolerating `,` and `_` separators.
pub fn parse_price(input: &str) -> Option<u64> {
    let cleaned: String = input
        .trim()
        .trim_end_matches('원')
        .chars()
        .filter(|ch| *ch != ',' && *ch != '_')
        .collect();
    if cleaned.is_empty() {
        return None;
    }
    cleaned.parse().ok()
}

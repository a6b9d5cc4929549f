mod common;

use std::path::Path;

use assert_cmd::Command;
use common::temp_base;
use predicates::prelude::*;
use predicates::str::contains;

fn script(base: &Path) -> Command {
    let mut cmd = Command::cargo_bin("subtrack_cli").unwrap();
    cmd.env("SUBTRACK_CLI_SCRIPT", "1")
        .env("SUBTRACK_HOME", base)
        .env("SUBTRACK_TODAY", "2024-01-20")
        .env("NO_COLOR", "1")
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn script_mode_runs_basic_flow() {
    let base = temp_base();
    script(&base)
        .write_stdin("add Netflix 17000 29 Card\nlist\nsummary\nexit\n")
        .assert()
        .success()
        .stdout(contains("Added `Netflix` (17,000원) billed on day 29. id: 1705708800000"))
        .stdout(contains("Reminders scheduled: 1"))
        .stdout(contains("2월 29일"))
        .stdout(contains("Monthly total       : 17,000원"))
        .stdout(contains("Remaining this month: 17,000원"));

    let json = std::fs::read_to_string(base.join("subscriptions.json")).unwrap();
    assert!(json.contains("\"Netflix\""));
    assert!(json.contains("\"date\": 29"));
}

#[test]
fn reminders_fire_the_day_before_payment() {
    let base = temp_base();
    script(&base)
        .write_stdin("add \"YouTube Premium\" 14,900 29 Card\nreminders\n")
        .assert()
        .success()
        .stdout(contains("2024-01-28 09:00"))
        .stdout(contains("YouTube Premium 결제일 알림"))
        .stdout(contains("YouTube Premium 결제가 내일(29일) 예정입니다."));
}

#[test]
fn delete_rebuilds_reminders_and_reports_unknown_ids() {
    let base = temp_base();
    script(&base)
        .write_stdin(
            "add Netflix 17000 15 Card\nadd Gym 50000 31 Cash\n\
             delete 1705708800000\ndelete 42\nlist\n",
        )
        .assert()
        .success()
        .stdout(contains("Deleted `Netflix`."))
        .stdout(contains("Reminders scheduled: 1"))
        .stdout(contains("No subscription matches `42`."))
        .stdout(contains("1705708800001"));

    let json = std::fs::read_to_string(base.join("reminders.json")).unwrap();
    assert!(json.contains("Gym"));
    assert!(!json.contains("Netflix"));
}

#[test]
fn records_without_id_are_deleted_by_value() {
    let base = temp_base();
    std::fs::write(
        base.join("subscriptions.json"),
        r#"{"subscriptions":[{"name":"Gym","price":50000,"date":5,"paymentMethod":"Cash"}]}"#,
    )
    .unwrap();

    script(&base)
        .write_stdin("delete Gym 50000 5 Card
delete Gym 50000 5 Cash
list
")
        .assert()
        .success()
        .stdout(contains("No subscription matches `Gym`."))
        .stdout(contains("Deleted `Gym`."))
        .stdout(contains("Reminders scheduled: 0"))
        .stdout(contains("No subscriptions yet."));

    let stored = std::fs::read_to_string(base.join("subscriptions.json")).unwrap();
    assert!(!stored.contains("Gym"));
    let reminders = std::fs::read_to_string(base.join("reminders.json")).unwrap();
    assert!(!reminders.contains("Gym"));
}

#[test]
fn invalid_input_is_reported_without_stopping() {
    let base = temp_base();
    script(&base)
        .write_stdin("add Music 10900 40 Card\nadd Music ten 4 Card\nadd Music\nlsit\nlist\n")
        .assert()
        .success()
        .stdout(contains("billing day 40 is outside 1..=31"))
        .stdout(contains("price `ten` is not a whole number"))
        .stdout(contains("usage: add <name> <price> <billing_day> <payment_method>"))
        .stdout(contains("Suggestion: `list`?"))
        .stdout(contains("No subscriptions yet."));
}

#[test]
fn disabled_notifications_leave_the_queue_untouched() {
    let base = temp_base();
    script(&base)
        .write_stdin("add Netflix 17000 15 Card\nnotifications off\nadd Gym 50000 31 Cash\n")
        .assert()
        .success()
        .stdout(contains("Notifications disabled."))
        .stdout(contains("Notifications are off; reminders were left unchanged."));

    let json = std::fs::read_to_string(base.join("reminders.json")).unwrap();
    assert!(json.contains("Netflix"));
    assert!(!json.contains("Gym"));

    script(&base)
        .write_stdin("notifications\nnotifications on\n")
        .assert()
        .success()
        .stdout(contains("Notifications: off"))
        .stdout(contains("Reminders scheduled: 2"));
}

#[test]
fn list_accepts_sort_orders() {
    let base = temp_base();
    script(&base)
        .write_stdin("add Netflix 17000 15 Card\nadd Gym 50000 31 Cash\nlist price-desc\nlist cheapest\n")
        .assert()
        .success()
        .stdout(contains("unknown sort `cheapest`"))
        .stdout(
            predicate::str::is_match(r"(?s)Gym\s+50,000원.*Netflix\s+17,000원").unwrap(),
        );
}

#[test]
fn english_locale_changes_formatting() {
    let base = temp_base();
    std::fs::write(
        base.join("config.json"),
        r#"{ "locale": "en-US", "currency": "USD" }"#,
    )
    .unwrap();
    script(&base)
        .write_stdin("add Gym 50 31 Cash\nlist\nreminders\n")
        .assert()
        .success()
        .stdout(contains("50 USD"))
        .stdout(contains("Feb 29"))
        .stdout(contains("Gym payment reminder"));
}

#[test]
fn bad_today_override_fails_startup() {
    let base = temp_base();
    script(&base)
        .env("SUBTRACK_TODAY", "tomorrow")
        .write_stdin("list\n")
        .assert()
        .failure()
        .stderr(contains("SUBTRACK_TODAY"));
}

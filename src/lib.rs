#![doc(test(attr(deny(warnings))))]

//! Subtrack keeps a personal list of paid subscriptions, reports monthly spend,
//! and keeps a local reminder queued the day before every payment.

pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod notification;
pub mod storage;
pub mod utils;

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::info!("Subtrack tracing initialized.");
    });
}

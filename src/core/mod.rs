//! Reminder scheduling, payment-date arithmetic, and the services built on them.

pub mod errors;
pub mod scheduler;
pub mod services;
pub mod subscription_manager;
pub mod time;
pub mod utils;

pub use errors::{CliError, SubtrackError};
pub use scheduler::{PassOutcome, ReminderScheduler, SchedulerError};
pub use subscription_manager::{ChangeReport, SubscriptionManager};
pub use time::{next_payment_date, Clock, FixedClock, PaymentDate, SystemClock};

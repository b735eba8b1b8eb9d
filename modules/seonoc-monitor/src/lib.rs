pub mod alerts;
pub mod availability;
pub mod context;
pub mod digest;
pub mod expiration;
pub mod probe;
pub mod reminders;
pub mod test_alert;
pub mod worker;

pub use availability::AvailabilityWorker;
pub use digest::DigestWorker;
pub use expiration::ExpirationWorker;
pub use probe::{classify_response, HttpProber, ProbeOutcome};
pub use reminders::{coverage_summary, list_unmonitored, OptimizationReminderWorker,
    UnmonitoredReminderWorker};
pub use worker::sleep_with_cancel;

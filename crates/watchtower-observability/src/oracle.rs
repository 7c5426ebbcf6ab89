use std::time::Duration;

use metrics::{counter, gauge, histogram};

pub fn record_scan(duty: &str, scanned: usize, qualifying: usize, duration: Duration) {
    gauge!("watchtower_scan_entities", "duty" => duty.to_string()).set(scanned as f64);
    gauge!("watchtower_scan_qualifying", "duty" => duty.to_string()).set(qualifying as f64);
    histogram!(
        "watchtower_scan_duration_seconds",
        "duty" => duty.to_string()
    )
    .record(duration.as_secs_f64());
}

/// `outcome` is one of `confirmed`, `declined` or the failing stage name.
pub fn record_transaction_outcome(duty: &str, outcome: &str) {
    counter!(
        "watchtower_transactions_total",
        "duty" => duty.to_string(),
        "outcome" => outcome.to_string()
    )
    .increment(1);
}

pub fn record_cycle_skipped(duty: &str, reason: &str) {
    counter!(
        "watchtower_cycles_skipped_total",
        "duty" => duty.to_string(),
        "reason" => reason.to_string()
    )
    .increment(1);
}

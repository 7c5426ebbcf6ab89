pub(crate) mod dissolve_timed_out_minipools;
pub(crate) mod respond_challenges;

use std::time::Instant;

use watchtower_observability as observability;

use super::OracleTaskDeps;
use crate::oracle::{CycleReport, Duty, OracleTask};

/// Run one cycle of `duty` and record its metrics. Returns the run status.
///
/// Cycles are skipped while the execution client is syncing. The submission
/// lock is held for the whole cycle so duties never interleave transactions.
pub(crate) async fn run_oracle_cycle(deps: &OracleTaskDeps, duty: Duty) -> &'static str {
    let started = Instant::now();

    let status = match deps.services.reader.is_synced().await {
        Ok(true) => {
            let _submission_guard = deps.submission_lock.lock().await;
            let task = OracleTask::new(deps.services.clone(), deps.gas_policy);
            let result = match duty {
                Duty::DissolveTimedOutMinipools => task.run_dissolve_cycle().await,
                Duty::RespondChallenges => task.run_challenge_cycle().await,
            };

            match result {
                Ok(CycleReport::Ineligible) => "ineligible",
                Ok(report) => {
                    observability::record_scan(
                        duty.as_str(),
                        report.scanned(),
                        report.outcomes().len(),
                        report.scan_duration(),
                    );
                    for outcome in report.outcomes() {
                        observability::record_transaction_outcome(duty.as_str(), outcome.label());
                    }
                    "completed"
                }
                Err(e) => {
                    tracing::error!(duty = duty.as_str(), error = %e, "Oracle cycle failed");
                    "error"
                }
            }
        }
        Ok(false) => {
            tracing::info!(
                duty = duty.as_str(),
                "Execution client is still syncing; skipping cycle"
            );
            observability::record_cycle_skipped(duty.as_str(), "syncing");
            "skipped"
        }
        Err(e) => {
            tracing::warn!(duty = duty.as_str(), error = %e, "Failed to check sync status");
            observability::record_cycle_skipped(duty.as_str(), "sync_check_error");
            "error"
        }
    };

    observability::record_task_run(duty.as_str(), status, started.elapsed());
    status
}

use std::time::Duration;

use tokio::time::Instant;
use watchtower_chain::{OracleAction, TxHash};

use super::{
    OracleError, OracleServices, SubmitError, evaluator, gate,
    gas_policy::GasPolicy,
    scanner,
    submitter::{Submission, TransactionSubmitter},
};

/// The oracle duties a trusted node performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Duty {
    DissolveTimedOutMinipools,
    RespondChallenges,
}

impl Duty {
    pub(crate) fn as_str(&self) -> &'static str {
        match self {
            Duty::DissolveTimedOutMinipools => "dissolve_timed_out_minipools",
            Duty::RespondChallenges => "respond_challenges",
        }
    }
}

/// Result of one candidate's pipeline, kept only for logging and metrics.
#[derive(Debug)]
pub(crate) struct TransactionOutcome {
    pub(crate) action: OracleAction,
    pub(crate) result: Result<Submission, SubmitError>,
}

impl TransactionOutcome {
    pub(crate) fn tx_hash(&self) -> Option<TxHash> {
        match &self.result {
            Ok(Submission::Confirmed(tx_hash)) => Some(*tx_hash),
            Ok(Submission::Declined) => None,
            Err(e) => e.tx_hash,
        }
    }

    /// Metric label: `confirmed`, `declined` or `failed:<stage>`.
    pub(crate) fn label(&self) -> &'static str {
        match &self.result {
            Ok(Submission::Confirmed(_)) => "confirmed",
            Ok(Submission::Declined) => "declined",
            Err(e) => e.stage.label(),
        }
    }
}

#[derive(Debug)]
pub(crate) enum CycleReport {
    /// The account is not a trusted member; nothing was read or sent.
    Ineligible,
    Completed {
        scanned: usize,
        /// Time spent reading chain state, excluding submissions.
        scan_duration: Duration,
        outcomes: Vec<TransactionOutcome>,
    },
}

impl CycleReport {
    /// Entities read this cycle.
    pub(crate) fn scanned(&self) -> usize {
        match self {
            CycleReport::Ineligible => 0,
            CycleReport::Completed { scanned, .. } => *scanned,
        }
    }

    pub(crate) fn scan_duration(&self) -> Duration {
        match self {
            CycleReport::Ineligible => Duration::ZERO,
            CycleReport::Completed { scan_duration, .. } => *scan_duration,
        }
    }

    pub(crate) fn outcomes(&self) -> &[TransactionOutcome] {
        match self {
            CycleReport::Ineligible => &[],
            CycleReport::Completed { outcomes, .. } => outcomes,
        }
    }
}

/// Context for one oracle cycle: gate, scan, evaluate, then submit each
/// qualifying action in turn.
pub(crate) struct OracleTask {
    services: OracleServices,
    gas_policy: GasPolicy,
}

impl OracleTask {
    pub(crate) fn new(services: OracleServices, gas_policy: GasPolicy) -> Self {
        Self {
            services,
            gas_policy,
        }
    }

    pub(crate) async fn run_dissolve_cycle(&self) -> Result<CycleReport, OracleError> {
        let account = self.services.signer.account();
        if !gate::is_eligible(self.services.reader.as_ref(), account).await? {
            return Ok(CycleReport::Ineligible);
        }

        tracing::debug!("Checking for timed out minipools");
        let scan_started = Instant::now();
        let scan = scanner::scan_minipools(self.services.reader.as_ref()).await?;
        let scan_duration = scan_started.elapsed();
        let actions: Vec<_> = evaluator::timed_out_minipools(&scan)
            .into_iter()
            .map(|minipool| OracleAction::Dissolve { minipool })
            .collect();

        if !actions.is_empty() {
            tracing::info!(
                count = actions.len(),
                scanned = scan.minipools.len(),
                "Minipools are ready to be dissolved"
            );
        }

        Ok(CycleReport::Completed {
            scanned: scan.minipools.len(),
            scan_duration,
            outcomes: self.process(actions).await,
        })
    }

    pub(crate) async fn run_challenge_cycle(&self) -> Result<CycleReport, OracleError> {
        let account = self.services.signer.account();
        if !gate::is_eligible(self.services.reader.as_ref(), account).await? {
            return Ok(CycleReport::Ineligible);
        }

        tracing::debug!("Checking for an open challenge");
        let scan_started = Instant::now();
        let scan = scanner::scan_challenge(self.services.reader.as_ref(), account).await?;
        let scan_duration = scan_started.elapsed();
        let mut actions = Vec::new();
        if evaluator::challenge_needs_decision(&scan) {
            tracing::info!(node = %scan.node, "Node has an open challenge; responding");
            actions.push(OracleAction::DecideChallenge { node: scan.node });
        }

        Ok(CycleReport::Completed {
            scanned: 1,
            scan_duration,
            outcomes: self.process(actions).await,
        })
    }

    /// Submit actions one at a time; a failed action never stops the rest.
    async fn process(&self, actions: Vec<OracleAction>) -> Vec<TransactionOutcome> {
        let submitter = TransactionSubmitter::new(
            self.services.estimator.as_ref(),
            self.services.sink.as_ref(),
            self.services.approval.as_ref(),
            &self.gas_policy,
        );

        let mut outcomes = Vec::with_capacity(actions.len());
        for action in actions {
            let outcome = TransactionOutcome {
                action,
                result: submitter.submit(action).await,
            };
            match &outcome.result {
                Ok(Submission::Confirmed(tx_hash)) => {
                    tracing::info!(
                        action = action.name(),
                        target = %action.target(),
                        tx_hash = %tx_hash,
                        "Transaction confirmed"
                    );
                }
                Ok(Submission::Declined) => {
                    tracing::info!(
                        action = action.name(),
                        target = %action.target(),
                        "Transaction declined by approval gate"
                    );
                }
                Err(e) => {
                    tracing::warn!(
                        action = action.name(),
                        target = %action.target(),
                        stage = %e.stage,
                        tx_hash = ?outcome.tx_hash(),
                        error = %e.source,
                        "Could not {}",
                        action
                    );
                }
            }
            outcomes.push(outcome);
        }
        outcomes
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use std::{sync::Arc, time::Duration};

    use watchtower_chain::{Address, MinipoolStatus};

    use super::*;
    use crate::oracle::{
        SigningAuthority,
        test_support::{MockChain, RecordingApproval, minipool_address},
    };

    const BLOCK_TIME: u64 = 1_000_000;
    const TIMEOUT: Duration = Duration::from_secs(86_400);

    fn task(chain: &Arc<MockChain>, approval: RecordingApproval) -> OracleTask {
        let services = OracleServices::from_chain(chain.clone(), Arc::new(approval));
        OracleTask::new(services, GasPolicy::new(None, None, None))
    }

    fn dissolve_chain() -> MockChain {
        MockChain::trusted_member()
            .with_block_time(BLOCK_TIME)
            .with_launch_timeout(TIMEOUT)
    }

    fn submitted_targets(chain: &MockChain) -> Vec<Address> {
        chain
            .submissions()
            .iter()
            .map(|(action, _)| action.target())
            .collect()
    }

    #[tokio::test]
    async fn no_qualifying_minipools_means_no_transactions() {
        let chain = Arc::new(
            dissolve_chain()
                .with_minipool(minipool_address(0), MinipoolStatus::Staking, 0)
                .with_minipool(minipool_address(1), MinipoolStatus::Prelaunch, BLOCK_TIME - 10),
        );

        let report = task(&chain, RecordingApproval::approving())
            .run_dissolve_cycle()
            .await
            .unwrap();

        assert!(matches!(report, CycleReport::Completed { scanned: 2, .. }));
        assert!(report.outcomes().is_empty());
        assert!(chain.estimates().is_empty());
        assert!(chain.submissions().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn scan_duration_excludes_confirmation_waits() {
        let confirmation_delay = Duration::from_secs(600);
        let chain = Arc::new(
            dissolve_chain()
                .with_minipool(minipool_address(0), MinipoolStatus::Prelaunch, 0)
                .with_minipool(minipool_address(1), MinipoolStatus::Prelaunch, 0)
                .with_confirmation_delay(confirmation_delay),
        );
        let started = Instant::now();

        let report = task(&chain, RecordingApproval::approving())
            .run_dissolve_cycle()
            .await
            .unwrap();

        assert_eq!(report.outcomes().len(), 2);
        assert!(started.elapsed() >= confirmation_delay * 2);
        assert!(report.scan_duration() < confirmation_delay);
    }

    #[tokio::test]
    async fn each_timed_out_minipool_is_dissolved_once() {
        let timed_out = BLOCK_TIME - TIMEOUT.as_secs();
        let chain = Arc::new(
            dissolve_chain()
                .with_minipool(minipool_address(0), MinipoolStatus::Prelaunch, timed_out)
                .with_minipool(minipool_address(1), MinipoolStatus::Staking, 0)
                .with_minipool(minipool_address(2), MinipoolStatus::Prelaunch, timed_out + 1)
                .with_minipool(minipool_address(3), MinipoolStatus::Prelaunch, 0),
        );

        let report = task(&chain, RecordingApproval::approving())
            .run_dissolve_cycle()
            .await
            .unwrap();

        assert_eq!(
            submitted_targets(&chain),
            vec![minipool_address(0), minipool_address(3)]
        );
        assert!(
            chain
                .submissions()
                .iter()
                .all(|(action, _)| matches!(action, OracleAction::Dissolve { .. }))
        );
        assert!(report.outcomes().iter().all(|o| o.label() == "confirmed"));
    }

    #[tokio::test]
    async fn non_member_triggers_no_scanner_reads() {
        let chain = Arc::new(
            MockChain::non_member()
                .with_minipool(minipool_address(0), MinipoolStatus::Prelaunch, 0)
                .with_challenge(true),
        );

        let dissolve = task(&chain, RecordingApproval::approving())
            .run_dissolve_cycle()
            .await
            .unwrap();
        let challenge = task(&chain, RecordingApproval::approving())
            .run_challenge_cycle()
            .await
            .unwrap();

        assert!(matches!(dissolve, CycleReport::Ineligible));
        assert!(matches!(challenge, CycleReport::Ineligible));
        assert_eq!(chain.reads(), vec!["is_trusted_member", "is_trusted_member"]);
        assert!(chain.submissions().is_empty());
    }

    #[tokio::test]
    async fn gate_read_failure_aborts_the_cycle() {
        let chain = Arc::new(dissolve_chain().with_failing_membership());

        let result = task(&chain, RecordingApproval::approving())
            .run_dissolve_cycle()
            .await;

        assert!(matches!(result, Err(OracleError::Read(_))));
        assert_eq!(chain.reads(), vec!["is_trusted_member"]);
    }

    #[tokio::test]
    async fn one_candidate_failing_does_not_stop_the_next() {
        let chain = Arc::new(
            dissolve_chain()
                .with_minipool(minipool_address(0), MinipoolStatus::Prelaunch, 0)
                .with_minipool(minipool_address(1), MinipoolStatus::Prelaunch, 0)
                .with_failing_estimate(minipool_address(0)),
        );

        let report = task(&chain, RecordingApproval::approving())
            .run_dissolve_cycle()
            .await
            .unwrap();

        let estimated: Vec<_> = chain.estimates().iter().map(|a| a.target()).collect();
        assert_eq!(estimated, vec![minipool_address(0), minipool_address(1)]);
        assert_eq!(submitted_targets(&chain), vec![minipool_address(1)]);

        let labels: Vec<_> = report.outcomes().iter().map(|o| o.label()).collect();
        assert_eq!(labels, vec!["failed:estimate_gas", "confirmed"]);
    }

    #[tokio::test]
    async fn declined_candidate_does_not_block_others() {
        let chain = Arc::new(
            dissolve_chain()
                .with_minipool(minipool_address(0), MinipoolStatus::Prelaunch, 0)
                .with_minipool(minipool_address(1), MinipoolStatus::Prelaunch, 0),
        );
        let approval = RecordingApproval::declining_target(minipool_address(0));

        let report = task(&chain, approval).run_dissolve_cycle().await.unwrap();

        assert_eq!(submitted_targets(&chain), vec![minipool_address(1)]);
        let labels: Vec<_> = report.outcomes().iter().map(|o| o.label()).collect();
        assert_eq!(labels, vec!["declined", "confirmed"]);
    }

    #[tokio::test]
    async fn submissions_run_sequentially() {
        let chain = Arc::new(
            dissolve_chain()
                .with_minipool(minipool_address(0), MinipoolStatus::Prelaunch, 0)
                .with_minipool(minipool_address(1), MinipoolStatus::Prelaunch, 0)
                .with_minipool(minipool_address(2), MinipoolStatus::Prelaunch, 0),
        );

        task(&chain, RecordingApproval::approving())
            .run_dissolve_cycle()
            .await
            .unwrap();

        let pipeline: Vec<_> = chain
            .pipeline_log()
            .into_iter()
            .filter(|entry| !entry.starts_with("suggest"))
            .collect();
        let expected: Vec<String> = (0..3)
            .flat_map(|index| {
                let target = minipool_address(index);
                [
                    format!("estimate {}", target),
                    format!("submit {}", target),
                    format!("confirm {}", target),
                ]
            })
            .collect();
        assert_eq!(pipeline, expected);
    }

    #[tokio::test]
    async fn scan_failure_is_surfaced() {
        let chain = Arc::new(
            dissolve_chain()
                .with_minipool(minipool_address(0), MinipoolStatus::Prelaunch, 0)
                .with_failing_status(minipool_address(0)),
        );

        let result = task(&chain, RecordingApproval::approving())
            .run_dissolve_cycle()
            .await;

        assert!(matches!(result, Err(OracleError::Read(_))));
        assert!(chain.estimates().is_empty());
    }

    #[tokio::test]
    async fn open_challenge_is_decided_once() {
        let chain = Arc::new(MockChain::trusted_member().with_challenge(true));

        let report = task(&chain, RecordingApproval::approving())
            .run_challenge_cycle()
            .await
            .unwrap();

        let submissions = chain.submissions();
        assert_eq!(submissions.len(), 1);
        assert_eq!(
            submissions[0].0,
            OracleAction::DecideChallenge {
                node: chain.account()
            }
        );
        assert_eq!(report.outcomes().len(), 1);
        assert!(report.outcomes()[0].tx_hash().is_some());
    }

    #[tokio::test]
    async fn no_challenge_means_no_submitter_calls() {
        let chain = Arc::new(MockChain::trusted_member().with_challenge(false));

        let report = task(&chain, RecordingApproval::approving())
            .run_challenge_cycle()
            .await
            .unwrap();

        assert!(report.outcomes().is_empty());
        assert!(chain.pipeline_log().is_empty());
        assert_eq!(chain.reads(), vec!["is_trusted_member", "is_challenged"]);
    }
}

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;

use super::run_oracle_cycle;
use crate::{
    oracle::Duty,
    periodic_tasks::{OracleTaskDeps, runner::run_with_shutdown},
};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct RespondChallengesConfig {
    pub enabled: bool,
    pub interval_secs: u64,
}

/// Decides open challenges raised against this node's trusted membership.
pub(crate) struct RespondChallengesTask {
    deps: OracleTaskDeps,
    config: RespondChallengesConfig,
}

impl RespondChallengesTask {
    pub(crate) fn new(deps: OracleTaskDeps, config: RespondChallengesConfig) -> Self {
        Self { deps, config }
    }

    pub(crate) async fn run(self, shutdown: CancellationToken) {
        run_with_shutdown("respond_challenges", shutdown, || self.execute()).await;
    }

    #[tracing::instrument(name = "periodic_tasks.respond_challenges", skip(self))]
    async fn execute(&self) -> Duration {
        run_oracle_cycle(&self.deps, Duty::RespondChallenges).await;
        Duration::from_secs(self.config.interval_secs)
    }
}

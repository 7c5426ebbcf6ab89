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
pub(crate) struct DissolveTimedOutMinipoolsConfig {
    pub enabled: bool,
    pub interval_secs: u64,
}

/// Dissolves minipools that stayed in prelaunch past the launch timeout.
pub(crate) struct DissolveTimedOutMinipoolsTask {
    deps: OracleTaskDeps,
    config: DissolveTimedOutMinipoolsConfig,
}

impl DissolveTimedOutMinipoolsTask {
    pub(crate) fn new(deps: OracleTaskDeps, config: DissolveTimedOutMinipoolsConfig) -> Self {
        Self { deps, config }
    }

    pub(crate) async fn run(self, shutdown: CancellationToken) {
        run_with_shutdown("dissolve_timed_out_minipools", shutdown, || self.execute()).await;
    }

    #[tracing::instrument(name = "periodic_tasks.dissolve_timed_out_minipools", skip(self))]
    async fn execute(&self) -> Duration {
        run_oracle_cycle(&self.deps, Duty::DissolveTimedOutMinipools).await;
        Duration::from_secs(self.config.interval_secs)
    }
}

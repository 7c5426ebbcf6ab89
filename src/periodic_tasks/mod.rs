mod deps;
mod runner;
pub(crate) mod tasks;

pub(crate) use deps::OracleTaskDeps;
use serde::{Deserialize, Serialize};
use tasks::{
    dissolve_timed_out_minipools::{
        DissolveTimedOutMinipoolsConfig, DissolveTimedOutMinipoolsTask,
    },
    respond_challenges::{RespondChallengesConfig, RespondChallengesTask},
};
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct PeriodicTasksConfig {
    pub dissolve_timed_out_minipools: DissolveTimedOutMinipoolsConfig,
    pub respond_challenges: RespondChallengesConfig,
}

/// Spawn the enabled oracle duties and wait for them to finish.
///
/// Tasks only exit on shutdown; panics are logged as soon as they happen.
pub(crate) async fn run_all(
    deps: OracleTaskDeps,
    config: PeriodicTasksConfig,
    shutdown: CancellationToken,
) {
    let mut set = JoinSet::new();

    if config.dissolve_timed_out_minipools.enabled {
        let task =
            DissolveTimedOutMinipoolsTask::new(deps.clone(), config.dissolve_timed_out_minipools);
        set.spawn(task.run(shutdown.clone()));
    } else {
        tracing::info!("Dissolving timed out minipools is disabled");
    }

    if config.respond_challenges.enabled {
        let task = RespondChallengesTask::new(deps, config.respond_challenges);
        set.spawn(task.run(shutdown.clone()));
    } else {
        tracing::info!("Responding to challenges is disabled");
    }

    while let Some(result) = set.join_next().await {
        match result {
            Ok(()) => {}
            Err(e) if e.is_panic() => {
                tracing::error!("Periodic task panicked: {:?}", e);
            }
            Err(e) => {
                tracing::error!("Periodic task failed: {:?}", e);
            }
        }
    }
}

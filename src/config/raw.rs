use serde::{Deserialize, Serialize};
use watchtower_chain::{ChainConfig, ChainConfigRaw};

use crate::{
    config::ConfigError,
    logger::{LoggerConfig, TelemetryConfig},
    oracle::{ApprovalConfig, GasPolicyConfig},
    periodic_tasks::PeriodicTasksConfig,
};

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(deny_unknown_fields)]
pub(crate) struct ConfigRaw {
    pub environment: String,
    pub logger: LoggerConfig,
    pub telemetry: TelemetryConfig,
    pub chain: ChainConfigRaw,
    #[serde(default)]
    pub gas_policy: GasPolicyConfig,
    #[serde(default)]
    pub approval: ApprovalConfig,
    pub tasks: PeriodicTasksConfig,
}

#[derive(Debug, Clone)]
pub(crate) struct Config {
    pub environment: String,
    pub logger: LoggerConfig,
    pub telemetry: TelemetryConfig,
    pub chain: ChainConfig,
    pub gas_policy: GasPolicyConfig,
    pub approval: ApprovalConfig,
    pub tasks: PeriodicTasksConfig,
}

impl ConfigRaw {
    pub(crate) fn resolve(self) -> Result<Config, ConfigError> {
        Ok(Config {
            environment: self.environment,
            logger: self.logger,
            telemetry: self.telemetry,
            chain: self.chain.resolve()?,
            gas_policy: self.gas_policy,
            approval: self.approval,
            tasks: self.tasks,
        })
    }
}

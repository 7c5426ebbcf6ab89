//! Typed default configurations for each environment.
//!
//! Each environment (development, testnet, mainnet) gets a fully constructed
//! [`ConfigRaw`] via [`config_for`]. The node private key is never defaulted.

use watchtower_chain::{ChainConfigRaw, GasConfig};

use super::{ConfigError, ConfigRaw};
use crate::{
    logger::{LogFormat, LoggerConfig, TelemetryConfig, TelemetryMetricsConfig},
    oracle::{ApprovalConfig, GasPolicyConfig},
    periodic_tasks::{
        PeriodicTasksConfig,
        tasks::{
            dissolve_timed_out_minipools::DissolveTimedOutMinipoolsConfig,
            respond_challenges::RespondChallengesConfig,
        },
    },
};

/// Returns the default [`ConfigRaw`] for the given environment name.
pub(crate) fn config_for(environment: &str) -> Result<ConfigRaw, ConfigError> {
    match environment {
        "development" => Ok(development()),
        "testnet" => Ok(testnet()),
        "mainnet" => Ok(mainnet()),
        _ => Err(ConfigError::UnknownEnvironment(environment.to_string())),
    }
}

// ── Shared defaults ─────────────────────────────────────────────

fn tasks() -> PeriodicTasksConfig {
    PeriodicTasksConfig {
        dissolve_timed_out_minipools: DissolveTimedOutMinipoolsConfig {
            enabled: true,
            interval_secs: 300,
        },
        respond_challenges: RespondChallengesConfig {
            enabled: true,
            interval_secs: 300,
        },
    }
}

fn telemetry(metrics_enabled: bool) -> TelemetryConfig {
    TelemetryConfig {
        metrics: TelemetryMetricsConfig {
            enabled: metrics_enabled,
            bind_address: "127.0.0.1:9102".to_string(),
        },
    }
}

fn chain(storage_address: &str, rpc_endpoints: &[&str], tx_confirmations: u64) -> ChainConfigRaw {
    ChainConfigRaw {
        rpc_endpoints: rpc_endpoints.iter().map(|e| e.to_string()).collect(),
        node_private_key: None,
        node_address: None,
        storage_address: storage_address.to_string(),
        max_rpc_requests_per_second: None,
        tx_confirmations,
        tx_receipt_timeout_ms: 600_000,
        gas: GasConfig::default(),
    }
}

// ── Per-environment constructors ────────────────────────────────

fn development() -> ConfigRaw {
    ConfigRaw {
        environment: "development".to_string(),
        logger: LoggerConfig {
            level: "oracle_watchtower=debug,watchtower_chain=debug".to_string(),
            format: LogFormat::Pretty,
        },
        telemetry: telemetry(true),
        chain: chain(
            "0x5FbDB2315678afecb367f032d93F642f64180aa3",
            &["http://localhost:8545"],
            1,
        ),
        gas_policy: GasPolicyConfig::default(),
        approval: ApprovalConfig::default(),
        tasks: tasks(),
    }
}

fn testnet() -> ConfigRaw {
    ConfigRaw {
        environment: "testnet".to_string(),
        logger: LoggerConfig {
            level: "oracle_watchtower=info,watchtower_chain=info".to_string(),
            format: LogFormat::Pretty,
        },
        telemetry: telemetry(false),
        chain: chain(
            "0x594Fb75D3dc2DFa0150Ad03F99F97817747dd4E1",
            &["http://localhost:8545"],
            1,
        ),
        gas_policy: GasPolicyConfig::default(),
        approval: ApprovalConfig::default(),
        tasks: tasks(),
    }
}

fn mainnet() -> ConfigRaw {
    ConfigRaw {
        environment: "mainnet".to_string(),
        logger: LoggerConfig {
            level: "oracle_watchtower=info,watchtower_chain=info".to_string(),
            format: LogFormat::Json,
        },
        telemetry: telemetry(false),
        chain: chain(
            "0x1d8f8f00cfa6758d7bE78336684788Fb0ee0Fa46",
            &["http://localhost:8545"],
            2,
        ),
        gas_policy: GasPolicyConfig::default(),
        approval: ApprovalConfig::default(),
        tasks: tasks(),
    }
}

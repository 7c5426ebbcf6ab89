mod config;
mod logger;
mod oracle;
mod periodic_tasks;

use std::{process::ExitCode, sync::Arc, sync::Once};

use dotenvy::dotenv;
use tokio::{select, signal::unix::SignalKind, task::JoinHandle};
use tokio_util::sync::CancellationToken;
use watchtower_chain::EvmChain;

use crate::{
    oracle::{GasPolicy, HeadlessApprovalGate, OracleServices},
    periodic_tasks::OracleTaskDeps,
};

static CRYPTO_PROVIDER: Once = Once::new();

/// Install the rustls crypto provider exactly once, before any TLS connection.
fn install_crypto_provider() {
    CRYPTO_PROVIDER.call_once(|| {
        if rustls::crypto::ring::default_provider()
            .install_default()
            .is_err()
        {
            tracing::debug!("A rustls crypto provider was already installed");
        }
    });
}

#[tokio::main]
async fn main() -> ExitCode {
    install_crypto_provider();
    dotenv().ok();

    let config = match config::load_configuration() {
        Ok(config) => config,
        Err(error) => {
            eprintln!("Failed to load configuration: {}", error);
            return ExitCode::FAILURE;
        }
    };

    logger::initialize(&config.logger, &config.telemetry);
    tracing::info!(environment = %config.environment, "Starting oracle watchtower");

    // Malformed fee settings are fatal before any cycle runs
    let gas_policy = match GasPolicy::from_config(&config.gas_policy) {
        Ok(policy) => policy,
        Err(error) => {
            tracing::error!(error = %error, "Invalid gas policy");
            return ExitCode::FAILURE;
        }
    };
    let approval = match HeadlessApprovalGate::from_config(&config.approval) {
        Ok(gate) => gate,
        Err(error) => {
            tracing::error!(error = %error, "Invalid approval settings");
            return ExitCode::FAILURE;
        }
    };

    let chain = match EvmChain::new(config.chain.clone()).await {
        Ok(chain) => Arc::new(chain),
        Err(error) => {
            tracing::error!(error = %error, "Failed to connect to the execution client");
            return ExitCode::FAILURE;
        }
    };

    let services = OracleServices::from_chain(chain, Arc::new(approval));
    let deps = OracleTaskDeps::new(services, gas_policy);

    // Signal handlers must exist before any task is spawned
    let mut sigterm = match tokio::signal::unix::signal(SignalKind::terminate()) {
        Ok(signal) => signal,
        Err(error) => {
            tracing::error!(error = %error, "Failed to install SIGTERM handler");
            return ExitCode::FAILURE;
        }
    };
    let shutdown_signal = async move {
        select! {
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("Received SIGINT, shutting down");
            }
            _ = sigterm.recv() => {
                tracing::info!("Received SIGTERM, shutting down");
            }
        }
    };

    let shutdown = CancellationToken::new();
    let tasks_handle = tokio::spawn(periodic_tasks::run_all(
        deps,
        config.tasks.clone(),
        shutdown.clone(),
    ));

    let exit_code = stop_on_signal(shutdown_signal, shutdown, tasks_handle).await;
    if exit_code == ExitCode::SUCCESS {
        tracing::info!("Oracle watchtower stopped");
    }
    exit_code
}

/// Cancel the periodic tasks once `signal` resolves and wait for them to exit.
///
/// Cycles in progress finish before their task exits.
async fn stop_on_signal(
    signal: impl Future<Output = ()>,
    shutdown: CancellationToken,
    tasks: JoinHandle<()>,
) -> ExitCode {
    signal.await;
    shutdown.cancel();

    match tasks.await {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            tracing::error!(error = %error, "Periodic tasks did not shut down cleanly");
            ExitCode::FAILURE
        }
    }
}

mod contracts;
mod gas;
mod provider;
mod rpc;
mod transactions;
mod wallets;

use alloy::primitives::Address;
pub use gas::{FeeSource, FeeSuggestion, GasConfig};

use crate::{
    ChainConfig, RpcRateLimiter,
    error::BlockchainError,
    evm::{
        contracts::{Contracts, initialize_contracts},
        provider::{BlockchainProvider, initialize_provider},
    },
};

/// Multiplier applied to gas estimates to obtain a safe gas limit.
const GAS_ESTIMATE_MULTIPLIER: f64 = 1.5;

/// Connection to the execution chain, bound to the trusted node's signing account.
///
/// Every read, estimate and send passes through the RPC rate limiter. Reads
/// are not retried here; a failed read fails the caller's cycle.
pub struct EvmChain {
    config: ChainConfig,
    provider: BlockchainProvider,
    contracts: Contracts,
    rpc_rate_limiter: RpcRateLimiter,
}

impl EvmChain {
    pub async fn new(config: ChainConfig) -> Result<Self, BlockchainError> {
        let provider = initialize_provider(&config)
            .await
            .map_err(|e| BlockchainError::ProviderInit {
                reason: e.to_string(),
            })?;

        let contracts = initialize_contracts(config.storage_address(), &provider)
            .await
            .map_err(|e| BlockchainError::ContractInit {
                reason: e.to_string(),
            })?;

        let rpc_rate_limiter = RpcRateLimiter::new(config.max_rpc_requests_per_second());
        if rpc_rate_limiter.is_limited() {
            tracing::info!(
                requests_per_second = ?config.max_rpc_requests_per_second(),
                "RPC rate limiting enabled"
            );
        }

        tracing::info!(
            node_address = %config.node_address(),
            storage_address = %config.storage_address(),
            default_gas_price_wei = config.gas().default_gas_price_wei,
            max_gas_price_wei = config.gas().max_gas_price_wei,
            "Initialized execution chain connection"
        );

        Ok(Self {
            config,
            provider,
            contracts,
            rpc_rate_limiter,
        })
    }

    pub fn config(&self) -> &ChainConfig {
        &self.config
    }

    /// Address of the account transactions are signed with.
    pub fn node_address(&self) -> Address {
        self.config.node_address()
    }

    pub(crate) fn provider(&self) -> BlockchainProvider {
        self.provider.clone()
    }

    pub(crate) fn contracts(&self) -> &Contracts {
        &self.contracts
    }

    /// Execute an RPC call with rate limiting.
    ///
    /// # Example
    /// ```ignore
    /// let result = self.rpc_call(|| async { contract.method().call().await }).await?;
    /// ```
    pub(crate) async fn rpc_call<T, E, F, O>(&self, operation: F) -> Result<T, E>
    where
        F: FnOnce() -> O,
        O: std::future::IntoFuture<Output = Result<T, E>>,
    {
        self.rpc_rate_limiter.acquire().await;
        operation().into_future().await
    }
}

pub(crate) fn apply_gas_estimate_multiplier(estimate: u64) -> u64 {
    if estimate == 0 {
        return 0;
    }

    let scaled = (estimate as f64 * GAS_ESTIMATE_MULTIPLIER).ceil();
    if !scaled.is_finite() || scaled <= 0.0 {
        return estimate;
    }

    let scaled = scaled.min(u64::MAX as f64) as u64;
    scaled.max(estimate)
}

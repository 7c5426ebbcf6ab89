//! Headless max-fee suggestion for oracle transactions.
//!
//! The client's EIP-1559 estimate is preferred, then `eth_gasPrice`, then the
//! configured default. Whatever the source, the result is clamped to
//! `[default_gas_price_wei, max_gas_price_wei]`.

use alloy::{primitives::U256, providers::Provider};
use serde::{Deserialize, Serialize};

use super::EvmChain;
use crate::RpcRateLimiter;

/// Bounds applied to every suggested max fee.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GasConfig {
    /// Fee used when the client cannot suggest one; also the lower bound.
    pub default_gas_price_wei: u64,
    /// Upper bound on any suggested max fee.
    pub max_gas_price_wei: u64,
}

impl Default for GasConfig {
    fn default() -> Self {
        Self {
            default_gas_price_wei: 1_000_000_000,
            max_gas_price_wei: 500_000_000_000,
        }
    }
}

impl GasConfig {
    fn suggestion(&self, fee: U256, source: FeeSource) -> FeeSuggestion {
        let floor = U256::from(self.default_gas_price_wei);
        let cap = U256::from(self.max_gas_price_wei);
        FeeSuggestion {
            max_fee_per_gas: fee.max(floor).min(cap),
            source,
        }
    }

    fn fallback(&self) -> FeeSuggestion {
        self.suggestion(U256::from(self.default_gas_price_wei), FeeSource::Default)
    }
}

/// Where a suggested fee came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FeeSource {
    Eip1559,
    GasPrice,
    Default,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FeeSuggestion {
    pub max_fee_per_gas: U256,
    pub source: FeeSource,
}

impl EvmChain {
    /// Suggest a max fee per gas without operator interaction. Never fails.
    pub async fn suggest_max_fee(&self) -> FeeSuggestion {
        suggest_max_fee_from(
            self.provider.as_ref(),
            &self.rpc_rate_limiter,
            self.config().gas(),
        )
        .await
    }
}

/// Fee suggestion against `provider`; every request waits on `limiter` first.
pub(crate) async fn suggest_max_fee_from<P: Provider>(
    provider: &P,
    limiter: &RpcRateLimiter,
    gas: &GasConfig,
) -> FeeSuggestion {
    limiter.acquire().await;
    match provider.estimate_eip1559_fees().await {
        Ok(estimate) => {
            return gas.suggestion(U256::from(estimate.max_fee_per_gas), FeeSource::Eip1559);
        }
        Err(e) => {
            tracing::debug!(error = %e, "EIP-1559 fee estimation failed; trying eth_gasPrice");
        }
    }

    limiter.acquire().await;
    match provider.get_gas_price().await {
        Ok(price) => gas.suggestion(U256::from(price), FeeSource::GasPrice),
        Err(e) => {
            tracing::warn!(error = %e, "eth_gasPrice failed; using the default gas price");
            gas.fallback()
        }
    }
}

//! Seams between the oracle core and the execution chain.
//!
//! Production wiring implements every trait on [`watchtower_chain::EvmChain`];
//! tests substitute in-memory implementations.

use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
use watchtower_chain::{
    Address, BlockchainError, GasInfo, LatestBlock, MinipoolStatusDetails, OracleAction, TxFees,
    TxHash, U256,
};

use super::approval::CostQuote;

#[async_trait]
pub(crate) trait ChainReader: Send + Sync {
    /// Whether the execution client has caught up with the chain head.
    async fn is_synced(&self) -> Result<bool, BlockchainError>;

    async fn minipool_addresses(&self) -> Result<Vec<Address>, BlockchainError>;

    async fn launch_timeout(&self) -> Result<Duration, BlockchainError>;

    async fn latest_block(&self) -> Result<LatestBlock, BlockchainError>;

    async fn minipool_status_details(
        &self,
        minipool: Address,
    ) -> Result<MinipoolStatusDetails, BlockchainError>;

    async fn is_challenged(&self, node: Address) -> Result<bool, BlockchainError>;

    async fn is_trusted_member(&self, node: Address) -> Result<bool, BlockchainError>;
}

pub(crate) trait SigningAuthority: Send + Sync {
    /// Account every oracle transaction is signed and sent from.
    fn account(&self) -> Address;
}

#[async_trait]
pub(crate) trait GasEstimator: Send + Sync {
    async fn estimate_gas(&self, action: &OracleAction) -> Result<GasInfo, BlockchainError>;

    /// Current max fee per gas when the policy does not pin one.
    async fn suggest_max_fee_per_gas(&self) -> Result<U256, BlockchainError>;
}

#[async_trait]
pub(crate) trait TransactionSink: Send + Sync {
    async fn submit(
        &self,
        action: &OracleAction,
        fees: &TxFees,
    ) -> Result<TxHash, BlockchainError>;

    async fn wait_for_confirmation(&self, tx_hash: TxHash) -> Result<(), BlockchainError>;
}

pub(crate) trait ApprovalGate: Send + Sync {
    fn approve(&self, quote: &CostQuote) -> bool;
}

/// Handles shared by every cycle of every duty.
#[derive(Clone)]
pub(crate) struct OracleServices {
    pub(crate) reader: Arc<dyn ChainReader>,
    pub(crate) signer: Arc<dyn SigningAuthority>,
    pub(crate) estimator: Arc<dyn GasEstimator>,
    pub(crate) sink: Arc<dyn TransactionSink>,
    pub(crate) approval: Arc<dyn ApprovalGate>,
}

impl OracleServices {
    /// Bind every chain-facing seam to one implementation.
    pub(crate) fn from_chain<C>(chain: Arc<C>, approval: Arc<dyn ApprovalGate>) -> Self
    where
        C: ChainReader + SigningAuthority + GasEstimator + TransactionSink + 'static,
    {
        Self {
            reader: chain.clone(),
            signer: chain.clone(),
            estimator: chain.clone(),
            sink: chain,
            approval,
        }
    }
}

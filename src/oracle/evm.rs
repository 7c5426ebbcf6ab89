use std::time::Duration;

use async_trait::async_trait;
use watchtower_chain::{
    Address, BlockchainError, EvmChain, GasInfo, LatestBlock, MinipoolStatusDetails,
    OracleAction, TxFees, TxHash, U256, format_wei_as_gwei,
};

use super::{ChainReader, GasEstimator, SigningAuthority, TransactionSink};

#[async_trait]
impl ChainReader for EvmChain {
    async fn is_synced(&self) -> Result<bool, BlockchainError> {
        EvmChain::is_synced(self).await
    }

    async fn minipool_addresses(&self) -> Result<Vec<Address>, BlockchainError> {
        self.get_minipool_addresses().await
    }

    async fn launch_timeout(&self) -> Result<Duration, BlockchainError> {
        self.get_minipool_launch_timeout().await
    }

    async fn latest_block(&self) -> Result<LatestBlock, BlockchainError> {
        self.get_latest_block().await
    }

    async fn minipool_status_details(
        &self,
        minipool: Address,
    ) -> Result<MinipoolStatusDetails, BlockchainError> {
        self.get_minipool_status_details(minipool).await
    }

    async fn is_challenged(&self, node: Address) -> Result<bool, BlockchainError> {
        self.get_member_is_challenged(node).await
    }

    async fn is_trusted_member(&self, node: Address) -> Result<bool, BlockchainError> {
        self.get_member_exists(node).await
    }
}

impl SigningAuthority for EvmChain {
    fn account(&self) -> Address {
        self.node_address()
    }
}

#[async_trait]
impl GasEstimator for EvmChain {
    async fn estimate_gas(&self, action: &OracleAction) -> Result<GasInfo, BlockchainError> {
        self.estimate_action_gas(action).await
    }

    async fn suggest_max_fee_per_gas(&self) -> Result<U256, BlockchainError> {
        let suggestion = self.suggest_max_fee().await;
        tracing::debug!(
            max_fee_gwei = %format_wei_as_gwei(suggestion.max_fee_per_gas),
            source = ?suggestion.source,
            "Resolved max fee from the execution client"
        );
        Ok(suggestion.max_fee_per_gas)
    }
}

#[async_trait]
impl TransactionSink for EvmChain {
    async fn submit(
        &self,
        action: &OracleAction,
        fees: &TxFees,
    ) -> Result<TxHash, BlockchainError> {
        self.send_action(action, fees).await
    }

    async fn wait_for_confirmation(&self, tx_hash: TxHash) -> Result<(), BlockchainError> {
        self.wait_for_transaction(tx_hash).await
    }
}

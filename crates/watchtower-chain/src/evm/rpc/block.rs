use alloy::{eips::BlockNumberOrTag, providers::Provider, rpc::types::SyncStatus};

use crate::{LatestBlock, error::BlockchainError, evm::EvmChain};

impl EvmChain {
    /// Header of the latest block; its timestamp is the oracle's reference clock.
    pub async fn get_latest_block(&self) -> Result<LatestBlock, BlockchainError> {
        let block = self
            .rpc_call(|| async {
                let provider = self.provider();
                provider.get_block_by_number(BlockNumberOrTag::Latest).await
            })
            .await
            .map_err(|e| BlockchainError::rpc("eth_getBlockByNumber", e))?
            .ok_or(BlockchainError::LatestBlockUnavailable)?;

        Ok(LatestBlock {
            number: block.header.number,
            timestamp: block.header.timestamp,
        })
    }

    /// Whether the execution client reports that it has finished syncing.
    pub async fn is_synced(&self) -> Result<bool, BlockchainError> {
        let status = self
            .rpc_call(|| async {
                let provider = self.provider();
                provider.syncing().await
            })
            .await
            .map_err(|e| BlockchainError::rpc("eth_syncing", e))?;

        Ok(matches!(status, SyncStatus::None))
    }
}

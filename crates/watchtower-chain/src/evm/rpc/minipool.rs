use std::time::Duration;

use alloy::primitives::{Address, U256};
use futures::future::try_join_all;

use crate::{MinipoolStatus, MinipoolStatusDetails, error::BlockchainError, evm::EvmChain};

/// Number of `getMinipoolAt` reads issued concurrently.
const MINIPOOL_ADDRESS_BATCH_SIZE: u64 = 50;

fn to_u64(value: U256, what: &'static str) -> Result<u64, BlockchainError> {
    u64::try_from(value).map_err(|_| BlockchainError::ValueOutOfRange {
        what,
        value: value.to_string(),
    })
}

impl EvmChain {
    /// All minipool addresses registered with the minipool manager, in index order.
    pub async fn get_minipool_addresses(&self) -> Result<Vec<Address>, BlockchainError> {
        let count = self
            .rpc_call(|| async {
                self.contracts()
                    .minipool_manager()
                    .getMinipoolCount()
                    .call()
                    .await
            })
            .await?;
        let count = to_u64(count, "minipool count")?;

        let mut addresses = Vec::with_capacity(count as usize);
        let mut start = 0u64;
        while start < count {
            let end = (start + MINIPOOL_ADDRESS_BATCH_SIZE).min(count);
            let batch = try_join_all((start..end).map(|index| self.get_minipool_at(index))).await?;
            addresses.extend(batch);
            start = end;
        }

        Ok(addresses)
    }

    async fn get_minipool_at(&self, index: u64) -> Result<Address, BlockchainError> {
        let address = self
            .rpc_call(|| async {
                self.contracts()
                    .minipool_manager()
                    .getMinipoolAt(U256::from(index))
                    .call()
                    .await
            })
            .await?;

        Ok(address)
    }

    /// Time a minipool may stay in prelaunch before it can be dissolved.
    pub async fn get_minipool_launch_timeout(&self) -> Result<Duration, BlockchainError> {
        let timeout = self
            .rpc_call(|| async {
                self.contracts()
                    .minipool_settings()
                    .getLaunchTimeout()
                    .call()
                    .await
            })
            .await?;

        Ok(Duration::from_secs(to_u64(timeout, "launch timeout")?))
    }

    /// Current status of a minipool and when it entered that status.
    pub async fn get_minipool_status_details(
        &self,
        minipool: Address,
    ) -> Result<MinipoolStatusDetails, BlockchainError> {
        let contract = self.contracts().minipool(minipool);

        let (status, status_time) = futures::try_join!(
            self.rpc_call(|| async { contract.getStatus().call().await }),
            self.rpc_call(|| async { contract.getStatusTime().call().await }),
        )?;

        let status = MinipoolStatus::try_from(status).map_err(|status| {
            BlockchainError::UnknownMinipoolStatus {
                minipool: minipool.to_string(),
                status,
            }
        })?;

        Ok(MinipoolStatusDetails {
            status,
            status_time: to_u64(status_time, "status time")?,
        })
    }
}

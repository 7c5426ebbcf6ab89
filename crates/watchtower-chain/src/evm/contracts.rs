use alloy::{
    primitives::{Address, B256},
    sol,
};

use super::provider::BlockchainProvider;
use crate::{error::BlockchainError, utils::keccak256_encode_packed};

sol! {
    /// Central registry every protocol contract address is stored in.
    #[sol(rpc)]
    contract RocketStorage {
        function getAddress(bytes32 key) external view returns (address);
    }
}

sol! {
    #[sol(rpc)]
    contract RocketMinipoolManager {
        function getMinipoolCount() external view returns (uint256);
        function getMinipoolAt(uint256 index) external view returns (address);
    }
}

sol! {
    #[sol(rpc)]
    contract RocketDAOProtocolSettingsMinipool {
        function getLaunchTimeout() external view returns (uint256);
    }
}

sol! {
    #[sol(rpc)]
    contract RocketDAONodeTrusted {
        function getMemberExists(address nodeAddress) external view returns (bool);
        function getMemberIsChallenged(address nodeAddress) external view returns (bool);
    }
}

sol! {
    #[sol(rpc)]
    contract RocketDAONodeTrustedActions {
        function actionChallengeDecide(address nodeAddress) external;
    }
}

sol! {
    #[sol(rpc)]
    contract RocketMinipool {
        function getStatus() external view returns (uint8);
        function getStatusTime() external view returns (uint256);
        function dissolve() external;
    }
}

const MINIPOOL_MANAGER: &str = "rocketMinipoolManager";
const MINIPOOL_SETTINGS: &str = "rocketDAOProtocolSettingsMinipool";
const NODE_TRUSTED: &str = "rocketDAONodeTrusted";
const NODE_TRUSTED_ACTIONS: &str = "rocketDAONodeTrustedActions";

pub(crate) struct Contracts {
    minipool_manager: RocketMinipoolManager::RocketMinipoolManagerInstance<BlockchainProvider>,
    minipool_settings:
        RocketDAOProtocolSettingsMinipool::RocketDAOProtocolSettingsMinipoolInstance<
            BlockchainProvider,
        >,
    node_trusted: RocketDAONodeTrusted::RocketDAONodeTrustedInstance<BlockchainProvider>,
    node_trusted_actions:
        RocketDAONodeTrustedActions::RocketDAONodeTrustedActionsInstance<BlockchainProvider>,
    provider: BlockchainProvider,
}

impl Contracts {
    pub(crate) fn minipool_manager(
        &self,
    ) -> &RocketMinipoolManager::RocketMinipoolManagerInstance<BlockchainProvider> {
        &self.minipool_manager
    }

    pub(crate) fn minipool_settings(
        &self,
    ) -> &RocketDAOProtocolSettingsMinipool::RocketDAOProtocolSettingsMinipoolInstance<
        BlockchainProvider,
    > {
        &self.minipool_settings
    }

    pub(crate) fn node_trusted(
        &self,
    ) -> &RocketDAONodeTrusted::RocketDAONodeTrustedInstance<BlockchainProvider> {
        &self.node_trusted
    }

    pub(crate) fn node_trusted_actions_address(&self) -> Address {
        *self.node_trusted_actions.address()
    }

    /// Minipools are per-entity contracts, so instances are built on demand.
    pub(crate) fn minipool(
        &self,
        address: Address,
    ) -> RocketMinipool::RocketMinipoolInstance<BlockchainProvider> {
        RocketMinipool::new(address, self.provider.clone())
    }
}

/// Storage key under which the registry keeps a contract's address.
pub(crate) fn contract_address_key(name: &str) -> B256 {
    B256::from(keccak256_encode_packed(&[
        b"contract.address",
        name.as_bytes(),
    ]))
}

async fn resolve_address(
    storage: &RocketStorage::RocketStorageInstance<BlockchainProvider>,
    name: &'static str,
) -> Result<Address, BlockchainError> {
    let address = storage
        .getAddress(contract_address_key(name))
        .call()
        .await?;

    if address == Address::ZERO {
        return Err(BlockchainError::ContractNotRegistered { name });
    }

    tracing::debug!(contract = name, address = %address, "Resolved protocol contract");
    Ok(address)
}

pub(crate) async fn initialize_contracts(
    storage_address: Address,
    provider: &BlockchainProvider,
) -> Result<Contracts, BlockchainError> {
    let storage = RocketStorage::new(storage_address, provider.clone());

    Ok(Contracts {
        minipool_manager: RocketMinipoolManager::new(
            resolve_address(&storage, MINIPOOL_MANAGER).await?,
            provider.clone(),
        ),
        minipool_settings: RocketDAOProtocolSettingsMinipool::new(
            resolve_address(&storage, MINIPOOL_SETTINGS).await?,
            provider.clone(),
        ),
        node_trusted: RocketDAONodeTrusted::new(
            resolve_address(&storage, NODE_TRUSTED).await?,
            provider.clone(),
        ),
        node_trusted_actions: RocketDAONodeTrustedActions::new(
            resolve_address(&storage, NODE_TRUSTED_ACTIONS).await?,
            provider.clone(),
        ),
        provider: provider.clone(),
    })
}

#[cfg(test)]
mod tests {
    use alloy::primitives::keccak256;

    use super::*;

    #[test]
    fn contract_address_key_matches_packed_keccak() {
        let expected = keccak256(b"contract.addressrocketMinipoolManager");
        assert_eq!(contract_address_key(MINIPOOL_MANAGER), expected);
    }
}

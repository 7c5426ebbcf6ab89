use alloy::primitives::Address;

use crate::{error::BlockchainError, evm::EvmChain};

impl EvmChain {
    /// Whether `node` is a member of the trusted-node DAO.
    pub async fn get_member_exists(&self, node: Address) -> Result<bool, BlockchainError> {
        let exists = self
            .rpc_call(|| async {
                self.contracts()
                    .node_trusted()
                    .getMemberExists(node)
                    .call()
                    .await
            })
            .await?;

        Ok(exists)
    }

    /// Whether an open challenge exists against trusted member `node`.
    pub async fn get_member_is_challenged(&self, node: Address) -> Result<bool, BlockchainError> {
        let challenged = self
            .rpc_call(|| async {
                self.contracts()
                    .node_trusted()
                    .getMemberIsChallenged(node)
                    .call()
                    .await
            })
            .await?;

        Ok(challenged)
    }
}

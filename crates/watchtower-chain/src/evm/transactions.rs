use alloy::{
    network::TransactionBuilder,
    primitives::{Bytes, TxHash},
    providers::{PendingTransactionBuilder, Provider},
    rpc::types::{TransactionReceipt, TransactionRequest},
    sol_types::SolCall,
};

use super::{
    EvmChain, apply_gas_estimate_multiplier,
    contracts::{RocketDAONodeTrustedActions, RocketMinipool},
};
use crate::{GasInfo, OracleAction, TxFees, error::BlockchainError};

impl EvmChain {
    /// Unsigned request for `action`, sent from the node account.
    fn action_request(&self, action: &OracleAction) -> TransactionRequest {
        let (to, input): (_, Bytes) = match action {
            OracleAction::Dissolve { minipool } => {
                (*minipool, RocketMinipool::dissolveCall {}.abi_encode().into())
            }
            OracleAction::DecideChallenge { node } => (
                self.contracts().node_trusted_actions_address(),
                RocketDAONodeTrustedActions::actionChallengeDecideCall { nodeAddress: *node }
                    .abi_encode()
                    .into(),
            ),
        };

        TransactionRequest::default()
            .with_from(self.node_address())
            .with_to(to)
            .with_input(input)
    }

    /// Dry-run `action` and derive a safe gas limit from the estimate.
    pub async fn estimate_action_gas(
        &self,
        action: &OracleAction,
    ) -> Result<GasInfo, BlockchainError> {
        let request = self.action_request(action);
        let estimated_gas = self
            .rpc_call(|| async {
                let provider = self.provider();
                provider.estimate_gas(request).await
            })
            .await
            .map_err(|e| BlockchainError::rpc("eth_estimateGas", e))?;

        Ok(GasInfo {
            estimated_gas,
            safe_gas_limit: apply_gas_estimate_multiplier(estimated_gas),
        })
    }

    /// Sign and broadcast `action` with explicit fee cap, tip cap and gas limit.
    pub async fn send_action(
        &self,
        action: &OracleAction,
        fees: &TxFees,
    ) -> Result<TxHash, BlockchainError> {
        let request = self
            .action_request(action)
            .with_max_fee_per_gas(fees.max_fee_per_gas.saturating_to::<u128>())
            .with_max_priority_fee_per_gas(fees.max_priority_fee_per_gas.saturating_to::<u128>())
            .with_gas_limit(fees.gas_limit);

        let pending = self
            .rpc_call(|| async {
                let provider = self.provider();
                provider.send_transaction(request).await
            })
            .await
            .map_err(|e| BlockchainError::rpc("eth_sendRawTransaction", e))?;

        Ok(*pending.tx_hash())
    }

    /// Block until `tx_hash` is mined with the configured confirmations/timeout.
    pub async fn wait_for_transaction(&self, tx_hash: TxHash) -> Result<(), BlockchainError> {
        let provider = self.provider();
        PendingTransactionBuilder::new(provider.root().clone(), tx_hash)
            .with_required_confirmations(self.config().tx_confirmations())
            .with_timeout(self.config().tx_receipt_timeout())
            .watch()
            .await
            .map_err(BlockchainError::receipt)?;

        let receipt = self
            .rpc_call(|| async { mined_receipt(provider.as_ref(), tx_hash).await })
            .await?;

        tracing::debug!(
            tx_hash = %tx_hash,
            block_number = ?receipt.block_number,
            gas_used = receipt.gas_used,
            "Transaction mined"
        );
        Ok(())
    }
}

/// Receipt of a mined transaction; a reverted receipt is an error.
pub(crate) async fn mined_receipt<P: Provider>(
    provider: &P,
    tx_hash: TxHash,
) -> Result<TransactionReceipt, BlockchainError> {
    let receipt = provider
        .get_transaction_receipt(tx_hash)
        .await
        .map_err(|e| BlockchainError::rpc("eth_getTransactionReceipt", e))?
        .ok_or_else(|| BlockchainError::ReceiptFailed {
            reason: format!("no receipt for mined transaction {}", tx_hash),
            source: None,
        })?;

    if !receipt.status() {
        return Err(BlockchainError::TransactionReverted {
            tx_hash: tx_hash.to_string(),
        });
    }

    Ok(receipt)
}

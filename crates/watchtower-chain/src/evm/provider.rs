use std::sync::Arc;

use alloy::{
    network::{Ethereum, EthereumWallet},
    providers::{DynProvider, Provider, ProviderBuilder},
    transports::http::reqwest::Url,
};

use super::wallets::wallet_from_private_key;
use crate::{ChainConfig, error::BlockchainError};

/// Use Arc<DynProvider> for thread-safe sharing.
pub(crate) type BlockchainProvider = Arc<DynProvider<Ethereum>>;

/// Creates a provider with the given wallet.
///
/// Endpoints are tried in configured order; the first one that answers
/// `eth_blockNumber` is used for the lifetime of the process.
pub(crate) async fn initialize_provider_with_wallet(
    rpc_endpoints: &[String],
    wallet: EthereumWallet,
) -> Result<BlockchainProvider, BlockchainError> {
    let mut attempts = 0usize;

    for endpoint in rpc_endpoints {
        let url = match endpoint.parse::<Url>() {
            Ok(url) => url,
            Err(e) => {
                tracing::warn!("Invalid RPC URL '{}': {}", endpoint, e);
                continue;
            }
        };
        attempts += 1;

        let provider = ProviderBuilder::new()
            .wallet(wallet.clone())
            .connect_http(url);

        match provider.get_block_number().await {
            Ok(block) => {
                tracing::info!(
                    endpoint = %endpoint,
                    block,
                    "Execution client provider initialized"
                );
                return Ok(Arc::new(provider.erased()));
            }
            Err(e) => {
                tracing::warn!(
                    endpoint = %endpoint,
                    error = %e,
                    "RPC endpoint failed connectivity check"
                );
            }
        }
    }

    tracing::error!("All RPC endpoints failed connectivity check");
    Err(BlockchainError::RpcConnectionFailed { attempts })
}

/// Creates a provider signing with the node account from config.
pub(crate) async fn initialize_provider(
    config: &ChainConfig,
) -> Result<BlockchainProvider, BlockchainError> {
    let wallet = wallet_from_private_key(config.node_private_key())?;

    initialize_provider_with_wallet(config.rpc_endpoints(), wallet).await
}

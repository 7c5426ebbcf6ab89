//! Execution-chain binding for the oracle watchtower.
//!
//! Wraps an `alloy` provider signing with the trusted node's key and exposes
//! the protocol reads and maintenance transactions the oracle duties need.

mod config;
mod config_error;
mod error;
mod evm;
mod rpc_rate_limiter;
mod types;
mod utils;

pub use alloy::primitives::{Address, TxHash, U256};
pub use config::{ChainConfig, ChainConfigRaw};
pub use config_error::ConfigError;
pub use error::BlockchainError;
pub use evm::{EvmChain, FeeSource, FeeSuggestion, GasConfig};
pub use rpc_rate_limiter::RpcRateLimiter;
pub use types::{
    GasInfo, LatestBlock, MinipoolStatus, MinipoolStatusDetails, OracleAction, TxFees,
};
pub use utils::{format_wei_as_eth, format_wei_as_gwei, keccak256_encode_packed, parse_gwei_to_wei};

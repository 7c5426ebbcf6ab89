use std::time::Duration;

use alloy::{primitives::Address, signers::local::PrivateKeySigner};
use serde::{Deserialize, Serialize};

use crate::{ConfigError, evm::GasConfig};

/// Execution-client connection settings as read from configuration files.
///
/// **Secret handling**: the node private key should come from the
/// `WATCHTOWER_CHAIN__NODE_PRIVATE_KEY` env var rather than a checked-in file.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ChainConfigRaw {
    /// JSON-RPC endpoints of the execution client, tried in order at start-up.
    #[serde(default)]
    pub rpc_endpoints: Vec<String>,

    /// Private key of the trusted node account (hex, with or without 0x).
    pub node_private_key: Option<String>,

    /// Node account address. If omitted, it is derived from the private key.
    pub node_address: Option<String>,

    /// Address of the protocol storage registry all other contracts are resolved from.
    pub storage_address: String,

    /// Maximum RPC requests per second (optional rate limiting).
    /// Common values: 25 (free tier), 50-100 (paid tier), None (unlimited).
    pub max_rpc_requests_per_second: Option<u32>,

    /// Number of confirmations to wait for when fetching transaction receipts.
    pub tx_confirmations: u64,

    /// Timeout for waiting on transaction receipts in milliseconds.
    /// Set to 0 to disable the timeout.
    pub tx_receipt_timeout_ms: u64,

    /// Floor and ceiling applied to suggested fees.
    pub gas: GasConfig,
}

impl ChainConfigRaw {
    /// Checks that do not need the private key to be parsed.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.rpc_endpoints.is_empty() {
            return Err(ConfigError::InvalidConfig(
                "chain.rpc_endpoints must list at least one endpoint".to_string(),
            ));
        }
        if self.max_rpc_requests_per_second == Some(0) {
            return Err(ConfigError::InvalidConfig(
                "chain.max_rpc_requests_per_second must be greater than 0 when set".to_string(),
            ));
        }
        if self.gas.default_gas_price_wei > self.gas.max_gas_price_wei {
            return Err(ConfigError::InvalidConfig(format!(
                "chain.gas.default_gas_price_wei ({}) exceeds chain.gas.max_gas_price_wei ({})",
                self.gas.default_gas_price_wei, self.gas.max_gas_price_wei
            )));
        }
        Ok(())
    }

    /// Validate and derive the node account from its private key.
    pub fn resolve(self) -> Result<ChainConfig, ConfigError> {
        self.validate()?;

        let node_private_key = self.node_private_key.ok_or_else(|| {
            ConfigError::MissingSecret(
                "set WATCHTOWER_CHAIN__NODE_PRIVATE_KEY or chain.node_private_key".to_string(),
            )
        })?;
        let node_address = derive_evm_address_from_private_key(&node_private_key)?;

        if let Some(declared) = self.node_address.as_deref() {
            if parse_evm_address(declared)? != node_address {
                return Err(ConfigError::InvalidConfig(format!(
                    "chain.node_address {} does not match the private key's address {}",
                    declared, node_address
                )));
            }
        }

        Ok(ChainConfig {
            storage_address: parse_evm_address(&self.storage_address)?,
            rpc_endpoints: self.rpc_endpoints,
            node_private_key,
            node_address,
            max_rpc_requests_per_second: self.max_rpc_requests_per_second,
            tx_confirmations: self.tx_confirmations,
            tx_receipt_timeout_ms: self.tx_receipt_timeout_ms,
            gas: self.gas,
        })
    }
}

#[derive(Debug, Clone)]
pub struct ChainConfig {
    rpc_endpoints: Vec<String>,
    node_private_key: String,
    node_address: Address,
    storage_address: Address,
    max_rpc_requests_per_second: Option<u32>,
    tx_confirmations: u64,
    tx_receipt_timeout_ms: u64,
    gas: GasConfig,
}

impl ChainConfig {
    pub fn rpc_endpoints(&self) -> &[String] {
        &self.rpc_endpoints
    }

    pub fn node_private_key(&self) -> &str {
        &self.node_private_key
    }

    pub fn node_address(&self) -> Address {
        self.node_address
    }

    pub fn storage_address(&self) -> Address {
        self.storage_address
    }

    /// `None` means unlimited.
    pub fn max_rpc_requests_per_second(&self) -> Option<u32> {
        self.max_rpc_requests_per_second
    }

    pub fn tx_confirmations(&self) -> u64 {
        self.tx_confirmations
    }

    /// `None` when the configured timeout is 0.
    pub fn tx_receipt_timeout(&self) -> Option<Duration> {
        (self.tx_receipt_timeout_ms != 0).then(|| Duration::from_millis(self.tx_receipt_timeout_ms))
    }

    pub fn gas(&self) -> &GasConfig {
        &self.gas
    }
}

fn parse_evm_address(value: &str) -> Result<Address, ConfigError> {
    value
        .parse::<Address>()
        .map_err(|e| ConfigError::InvalidConfig(format!("invalid EVM address '{}': {}", value, e)))
}

fn derive_evm_address_from_private_key(private_key: &str) -> Result<Address, ConfigError> {
    let signer: PrivateKeySigner = private_key
        .parse()
        .map_err(|e| ConfigError::InvalidConfig(format!("invalid EVM private key: {}", e)))?;
    Ok(signer.address())
}

use alloy::{
    contract::Error as ContractError,
    providers::PendingTransactionError,
    signers::local::LocalSignerError,
    transports::{RpcError, TransportErrorKind},
};

#[derive(Debug, thiserror::Error)]
pub enum BlockchainError {
    // Start-up
    #[error("Invalid node private key (length: {key_length})")]
    InvalidPrivateKey {
        key_length: usize,
        #[source]
        source: LocalSignerError,
    },

    #[error("No RPC endpoint answered after trying {attempts} endpoint(s)")]
    RpcConnectionFailed { attempts: usize },

    #[error("Provider initialization failed: {reason}")]
    ProviderInit { reason: String },

    #[error("Contract '{name}' is not registered in protocol storage")]
    ContractNotRegistered { name: &'static str },

    #[error("Contract resolution failed: {reason}")]
    ContractInit { reason: String },

    // Reads
    #[error("Contract call failed: {0}")]
    Contract(#[from] ContractError),

    #[error("RPC request '{method}' failed: {reason}")]
    Rpc {
        method: &'static str,
        reason: String,
        #[source]
        source: Option<RpcError<TransportErrorKind>>,
    },

    #[error("Latest block not available")]
    LatestBlockUnavailable,

    #[error("Minipool {minipool} reported unknown status {status}")]
    UnknownMinipoolStatus { minipool: String, status: u8 },

    #[error("{what} {value} does not fit in 64 bits")]
    ValueOutOfRange { what: &'static str, value: String },

    // Transactions
    #[error("Waiting for transaction receipt failed: {reason}")]
    ReceiptFailed {
        reason: String,
        #[source]
        source: Option<PendingTransactionError>,
    },

    #[error("Transaction {tx_hash} reverted")]
    TransactionReverted { tx_hash: String },

    #[error("{0}")]
    Custom(String),
}

impl BlockchainError {
    /// Wrap a raw JSON-RPC failure with the method that produced it.
    pub(crate) fn rpc(method: &'static str, err: RpcError<TransportErrorKind>) -> Self {
        Self::Rpc {
            method,
            reason: err.to_string(),
            source: Some(err),
        }
    }

    pub(crate) fn receipt(err: PendingTransactionError) -> Self {
        Self::ReceiptFailed {
            reason: err.to_string(),
            source: Some(err),
        }
    }
}

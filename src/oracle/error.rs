use std::fmt;

use thiserror::Error;
use watchtower_chain::{BlockchainError, TxHash};

/// Failures that abort a whole oracle cycle or prevent a task from starting.
#[derive(Debug, Error)]
pub(crate) enum OracleError {
    /// A gate or scanner read failed; the cycle is retried on the next interval.
    #[error("Failed to read chain state: {0}")]
    Read(#[from] BlockchainError),

    #[error("Invalid gas policy: {0}")]
    Configuration(String),
}

/// Step of the per-candidate transaction pipeline that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SubmitStage {
    EstimateGas,
    ResolveMaxFee,
    SubmitTransaction,
    AwaitConfirmation,
}

impl SubmitStage {
    pub(crate) fn as_str(&self) -> &'static str {
        match self {
            SubmitStage::EstimateGas => "estimate gas",
            SubmitStage::ResolveMaxFee => "resolve max fee",
            SubmitStage::SubmitTransaction => "submit transaction",
            SubmitStage::AwaitConfirmation => "await confirmation",
        }
    }

    /// Metric label for the stage.
    pub(crate) fn label(&self) -> &'static str {
        match self {
            SubmitStage::EstimateGas => "failed:estimate_gas",
            SubmitStage::ResolveMaxFee => "failed:resolve_max_fee",
            SubmitStage::SubmitTransaction => "failed:submit_transaction",
            SubmitStage::AwaitConfirmation => "failed:await_confirmation",
        }
    }
}

impl fmt::Display for SubmitStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single candidate's pipeline failure, tagged with the failing stage.
#[derive(Debug, Error)]
#[error("{stage} failed: {source}")]
pub(crate) struct SubmitError {
    pub(crate) stage: SubmitStage,
    /// Set once the transaction has been broadcast.
    pub(crate) tx_hash: Option<TxHash>,
    #[source]
    pub(crate) source: BlockchainError,
}

impl SubmitError {
    pub(crate) fn new(stage: SubmitStage, source: BlockchainError) -> Self {
        Self {
            stage,
            tx_hash: None,
            source,
        }
    }

    pub(crate) fn with_tx_hash(mut self, tx_hash: TxHash) -> Self {
        self.tx_hash = Some(tx_hash);
        self
    }
}

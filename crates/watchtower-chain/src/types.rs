use std::fmt;

use alloy::primitives::{Address, U256};

/// Lifecycle stage of a minipool as stored on-chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MinipoolStatus {
    Initialized,
    Prelaunch,
    Staking,
    Withdrawable,
    Dissolved,
}

impl MinipoolStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            MinipoolStatus::Initialized => "Initialized",
            MinipoolStatus::Prelaunch => "Prelaunch",
            MinipoolStatus::Staking => "Staking",
            MinipoolStatus::Withdrawable => "Withdrawable",
            MinipoolStatus::Dissolved => "Dissolved",
        }
    }
}

impl TryFrom<u8> for MinipoolStatus {
    type Error = u8;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(MinipoolStatus::Initialized),
            1 => Ok(MinipoolStatus::Prelaunch),
            2 => Ok(MinipoolStatus::Staking),
            3 => Ok(MinipoolStatus::Withdrawable),
            4 => Ok(MinipoolStatus::Dissolved),
            other => Err(other),
        }
    }
}

impl fmt::Display for MinipoolStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Status of a minipool and the block time (UNIX seconds) it entered that status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MinipoolStatusDetails {
    pub status: MinipoolStatus,
    pub status_time: u64,
}

/// Header fields of the latest execution block the oracle needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LatestBlock {
    pub number: u64,
    pub timestamp: u64,
}

/// A corrective transaction a trusted node can submit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OracleAction {
    /// Dissolve a minipool stuck in prelaunch.
    Dissolve { minipool: Address },
    /// Decide an open challenge against a trusted node.
    DecideChallenge { node: Address },
}

impl OracleAction {
    pub fn name(&self) -> &'static str {
        match self {
            OracleAction::Dissolve { .. } => "dissolve",
            OracleAction::DecideChallenge { .. } => "decide-challenge",
        }
    }

    /// The entity the action is taken against.
    pub fn target(&self) -> Address {
        match self {
            OracleAction::Dissolve { minipool } => *minipool,
            OracleAction::DecideChallenge { node } => *node,
        }
    }
}

impl fmt::Display for OracleAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.name(), self.target())
    }
}

/// Result of a dry-run gas estimation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GasInfo {
    pub estimated_gas: u64,
    pub safe_gas_limit: u64,
}

/// Fee and gas parameters attached to a submitted transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TxFees {
    pub max_fee_per_gas: U256,
    pub max_priority_fee_per_gas: U256,
    pub gas_limit: u64,
}

//! Trusted-node oracle duties.
//!
//! Each cycle checks trusted membership, scans chain state, decides which
//! corrective actions are due and submits them one at a time. Per-candidate
//! failures are logged and isolated; only gate and scan failures abort a cycle.

mod approval;
mod collaborators;
mod error;
mod evaluator;
mod evm;
mod gas_policy;
mod gate;
mod orchestrator;
mod scanner;
mod submitter;
#[cfg(test)]
pub(crate) mod test_support;

pub(crate) use approval::{ApprovalConfig, HeadlessApprovalGate};
pub(crate) use collaborators::{
    ApprovalGate, ChainReader, GasEstimator, OracleServices, SigningAuthority, TransactionSink,
};
pub(crate) use error::{OracleError, SubmitError};
pub(crate) use gas_policy::{GasPolicy, GasPolicyConfig};
pub(crate) use orchestrator::{CycleReport, Duty, OracleTask};

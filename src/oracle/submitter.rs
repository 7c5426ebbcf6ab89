use watchtower_chain::{OracleAction, TxFees, TxHash, format_wei_as_gwei};

use super::{
    ApprovalGate, GasEstimator, TransactionSink,
    approval::CostQuote,
    error::{SubmitError, SubmitStage},
    gas_policy::GasPolicy,
};

/// How a candidate's pipeline ended when nothing failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Submission {
    Confirmed(TxHash),
    /// The approval gate rejected the cost; nothing was sent.
    Declined,
}

/// Runs the estimate, price, approve, send and confirm pipeline for one action.
pub(crate) struct TransactionSubmitter<'a> {
    estimator: &'a dyn GasEstimator,
    sink: &'a dyn TransactionSink,
    approval: &'a dyn ApprovalGate,
    policy: &'a GasPolicy,
}

impl<'a> TransactionSubmitter<'a> {
    pub(crate) fn new(
        estimator: &'a dyn GasEstimator,
        sink: &'a dyn TransactionSink,
        approval: &'a dyn ApprovalGate,
        policy: &'a GasPolicy,
    ) -> Self {
        Self {
            estimator,
            sink,
            approval,
            policy,
        }
    }

    pub(crate) async fn submit(&self, action: OracleAction) -> Result<Submission, SubmitError> {
        let gas = self
            .estimator
            .estimate_gas(&action)
            .await
            .map_err(|e| SubmitError::new(SubmitStage::EstimateGas, e))?;

        let gas_limit = self.policy.gas_limit().unwrap_or(gas.safe_gas_limit);

        let max_fee_per_gas = match self.policy.max_fee_per_gas() {
            Some(max_fee) => max_fee,
            None => self
                .estimator
                .suggest_max_fee_per_gas()
                .await
                .map_err(|e| SubmitError::new(SubmitStage::ResolveMaxFee, e))?,
        };

        let max_priority_fee_per_gas = self.policy.max_priority_fee_per_gas();
        let max_fee_per_gas = if max_fee_per_gas < max_priority_fee_per_gas {
            tracing::warn!(
                action = %action,
                max_fee_gwei = %format_wei_as_gwei(max_fee_per_gas),
                max_priority_fee_gwei = %format_wei_as_gwei(max_priority_fee_per_gas),
                "Max fee is below the priority fee; raising it to the priority fee"
            );
            max_priority_fee_per_gas
        } else {
            max_fee_per_gas
        };

        let fees = TxFees {
            max_fee_per_gas,
            max_priority_fee_per_gas,
            gas_limit,
        };

        if !self.approval.approve(&CostQuote { action, gas, fees }) {
            return Ok(Submission::Declined);
        }

        let tx_hash = self
            .sink
            .submit(&action, &fees)
            .await
            .map_err(|e| SubmitError::new(SubmitStage::SubmitTransaction, e))?;
        tracing::info!(action = %action, tx_hash = %tx_hash, "Transaction submitted");

        self.sink.wait_for_confirmation(tx_hash).await.map_err(|e| {
            SubmitError::new(SubmitStage::AwaitConfirmation, e).with_tx_hash(tx_hash)
        })?;

        Ok(Submission::Confirmed(tx_hash))
    }
}

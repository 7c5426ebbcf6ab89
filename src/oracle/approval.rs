use serde::{Deserialize, Serialize};
use watchtower_chain::{
    GasInfo, OracleAction, TxFees, U256, format_wei_as_eth, format_wei_as_gwei,
};

use super::{ApprovalGate, OracleError, gas_policy::GweiAmount};

/// Everything an approver needs to judge one pending transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct CostQuote {
    pub(crate) action: OracleAction,
    pub(crate) gas: GasInfo,
    pub(crate) fees: TxFees,
}

impl CostQuote {
    /// Cost if the transaction uses exactly the estimated gas at the max fee.
    pub(crate) fn estimated_cost(&self) -> U256 {
        U256::from(self.gas.estimated_gas).saturating_mul(self.fees.max_fee_per_gas)
    }

    /// Upper bound: the full gas limit at the max fee.
    pub(crate) fn max_cost(&self) -> U256 {
        U256::from(self.fees.gas_limit).saturating_mul(self.fees.max_fee_per_gas)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct ApprovalConfig {
    /// Decline transactions whose maximum cost exceeds this many gwei.
    #[serde(default)]
    pub max_cost_gwei: Option<GweiAmount>,
}

/// Non-interactive approver: reports the cost and approves unless it exceeds
/// the optional ceiling.
#[derive(Debug, Clone, Default)]
pub(crate) struct HeadlessApprovalGate {
    max_cost: Option<U256>,
}

impl HeadlessApprovalGate {
    pub(crate) fn new(max_cost: Option<U256>) -> Self {
        Self { max_cost }
    }

    pub(crate) fn from_config(config: &ApprovalConfig) -> Result<Self, OracleError> {
        let max_cost = config
            .max_cost_gwei
            .as_ref()
            .map(|amount| {
                amount.to_wei().map_err(|e| {
                    OracleError::Configuration(format!("approval.max_cost_gwei: {}", e))
                })
            })
            .transpose()?;
        Ok(Self::new(max_cost))
    }
}

impl ApprovalGate for HeadlessApprovalGate {
    fn approve(&self, quote: &CostQuote) -> bool {
        tracing::info!(
            action = %quote.action,
            estimated_gas = quote.gas.estimated_gas,
            gas_limit = quote.fees.gas_limit,
            max_fee_gwei = %format_wei_as_gwei(quote.fees.max_fee_per_gas),
            max_priority_fee_gwei = %format_wei_as_gwei(quote.fees.max_priority_fee_per_gas),
            "Transaction will cost up to {} - {} ETH",
            format_wei_as_eth(quote.estimated_cost()),
            format_wei_as_eth(quote.max_cost()),
        );

        match self.max_cost {
            Some(ceiling) if quote.max_cost() > ceiling => {
                tracing::warn!(
                    action = %quote.action,
                    max_cost_eth = %format_wei_as_eth(quote.max_cost()),
                    ceiling_eth = %format_wei_as_eth(ceiling),
                    "Transaction cost exceeds the approval ceiling; skipping"
                );
                false
            }
            _ => true,
        }
    }
}

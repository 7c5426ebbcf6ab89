use serde::{Deserialize, Serialize};
use watchtower_chain::{U256, format_wei_as_gwei, parse_gwei_to_wei};

use super::OracleError;

/// Priority fee used when the operator leaves it unset or zero.
pub(crate) const DEFAULT_MAX_PRIORITY_FEE_GWEI: u64 = 2;

const WEI_PER_GWEI: u64 = 1_000_000_000;

/// A gwei amount as written in config: a decimal string, or a bare number
/// when it arrives through an environment variable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub(crate) enum GweiAmount {
    Text(String),
    Whole(u64),
    Fraction(f64),
}

impl GweiAmount {
    pub(crate) fn to_wei(&self) -> Result<U256, String> {
        match self {
            GweiAmount::Text(text) => parse_gwei_to_wei(text),
            GweiAmount::Whole(gwei) => Ok(U256::from(*gwei) * U256::from(WEI_PER_GWEI)),
            GweiAmount::Fraction(gwei) => parse_gwei_to_wei(&gwei.to_string()),
        }
    }
}

/// Operator fee and gas-limit overrides for automated submissions.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct GasPolicyConfig {
    /// Fixed max fee per gas; unset or zero uses the client's suggestion.
    #[serde(default)]
    pub max_fee_gwei: Option<GweiAmount>,
    /// Priority fee per gas; unset or zero falls back to the default.
    #[serde(default)]
    pub max_priority_fee_gwei: Option<GweiAmount>,
    /// Fixed gas limit; unset or zero uses the estimate's safe limit.
    #[serde(default)]
    pub gas_limit: Option<u64>,
}

/// Resolved gas policy. The priority fee is always non-zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct GasPolicy {
    max_fee_per_gas: Option<U256>,
    max_priority_fee_per_gas: U256,
    gas_limit: Option<u64>,
}

impl GasPolicy {
    pub(crate) fn new(
        max_fee_per_gas: Option<U256>,
        max_priority_fee_per_gas: Option<U256>,
        gas_limit: Option<u64>,
    ) -> Self {
        let max_priority_fee_per_gas = match max_priority_fee_per_gas.filter(|fee| !fee.is_zero()) {
            Some(fee) => fee,
            None => {
                let fee = default_max_priority_fee_per_gas();
                tracing::warn!(
                    default_gwei = %format_wei_as_gwei(fee),
                    "Priority fee is not set or is zero; using the default"
                );
                fee
            }
        };

        Self {
            max_fee_per_gas: max_fee_per_gas.filter(|fee| !fee.is_zero()),
            max_priority_fee_per_gas,
            gas_limit: gas_limit.filter(|limit| *limit != 0),
        }
    }

    pub(crate) fn from_config(config: &GasPolicyConfig) -> Result<Self, OracleError> {
        let max_fee = parse_optional(config.max_fee_gwei.as_ref(), "gas_policy.max_fee_gwei")?;
        let max_priority_fee = parse_optional(
            config.max_priority_fee_gwei.as_ref(),
            "gas_policy.max_priority_fee_gwei",
        )?;

        Ok(Self::new(max_fee, max_priority_fee, config.gas_limit))
    }

    /// Pinned max fee per gas, if any.
    pub(crate) fn max_fee_per_gas(&self) -> Option<U256> {
        self.max_fee_per_gas
    }

    pub(crate) fn max_priority_fee_per_gas(&self) -> U256 {
        self.max_priority_fee_per_gas
    }

    /// Pinned gas limit, if any.
    pub(crate) fn gas_limit(&self) -> Option<u64> {
        self.gas_limit
    }
}

pub(crate) fn default_max_priority_fee_per_gas() -> U256 {
    U256::from(DEFAULT_MAX_PRIORITY_FEE_GWEI) * U256::from(WEI_PER_GWEI)
}

fn parse_optional(
    amount: Option<&GweiAmount>,
    field: &str,
) -> Result<Option<U256>, OracleError> {
    amount
        .map(|amount| {
            amount
                .to_wei()
                .map_err(|e| OracleError::Configuration(format!("{}: {}", field, e)))
        })
        .transpose()
}

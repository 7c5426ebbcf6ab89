//! In-memory chain and approver that record every call made by the oracle core.

#![allow(clippy::unwrap_used)]

use std::{
    collections::{HashMap, HashSet},
    sync::{
        Mutex,
        atomic::{AtomicUsize, Ordering},
    },
    time::Duration,
};

use async_trait::async_trait;
use watchtower_chain::{
    Address, BlockchainError, GasInfo, LatestBlock, MinipoolStatus, MinipoolStatusDetails,
    OracleAction, TxFees, TxHash, U256,
};

use super::{
    ApprovalGate, ChainReader, GasEstimator, SigningAuthority, TransactionSink,
    approval::CostQuote,
};

pub(crate) fn gwei(amount: u64) -> U256 {
    U256::from(amount) * U256::from(1_000_000_000u64)
}

/// Distinct, recognisable address for the minipool at `index`.
pub(crate) fn minipool_address(index: usize) -> Address {
    let mut bytes = [0u8; 20];
    bytes[0] = 0xaa;
    bytes[12..].copy_from_slice(&(index as u64).to_be_bytes());
    Address::from(bytes)
}

fn injected(what: &str) -> BlockchainError {
    BlockchainError::Custom(format!("injected {} failure", what))
}

#[derive(Default)]
struct Calls {
    reads: Vec<&'static str>,
    /// Requested minipool and how many status reads were in flight when it started.
    status_requests: Vec<(Address, usize)>,
    estimates: Vec<OracleAction>,
    fee_suggestions: usize,
    submissions: Vec<(OracleAction, TxFees)>,
    sent: HashMap<TxHash, Address>,
    confirmations: Vec<TxHash>,
    pipeline: Vec<String>,
}

pub(crate) struct MockChain {
    account: Address,
    synced: bool,
    member: bool,
    fail_membership: bool,
    challenged: bool,
    minipools: Vec<(Address, MinipoolStatusDetails)>,
    block_time: u64,
    launch_timeout: Duration,
    fail_latest_block: bool,
    failing_status: HashSet<Address>,
    failing_estimates: HashSet<Address>,
    estimate: GasInfo,
    suggested_fee: U256,
    fail_fee_suggestion: bool,
    fail_send: bool,
    fail_confirmation: bool,
    confirmation_delay: Duration,
    in_flight: AtomicUsize,
    calls: Mutex<Calls>,
}

impl MockChain {
    pub(crate) fn trusted_member() -> Self {
        Self {
            account: Address::repeat_byte(0x42),
            synced: true,
            member: true,
            fail_membership: false,
            challenged: false,
            minipools: Vec::new(),
            block_time: 1_000_000,
            launch_timeout: Duration::from_secs(86_400),
            fail_latest_block: false,
            failing_status: HashSet::new(),
            failing_estimates: HashSet::new(),
            estimate: GasInfo {
                estimated_gas: 100_000,
                safe_gas_limit: 150_000,
            },
            suggested_fee: gwei(20),
            fail_fee_suggestion: false,
            fail_send: false,
            fail_confirmation: false,
            confirmation_delay: Duration::ZERO,
            in_flight: AtomicUsize::new(0),
            calls: Mutex::new(Calls::default()),
        }
    }

    pub(crate) fn non_member() -> Self {
        Self {
            member: false,
            ..Self::trusted_member()
        }
    }

    pub(crate) fn syncing(mut self) -> Self {
        self.synced = false;
        self
    }

    pub(crate) fn with_minipool(
        mut self,
        address: Address,
        status: MinipoolStatus,
        status_time: u64,
    ) -> Self {
        self.minipools.push((
            address,
            MinipoolStatusDetails {
                status,
                status_time,
            },
        ));
        self
    }

    pub(crate) fn with_block_time(mut self, block_time: u64) -> Self {
        self.block_time = block_time;
        self
    }

    pub(crate) fn with_launch_timeout(mut self, launch_timeout: Duration) -> Self {
        self.launch_timeout = launch_timeout;
        self
    }

    pub(crate) fn with_challenge(mut self, challenged: bool) -> Self {
        self.challenged = challenged;
        self
    }

    pub(crate) fn with_estimate(mut self, estimated_gas: u64, safe_gas_limit: u64) -> Self {
        self.estimate = GasInfo {
            estimated_gas,
            safe_gas_limit,
        };
        self
    }

    pub(crate) fn with_suggested_fee(mut self, fee: U256) -> Self {
        self.suggested_fee = fee;
        self
    }

    pub(crate) fn with_failing_membership(mut self) -> Self {
        self.fail_membership = true;
        self
    }

    pub(crate) fn with_failing_latest_block(mut self) -> Self {
        self.fail_latest_block = true;
        self
    }

    pub(crate) fn with_failing_status(mut self, minipool: Address) -> Self {
        self.failing_status.insert(minipool);
        self
    }

    pub(crate) fn with_failing_estimate(mut self, target: Address) -> Self {
        self.failing_estimates.insert(target);
        self
    }

    pub(crate) fn with_failing_fee_suggestion(mut self) -> Self {
        self.fail_fee_suggestion = true;
        self
    }

    pub(crate) fn with_failing_send(mut self) -> Self {
        self.fail_send = true;
        self
    }

    pub(crate) fn with_failing_confirmation(mut self) -> Self {
        self.fail_confirmation = true;
        self
    }

    /// Mined-after delay applied to every confirmation wait.
    pub(crate) fn with_confirmation_delay(mut self, delay: Duration) -> Self {
        self.confirmation_delay = delay;
        self
    }

    pub(crate) fn reads(&self) -> Vec<&'static str> {
        self.calls.lock().unwrap().reads.clone()
    }

    pub(crate) fn status_requests(&self) -> Vec<Address> {
        self.calls
            .lock()
            .unwrap()
            .status_requests
            .iter()
            .map(|(address, _)| *address)
            .collect()
    }

    /// Sizes of the concurrent groups status reads were issued in.
    pub(crate) fn status_batch_sizes(&self) -> Vec<usize> {
        let mut sizes: Vec<usize> = Vec::new();
        for (_, in_flight) in &self.calls.lock().unwrap().status_requests {
            match sizes.last_mut() {
                Some(size) if *in_flight != 0 => *size += 1,
                _ => sizes.push(1),
            }
        }
        sizes
    }

    pub(crate) fn estimates(&self) -> Vec<OracleAction> {
        self.calls.lock().unwrap().estimates.clone()
    }

    pub(crate) fn fee_suggestions(&self) -> usize {
        self.calls.lock().unwrap().fee_suggestions
    }

    pub(crate) fn submissions(&self) -> Vec<(OracleAction, TxFees)> {
        self.calls.lock().unwrap().submissions.clone()
    }

    pub(crate) fn confirmations(&self) -> Vec<TxHash> {
        self.calls.lock().unwrap().confirmations.clone()
    }

    /// Estimator and sink calls in the order they happened.
    pub(crate) fn pipeline_log(&self) -> Vec<String> {
        self.calls.lock().unwrap().pipeline.clone()
    }

    fn record_read(&self, name: &'static str) {
        self.calls.lock().unwrap().reads.push(name);
    }
}

#[async_trait]
impl ChainReader for MockChain {
    async fn is_synced(&self) -> Result<bool, BlockchainError> {
        Ok(self.synced)
    }

    async fn minipool_addresses(&self) -> Result<Vec<Address>, BlockchainError> {
        self.record_read("minipool_addresses");
        Ok(self.minipools.iter().map(|(address, _)| *address).collect())
    }

    async fn launch_timeout(&self) -> Result<Duration, BlockchainError> {
        self.record_read("launch_timeout");
        Ok(self.launch_timeout)
    }

    async fn latest_block(&self) -> Result<LatestBlock, BlockchainError> {
        self.record_read("latest_block");
        if self.fail_latest_block {
            return Err(injected("latest block"));
        }
        Ok(LatestBlock {
            number: 1,
            timestamp: self.block_time,
        })
    }

    async fn minipool_status_details(
        &self,
        minipool: Address,
    ) -> Result<MinipoolStatusDetails, BlockchainError> {
        let in_flight = self.in_flight.fetch_add(1, Ordering::SeqCst);
        {
            let mut calls = self.calls.lock().unwrap();
            calls.reads.push("minipool_status_details");
            calls.status_requests.push((minipool, in_flight));
        }

        if self.failing_status.contains(&minipool) {
            self.in_flight.fetch_sub(1, Ordering::SeqCst);
            return Err(injected("status"));
        }

        // Stay in flight until every read of the batch has started.
        tokio::task::yield_now().await;
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        self.minipools
            .iter()
            .find(|(address, _)| *address == minipool)
            .map(|(_, details)| *details)
            .ok_or_else(|| injected("unknown minipool"))
    }

    async fn is_challenged(&self, _node: Address) -> Result<bool, BlockchainError> {
        self.record_read("is_challenged");
        Ok(self.challenged)
    }

    async fn is_trusted_member(&self, _node: Address) -> Result<bool, BlockchainError> {
        self.record_read("is_trusted_member");
        if self.fail_membership {
            return Err(injected("membership"));
        }
        Ok(self.member)
    }
}

impl SigningAuthority for MockChain {
    fn account(&self) -> Address {
        self.account
    }
}

#[async_trait]
impl GasEstimator for MockChain {
    async fn estimate_gas(&self, action: &OracleAction) -> Result<GasInfo, BlockchainError> {
        {
            let mut calls = self.calls.lock().unwrap();
            calls.estimates.push(*action);
            calls.pipeline.push(format!("estimate {}", action.target()));
        }
        if self.failing_estimates.contains(&action.target()) {
            return Err(injected("estimate"));
        }
        Ok(self.estimate)
    }

    async fn suggest_max_fee_per_gas(&self) -> Result<U256, BlockchainError> {
        {
            let mut calls = self.calls.lock().unwrap();
            calls.fee_suggestions += 1;
            calls.pipeline.push("suggest".to_string());
        }
        if self.fail_fee_suggestion {
            return Err(injected("fee suggestion"));
        }
        Ok(self.suggested_fee)
    }
}

#[async_trait]
impl TransactionSink for MockChain {
    async fn submit(
        &self,
        action: &OracleAction,
        fees: &TxFees,
    ) -> Result<TxHash, BlockchainError> {
        let mut calls = self.calls.lock().unwrap();
        calls.pipeline.push(format!("submit {}", action.target()));
        if self.fail_send {
            return Err(injected("send"));
        }
        calls.submissions.push((*action, *fees));
        let tx_hash = TxHash::with_last_byte(calls.submissions.len() as u8);
        calls.sent.insert(tx_hash, action.target());
        Ok(tx_hash)
    }

    async fn wait_for_confirmation(&self, tx_hash: TxHash) -> Result<(), BlockchainError> {
        if !self.confirmation_delay.is_zero() {
            tokio::time::sleep(self.confirmation_delay).await;
        }
        let mut calls = self.calls.lock().unwrap();
        let target = calls.sent.get(&tx_hash).copied().unwrap_or_default();
        calls.pipeline.push(format!("confirm {}", target));
        calls.confirmations.push(tx_hash);
        if self.fail_confirmation {
            return Err(injected("confirmation"));
        }
        Ok(())
    }
}

enum Decision {
    Approve,
    Decline,
    DeclineTarget(Address),
}

/// Approval gate with a fixed answer that keeps every quote it was shown.
pub(crate) struct RecordingApproval {
    decision: Decision,
    quotes: Mutex<Vec<CostQuote>>,
}

impl RecordingApproval {
    fn with_decision(decision: Decision) -> Self {
        Self {
            decision,
            quotes: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn approving() -> Self {
        Self::with_decision(Decision::Approve)
    }

    pub(crate) fn declining() -> Self {
        Self::with_decision(Decision::Decline)
    }

    pub(crate) fn declining_target(target: Address) -> Self {
        Self::with_decision(Decision::DeclineTarget(target))
    }

    pub(crate) fn quotes(&self) -> Vec<CostQuote> {
        self.quotes.lock().unwrap().clone()
    }
}

impl ApprovalGate for RecordingApproval {
    fn approve(&self, quote: &CostQuote) -> bool {
        self.quotes.lock().unwrap().push(*quote);
        match self.decision {
            Decision::Approve => true,
            Decision::Decline => false,
            Decision::DeclineTarget(target) => quote.action.target() != target,
        }
    }
}

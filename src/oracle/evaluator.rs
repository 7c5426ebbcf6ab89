use std::time::Duration;

use watchtower_chain::{Address, MinipoolStatus, MinipoolStatusDetails};

use super::scanner::{ChallengeScan, MinipoolScan};

/// A minipool has timed out once it has been in prelaunch for at least the
/// launch timeout, measured against the block time.
pub(crate) fn is_timed_out(
    details: &MinipoolStatusDetails,
    block_time: u64,
    launch_timeout: Duration,
) -> bool {
    if details.status != MinipoolStatus::Prelaunch {
        return false;
    }
    let elapsed = i128::from(block_time) - i128::from(details.status_time);
    elapsed >= i128::from(launch_timeout.as_secs())
}

/// Timed out minipools in scan order.
pub(crate) fn timed_out_minipools(scan: &MinipoolScan) -> Vec<Address> {
    scan.minipools
        .iter()
        .filter(|minipool| is_timed_out(&minipool.details, scan.block_time, scan.launch_timeout))
        .map(|minipool| minipool.address)
        .collect()
}

pub(crate) fn challenge_needs_decision(scan: &ChallengeScan) -> bool {
    scan.challenged
}

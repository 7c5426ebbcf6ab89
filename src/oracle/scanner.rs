use std::time::Duration;

use futures::future::try_join_all;
use watchtower_chain::{Address, MinipoolStatusDetails};

use super::{ChainReader, OracleError};

/// Number of minipool status reads issued concurrently.
pub(crate) const MINIPOOL_STATUS_BATCH_SIZE: usize = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct MinipoolCandidate {
    pub(crate) address: Address,
    pub(crate) details: MinipoolStatusDetails,
}

/// Facts needed to decide which minipools have timed out.
#[derive(Debug, Clone)]
pub(crate) struct MinipoolScan {
    /// Timestamp of the latest block; the reference clock for timeouts.
    pub(crate) block_time: u64,
    pub(crate) launch_timeout: Duration,
    /// In manager index order.
    pub(crate) minipools: Vec<MinipoolCandidate>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ChallengeScan {
    pub(crate) node: Address,
    pub(crate) challenged: bool,
}

/// Read every minipool's status together with the launch timeout and latest block.
///
/// Statuses are fetched in batches of [`MINIPOOL_STATUS_BATCH_SIZE`]; the first
/// failing read fails the scan and later batches are never issued.
pub(crate) async fn scan_minipools(reader: &dyn ChainReader) -> Result<MinipoolScan, OracleError> {
    let (addresses, launch_timeout, latest_block) = tokio::try_join!(
        reader.minipool_addresses(),
        reader.launch_timeout(),
        reader.latest_block(),
    )?;

    let mut minipools = Vec::with_capacity(addresses.len());
    for (batch_index, batch) in addresses.chunks(MINIPOOL_STATUS_BATCH_SIZE).enumerate() {
        let statuses = try_join_all(batch.iter().map(|&address| async move {
            let details = reader.minipool_status_details(address).await?;
            Ok::<_, OracleError>(MinipoolCandidate { address, details })
        }))
        .await
        .inspect_err(|e| {
            tracing::debug!(batch = batch_index, error = %e, "Minipool status batch failed");
        })?;
        minipools.extend(statuses);
    }

    tracing::debug!(
        block_number = latest_block.number,
        block_time = latest_block.timestamp,
        minipools = minipools.len(),
        "Scanned minipool statuses"
    );

    Ok(MinipoolScan {
        block_time: latest_block.timestamp,
        launch_timeout,
        minipools,
    })
}

pub(crate) async fn scan_challenge(
    reader: &dyn ChainReader,
    node: Address,
) -> Result<ChallengeScan, OracleError> {
    let challenged = reader.is_challenged(node).await?;
    Ok(ChallengeScan { node, challenged })
}

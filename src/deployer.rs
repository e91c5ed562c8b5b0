use crate::contracts::{OwnershipTransferred, decode_ownership_transferred};
use crate::rpc::ChainReader;
use alloy::rpc::types::{BlockNumberOrTag, Filter, Log};
use alloy::sol_types::SolEvent;
use alloy_primitives::{Address, B256};
use anyhow::{Context, Result};
use tracing::{debug, info, warn};

/// Deployer of a single farm, as read from its ownership-transfer history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FarmDeployer {
    /// Position of the farm in the factory list.
    pub index: usize,
    pub farm: Address,
    /// `newOwner` of the last matching transfer, `None` if nothing matched.
    pub deployer: Option<Address>,
    pub block_number: Option<u64>,
    pub transaction_hash: Option<B256>,
    pub matched_events: usize,
}

pub async fn list_farms<R: ChainReader>(reader: &R, factory: Address) -> Result<Vec<Address>> {
    info!("Fetching farm list from factory {:?}", factory);

    let farms = reader
        .farm_list(factory)
        .await
        .with_context(|| format!("Failed to fetch farm list from factory {factory:?}"))?;

    info!("Factory returned {} farms", farms.len());
    Ok(farms)
}

/// Ownership transfers away from the zero address emitted by `farm`, i.e. the
/// transfer recorded when the farm was initialised.
pub fn ownership_filter(farm: Address, start_block: u64) -> Filter {
    Filter::new()
        .address(farm)
        .event_signature(OwnershipTransferred::SIGNATURE_HASH)
        .topic1(Address::ZERO.into_word())
        .from_block(start_block)
        .to_block(BlockNumberOrTag::Latest)
}

/// Folds the matching logs of one farm into its deployer.
///
/// Logs are applied in the order the node returned them and each one
/// overwrites the previous result, so the last transfer wins.
pub fn resolve_deployer(index: usize, farm: Address, logs: &[Log]) -> Result<FarmDeployer> {
    let mut result = FarmDeployer {
        index,
        farm,
        deployer: None,
        block_number: None,
        transaction_hash: None,
        matched_events: logs.len(),
    };

    for (position, log) in logs.iter().enumerate() {
        let event = decode_ownership_transferred(log).with_context(|| {
            format!("Failed to decode OwnershipTransferred log #{position} of farm {farm:?}")
        })?;
        debug!(
            "Farm {:?}: ownership {:?} -> {:?}",
            farm, event.previousOwner, event.newOwner
        );

        result.deployer = Some(event.newOwner);
        result.block_number = log.block_number;
        result.transaction_hash = log.transaction_hash;
    }

    Ok(result)
}

pub async fn fetch_deployer<R: ChainReader>(
    reader: &R,
    index: usize,
    farm: Address,
    start_block: u64,
) -> Result<FarmDeployer> {
    let filter = ownership_filter(farm, start_block);
    let logs = reader
        .get_logs(&filter)
        .await
        .with_context(|| format!("Failed to fetch ownership logs for farm {farm:?}"))?;

    let result = resolve_deployer(index, farm, &logs)?;

    match result.deployer {
        Some(deployer) if result.matched_events > 1 => warn!(
            "Farm {:?} has {} ownership transfers from the zero address, keeping the last ({:?})",
            farm, result.matched_events, deployer
        ),
        Some(_) => {}
        None => warn!(
            "No ownership transfer from the zero address found for farm {:?} since block {}",
            farm, start_block
        ),
    }

    Ok(result)
}
